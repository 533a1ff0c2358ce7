pub mod config;
pub mod error;
pub mod i18n;
pub mod journal;
pub mod language;
pub mod ledger;
pub mod profile;
pub mod scripted;
pub mod session;
pub mod store;
pub mod tasks;

// Re-export common error type
pub use error::AmigoError;
pub use language::Language;
