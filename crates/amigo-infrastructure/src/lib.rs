pub mod config_storage;
pub mod dictionaries;
pub mod paths;
pub mod storage;

pub use config_storage::ConfigStorage;
pub use dictionaries::{EmbeddedDictionarySource, LocalesDirSource};
pub use paths::AmigoPaths;
pub use storage::{AtomicTextFile, FileMedium, MemoryMedium, UnavailableMedium};
