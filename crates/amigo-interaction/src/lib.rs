pub mod gemini_client;
pub mod offline;

pub use gemini_client::GeminiGenerationClient;
pub use offline::OfflineGenerationClient;
