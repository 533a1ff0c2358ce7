//! Low-level file storage.

pub mod atomic_file;
pub mod file_medium;
pub mod memory_medium;

pub use atomic_file::AtomicTextFile;
pub use file_medium::FileMedium;
pub use memory_medium::{MemoryMedium, UnavailableMedium};
