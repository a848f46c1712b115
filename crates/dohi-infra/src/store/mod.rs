//! Key-value store implementations behind [`dohi_core::ports::KvStore`]

pub mod file;
pub mod memory;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;
