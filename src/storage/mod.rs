//! Synchronous string-keyed persistence used by the profile store

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("write rejected: {0}")]
    Rejected(String),
}

pub trait KeyValueStore {
    /// Value stored under key, or None if absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Store value under key; on error the previous value is left in place
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}
