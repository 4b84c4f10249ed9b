//! Key-value storage for the persisted collections.
//!
//! Each collection lives under one string key and is always written whole.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

use thiserror::Error;

/// Key holding the favorites collection
pub const FAVORITES_KEY: &str = "favorites";

/// Key holding the search history collection
pub const HISTORY_KEY: &str = "searchHistory";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },

    #[error("Stored data could not be read: {0}")]
    Deserialization(String),
}

/// Storage capability the collections are persisted through
pub trait Store {
    /// Read the value stored under `key`, if any
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`
    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key` entirely
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}
