//! The key-value store that holds the persisted snapshot and settings.
//!
//! Values are JSON documents stored as strings. The `Store` trait is the seam between the ledger
//! and wherever the data lives: `FileStore` keeps one file per key in the data directory and
//! `MemoryStore` keeps everything in a map for tests.

mod file_store;
mod memory_store;

use crate::error::Res;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// The key under which the transaction snapshot is stored.
pub const TRANSACTIONS: &str = "transactions";

/// The key under which the notification settings are stored.
pub const TELEGRAM_SETTINGS: &str = "telegramSettings";

/// A minimal string-to-string store.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is nothing there.
    async fn get(&self, key: &str) -> Res<Option<String>>;

    /// Stores `value` under `key`, replacing anything that was there.
    async fn set(&self, key: &str, value: &str) -> Res<()>;

    /// Removes `key`. Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Res<()>;
}
