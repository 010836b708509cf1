use async_trait::async_trait;

use crate::entity::BotError;

mod file;
mod memory;
mod postgres;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// A set of named slots holding raw bytes that survive restarts
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, BotError>;
    async fn write(&self, key: &str, value: &[u8]) -> Result<(), BotError>;
    /// Removing a key that does not exist is not an error
    async fn delete(&self, key: &str) -> Result<(), BotError>;
}
