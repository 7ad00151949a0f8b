pub mod config;
pub mod memory;
pub mod sqlite;

pub use config::SqliteConfig;
pub use linkstash_core::repository::{ReadRepository, Repository, Result};
pub use linkstash_core::{Link, StorageError};
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
