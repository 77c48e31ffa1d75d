//! Repository backends for tinylink.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
pub use tinylink_core::{Repository, StorageError};
