//! tabdeck Storage Layer
//!
//! Client-side key-value persistence. The SQLite-backed [`Database`] keeps
//! settings across restarts; [`MemoryStore`] serves tests and hosts that
//! do not persist anything.

mod database;
mod error;
mod kv;
mod migrations;

pub use database::Database;
pub use error::StorageError;
pub use kv::{KeyValueStore, MemoryStore};

pub type Result<T> = std::result::Result<T, StorageError>;
