//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] tabdeck_storage::StorageError),

    #[error("Panel error: {0}")]
    Panel(#[from] tabdeck_panels::PanelError),

    #[error("Load error: {0}")]
    Load(#[from] tabdeck_panels::LoadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Container already mounted: {0}")]
    AlreadyMounted(String),

    #[error("Container not mounted: {0}")]
    NotMounted(String),
}
