//! Panel error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Panel not found: {0}")]
    NotFound(String),

    #[error("Panel is disabled: {0}")]
    Disabled(String),

    #[error("Duplicate panel id: {0}")]
    Duplicate(String),

    #[error("Invalid panel id: {0:?}")]
    InvalidId(String),

    #[error("Container id cannot be empty")]
    MissingContainer,
}
