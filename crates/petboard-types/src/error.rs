use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid pet id: {0}")]
    InvalidId(String),

    #[error("invalid pet reference: {0:?}")]
    InvalidReference(String),
}
