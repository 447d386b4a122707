//! Error types for netlist transformations.

use thiserror::Error;

/// Result type for netlist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while transforming a circuit description.
#[derive(Debug, Error)]
pub enum Error {
    /// A structural marker expected in the circuit description is missing.
    #[error("structural marker not found: {0}")]
    NotFound(String),

    /// A caller-supplied argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    pub(crate) fn terminator_missing() -> Self {
        Error::NotFound("`.end` terminator line".to_string())
    }
}
