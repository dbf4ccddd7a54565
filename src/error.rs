//! Error types for timetrack.

use thiserror::Error;

/// Errors surfaced by the timer core and its collaborators.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A timer with this identifier is already registered.
    #[error("Duplicated timer identifier: {0}")]
    DuplicateIdentifier(String),

    /// No timer with this identifier is registered.
    #[error("Timer identifier not found: {0}")]
    IdentifierNotFound(String),

    /// User input could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or saved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A storage collaborator failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TrackerError {
    /// Whether this error is about an identifier (conflict or absence).
    #[must_use]
    pub const fn is_identifier_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateIdentifier(_) | Self::IdentifierNotFound(_)
        )
    }
}
