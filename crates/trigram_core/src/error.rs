//! Error types for the combat core.
//!
//! Gameplay-level failures (denied stance changes, missed attacks) are not
//! errors; they are returned as data. The variants here cover data-integrity
//! problems that must surface at load time and misuse of a finished bout.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for the combat core.
#[derive(Debug, Error)]
pub enum GameError {
    /// Catalog failed integrity validation.
    #[error("Catalog validation failed with {} error(s): {}", .0.len(), .0.join("; "))]
    CatalogValidation(Vec<String>),

    /// Data file parsing error.
    #[error("Failed to parse data '{source_name}': {message}")]
    DataParseError {
        /// Name of the file or source that failed to parse.
        source_name: String,
        /// Error message.
        message: String,
    },

    /// Referenced vital point does not exist in the catalog.
    #[error("Unknown vital point: {0}")]
    UnknownVitalPoint(String),

    /// Referenced technique does not exist in the catalog.
    #[error("Unknown technique: {0}")]
    UnknownTechnique(String),

    /// Operation is not valid in the current bout state.
    #[error("Invalid bout state: {0}")]
    InvalidState(String),

    /// Snapshot encoding or decoding failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}
