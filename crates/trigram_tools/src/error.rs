//! Tool error types.

use std::path::PathBuf;

use thiserror::Error;
use trigram_core::error::GameError;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors surfaced by the command-line tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Reading a data file or directory failed.
    #[error("Cannot read '{}': {source}", path.display())]
    Io {
        /// File or directory being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A data file failed to parse or validate.
    #[error("{}: {source}", path.display())]
    InvalidData {
        /// Offending file.
        path: PathBuf,
        /// What the core rejected.
        source: GameError,
    },

    /// A directory held no `.ron` files.
    #[error("No data files found in '{}'", .0.display())]
    NoDataFiles(PathBuf),

    /// Encoding the export failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// An argument did not name a known value.
    #[error("Unknown {kind}: '{value}'")]
    UnknownArgument {
        /// What was expected.
        kind: &'static str,
        /// What was given.
        value: String,
    },
}
