//! Error handling module for OTrim

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that end the process; everything else is shown as a notification
#[derive(Error, Debug)]
pub enum OtrimError {
    /// Command-line path is neither a file nor a directory
    #[error("Path not found: {}", .path.display())]
    PathNotFound { path: PathBuf },

    /// Gallery directory given on the command line cannot be read
    #[error("Cannot read directory {}: {message}", .path.display())]
    UnreadableDirectory { path: PathBuf, message: String },

    /// No path given and no file selector tool installed
    #[error("No video file specified and no file selector (zenity or kdialog) is available")]
    NoSelector,

    /// Configuration file or override is invalid
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Domain-level failure surfaced at the edge
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for OTrim operations
pub type OtrimResult<T> = std::result::Result<T, OtrimError>;
