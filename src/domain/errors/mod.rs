// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// File is not recognised as media
    InvalidFormat(String),
    /// Requested bounds would leave an empty or inverted selection
    InvalidTimeRange(String),
    /// Operation not allowed in the current session state
    InvalidState(String),
    /// An external tool could not be started
    ToolUnavailable(String),
    /// External tool ran but failed
    ProcessingError(String),
    /// File system operation failed
    FsFail(String),
    /// User dismissed a dialog
    Cancelled,
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            DomainError::InvalidTimeRange(msg) => write!(f, "Invalid time range: {}", msg),
            DomainError::InvalidState(msg) => write!(f, "Not allowed now: {}", msg),
            DomainError::ToolUnavailable(msg) => write!(f, "Tool unavailable: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::error::Error for DomainError {}
