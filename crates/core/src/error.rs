//! Error types for Audioshelf
//!
//! Errors are grouped into three severity tiers:
//! - **Recoverable**: the caller can reject the input and carry on (bad slider value, etc.)
//! - **Degraded**: a collaborator failed but the book state is intact (storage hiccup, etc.)
//! - **Fatal**: a stored book broke its own invariants and must be treated as corrupted
//!
//! Every validated constructor and setter returns one of these instead of panicking.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Caller supplied something invalid; nothing was changed
    Recoverable,
    /// A collaborator failed but the aggregate is consistent
    Degraded,
    /// Data corruption or a broken contract
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Main error type for Audioshelf
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// An invariant that should always hold was found broken
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// Record not found in storage
    #[error("Record not found: {entity} with {identifier}")]
    RecordNotFound { entity: String, identifier: String },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    StorageError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File or directory could not be accessed
    #[error("I/O error on {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl AppError {
    /// Shorthand for [`AppError::InvalidArgument`]
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`AppError::InvalidState`]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Helper to create a storage error from any error type
    pub fn storage<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::StorageError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Wraps an I/O error together with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidArgument { .. } | Self::RecordNotFound { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::StorageError { .. } | Self::IoError { .. } => ErrorSeverity::Degraded,
            Self::InvalidState { .. } => ErrorSeverity::Fatal,
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidArgument { .. } => "Invalid input provided.".to_string(),
            Self::InvalidState { .. } => {
                "This book's saved state is damaged and cannot be used.".to_string()
            }
            Self::RecordNotFound { .. } => "The requested book was not found.".to_string(),
            Self::StorageError { .. } => {
                "Could not save your changes. Please try again.".to_string()
            }
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
        }
    }

    /// Returns true if this error should be logged at ERROR level
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Fatal
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
