//! Error types and result aliases for Skein operations.
//!
//! Provides a unified error type that covers the failure conditions of the
//! fingerprinting helpers and the configuration layer, with actionable messages.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all Skein operations
#[derive(Error, Debug)]
pub enum SkeinError {
    // Fingerprint errors
    #[error("Path not found: {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory traversal failed: {message}")]
    Traversal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed to serialize {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // Config errors
    #[error("Failed to parse skein.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Failed to parse JSON document: {message} at line {line}, column {column}")]
    JsonParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Skein operations
pub type SkeinResult<T> = Result<T, SkeinError>;

impl SkeinError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a traversal error from any error type
    pub fn traversal<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Traversal {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Filesystem failures may go away on retry (a file being rewritten, a
    /// permission being fixed); parse and validation failures will not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SkeinError::Io { .. } | SkeinError::Unreadable { .. } | SkeinError::Traversal { .. }
        )
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            SkeinError::PathNotFound { .. } => Some("Check the directory path spelling"),
            SkeinError::Unreadable { .. } => {
                Some("Make sure every file under the directory is readable by the current user")
            },
            SkeinError::Serialization { .. } => {
                Some("Job specifications and workflows must only contain JSON-compatible values")
            },
            SkeinError::TomlParse { .. } | SkeinError::ConfigValidation { .. } => {
                Some("Fix skein.toml or override the value with a SKEIN_* environment variable")
            },
            SkeinError::JsonParse { .. } => Some("Validate the document with a JSON linter"),
            _ => None,
        }
    }
}
