//! Error types for zone synchronization
//!
//! This module defines all error types used throughout the workspace.
//! Not-found is a distinct variant so callers branch on it explicitly
//! instead of treating every remote failure alike.

use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zone synchronization
#[derive(Error, Debug)]
pub enum Error {
    /// Remote resource is absent (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success HTTP status other than 404
    #[error("HTTP {status}: {message}")]
    Transport {
        /// HTTP status code returned by the remote API
        status: u16,
        /// Human-readable description, including the response body
        message: String,
    },

    /// The request never produced a status (connect, TLS, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wire rdata that does not follow its type's grammar
    #[error("Decode error: {0}")]
    Decode(String),

    /// A record or zone failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record type the provider cannot handle
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Apply aborted at one change; earlier changes stay applied
    #[error("Change #{index} ({change}) failed: {source}")]
    ChangeFailed {
        /// Zero-based position of the failing change in the plan
        index: usize,
        /// Short description of the change (e.g. `Create www A`)
        change: String,
        /// The underlying failure, unchanged
        #[source]
        source: Box<Error>,
    },

    /// I/O errors (config files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a transport error carrying the HTTP status
    pub fn transport(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Create a connection-level HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an unsupported-type error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Wrap a failure that aborted an apply at `index`
    pub fn change_failed(index: usize, change: impl Into<String>, source: Error) -> Self {
        Self::ChangeFailed {
            index,
            change: change.into(),
            source: Box::new(source),
        }
    }

    /// True when this error (or the failure it wraps) is a 404
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::ChangeFailed { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// HTTP status of the remote failure, if one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Transport { status, .. } => Some(*status),
            Self::ChangeFailed { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
