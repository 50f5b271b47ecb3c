//! Error types for backend requests and configuration.
//!
//! `SearchError` is the rich error a backend call produces. The session only
//! keeps its `ErrorKind` tag (which is `Copy`) so that state stays cheap to
//! clone and the view can branch on the kind of failure.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure of a single backend request.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request never produced an HTTP response.
    #[error("network failure: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status}")]
    Backend { status: u16 },

    /// The body was not a valid result page.
    #[error("could not decode result page: {0}")]
    Decode(String),

    /// No response within the configured request timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::Network(_) => ErrorKind::Network,
            SearchError::Backend { status } => ErrorKind::Backend { status: *status },
            SearchError::Decode(_) => ErrorKind::Decode,
            SearchError::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

/// The part of a `SearchError` that survives into session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Backend { status: u16 },
    Decode,
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network => write!(f, "network failure"),
            ErrorKind::Backend { status } => write!(f, "backend error {}", status),
            ErrorKind::Decode => write!(f, "malformed response"),
            ErrorKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Failure to load or validate a `SessionConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}
