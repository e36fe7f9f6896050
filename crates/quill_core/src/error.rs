//! Error types for the Quill session layer.
//!
//! Every failure is recovered at the session boundary: callers of
//! [`crate::Session::execute`] receive a `Failure` outcome rather than an
//! `Err`, and only the connection lifecycle operations surface `QuillError`
//! directly.

use thiserror::Error;

/// Main error type for the Quill backend.
#[derive(Debug, Error)]
pub enum QuillError {
    /// The database file could not be opened as a connection.
    #[error("Connection error: {message}")]
    Connection {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A statement failed inside the driver; carries the engine's text.
    #[error("{message}")]
    Query {
        /// SQLite error message.
        message: String,
        /// SQLite extended result code, when the driver reports one.
        code: Option<i32>,
    },

    /// An operation was attempted without its precondition holding,
    /// e.g. executing with no live connection or an empty statement.
    #[error("{message}")]
    Precondition {
        /// Human-readable error message.
        message: String,
    },

    /// A filesystem-level failure, e.g. the database file cannot be created.
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl QuillError {
    /// Create a new connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection { message: message.into(), source: None }
    }

    /// Create a new connection error with source.
    pub fn connection_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection { message: message.into(), source: Some(Box::new(source)) }
    }

    /// Create a new query error.
    pub fn query(message: impl Into<String>, code: Option<i32>) -> Self {
        Self::Query { message: message.into(), code }
    }

    /// Create a new precondition error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition { message: message.into() }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "Connection",
            Self::Query { .. } => "Query",
            Self::Precondition { .. } => "Precondition",
            Self::Io { .. } => "I/O",
        }
    }

    /// Get the SQLite extended result code (if applicable).
    pub fn sqlite_code(&self) -> Option<i32> {
        match self {
            Self::Query { code, .. } => *code,
            _ => None,
        }
    }
}

/// Convert from rusqlite::Error to QuillError.
impl From<rusqlite::Error> for QuillError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(e, _) => Some(e.extended_code),
            _ => None,
        };
        QuillError::Query { message: err.to_string(), code }
    }
}

/// Convert from std::io::Error to QuillError.
impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        QuillError::Io { message: err.to_string(), source: Some(Box::new(err)) }
    }
}
