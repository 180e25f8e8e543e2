//! Error types for relay pagination
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for relay pagination
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Validation Errors
    // ============================================================================
    #[error("Invalid pagination request: {message}")]
    InvalidRequest { message: String },

    #[error("Duplicate orderBy field: {field}")]
    DuplicateOrderField { field: String },

    // ============================================================================
    // Cursor Errors
    // ============================================================================
    #[error("Invalid cursor: {message}")]
    InvalidCursor { message: String },

    #[error("Cursor keys {actual:?} do not match orderBy keys {expected:?}")]
    CursorKeyMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Missing key '{key}' in cursor")]
    MissingKeyInCursor { key: String },

    #[error("Cursor failed authentication")]
    CursorTampered,

    // ============================================================================
    // Execution Errors
    // ============================================================================
    #[error("Pagination cancelled")]
    Cancelled,

    #[error("Strategy failed (limit={limit}, from_end={from_end}, after={after:?}, before={before:?}): {source}")]
    Strategy {
        limit: usize,
        from_end: bool,
        after: Option<String>,
        before: Option<String>,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to render cursor for edge {index}: {source}")]
    CursorRender {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Node is not of the expected type {expected}")]
    NodeType { expected: &'static str },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a duplicate orderBy field error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        Self::DuplicateOrderField {
            field: field.into(),
        }
    }

    /// Create an invalid cursor error
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor {
            message: message.into(),
        }
    }

    /// Create a missing cursor key error
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKeyInCursor { key: key.into() }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad client input (request or cursor)
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::InvalidRequest { .. }
            | Error::DuplicateOrderField { .. }
            | Error::InvalidCursor { .. }
            | Error::CursorKeyMismatch { .. }
            | Error::MissingKeyInCursor { .. }
            | Error::CursorTampered => true,
            Error::Strategy { source, .. } | Error::CursorRender { source, .. } => {
                source.is_client_error()
            }
            _ => false,
        }
    }

    /// Check if this error is (or wraps) a cancellation
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Cancelled => true,
            Error::Strategy { source, .. } | Error::CursorRender { source, .. } => {
                source.is_cancelled()
            }
            _ => false,
        }
    }
}

/// Result type alias for relay pagination
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
