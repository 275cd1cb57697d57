//! Error types for pgfilter

use crate::array::{DecodeError, EncodeError};
use thiserror::Error;

/// Result type alias for pgfilter operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// An array value could not be encoded for binding
    #[error("Array encode error: {0}")]
    ArrayEncode(#[from] EncodeError),

    /// An array value read from the database could not be decoded
    #[error("Array decode error: {0}")]
    ArrayDecode(#[from] DecodeError),

    /// Statement validation error (raised before anything is sent)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this error came from the array transcoder
    pub fn is_array_error(&self) -> bool {
        matches!(self, Self::ArrayEncode(_) | Self::ArrayDecode(_))
    }
}
