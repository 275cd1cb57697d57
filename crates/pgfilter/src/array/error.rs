use thiserror::Error;
use tokio_postgres::types::Type;

/// Failure turning a database array value into a sequence of `T`.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The requested element type has no entry in the registry.
    #[error("no array element type registered for {0}")]
    UnregisteredType(&'static str),

    /// The wire value declares an element type that `T` cannot be read from.
    #[error("array element type oid {found} is not {expected} (required by {rust_type})")]
    ElementTypeMismatch {
        rust_type: &'static str,
        expected: Type,
        found: u32,
    },

    /// A NULL element cannot be placed in a sequence of non-null values.
    #[error("NULL array element at index {0}")]
    NullElement(usize),

    /// Only one-dimensional arrays map onto a flat sequence.
    #[error("{0}-dimensional arrays are not supported")]
    UnsupportedDimensions(i32),

    /// The raw bytes or literal text do not form a valid array.
    #[error("malformed array: {0}")]
    Malformed(String),

    /// A single element failed to decode.
    #[error("array element {index}: {message}")]
    Element { index: usize, message: String },
}

/// Failure turning a sequence of `T` into a database array value.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// `T` has no known database element type.
    #[error("no array element type registered for {0}")]
    UnsupportedType(&'static str),

    /// A single element failed to encode.
    #[error("array element {index}: {message}")]
    Element { index: usize, message: String },

    /// The sequence (or one element) does not fit the 32-bit length fields.
    #[error("array too large: {0} bytes or elements")]
    TooLarge(usize),
}

impl DecodeError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
