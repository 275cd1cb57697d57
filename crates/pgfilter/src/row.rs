//! Row mapping traits

use crate::error::{DbError, DbResult};
use tokio_postgres::Row;
use tokio_postgres::types::FromSql;

/// Trait for converting a database row into a Rust struct.
///
/// # Example
///
/// ```ignore
/// use pgfilter::{FromRow, RowExt};
///
/// struct Name(String);
///
/// impl FromRow for Name {
///     fn from_row(row: &tokio_postgres::Row) -> pgfilter::DbResult<Self> {
///         Ok(Name(row.try_get_column("name")?))
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> DbResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning [`DbError::Decode`] on failure
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> DbResult<T>
    where
        T: for<'a> FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| DbError::decode(column, decode_message(&e)))
    }
}

/// `tokio_postgres::Error` wraps the source; surface it so array decode
/// failures are readable.
fn decode_message(err: &tokio_postgres::Error) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}
