//! Scalar types that can live inside a Postgres array.

use std::error::Error;
use std::fmt::Write;
use tokio_postgres::types::{FromSql, ToSql};

type BoxError = Box<dyn Error + Sync + Send>;

/// A scalar that can be an element of a one-dimensional Postgres array.
///
/// The binary representation comes from the `tokio-postgres` [`ToSql`] /
/// [`FromSql`] impls; the text representation (used inside array literals
/// such as `{1,2,3}`) is provided here.
pub trait ArrayElement: ToSql + for<'a> FromSql<'a> + Send + Sync + Sized + 'static {
    /// Append the element's text form, unquoted.
    fn write_text(&self, out: &mut String);

    /// Parse an element from its (already unquoted and unescaped) text form.
    fn parse_text(s: &str) -> Result<Self, BoxError>;
}

macro_rules! integer_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                fn write_text(&self, out: &mut String) {
                    let _ = write!(out, "{self}");
                }

                fn parse_text(s: &str) -> Result<Self, BoxError> {
                    Ok(s.trim().parse::<$ty>()?)
                }
            }
        )*
    };
}

macro_rules! float_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                fn write_text(&self, out: &mut String) {
                    if self.is_nan() {
                        out.push_str("NaN");
                    } else if self.is_infinite() {
                        out.push_str(if *self > 0.0 { "Infinity" } else { "-Infinity" });
                    } else {
                        let _ = write!(out, "{self}");
                    }
                }

                fn parse_text(s: &str) -> Result<Self, BoxError> {
                    Ok(s.trim().parse::<$ty>()?)
                }
            }
        )*
    };
}

integer_element!(i16, i32, i64);
float_element!(f32, f64);

impl ArrayElement for bool {
    fn write_text(&self, out: &mut String) {
        out.push(if *self { 't' } else { 'f' });
    }

    fn parse_text(s: &str) -> Result<Self, BoxError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "true" | "y" | "yes" | "on" | "1" => Ok(true),
            "f" | "false" | "n" | "no" | "off" | "0" => Ok(false),
            other => Err(format!("invalid boolean: {other:?}").into()),
        }
    }
}

impl ArrayElement for String {
    fn write_text(&self, out: &mut String) {
        out.push_str(self);
    }

    fn parse_text(s: &str) -> Result<Self, BoxError> {
        Ok(s.to_owned())
    }
}
