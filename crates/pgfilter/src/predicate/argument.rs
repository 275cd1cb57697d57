use crate::array::binary;
use crate::array::{ArrayCodec, EncodeError, RegistryCodec, TypeRegistry, WireValue};
use bytes::BytesMut;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, Kind, ToSql, Type, WrongType};

/// A value bound to one predicate placeholder.
///
/// `TextArray` is always a single argument: membership tests bind the whole
/// sequence to one `$n`. It binds to `text[]`-like columns and to arrays of
/// user-defined enums (`colors[]`).
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Bool(bool),
    Int8(i64),
    Text(String),
    TextArray(Vec<String>),
}

impl Argument {
    /// Render the value's text form for display, the way the server would
    /// read the bound parameter. Scalars are not quoted or escaped; arrays use
    /// the array literal syntax and an empty array renders as `NULL`.
    pub fn to_literal(&self, registry: &TypeRegistry) -> Result<String, EncodeError> {
        Ok(match self {
            Argument::Bool(b) => b.to_string(),
            Argument::Int8(n) => n.to_string(),
            Argument::Text(s) => s.clone(),
            Argument::TextArray(values) => {
                match RegistryCodec::text(registry).encode(values.as_slice())? {
                    WireValue::Text { literal, .. } => literal,
                    _ => "NULL".to_string(),
                }
            }
        })
    }

    fn accepts_value(&self, ty: &Type) -> bool {
        match self {
            Argument::Bool(_) => <bool as ToSql>::accepts(ty),
            Argument::Int8(_) => <i64 as ToSql>::accepts(ty),
            Argument::Text(_) => text_like(ty),
            Argument::TextArray(_) => matches!(ty.kind(), Kind::Array(inner) if text_like(inner)),
        }
    }
}

fn text_like(ty: &Type) -> bool {
    <String as ToSql>::accepts(ty) || matches!(ty.kind(), Kind::Enum(_))
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Bool(b) => write!(f, "{b}"),
            Argument::Int8(n) => write!(f, "{n}"),
            Argument::Text(s) => write!(f, "{s}"),
            Argument::TextArray(values) => write!(f, "[{}]", values.join(" ")),
        }
    }
}

impl ToSql for Argument {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            Argument::Bool(b) => b.to_sql(ty, out),
            Argument::Int8(n) => n.to_sql(ty, out),
            // Enum labels share the text wire format.
            Argument::Text(s) => s.to_sql(ty, out),
            Argument::TextArray(values) => {
                let Kind::Array(element) = ty.kind() else {
                    return Err(format!("{ty} is not an array type").into());
                };
                binary::encode_array(element, values, out)?;
                Ok(IsNull::No)
            }
        }
    }

    fn accepts(ty: &Type) -> bool {
        <bool as ToSql>::accepts(ty)
            || <i64 as ToSql>::accepts(ty)
            || text_like(ty)
            || matches!(ty.kind(), Kind::Array(inner) if text_like(inner))
    }

    fn to_sql_checked(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if !self.accepts_value(ty) {
            return Err(Box::new(WrongType::new::<Self>(ty.clone())));
        }
        self.to_sql(ty, out)
    }
}

impl From<bool> for Argument {
    fn from(value: bool) -> Self {
        Argument::Bool(value)
    }
}

impl From<i64> for Argument {
    fn from(value: i64) -> Self {
        Argument::Int8(value)
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Argument::Text(value)
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Argument::Text(value.to_string())
    }
}

impl From<Vec<String>> for Argument {
    fn from(values: Vec<String>) -> Self {
        Argument::TextArray(values)
    }
}

impl From<&[String]> for Argument {
    fn from(values: &[String]) -> Self {
        Argument::TextArray(values.to_vec())
    }
}
