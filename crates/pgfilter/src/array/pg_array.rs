use super::binary;
use bytes::BytesMut;
use std::error::Error;
use std::fmt;
use std::ops::Deref;
use tokio_postgres::types::{FromSql, IsNull, Kind, ToSql, Type};

/// Column adapter that scans a Postgres array into a `Vec<T>` and binds it back.
///
/// SQL NULL scans to an empty array, and an empty array binds as SQL NULL.
///
/// ```ignore
/// let fav_numbers: PgArray<i32> = row.try_get("fav_numbers")?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PgArray<T>(pub Vec<T>);

impl<T> PgArray<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self(values)
    }

    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Default for PgArray<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for PgArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> From<Vec<T>> for PgArray<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T> FromIterator<T> for PgArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Space-separated inside brackets: `[1 2 3]`.
impl<T: fmt::Display> fmt::Display for PgArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str("]")
    }
}

fn element_type(ty: &Type) -> Result<&Type, Box<dyn Error + Sync + Send>> {
    match ty.kind() {
        Kind::Array(inner) => Ok(inner),
        _ => Err(format!("{ty} is not an array type").into()),
    }
}

fn accepts_array_of(ty: &Type, element_accepts: impl Fn(&Type) -> bool) -> bool {
    matches!(ty.kind(), Kind::Array(inner) if element_accepts(inner))
}

impl<T: ToSql> ToSql for PgArray<T> {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if self.0.is_empty() {
            return Ok(IsNull::Yes);
        }
        binary::encode_array(element_type(ty)?, &self.0, out)?;
        Ok(IsNull::No)
    }

    fn accepts(ty: &Type) -> bool {
        accepts_array_of(ty, T::accepts)
    }

    tokio_postgres::types::to_sql_checked!();
}

impl<'a, T: FromSql<'a>> FromSql<'a> for PgArray<T> {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Self(binary::decode_array(element_type(ty)?, raw)?))
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Self::default())
    }

    fn accepts(ty: &Type) -> bool {
        accepts_array_of(ty, T::accepts)
    }
}
