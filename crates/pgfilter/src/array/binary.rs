//! Postgres binary array format.
//!
//! ```text
//! i32 ndim | i32 has_nulls | u32 element oid
//! ndim × (i32 length | i32 lower bound)
//! length × (i32 byte length, -1 for NULL | bytes)
//! ```

use super::error::{DecodeError, EncodeError};
use bytes::{BufMut, BytesMut};
use std::any::type_name;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};

const HEADER_LEN: usize = 12;

/// Append a one-dimensional array of `values` typed as `element_type`.
///
/// An empty slice is written as a zero-dimensional array (`{}`).
pub(crate) fn encode_array<T: ToSql>(
    element_type: &Type,
    values: &[T],
    out: &mut BytesMut,
) -> Result<(), EncodeError> {
    let count = i32::try_from(values.len()).map_err(|_| EncodeError::TooLarge(values.len()))?;

    out.put_i32(if values.is_empty() { 0 } else { 1 });
    let flags_pos = out.len();
    out.put_i32(0);
    out.put_u32(element_type.oid());

    if values.is_empty() {
        return Ok(());
    }

    out.put_i32(count);
    out.put_i32(1);

    let mut has_nulls = false;
    for (index, value) in values.iter().enumerate() {
        // Reserve space for the 4-byte length prefix
        let len_pos = out.len();
        out.put_i32(0);
        let body = out.len();

        let is_null = value
            .to_sql(element_type, out)
            .map_err(|e| EncodeError::Element {
                index,
                message: e.to_string(),
            })?;

        let len = match is_null {
            IsNull::Yes => {
                has_nulls = true;
                -1
            }
            IsNull::No => {
                let written = out.len() - body;
                i32::try_from(written).map_err(|_| EncodeError::TooLarge(written))?
            }
        };
        out[len_pos..len_pos + 4].copy_from_slice(&len.to_be_bytes());
    }

    if has_nulls {
        out[flags_pos..flags_pos + 4].copy_from_slice(&1_i32.to_be_bytes());
    }
    Ok(())
}

/// Decode a one-dimensional array whose elements must be `element_type`.
pub(crate) fn decode_array<'a, T: FromSql<'a>>(
    element_type: &Type,
    raw: &'a [u8],
) -> Result<Vec<T>, DecodeError> {
    if raw.len() < HEADER_LEN {
        return Err(DecodeError::malformed(format!(
            "{} bytes is shorter than the array header",
            raw.len()
        )));
    }

    let mut pos = 0;
    let ndim = read_i32(raw, &mut pos)?;
    let _has_nulls = read_i32(raw, &mut pos)?;
    let oid = read_i32(raw, &mut pos)? as u32;

    if ndim < 0 {
        return Err(DecodeError::malformed(format!("negative dimension count {ndim}")));
    }
    if oid != element_type.oid() {
        return Err(DecodeError::ElementTypeMismatch {
            rust_type: type_name::<T>(),
            expected: element_type.clone(),
            found: oid,
        });
    }
    if ndim == 0 {
        return finish(raw, pos, Vec::new());
    }
    if ndim > 1 {
        return Err(DecodeError::UnsupportedDimensions(ndim));
    }

    let len = read_i32(raw, &mut pos)?;
    let _lower_bound = read_i32(raw, &mut pos)?;
    let len = usize::try_from(len)
        .map_err(|_| DecodeError::malformed(format!("negative array length {len}")))?;

    let mut values = Vec::with_capacity(len.min(raw.len() / 4));
    for index in 0..len {
        let elem_len = read_i32(raw, &mut pos)?;
        if elem_len < 0 {
            return Err(DecodeError::NullElement(index));
        }
        let elem_len = elem_len as usize;
        if pos + elem_len > raw.len() {
            return Err(DecodeError::malformed(format!(
                "element {index}: insufficient data for value"
            )));
        }
        let value = T::from_sql(element_type, &raw[pos..pos + elem_len]).map_err(|e| {
            DecodeError::Element {
                index,
                message: e.to_string(),
            }
        })?;
        values.push(value);
        pos += elem_len;
    }

    finish(raw, pos, values)
}

fn finish<T>(raw: &[u8], pos: usize, values: Vec<T>) -> Result<Vec<T>, DecodeError> {
    if pos != raw.len() {
        return Err(DecodeError::malformed(format!(
            "{} trailing bytes",
            raw.len() - pos
        )));
    }
    Ok(values)
}

fn read_i32(raw: &[u8], pos: &mut usize) -> Result<i32, DecodeError> {
    let end = *pos + 4;
    let bytes: [u8; 4] = raw
        .get(*pos..end)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| DecodeError::malformed("insufficient data for length"))?;
    *pos = end;
    Ok(i32::from_be_bytes(bytes))
}
