use super::binary;
use super::element::ArrayElement;
use super::error::{DecodeError, EncodeError};
use super::registry::{ElementType, TypeRegistry};
use super::text;
use bytes::{Bytes, BytesMut};
use std::any::type_name;
use tokio_postgres::types::{Kind, Type};

/// A database array value as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    /// SQL NULL.
    Null,
    /// Text format: an array literal such as `{1,2,3}`, typed by the column's
    /// array type.
    Text { array_type: Type, literal: String },
    /// Binary format: the Postgres binary array encoding, which carries the
    /// element OID in its header.
    Binary { array_type: Type, bytes: Bytes },
}

impl WireValue {
    pub fn is_null(&self) -> bool {
        matches!(self, WireValue::Null)
    }

    /// The declared array type, or `None` for NULL.
    pub fn array_type(&self) -> Option<&Type> {
        match self {
            WireValue::Null => None,
            WireValue::Text { array_type, .. } | WireValue::Binary { array_type, .. } => {
                Some(array_type)
            }
        }
    }
}

/// Which wire representation an encoder produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireFormat {
    Text,
    #[default]
    Binary,
}

/// Converts between a host sequence of `T` and a database array value.
///
/// Empty sequences encode to [`WireValue::Null`]; NULL decodes to an empty
/// sequence, so `decode(encode(&[]))` is `[]`.
pub trait ArrayCodec<T> {
    /// Decode a wire value into a sequence of `T`.
    fn decode(&self, wire: &WireValue) -> Result<Vec<T>, DecodeError>;

    /// Encode a sequence of `T` into a wire value.
    fn encode(&self, values: &[T]) -> Result<WireValue, EncodeError>;
}

/// [`ArrayCodec`] for every [`ArrayElement`], resolving element types through a
/// [`TypeRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct RegistryCodec<'r> {
    registry: &'r TypeRegistry,
    format: WireFormat,
}

impl<'r> RegistryCodec<'r> {
    pub fn new(registry: &'r TypeRegistry, format: WireFormat) -> Self {
        Self { registry, format }
    }

    /// Codec producing array literals.
    pub fn text(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, WireFormat::Text)
    }

    /// Codec producing the binary array encoding.
    pub fn binary(registry: &'r TypeRegistry) -> Self {
        Self::new(registry, WireFormat::Binary)
    }

    pub fn format(&self) -> WireFormat {
        self.format
    }

    pub fn registry(&self) -> &'r TypeRegistry {
        self.registry
    }
}

impl<T: ArrayElement> ArrayCodec<T> for RegistryCodec<'_> {
    fn decode(&self, wire: &WireValue) -> Result<Vec<T>, DecodeError> {
        let entry = self
            .registry
            .lookup::<T>()
            .ok_or(DecodeError::UnregisteredType(type_name::<T>()))?;

        match wire {
            WireValue::Null => Ok(Vec::new()),
            WireValue::Binary { bytes, .. } => binary::decode_array(&entry.element, bytes),
            WireValue::Text {
                array_type,
                literal,
            } => {
                check_declared_element::<T>(entry, array_type)?;
                text::parse_literal(literal)?
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let item = item.ok_or(DecodeError::NullElement(index))?;
                        T::parse_text(&item).map_err(|e| DecodeError::Element {
                            index,
                            message: e.to_string(),
                        })
                    })
                    .collect()
            }
        }
    }

    fn encode(&self, values: &[T]) -> Result<WireValue, EncodeError> {
        let entry = self
            .registry
            .lookup::<T>()
            .ok_or(EncodeError::UnsupportedType(type_name::<T>()))?;

        if values.is_empty() {
            return Ok(WireValue::Null);
        }

        let array_type = entry.array.clone();
        match self.format {
            WireFormat::Text => Ok(WireValue::Text {
                array_type,
                literal: text::write_literal(values),
            }),
            WireFormat::Binary => {
                let mut buf = BytesMut::new();
                binary::encode_array(&entry.element, values, &mut buf)?;
                Ok(WireValue::Binary {
                    array_type,
                    bytes: buf.freeze(),
                })
            }
        }
    }
}

/// Text literals carry no element OID, so the column's array type decides.
fn check_declared_element<T>(entry: &ElementType, array_type: &Type) -> Result<(), DecodeError> {
    let Kind::Array(declared) = array_type.kind() else {
        return Err(DecodeError::malformed(format!(
            "{array_type} is not an array type"
        )));
    };
    if declared.oid() != entry.element.oid() {
        return Err(DecodeError::ElementTypeMismatch {
            rust_type: type_name::<T>(),
            expected: entry.element.clone(),
            found: declared.oid(),
        });
    }
    Ok(())
}
