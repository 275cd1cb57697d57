//! Array transcoding between host sequences and Postgres array values.
//!
//! Two entry points:
//!
//! - [`PgArray<T>`] is a column adapter: it implements `tokio-postgres`'s
//!   `ToSql` / `FromSql`, so it can be read from a [`Row`](tokio_postgres::Row)
//!   or bound as a parameter. The element type comes from the column.
//! - [`ArrayCodec<T>`] (implemented by [`RegistryCodec`]) converts a slice to
//!   and from a [`WireValue`] in text or binary format, resolving element
//!   types through an explicitly passed [`TypeRegistry`].
//!
//! Empty sequences and NULL collapse: an empty sequence encodes as NULL and
//! NULL decodes as an empty sequence.
//!
//! # Example
//!
//! ```ignore
//! use pgfilter::array::{ArrayCodec, RegistryCodec, TypeRegistry};
//!
//! let registry = TypeRegistry::standard();
//! let codec = RegistryCodec::text(&registry);
//! let wire = codec.encode(&[1_i32, 2, 3])?;
//! let back: Vec<i32> = codec.decode(&wire)?;
//! ```

pub(crate) mod binary;
mod codec;
mod element;
mod error;
mod pg_array;
mod registry;
mod text;

#[cfg(test)]
mod tests;

pub use codec::{ArrayCodec, RegistryCodec, WireFormat, WireValue};
pub use element::ArrayElement;
pub use error::{DecodeError, EncodeError};
pub use pg_array::PgArray;
pub use registry::{ElementType, TypeRegistry, TypeRegistryBuilder};
