//! Rust type → Postgres element type lookup.

use super::element::ArrayElement;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use tokio_postgres::types::Type;

/// The Postgres element type and matching array type for one Rust scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementType {
    /// Element type, e.g. `int4`.
    pub element: Type,
    /// One-dimensional array type, e.g. `_int4`.
    pub array: Type,
}

#[derive(Debug, Clone)]
struct Entry {
    rust_type: &'static str,
    types: ElementType,
}

/// Immutable table mapping Rust scalar types to Postgres element types.
///
/// Build it once (usually [`TypeRegistry::standard`]) and hand out `&TypeRegistry`
/// to the codecs that need it. Nothing in this crate keeps a global instance.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    by_rust: HashMap<TypeId, Entry>,
    by_oid: HashMap<u32, ElementType>,
}

impl TypeRegistry {
    /// Start an empty registry.
    pub fn builder() -> TypeRegistryBuilder {
        TypeRegistryBuilder::default()
    }

    /// Registry with every built-in [`ArrayElement`] type.
    pub fn standard() -> Self {
        Self::builder()
            .register::<i16>(Type::INT2, Type::INT2_ARRAY)
            .register::<i32>(Type::INT4, Type::INT4_ARRAY)
            .register::<i64>(Type::INT8, Type::INT8_ARRAY)
            .register::<f32>(Type::FLOAT4, Type::FLOAT4_ARRAY)
            .register::<f64>(Type::FLOAT8, Type::FLOAT8_ARRAY)
            .register::<bool>(Type::BOOL, Type::BOOL_ARRAY)
            .register::<String>(Type::TEXT, Type::TEXT_ARRAY)
            .build()
    }

    /// Element type registered for `T`, if any.
    pub fn lookup<T: 'static>(&self) -> Option<&ElementType> {
        self.by_rust.get(&TypeId::of::<T>()).map(|e| &e.types)
    }

    /// Element type registered under a Postgres element OID, if any.
    pub fn lookup_oid(&self, oid: u32) -> Option<&ElementType> {
        self.by_oid.get(&oid)
    }

    /// Whether `T` has an entry.
    pub fn contains<T: 'static>(&self) -> bool {
        self.by_rust.contains_key(&TypeId::of::<T>())
    }

    /// Names of the registered Rust types, sorted.
    pub fn rust_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.by_rust.values().map(|e| e.rust_type).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.by_rust.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_rust.is_empty()
    }
}

/// Collects registrations, then freezes them into a [`TypeRegistry`].
#[derive(Debug, Default)]
pub struct TypeRegistryBuilder {
    registry: TypeRegistry,
}

impl TypeRegistryBuilder {
    /// Map `T` to the given element and array types. Later registrations of the
    /// same `T` replace earlier ones.
    pub fn register<T: ArrayElement>(mut self, element: Type, array: Type) -> Self {
        let types = ElementType { element, array };
        self.registry
            .by_oid
            .insert(types.element.oid(), types.clone());
        self.registry.by_rust.insert(
            TypeId::of::<T>(),
            Entry {
                rust_type: type_name::<T>(),
                types,
            },
        );
        self
    }

    pub fn build(self) -> TypeRegistry {
        self.registry
    }
}
