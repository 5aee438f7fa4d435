//! Static field-descriptor tables.
//!
//! Each record type publishes one closed [`DescriptorTable`] listing the
//! fields reachable through a proxy. A descriptor carries the field's name,
//! its doc text and a typed accessor pair; the accessor engine dispatches on
//! the pair's variant instead of computing addresses inside the record.

use std::fmt;

use crate::arena::{StrRef, StringChunk};
use crate::config::ArenaConfig;
use crate::error::{Error, Result};

/// Value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Optional arena-backed byte string.
    String,
    /// Unsigned 64-bit integer stored inline.
    UnsignedInt,
}

impl FieldKind {
    /// Human-readable kind name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::UnsignedInt => "unsigned integer",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed accessor pair locating a field inside a record.
pub enum FieldAccess<R> {
    /// String field: reads and replaces an arena handle.
    Str {
        /// Read the stored handle.
        get: fn(&R) -> Option<StrRef>,
        /// Replace the stored handle.
        set: fn(&mut R, Option<StrRef>),
    },
    /// Unsigned integer field.
    UInt {
        /// Read the stored value.
        get: fn(&R) -> u64,
        /// Replace the stored value.
        set: fn(&mut R, u64),
    },
}

impl<R> Clone for FieldAccess<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for FieldAccess<R> {}

impl<R> FieldAccess<R> {
    /// Kind served by this accessor pair.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            FieldAccess::Str { .. } => FieldKind::String,
            FieldAccess::UInt { .. } => FieldKind::UnsignedInt,
        }
    }
}

/// Metadata for one exposed field.
pub struct FieldDescriptor<R> {
    /// Attribute name at the boundary.
    pub name: &'static str,
    /// Short doc text.
    pub doc: &'static str,
    /// Accessor pair.
    pub access: FieldAccess<R>,
}

impl<R> FieldDescriptor<R> {
    /// Describe a string field.
    #[must_use]
    pub const fn string(
        name: &'static str,
        doc: &'static str,
        get: fn(&R) -> Option<StrRef>,
        set: fn(&mut R, Option<StrRef>),
    ) -> Self {
        Self {
            name,
            doc,
            access: FieldAccess::Str { get, set },
        }
    }

    /// Describe an unsigned integer field.
    #[must_use]
    pub const fn unsigned(
        name: &'static str,
        doc: &'static str,
        get: fn(&R) -> u64,
        set: fn(&mut R, u64),
    ) -> Self {
        Self {
            name,
            doc,
            access: FieldAccess::UInt { get, set },
        }
    }

    /// Kind of this field.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.access.kind()
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("doc", &self.doc)
            .finish()
    }
}

/// Closed, per-type table of field descriptors.
pub struct DescriptorTable<R: 'static> {
    type_name: &'static str,
    fields: &'static [FieldDescriptor<R>],
}

impl<R: 'static> DescriptorTable<R> {
    /// Create a table. Intended for `static` initializers.
    #[must_use]
    pub const fn new(type_name: &'static str, fields: &'static [FieldDescriptor<R>]) -> Self {
        Self { type_name, fields }
    }

    /// Boundary-visible name of the record type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look up a field by name.
    pub fn lookup(&self, name: &str) -> Result<&'static FieldDescriptor<R>> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    /// Check if a field name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field.name == name)
    }

    /// Iterate over descriptors in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'static, FieldDescriptor<R>> {
        self.fields.iter()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<R> {
        self.fields.iter().map(|field| field.name)
    }

    /// Number of fields.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the table has no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R: 'static> fmt::Debug for DescriptorTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DescriptorTable")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl<R: 'static> IntoIterator for &DescriptorTable<R> {
    type Item = &'static FieldDescriptor<R>;
    type IntoIter = std::slice::Iter<'static, FieldDescriptor<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A natively-owned record reachable through a proxy.
///
/// Implementors own exactly one [`StringChunk`]; every string handle stored
/// in the record must come from it. Dropping the record frees the arena.
pub trait Record: Sized + 'static {
    /// The record type's descriptor table.
    fn descriptors() -> &'static DescriptorTable<Self>;

    /// Allocate a record with cleared strings, zeroed integers and a fresh
    /// arena.
    fn new_record(arena: ArenaConfig) -> Result<Self>;

    /// Deep clone into a new record with its own arena.
    fn deep_copy(&self) -> Result<Self>;

    /// The record's arena.
    fn arena(&self) -> &StringChunk;

    /// The record's arena, mutably.
    fn arena_mut(&mut self) -> &mut StringChunk;
}
