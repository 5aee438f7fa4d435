//! The update-collection module record.

use std::borrow::Cow;
use std::fmt;

use crate::arena::{StrRef, StringChunk};
use crate::config::ArenaConfig;
use crate::descriptor::{DescriptorTable, FieldDescriptor, Record};
use crate::error::Result;

/// Boundary-visible type name of [`ModuleRecord`].
pub const MODULE_TYPE_NAME: &str = "UpdateCollectionModule";

/// A module entry of an update collection (name, stream, version, context,
/// arch). String fields live in the record's own arena.
pub struct ModuleRecord {
    name: Option<StrRef>,
    stream: Option<StrRef>,
    version: u64,
    context: Option<StrRef>,
    arch: Option<StrRef>,
    chunk: StringChunk,
}

static MODULE_FIELDS: [FieldDescriptor<ModuleRecord>; 5] = [
    FieldDescriptor::string("name", "Name", |m| m.name, |m, v| m.name = v),
    FieldDescriptor::string("stream", "Stream", |m| m.stream, |m, v| m.stream = v),
    FieldDescriptor::unsigned("version", "Version", |m| m.version, |m, v| m.version = v),
    FieldDescriptor::string("context", "Context", |m| m.context, |m, v| m.context = v),
    FieldDescriptor::string("arch", "Arch", |m| m.arch, |m, v| m.arch = v),
];

static MODULE_TABLE: DescriptorTable<ModuleRecord> =
    DescriptorTable::new(MODULE_TYPE_NAME, &MODULE_FIELDS);

impl ModuleRecord {
    /// Create an empty record with an unbounded arena.
    #[must_use]
    pub fn new() -> Self {
        Self::empty(StringChunk::new())
    }

    /// Create an empty record whose arena is sized by `config`.
    pub fn with_config(config: ArenaConfig) -> Result<Self> {
        Ok(Self::empty(StringChunk::with_config(config)?))
    }

    fn empty(chunk: StringChunk) -> Self {
        Self {
            name: None,
            stream: None,
            version: 0,
            context: None,
            arch: None,
            chunk,
        }
    }

    fn resolve(&self, handle: Option<StrRef>) -> Option<&[u8]> {
        handle.map(|h| self.chunk.get(h))
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> Option<&[u8]> {
        self.resolve(self.name)
    }

    /// Module stream.
    #[must_use]
    pub fn stream(&self) -> Option<&[u8]> {
        self.resolve(self.stream)
    }

    /// Module version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Module context.
    #[must_use]
    pub fn context(&self) -> Option<&[u8]> {
        self.resolve(self.context)
    }

    /// Module arch.
    #[must_use]
    pub fn arch(&self) -> Option<&[u8]> {
        self.resolve(self.arch)
    }

    /// Set the name, interning it in this record's arena.
    pub fn set_name(&mut self, name: Option<&[u8]>) -> Result<()> {
        self.name = self.intern(name)?;
        Ok(())
    }

    /// Set the stream.
    pub fn set_stream(&mut self, stream: Option<&[u8]>) -> Result<()> {
        self.stream = self.intern(stream)?;
        Ok(())
    }

    /// Set the version.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Set the context.
    pub fn set_context(&mut self, context: Option<&[u8]>) -> Result<()> {
        self.context = self.intern(context)?;
        Ok(())
    }

    /// Set the arch.
    pub fn set_arch(&mut self, arch: Option<&[u8]>) -> Result<()> {
        self.arch = self.intern(arch)?;
        Ok(())
    }

    fn intern(&mut self, bytes: Option<&[u8]>) -> Result<Option<StrRef>> {
        match bytes {
            Some(bytes) => self.chunk.insert(bytes).map(Some),
            None => Ok(None),
        }
    }
}

impl Default for ModuleRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for ModuleRecord {
    fn descriptors() -> &'static DescriptorTable<Self> {
        &MODULE_TABLE
    }

    fn new_record(arena: ArenaConfig) -> Result<Self> {
        Self::with_config(arena)
    }

    fn deep_copy(&self) -> Result<Self> {
        let mut copy = Self::with_config(self.chunk.config())?;
        copy.set_name(self.name())?;
        copy.set_stream(self.stream())?;
        copy.version = self.version;
        copy.set_context(self.context())?;
        copy.set_arch(self.arch())?;
        Ok(copy)
    }

    fn arena(&self) -> &StringChunk {
        &self.chunk
    }

    fn arena_mut(&mut self) -> &mut StringChunk {
        &mut self.chunk
    }
}

impl fmt::Debug for ModuleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRecord")
            .field("name", &text(self.name()))
            .field("stream", &text(self.stream()))
            .field("version", &self.version)
            .field("context", &text(self.context()))
            .field("arch", &text(self.arch()))
            .finish()
    }
}

fn text(bytes: Option<&[u8]>) -> Option<Cow<'_, str>> {
    bytes.map(String::from_utf8_lossy)
}
