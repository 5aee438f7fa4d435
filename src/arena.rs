//! Per-record string arena - append-only, deduplicated byte strings.

use std::collections::HashMap;

use crate::config::ArenaConfig;
use crate::error::{Error, Result};

/// Stable handle to a byte string interned in a [`StringChunk`].
///
/// Only meaningful for the arena that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StrRef {
    offset: u32,
    len: u32,
}

impl StrRef {
    /// Length in bytes.
    #[must_use]
    pub fn len(self) -> usize {
        self.len as usize
    }

    /// Check if the handle refers to zero-length content.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Append-only arena owning every string referenced by one record.
///
/// Strings are never freed individually; overwriting a field leaves the old
/// bytes in place until the arena itself is dropped.
#[derive(Debug)]
pub struct StringChunk {
    /// Raw arena data.
    data: Vec<u8>,
    /// Content to handle mapping for O(1) deduplication.
    index_map: HashMap<Box<[u8]>, StrRef>,
    /// Distinct entries in insertion order.
    entries: Vec<StrRef>,
    config: ArenaConfig,
}

impl StringChunk {
    /// Create an unbounded arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            index_map: HashMap::new(),
            entries: Vec::new(),
            config: ArenaConfig::default(),
        }
    }

    /// Create an arena sized by `config`.
    ///
    /// Fails with [`Error::AllocationFailure`] if the initial reservation
    /// cannot be made.
    pub fn with_config(config: ArenaConfig) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve(config.initial_capacity).map_err(|e| {
            log::warn!(
                "arena reservation of {} bytes failed: {e}",
                config.initial_capacity
            );
            Error::AllocationFailure(format!(
                "cannot reserve {} arena bytes: {e}",
                config.initial_capacity
            ))
        })?;
        Ok(Self {
            data,
            index_map: HashMap::new(),
            entries: Vec::new(),
            config,
        })
    }

    /// The configuration this arena was built with.
    #[must_use]
    pub fn config(&self) -> ArenaConfig {
        self.config
    }

    /// Intern `bytes` and return its handle.
    ///
    /// Empty input is stored as a zero-length entry. Identical content
    /// returns the existing handle.
    pub fn insert(&mut self, bytes: &[u8]) -> Result<StrRef> {
        if let Some(&existing) = self.index_map.get(bytes) {
            return Ok(existing);
        }

        let new_size = self.data.len() + bytes.len();
        if let Some(max) = self.config.max_bytes {
            if new_size > max {
                log::warn!("arena limit of {max} bytes reached ({new_size} requested)");
                return Err(Error::AllocationFailure(format!(
                    "arena limit of {max} bytes exceeded"
                )));
            }
        }
        // Offsets and lengths are 32-bit; everything below new_size fits.
        if u32::try_from(new_size).is_err() {
            return Err(Error::AllocationFailure(
                "arena exceeds 32-bit addressing".to_string(),
            ));
        }
        self.data
            .try_reserve(bytes.len())
            .map_err(|e| Error::AllocationFailure(format!("cannot grow arena: {e}")))?;

        let handle = StrRef {
            offset: self.data.len() as u32,
            len: bytes.len() as u32,
        };
        self.data.extend_from_slice(bytes);
        self.index_map.insert(bytes.into(), handle);
        self.entries.push(handle);
        Ok(handle)
    }

    /// Get the bytes behind a handle.
    ///
    /// A handle from a different arena that falls outside this one reads as
    /// empty.
    #[must_use]
    pub fn get(&self, handle: StrRef) -> &[u8] {
        let start = handle.offset as usize;
        start
            .checked_add(handle.len())
            .and_then(|end| self.data.get(start..end))
            .unwrap_or_default()
    }

    /// Total interned bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Number of distinct strings interned.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all interned strings with their handles.
    pub fn iter(&self) -> StringChunkIter<'_> {
        StringChunkIter {
            chunk: self,
            index: 0,
        }
    }
}

impl Default for StringChunk {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a StringChunk {
    type Item = (StrRef, &'a [u8]);
    type IntoIter = StringChunkIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over strings in the arena, in insertion order.
pub struct StringChunkIter<'a> {
    chunk: &'a StringChunk,
    index: usize,
}

impl<'a> Iterator for StringChunkIter<'a> {
    type Item = (StrRef, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let handle = *self.chunk.entries.get(self.index)?;
        self.index += 1;
        Some((handle, self.chunk.get(handle)))
    }
}
