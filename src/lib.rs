//! # updatemod
//!
//! Descriptor-driven field access for update-collection module records.
//!
//! A [`ModuleRecord`] (name, stream, version, context, arch) keeps its strings
//! in a per-record [`StringChunk`] arena. A [`Proxy`] owns at most one record
//! and exposes its fields to a dynamic-language boundary by name, with
//! [`Value`] as the exchanged type. Field lookup and typing come from a static
//! [`DescriptorTable`], so new record types only need a table and a
//! [`Record`] impl.
//!
//! ## Features
//!
//! - Typed string and unsigned-integer accessors with boundary coercion
//! - Deduplicating, append-only string arena with optional byte limit
//! - Construct / release / copy / adopt lifecycle on the proxy
//! - Lenient or strict numeric coercion
//!
//! ## Example
//!
//! ```
//! use updatemod::{ModuleProxy, Value};
//!
//! let mut module = ModuleProxy::new()?;
//! module.set("name", "nodejs")?;
//! module.set("stream", "18")?;
//! module.set("version", 3.9)?;
//!
//! assert_eq!(module.get("version")?, Value::Int(3));
//! assert_eq!(module.to_string(), "<updatemod.UpdateCollectionModule object>");
//! # Ok::<(), updatemod::Error>(())
//! ```

pub mod accessor;
pub mod arena;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod proxy;
pub mod record;
pub mod value;

// Re-export main types
pub use error::{Error, Result};
pub use proxy::{ModuleProxy, Proxy, ProxyState};
pub use record::ModuleRecord;
pub use value::Value;

// Re-export building blocks
pub use arena::{StrRef, StringChunk};
pub use config::{ArenaConfig, CoercionPolicy, ProxyConfig};
pub use descriptor::{DescriptorTable, FieldAccess, FieldDescriptor, FieldKind, Record};
