//! Boundary-visible proxy owning at most one record.
//!
//! A [`Proxy`] is what the embedding runtime holds. It is either
//! uninitialized (no record) or initialized (sole owner of one record), and
//! every attribute read or write goes through the record type's descriptor
//! table.
//!
//! ```
//! use updatemod::{ModuleProxy, Value};
//!
//! let mut p = ModuleProxy::new()?;
//! p.set("name", "modulemd")?;
//! p.set("version", 7u64)?;
//! p.set("context", None::<&str>)?;
//!
//! let q = p.copy()?;
//! p.set("version", 8u64)?;
//! assert_eq!(q.get("version")?, Value::Int(7));
//! assert_eq!(p.get("name")?, Value::from("modulemd"));
//! # Ok::<(), updatemod::Error>(())
//! ```

use std::fmt;

use crate::accessor;
use crate::config::{CoercionPolicy, ProxyConfig};
use crate::descriptor::Record;
use crate::error::{Error, Result};
use crate::record::ModuleRecord;
use crate::value::Value;

/// Name of the module the proxied types are registered under.
pub const BOUNDARY_MODULE: &str = "updatemod";

/// Proxy for update-collection module records.
pub type ModuleProxy = Proxy<ModuleRecord>;

/// Ownership state of a proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    /// No record held.
    Uninitialized,
    /// Sole owner of one record.
    Initialized,
}

/// Handle owning at most one record of type `R`.
pub struct Proxy<R: Record> {
    record: Option<R>,
    config: ProxyConfig,
}

impl<R: Record> Proxy<R> {
    /// Create a proxy holding a fresh record.
    pub fn new() -> Result<Self> {
        Self::with_config(ProxyConfig::default())
    }

    /// Create a proxy holding a fresh record built with `config`.
    pub fn with_config(config: ProxyConfig) -> Result<Self> {
        let mut proxy = Self::uninit_with_config(config);
        proxy.construct()?;
        Ok(proxy)
    }

    /// Create a proxy that holds no record yet.
    #[must_use]
    pub fn uninit() -> Self {
        Self::uninit_with_config(ProxyConfig::default())
    }

    /// Create an uninitialized proxy carrying `config`.
    #[must_use]
    pub fn uninit_with_config(config: ProxyConfig) -> Self {
        Self {
            record: None,
            config,
        }
    }

    /// Wrap a record produced elsewhere. The proxy becomes its sole owner.
    #[must_use]
    pub fn from_record(record: R) -> Self {
        let mut proxy = Self::uninit();
        proxy.adopt(record);
        proxy
    }

    /// (Re)initialize: release any held record, then allocate a fresh one.
    ///
    /// On failure the proxy is left uninitialized.
    pub fn construct(&mut self) -> Result<()> {
        self.release();
        let record = R::new_record(self.config.arena).inspect_err(|e| {
            log::warn!("{} initialization failed: {e}", Self::type_name());
        })?;
        log::debug!("constructed {} record", Self::type_name());
        self.record = Some(record);
        Ok(())
    }

    /// Drop the held record and its arena. No-op when uninitialized.
    pub fn release(&mut self) {
        if self.record.take().is_some() {
            log::trace!("released {} record", Self::type_name());
        }
    }

    /// Take ownership of `record`, releasing whatever was held before.
    pub fn adopt(&mut self, record: R) {
        self.release();
        log::trace!("adopted {} record", Self::type_name());
        self.record = Some(record);
    }

    /// Deep clone into a new, independent proxy with the same configuration.
    pub fn copy(&self) -> Result<Self> {
        let record = self.record()?.deep_copy()?;
        log::debug!("copied {} record", Self::type_name());
        let mut proxy = Self::uninit_with_config(self.config);
        proxy.adopt(record);
        Ok(proxy)
    }

    /// Current ownership state.
    #[must_use]
    pub fn state(&self) -> ProxyState {
        if self.record.is_some() {
            ProxyState::Initialized
        } else {
            ProxyState::Uninitialized
        }
    }

    /// Check if a record is held.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.record.is_some()
    }

    /// Borrow the held record.
    pub fn record(&self) -> Result<&R> {
        self.record.as_ref().ok_or(Error::UninitializedRecord)
    }

    /// Borrow the held record mutably.
    pub fn record_mut(&mut self) -> Result<&mut R> {
        self.record.as_mut().ok_or(Error::UninitializedRecord)
    }

    /// Move the record out, leaving the proxy uninitialized.
    pub fn take_record(&mut self) -> Option<R> {
        self.record.take()
    }

    /// Consume the proxy and return its record, if any.
    #[must_use]
    pub fn into_record(mut self) -> Option<R> {
        self.record.take()
    }

    /// Configuration applied to records this proxy builds.
    #[must_use]
    pub fn config(&self) -> ProxyConfig {
        self.config
    }

    /// Change the numeric coercion policy for later writes.
    pub fn set_coercion(&mut self, coercion: CoercionPolicy) {
        self.config.coercion = coercion;
    }

    /// Read a field.
    pub fn get(&self, name: &str) -> Result<Value> {
        accessor::get(self.record.as_ref(), name)
    }

    /// Write a field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        accessor::set(
            self.record.as_mut(),
            name,
            &value.into(),
            self.config.coercion,
        )
    }

    /// Read a string field as text.
    pub fn get_str(&self, name: &str) -> Result<Option<String>> {
        let field = R::descriptors().lookup(name)?;
        accessor::get_string(self.record.as_ref(), field)
    }

    /// Read a string field as raw bytes.
    pub fn get_bytes(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let field = R::descriptors().lookup(name)?;
        accessor::get_bytes(self.record.as_ref(), field)
    }

    /// Read an unsigned field.
    pub fn get_u64(&self, name: &str) -> Result<u64> {
        let field = R::descriptors().lookup(name)?;
        accessor::get_unsigned(self.record.as_ref(), field)
    }

    /// Names of all exposed fields, in declaration order.
    pub fn field_names() -> impl Iterator<Item = &'static str> {
        R::descriptors().names()
    }

    /// Doc text of a field.
    pub fn field_doc(name: &str) -> Result<&'static str> {
        Ok(R::descriptors().lookup(name)?.doc)
    }

    /// Check if `name` is an exposed field. Does not need a record.
    #[must_use]
    pub fn has_field(name: &str) -> bool {
        R::descriptors().contains(name)
    }

    /// Boundary-visible type name.
    #[must_use]
    pub fn type_name() -> &'static str {
        R::descriptors().type_name()
    }
}

impl<R: Record> Default for Proxy<R> {
    /// An uninitialized proxy.
    fn default() -> Self {
        Self::uninit()
    }
}

impl<R: Record> Drop for Proxy<R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R: Record> fmt::Display for Proxy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{BOUNDARY_MODULE}.{} object>", Self::type_name())
    }
}

impl<R: Record> fmt::Debug for Proxy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("type", &Self::type_name())
            .field("state", &self.state())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArenaConfig;

    fn initialized() -> ModuleProxy {
        ModuleProxy::new().unwrap()
    }

    #[test]
    fn test_scenario() {
        let mut p = initialized();
        p.set("name", "modulemd").unwrap();
        p.set("version", 7).unwrap();
        p.set("context", Value::None).unwrap();
        assert_eq!(p.get("name").unwrap(), Value::from("modulemd"));
        assert_eq!(p.get("version").unwrap(), Value::Int(7));
        assert_eq!(p.get("context").unwrap(), Value::None);

        let q = p.copy().unwrap();
        p.set("version", 8).unwrap();
        assert_eq!(q.get("version").unwrap(), Value::Int(7));
        assert_eq!(p.get("version").unwrap(), Value::Int(8));
    }

    #[test]
    fn test_round_trip_all_fields() {
        let mut p = initialized();
        for name in ["name", "stream", "context", "arch"] {
            p.set(name, format!("{name}-value")).unwrap();
            assert_eq!(p.get_str(name).unwrap(), Some(format!("{name}-value")));
        }
        p.set("version", u64::MAX).unwrap();
        assert_eq!(p.get_u64("version").unwrap(), u64::MAX);
        p.set("version", 3.9).unwrap();
        assert_eq!(p.get("version").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_none_clears() {
        let mut p = initialized();
        p.set("name", "perl").unwrap();
        p.set("name", None::<&str>).unwrap();
        assert_eq!(p.get("name").unwrap(), Value::None);
        assert_eq!(p.get_bytes("name").unwrap(), None);
    }

    #[test]
    fn test_empty_string_round_trips() {
        let mut p = initialized();
        p.set("name", "").unwrap();
        assert_eq!(p.get("name").unwrap(), Value::from(""));
        p.set("arch", b"".to_vec()).unwrap();
        assert_eq!(p.get("arch").unwrap(), Value::from(""));
        assert_eq!(p.get_bytes("arch").unwrap(), Some(Vec::new()));

        let copy = p.copy().unwrap();
        assert_eq!(copy.get_str("name").unwrap().as_deref(), Some(""));

        p.set("name", Value::None).unwrap();
        assert_eq!(p.get("name").unwrap(), Value::None);
    }

    #[test]
    fn test_copy_independence() {
        let mut a = initialized();
        a.set("arch", "x86_64").unwrap();
        let mut b = a.copy().unwrap();
        b.set("arch", "noarch").unwrap();
        assert_eq!(a.get("arch").unwrap(), Value::from("x86_64"));
        assert_eq!(b.get("arch").unwrap(), Value::from("noarch"));
    }

    #[test]
    fn test_uninitialized_fails_everything() {
        let mut fresh = ModuleProxy::uninit();
        let mut released = initialized();
        released.release();
        for p in [&mut fresh, &mut released] {
            assert_eq!(p.state(), ProxyState::Uninitialized);
            assert_eq!(p.get("name").unwrap_err(), Error::UninitializedRecord);
            assert_eq!(p.get("version").unwrap_err(), Error::UninitializedRecord);
            assert_eq!(p.set("arch", "x").unwrap_err(), Error::UninitializedRecord);
            assert_eq!(p.set("version", 1).unwrap_err(), Error::UninitializedRecord);
            assert!(p.copy().unwrap_err().is_uninitialized());
            assert!(p.record().is_err());
        }
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut p = initialized();
        p.release();
        p.release();
        assert!(!p.is_initialized());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut p = initialized();
        p.set("name", "ruby").unwrap();
        p.set("version", 3).unwrap();
        assert_eq!(
            p.set("bogus_field", 1).unwrap_err(),
            Error::UnknownField("bogus_field".into())
        );
        assert!(matches!(p.get("bogus_field"), Err(Error::UnknownField(_))));
        assert_eq!(p.get("name").unwrap(), Value::from("ruby"));
        assert_eq!(p.get("version").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_type_rejection() {
        let mut p = initialized();
        let err = p.set("version", "not-a-number").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { field: "version", got: "str", .. }));
        let err = p.set("name", 3.25).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { field: "name", got: "float", .. }));
        assert_eq!(p.get("version").unwrap(), Value::Int(0));
        assert_eq!(p.get("name").unwrap(), Value::None);
    }

    #[test]
    fn test_reinit_resets_fields() {
        let mut p = initialized();
        p.set("name", "nodejs").unwrap();
        p.set("stream", "18").unwrap();
        p.set("version", 42).unwrap();
        p.construct().unwrap();
        p.construct().unwrap();
        for name in ["name", "stream", "context", "arch"] {
            assert_eq!(p.get(name).unwrap(), Value::None);
        }
        assert_eq!(p.get("version").unwrap(), Value::Int(0));
        assert!(p.record().unwrap().arena().is_empty());
    }

    #[test]
    fn test_failed_construct_leaves_uninitialized() {
        let config =
            ProxyConfig::default().with_arena(ArenaConfig::new().with_initial_capacity(usize::MAX));
        let mut p = ModuleProxy::uninit_with_config(config);
        let err = p.construct().unwrap_err();
        assert!(matches!(err, Error::AllocationFailure(_)));
        assert_eq!(p.state(), ProxyState::Uninitialized);
        assert!(ModuleProxy::with_config(config).is_err());
    }

    #[test]
    fn test_adopt_replaces_record() {
        let mut p = initialized();
        p.set("name", "old").unwrap();
        let mut record = ModuleRecord::new();
        record.set_name(Some(b"adopted")).unwrap();
        record.set_version(5);
        p.adopt(record);
        assert_eq!(p.get("name").unwrap(), Value::from("adopted"));
        assert_eq!(p.get("version").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_from_record_and_back() {
        let mut record = ModuleRecord::new();
        record.set_stream(Some(b"rolling")).unwrap();
        let p = ModuleProxy::from_record(record);
        assert_eq!(p.get_str("stream").unwrap().as_deref(), Some("rolling"));
        let record = p.into_record().unwrap();
        assert_eq!(record.stream(), Some(&b"rolling"[..]));
    }

    #[test]
    fn test_take_record() {
        let mut p = initialized();
        p.set("arch", "aarch64").unwrap();
        let record = p.take_record().unwrap();
        assert_eq!(record.arch(), Some(&b"aarch64"[..]));
        assert!(p.take_record().is_none());
        assert_eq!(p.get("arch").unwrap_err(), Error::UninitializedRecord);
    }

    #[test]
    fn test_copy_keeps_config() {
        let config = ProxyConfig::strict();
        let p = ModuleProxy::with_config(config).unwrap();
        let mut q = p.copy().unwrap();
        assert_eq!(q.config(), config);
        assert!(matches!(q.set("version", -1), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_lenient_negative_wraps() {
        let mut p = initialized();
        p.set("version", -1).unwrap();
        assert_eq!(p.get_u64("version").unwrap(), u64::MAX);
        p.set_coercion(CoercionPolicy::Strict);
        assert!(p.set("version", -1).is_err());
        assert_eq!(p.get_u64("version").unwrap(), u64::MAX);
    }

    #[test]
    fn test_bool_is_integer() {
        let mut p = initialized();
        p.set("version", true).unwrap();
        assert_eq!(p.get("version").unwrap(), Value::Int(1));
        assert!(p.set("name", true).is_err());
    }

    #[test]
    fn test_display_is_fixed() {
        let mut p = initialized();
        p.set("name", "secret").unwrap();
        assert_eq!(p.to_string(), "<updatemod.UpdateCollectionModule object>");
        assert_eq!(
            ModuleProxy::uninit().to_string(),
            "<updatemod.UpdateCollectionModule object>"
        );
    }

    #[test]
    fn test_field_metadata() {
        let names: Vec<_> = ModuleProxy::field_names().collect();
        assert_eq!(names, vec!["name", "stream", "version", "context", "arch"]);
        assert_eq!(ModuleProxy::field_doc("stream").unwrap(), "Stream");
        assert!(ModuleProxy::field_doc("bogus").is_err());
        assert!(ModuleProxy::has_field("context"));
        assert!(!ModuleProxy::has_field("bogus"));
    }

    #[test]
    fn test_arena_limit_applies_to_writes() {
        let config = ProxyConfig::default().with_arena(ArenaConfig::new().with_max_bytes(6));
        let mut p = ModuleProxy::with_config(config).unwrap();
        p.set("arch", "x86_64").unwrap();
        let err = p.set("name", "modulemd").unwrap_err();
        assert!(matches!(err, Error::AllocationFailure(_)));
        assert_eq!(p.get("name").unwrap(), Value::None);
        // Re-setting interned content needs no new bytes.
        p.set("context", "x86_64").unwrap();
    }

    #[test]
    fn test_proxy_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ModuleProxy>();
    }
}
