//! Proxy and arena configuration.

/// How unsigned fields treat numbers that do not fit in a `u64`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoercionPolicy {
    /// Negative integers keep their low 64 bits and overly large ones
    /// saturate to `u64::MAX`. Floats truncate toward zero and saturate at
    /// the `u64` bounds, NaN becomes 0.
    #[default]
    Lenient,
    /// Negative, non-finite and out-of-range numbers are rejected.
    /// Fractional floats are still truncated.
    Strict,
}

/// Sizing of the per-record string arena.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ArenaConfig {
    /// Bytes reserved up front when the arena is created.
    pub initial_capacity: usize,
    /// Hard upper bound on interned bytes, `None` for unbounded.
    pub max_bytes: Option<usize>,
}

impl ArenaConfig {
    /// Create an unbounded arena configuration with no up-front reservation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the up-front reservation.
    #[must_use]
    pub fn with_initial_capacity(mut self, bytes: usize) -> Self {
        self.initial_capacity = bytes;
        self
    }

    /// Set the hard byte limit.
    #[must_use]
    pub fn with_max_bytes(mut self, bytes: usize) -> Self {
        self.max_bytes = Some(bytes);
        self
    }
}

/// Configuration carried by a proxy and applied to every record it builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProxyConfig {
    /// Arena sizing for new records.
    pub arena: ArenaConfig,
    /// Numeric coercion applied on unsigned writes.
    pub coercion: CoercionPolicy,
}

impl ProxyConfig {
    /// Create the default configuration (unbounded arena, lenient coercion).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the arena configuration.
    #[must_use]
    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    /// Replace the coercion policy.
    #[must_use]
    pub fn with_coercion(mut self, coercion: CoercionPolicy) -> Self {
        self.coercion = coercion;
        self
    }

    /// Shorthand for strict numeric coercion.
    #[must_use]
    pub fn strict() -> Self {
        Self::default().with_coercion(CoercionPolicy::Strict)
    }
}
