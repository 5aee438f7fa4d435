//! Error types for updatemod.

use thiserror::Error;

/// Result type alias for updatemod operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported at the proxy boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The proxy does not own a record (never constructed, or released).
    #[error("improper UpdateCollectionModule object: no record is held")]
    UninitializedRecord,

    /// Field name not present in the record's descriptor table.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The written value's kind is not accepted by the field.
    #[error("type mismatch for field {field}: expected {expected}, got {got}")]
    TypeMismatch {
        /// Field being written.
        field: &'static str,
        /// Kinds the field accepts.
        expected: &'static str,
        /// Kind that was supplied.
        got: &'static str,
    },

    /// A record or arena entry could not be allocated.
    #[error("allocation failed: {0}")]
    AllocationFailure(String),

    /// Stored bytes are not valid UTF-8 and cannot be read as text.
    #[error("field {field} does not hold valid UTF-8")]
    InvalidString {
        /// Field being read.
        field: &'static str,
    },

    /// Numeric value rejected under strict coercion.
    #[error("value {value} out of range for unsigned field {field}")]
    OutOfRange {
        /// Field being written.
        field: &'static str,
        /// Rendered input value.
        value: String,
    },
}

impl Error {
    /// Check if this error means the proxy held no record.
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Error::UninitializedRecord)
    }
}
