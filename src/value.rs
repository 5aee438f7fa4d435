//! Dynamic values crossing the language boundary.

use std::fmt;

/// A value as seen by the embedding dynamic-language runtime.
///
/// Reads produce `None`, `Int` or `Str`. Writes may pass any variant; the
/// accessor engine decides per field kind which ones it accepts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Absent value.
    #[default]
    None,
    /// Boolean. Treated as an integer by unsigned fields.
    Bool(bool),
    /// Integer of arbitrary sign. Wide enough for every `u64` and `i64`.
    Int(i128),
    /// Floating-point number.
    Float(f64),
    /// Text.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A sequence of values. Never accepted by a scalar field.
    List(Vec<Value>),
}

impl Value {
    /// Name of the value's kind as reported in type errors.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
        }
    }

    /// Check if this is the absent value.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Get as text if this is a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as an integer if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as a `u64` if this is an `Int` in range.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        self.as_int().and_then(|i| u64::try_from(i).ok())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bytes(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(i: $t) -> Self {
                    Value::Int(i128::from(i))
                }
            }
        )*
    };
}

impl_from_int!(u8, u16, u32, u64, i8, i16, i32, i64, i128);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from("perl"), Value::Str("perl".into()));
        assert_eq!(Value::from(7u64), Value::Int(7));
        assert_eq!(Value::from(-1i32), Value::Int(-1));
        assert_eq!(Value::from(None::<&str>), Value::None);
        assert_eq!(Value::from(Some("x")), Value::Str("x".into()));
        assert_eq!(Value::from(&b"ab"[..]), Value::Bytes(vec![b'a', b'b']));
        assert!(Value::from(()).is_none());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Value::Float(2.5).kind_name(), "float");
        assert_eq!(Value::List(vec![]).kind_name(), "list");
        assert_eq!(Value::None.kind_name(), "None");
    }

    #[test]
    fn test_extractors() {
        assert_eq!(Value::Int(u64::MAX as i128).as_u64(), Some(u64::MAX));
        assert_eq!(Value::Int(-1).as_u64(), None);
        assert_eq!(Value::Str("a".into()).as_str(), Some("a"));
        assert_eq!(Value::Bool(true).as_int(), None);
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::Int(1), Value::Str("a".into()), Value::None]);
        assert_eq!(list.to_string(), r#"[1, "a", None]"#);
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
    }
}
