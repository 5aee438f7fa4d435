//! Generic field accessors driven by descriptor tables.
//!
//! Every function takes the record as an `Option`: `None` stands for a proxy
//! that holds no record and fails with [`Error::UninitializedRecord`]. A
//! rejected write never touches the record.

use crate::config::CoercionPolicy;
use crate::descriptor::{FieldAccess, FieldDescriptor, FieldKind, Record};
use crate::error::{Error, Result};
use crate::value::Value;

const STRING_INPUTS: &str = "str, bytes or None";
const NUMBER_INPUTS: &str = "int or float";

/// 2^64, the first float that no longer fits in a `u64`.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

fn kind_mismatch<R>(field: &FieldDescriptor<R>, expected: FieldKind) -> Error {
    Error::TypeMismatch {
        field: field.name,
        expected: expected.name(),
        got: field.kind().name(),
    }
}

/// Read a string field.
///
/// An absent handle reads as `None`. Stored bytes that are not UTF-8 fail
/// with [`Error::InvalidString`].
pub fn get_string<R: Record>(
    record: Option<&R>,
    field: &FieldDescriptor<R>,
) -> Result<Option<String>> {
    match get_bytes(record, field)? {
        None => Ok(None),
        Some(bytes) => String::from_utf8(bytes)
            .map(Some)
            .map_err(|_| Error::InvalidString { field: field.name }),
    }
}

/// Read a string field without decoding it.
pub fn get_bytes<R: Record>(
    record: Option<&R>,
    field: &FieldDescriptor<R>,
) -> Result<Option<Vec<u8>>> {
    let record = record.ok_or(Error::UninitializedRecord)?;
    let FieldAccess::Str { get, .. } = field.access else {
        return Err(kind_mismatch(field, FieldKind::String));
    };
    Ok(get(record).map(|handle| record.arena().get(handle).to_vec()))
}

/// Read an unsigned integer field verbatim.
pub fn get_unsigned<R: Record>(record: Option<&R>, field: &FieldDescriptor<R>) -> Result<u64> {
    let record = record.ok_or(Error::UninitializedRecord)?;
    let FieldAccess::UInt { get, .. } = field.access else {
        return Err(kind_mismatch(field, FieldKind::UnsignedInt));
    };
    Ok(get(record))
}

/// Write a string field.
///
/// Accepts `Str` (stored as UTF-8), `Bytes` or `None` (clears the field
/// without allocating). Other values fail with [`Error::TypeMismatch`].
/// Text and bytes are interned in the record's arena, including empty ones.
pub fn set_string<R: Record>(
    record: Option<&mut R>,
    field: &FieldDescriptor<R>,
    value: &Value,
) -> Result<()> {
    let record = record.ok_or(Error::UninitializedRecord)?;
    let FieldAccess::Str { set, .. } = field.access else {
        return Err(kind_mismatch(field, FieldKind::String));
    };
    let bytes: Option<&[u8]> = match value {
        Value::None => None,
        Value::Str(s) => Some(s.as_bytes()),
        Value::Bytes(b) => Some(b),
        other => {
            return Err(Error::TypeMismatch {
                field: field.name,
                expected: STRING_INPUTS,
                got: other.kind_name(),
            });
        }
    };
    let handle = match bytes {
        Some(bytes) => Some(record.arena_mut().insert(bytes)?),
        None => None,
    };
    set(record, handle);
    Ok(())
}

/// Write an unsigned integer field.
///
/// Accepts `Int`, `Bool` (as 0 or 1) and `Float` (truncated toward zero).
/// How out-of-range numbers are handled depends on `policy`.
pub fn set_unsigned<R: Record>(
    record: Option<&mut R>,
    field: &FieldDescriptor<R>,
    value: &Value,
    policy: CoercionPolicy,
) -> Result<()> {
    let record = record.ok_or(Error::UninitializedRecord)?;
    let FieldAccess::UInt { set, .. } = field.access else {
        return Err(kind_mismatch(field, FieldKind::UnsignedInt));
    };
    let number = coerce_unsigned(field.name, value, policy)?;
    set(record, number);
    Ok(())
}

/// Convert a boundary value to a `u64` for an unsigned field.
pub fn coerce_unsigned(field: &'static str, value: &Value, policy: CoercionPolicy) -> Result<u64> {
    let out_of_range = || Error::OutOfRange {
        field,
        value: value.to_string(),
    };
    match *value {
        Value::Bool(b) => Ok(u64::from(b)),
        Value::Int(i) => match u64::try_from(i) {
            Ok(n) => Ok(n),
            Err(_) if policy == CoercionPolicy::Strict => Err(out_of_range()),
            Err(_) if i > 0 => {
                log::debug!("{field}: integer {i} saturated to {}", u64::MAX);
                Ok(u64::MAX)
            }
            Err(_) => {
                let wrapped = i as u64;
                log::debug!("{field}: integer {i} wrapped to {wrapped}");
                Ok(wrapped)
            }
        },
        Value::Float(x) => {
            let truncated = x.trunc();
            let fits = (0.0..U64_LIMIT).contains(&truncated);
            if fits {
                Ok(truncated as u64)
            } else if policy == CoercionPolicy::Strict {
                Err(out_of_range())
            } else {
                // `as` saturates at the bounds and maps NaN to 0.
                let saturated = x as u64;
                log::debug!("{field}: float {x} saturated to {saturated}");
                Ok(saturated)
            }
        }
        ref other => Err(Error::TypeMismatch {
            field,
            expected: NUMBER_INPUTS,
            got: other.kind_name(),
        }),
    }
}

/// Read a field by name as a boundary value.
pub fn get<R: Record>(record: Option<&R>, name: &str) -> Result<Value> {
    let field = R::descriptors().lookup(name)?;
    match field.kind() {
        FieldKind::String => Ok(get_string(record, field)?.into()),
        FieldKind::UnsignedInt => Ok(get_unsigned(record, field)?.into()),
    }
}

/// Write a field by name from a boundary value.
pub fn set<R: Record>(
    record: Option<&mut R>,
    name: &str,
    value: &Value,
    policy: CoercionPolicy,
) -> Result<()> {
    let field = R::descriptors().lookup(name)?;
    match field.kind() {
        FieldKind::String => set_string(record, field, value),
        FieldKind::UnsignedInt => set_unsigned(record, field, value, policy),
    }
}
