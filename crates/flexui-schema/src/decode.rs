//! Value-level decoding helpers
//!
//! Decoding walks a `serde_json::Value` by hand so every failure can name
//! the exact field path, which serde's derived deserializers cannot do.

use crate::error::{FieldPath, SchemaError};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Open string-keyed map that preserves insertion order
pub type OpenMap = IndexMap<String, Value>;

/// Closed enumeration decoded from a JSON string
pub trait SchemaEnum: Sized + Copy + 'static {
    /// Human-readable enumeration name used in errors
    const KIND: &'static str;

    /// All members in declaration order
    const ALL: &'static [Self];

    /// Wire name of this member
    fn as_str(&self) -> &'static str;

    /// Look up a member by wire name
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == name)
    }

    /// Comma-separated list of valid wire names
    fn allowed() -> String {
        Self::ALL
            .iter()
            .map(SchemaEnum::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// JSON kind name for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub(crate) fn mismatch(path: &FieldPath, expected: &'static str, found: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        path: path.clone(),
        expected,
        found: kind_of(found),
    }
}

pub(crate) fn as_object<'a>(
    value: &'a Value,
    path: &FieldPath,
) -> Result<&'a Map<String, Value>, SchemaError> {
    value.as_object().ok_or_else(|| mismatch(path, "object", value))
}

pub(crate) fn as_array<'a>(value: &'a Value, path: &FieldPath) -> Result<&'a [Value], SchemaError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| mismatch(path, "array", value))
}

pub(crate) fn required<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<&'a Value, SchemaError> {
    map.get(key).ok_or_else(|| SchemaError::MissingField {
        path: path.child(key),
    })
}

pub(crate) fn required_str(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<String, SchemaError> {
    let value = required(map, key, path)?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(&path.child(key), "string", value))
}

/// Absent and `null` both decode to `None`
pub(crate) fn optional_str(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<String>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(mismatch(&path.child(key), "string", other)),
    }
}

pub(crate) fn optional_bool(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<bool>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(mismatch(&path.child(key), "boolean", other)),
    }
}

pub(crate) fn optional_u64(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<u64>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| mismatch(&path.child(key), "non-negative integer", value)),
    }
}

pub(crate) fn optional_f64(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<Option<f64>, SchemaError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| mismatch(&path.child(key), "number", value)),
    }
}

/// Decode an enum member from a string value
pub(crate) fn decode_enum<T: SchemaEnum>(value: &Value, path: &FieldPath) -> Result<T, SchemaError> {
    let name = value.as_str().ok_or_else(|| mismatch(path, "string", value))?;
    T::from_name(name).ok_or_else(|| SchemaError::UnknownVariant {
        path: path.clone(),
        kind: T::KIND,
        value: name.to_string(),
        allowed: T::allowed(),
    })
}

/// Decode an optional enum field, falling back to `default` when absent
pub(crate) fn optional_enum<T: SchemaEnum>(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
    default: T,
) -> Result<T, SchemaError> {
    match map.get(key) {
        None => Ok(default),
        Some(value) => decode_enum(value, &path.child(key)),
    }
}

/// Copy an object into an ordered open map
pub(crate) fn open_map(value: &Value, path: &FieldPath) -> Result<OpenMap, SchemaError> {
    let map = as_object(value, path)?;
    Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
}

/// Copy an optional object field, empty when absent
pub(crate) fn optional_open_map(
    map: &Map<String, Value>,
    key: &str,
    path: &FieldPath,
) -> Result<OpenMap, SchemaError> {
    match map.get(key) {
        None => Ok(OpenMap::new()),
        Some(value) => open_map(value, &path.child(key)),
    }
}

/// Keys of `map` not listed in `known`, in original order
pub(crate) fn extra_fields(map: &Map<String, Value>, known: &[&str]) -> OpenMap {
    map.iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
