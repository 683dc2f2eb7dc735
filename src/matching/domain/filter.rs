//! Closed value type for metadata filters.

use serde::Serialize;
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;

/// Expected value of one metadata filter.
///
/// Only scalars are accepted so equality stays well defined. Numbers compare
/// by numeric value, so a filter of `1` matches stored metadata `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Text value.
    String(String),
    /// Integer or floating-point value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
}

impl MetadataValue {
    /// Converts a JSON scalar.
    ///
    /// # Errors
    ///
    /// Returns the JSON kind (`null`, `array` or `object`) for unsupported
    /// values.
    pub fn from_json(value: Value) -> Result<Self, &'static str> {
        match value {
            Value::String(text) => Ok(Self::String(text)),
            Value::Number(number) => Ok(Self::Number(number)),
            Value::Bool(flag) => Ok(Self::Bool(flag)),
            Value::Null => Err("null"),
            Value::Array(_) => Err("array"),
            Value::Object(_) => Err("object"),
        }
    }

    /// Returns whether a stored metadata value equals this filter value.
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match (self, actual) {
            (Self::String(expected), Value::String(found)) => expected == found,
            (Self::Bool(expected), Value::Bool(found)) => expected == found,
            (Self::Number(expected), Value::Number(found)) => numbers_equal(expected, found),
            _ => false,
        }
    }
}

fn numbers_equal(left: &Number, right: &Number) -> bool {
    if let (Some(a), Some(b)) = (left.as_i64(), right.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (left.as_u64(), right.as_u64()) {
        return a == b;
    }
    if !(left.is_f64() || right.is_f64()) {
        return false;
    }
    matches!(
        left.as_f64()
            .zip(right.as_f64())
            .and_then(|(a, b)| a.partial_cmp(&b)),
        Some(Ordering::Equal)
    )
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(text) => write!(f, "{text:?}"),
            Self::Number(number) => write!(f, "{number}"),
            Self::Bool(flag) => write!(f, "{flag}"),
        }
    }
}
