// ============================================================
// Layer 3 — Field Value
// ============================================================
// One cell of a listing record. Raw JSON gives us strings,
// numbers, nulls and the occasional bool; after cleaning a
// cell is one of four explicit states, so every stage has to
// say what it does with a missing value.
//
//   Numeric(f64)  — a fractional number, or one coerced from text
//   Integer(i64)  — a JSON integer, or a number after the validator's cast
//   Text(String)  — categorical or free text
//   Missing       — absent, null, or a placeholder token

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Numeric(f64),
    Integer(i64),
    Text(String),
    Missing,
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, FieldValue::Missing)
    }

    /// Numeric view of the value. Text is never parsed here;
    /// that is the coercer's job.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Numeric(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Stable rendering used for duplicate detection. Numbers
    /// compare by value: `5` and `5.0` collapse, as do `-0.0` and
    /// `0.0`. Integral values are rendered as exact integers so
    /// large ids never collide through f64 rounding. Text is
    /// quoted and escaped.
    pub(crate) fn fingerprint(&self) -> String {
        match self {
            FieldValue::Integer(i) => format!("i:{i}"),
            FieldValue::Numeric(v) => match exact_integer(*v) {
                Some(i) => format!("i:{i}"),
                None => format!("n:{v:?}"),
            },
            FieldValue::Text(s) => format!("t:{s:?}"),
            FieldValue::Missing => "m".to_string(),
        }
    }
}

/// `v` as an i64 when it is integral and inside i64 range.
fn exact_integer(v: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    if v.fract() == 0.0 && v >= -LIMIT && v < LIMIT {
        Some(v as i64)
    } else {
        None
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Missing,
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map(FieldValue::Numeric).unwrap_or(FieldValue::Missing),
            },
            Value::String(s) => FieldValue::Text(s),
            Value::Bool(b) => FieldValue::Text(b.to_string()),
            // Nested structures carry no meaning for the listing schema;
            // keep their compact JSON so nothing is silently lost.
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Numeric(v) if v.is_finite() => serializer.serialize_f64(*v),
            FieldValue::Numeric(_) => serializer.serialize_none(),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Missing => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(FieldValue::from)
    }
}
