// ============================================================
// Layer 4 — Numeric Coercer
// ============================================================
// Converts the fixed list of numeric columns to numbers.
// Anything that does not parse becomes Missing; this stage
// never raises and never touches columns outside the list.

use crate::domain::field::FieldValue;
use crate::domain::listing::{ListingRecord, NUMERIC_FIELDS};

pub struct NumericCoercer {
    fields: Vec<&'static str>,
}

impl NumericCoercer {
    pub fn new() -> Self {
        Self { fields: NUMERIC_FIELDS.to_vec() }
    }

    pub fn coerce(&self, mut record: ListingRecord) -> ListingRecord {
        for field in &self.fields {
            if let Some(value) = record.get_mut(field) {
                let raw = std::mem::replace(value, FieldValue::Missing);
                *value = coerce_value(raw);
            }
        }
        record
    }
}

impl Default for NumericCoercer {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric interpretation of a single value.
/// Integers from an earlier cast are kept as integers.
pub fn coerce_value(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Numeric(v) if v.is_finite() => FieldValue::Numeric(v),
        FieldValue::Integer(i) => FieldValue::Integer(i),
        FieldValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => FieldValue::Numeric(v),
            _ => FieldValue::Missing,
        },
        FieldValue::Numeric(_) | FieldValue::Missing => FieldValue::Missing,
    }
}
