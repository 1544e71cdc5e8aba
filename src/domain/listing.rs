// ============================================================
// Layer 3 — Listing Record Domain Type
// ============================================================
// One real-estate sale observation: field name → FieldValue.
// Records stay open-ended maps because the raw feed carries
// more columns than the cleaning rules look at, and those
// extra columns must survive cleaning untouched.
//
// Field names the rules depend on live in `fields` so that
// no stage spells a column name by hand.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::field::FieldValue;

/// Canonical column names.
pub mod fields {
    pub const PRICE:               &str = "price";
    pub const SIZE:                &str = "size";
    pub const YEAR:                &str = "year";
    pub const REMODELED:           &str = "remodeled";
    pub const BATHROOMS:           &str = "bathrooms";
    pub const KITCHENS:            &str = "kitchens";
    pub const STORAGE_RATING:      &str = "storage_rating";
    pub const CONDITION_RATING:    &str = "condition_rating";
    pub const SUN_FACTOR:          &str = "sun_factor";
    pub const DAYS_ON_MARKED:      &str = "days_on_marked";
    pub const LOT_W:               &str = "lot_w";
    pub const EXTERNAL_STORAGE_M2: &str = "external_storage_m2";
    pub const SOLD:                &str = "sold";
    pub const SOLD_IN_MONTH:       &str = "sold_in_month";
    pub const AGENT_ID:            &str = "agent_id";
    pub const ROOMS:               &str = "rooms";

    /// Historical misspelling of `sold_in_month` found in older exports.
    pub const SOLD_IN_MONTH_TYPO:  &str = "sold_in_moth";
}

/// Columns converted to numbers by the coercer.
pub const NUMERIC_FIELDS: [&str; 12] = [
    fields::PRICE,
    fields::SIZE,
    fields::BATHROOMS,
    fields::KITCHENS,
    fields::STORAGE_RATING,
    fields::CONDITION_RATING,
    fields::DAYS_ON_MARKED,
    fields::SUN_FACTOR,
    fields::LOT_W,
    fields::EXTERNAL_STORAGE_M2,
    fields::YEAR,
    fields::REMODELED,
];

/// A record missing any of these is dropped.
pub const REQUIRED_FIELDS: [&str; 3] = [fields::PRICE, fields::SIZE, fields::YEAR];

/// Columns cast to integers once a record has passed every rule.
pub const INTEGER_FIELDS: [&str; 8] = [
    fields::BATHROOMS,
    fields::KITCHENS,
    fields::STORAGE_RATING,
    fields::CONDITION_RATING,
    fields::YEAR,
    fields::REMODELED,
    fields::LOT_W,
    fields::EXTERNAL_STORAGE_M2,
];

static MISSING: FieldValue = FieldValue::Missing;

/// A listing as a map of column name → value.
/// Keys are kept sorted so serialisation and fingerprints are stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl ListingRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a column; absent columns read as `Missing`.
    pub fn get(&self, key: &str) -> &FieldValue {
        self.fields.get(key).unwrap_or(&MISSING)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).as_f64()
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).as_text()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.fields.remove(key)
    }

    /// Mutable access to an existing column.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Structural identity of the record. Two records with the
    /// same fingerprint are duplicates. Keys are quoted and escaped
    /// so no key or value can imitate a separator.
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            out.push_str(&format!("{key:?}="));
            out.push_str(&value.fingerprint());
            out.push(';');
        }
        out
    }
}

impl From<Map<String, Value>> for ListingRecord {
    fn from(map: Map<String, Value>) -> Self {
        map.into_iter()
            .map(|(k, v)| (k, FieldValue::from(v)))
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for ListingRecord {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

impl IntoIterator for ListingRecord {
    type Item     = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for ListingRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One line of an NDJSON input after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum RawLine {
    /// A JSON object, converted field by field.
    Record(ListingRecord),
    /// Anything that did not parse as a JSON object. `raw` holds
    /// the exact bytes of the line (without its `\n`), so
    /// passthrough stages can copy it verbatim, invalid UTF-8 and all.
    Malformed { line_no: usize, raw: Vec<u8> },
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> ListingRecord {
        match value {
            Value::Object(map) => ListingRecord::from(map),
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn test_absent_key_reads_as_missing() {
        let r = ListingRecord::new();
        assert!(r.get(fields::PRICE).is_missing());
        assert_eq!(r.get_f64(fields::PRICE), None);
    }

    #[test]
    fn test_from_json_object() {
        let r = record(json!({"price": 100, "sold": "yes", "remodeled": null}));
        assert_eq!(r.get_f64("price"), Some(100.0));
        assert_eq!(r.get_text("sold"), Some("yes"));
        assert!(r.contains_key("remodeled"));
        assert!(r.get("remodeled").is_missing());
    }

    #[test]
    fn test_fingerprint_ignores_insertion_order() {
        let mut a = ListingRecord::new();
        a.insert("price", FieldValue::Numeric(1.0));
        a.insert("size", FieldValue::Numeric(2.0));
        let mut b = ListingRecord::new();
        b.insert("size", FieldValue::Numeric(2.0));
        b.insert("price", FieldValue::Numeric(1.0));
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_keys_with_separators_do_not_collide() {
        let a = record(json!({"price": 1, "a": null, "b": null}));
        let b = record(json!({"price": 1, "a=m;b": null}));
        assert_ne!(a, b);
        assert_ne!(a.fingerprint(), b.fingerprint());

        let c = record(json!({"x": "1;\"y\"=t:\"2"}));
        let d = record(json!({"x": "1", "y": "2"}));
        assert_ne!(c.fingerprint(), d.fingerprint());
    }

    #[test]
    fn test_serializes_sorted_keys() {
        let r = record(json!({"size": 50, "price": 10, "rooms": "2 rooms"}));
        let out = serde_json::to_string(&r).unwrap();
        assert_eq!(out, r#"{"price":10,"rooms":"2 rooms","size":50}"#);
    }
}
