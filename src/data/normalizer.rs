// ============================================================
// Layer 4 — Record Normalizer
// ============================================================
// First cleaning stage. Never drops a record.
//
// Steps (applied in order):
//   1. Lowercase every column name
//   2. Rename `sold_in_moth` → `sold_in_month` if the canonical
//      column is absent
//   3. Trim whitespace around every text value
//   4. Map placeholder tokens ("", "unknown", "None", "nan")
//      to Missing
//
// `rooms` keeps an empty string as-is: for that column "" is a
// sentinel ("0 rooms") that the validator repairs later.
//
// When two raw columns lowercase to the same name, the one that
// was already lowercase wins; otherwise the byte-wise smallest
// raw name wins (`PRICE` over `Price`). Input order plays no part.

use std::collections::BTreeMap;

use crate::domain::field::FieldValue;
use crate::domain::listing::{fields, ListingRecord};

/// Tokens that mean "no value". Matched case-sensitively.
pub const PLACEHOLDER_TOKENS: [&str; 4] = ["", "unknown", "None", "nan"];

/// Columns where an empty string carries meaning.
pub const SENTINEL_FIELDS: [&str; 1] = [fields::ROOMS];

pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, record: ListingRecord) -> ListingRecord {
        // ── Step 1: lowercase keys ───────────────────────────────────────────
        let mut chosen: BTreeMap<String, (String, FieldValue)> = BTreeMap::new();
        for (key, value) in record {
            let lower = key.to_lowercase();
            let keep_existing = chosen
                .get(&lower)
                .is_some_and(|(kept, _)| collision_rank(kept, &lower) < collision_rank(&key, &lower));
            if keep_existing {
                tracing::debug!("Column '{key}' collides with another '{lower}' column, dropping it");
            } else {
                chosen.insert(lower, (key, value));
            }
        }
        let mut out: ListingRecord = chosen
            .into_iter()
            .map(|(lower, (_, value))| (lower, value))
            .collect();

        // ── Step 2: repair the historical typo ───────────────────────────────
        if !out.contains_key(fields::SOLD_IN_MONTH) {
            if let Some(value) = out.remove(fields::SOLD_IN_MONTH_TYPO) {
                out.insert(fields::SOLD_IN_MONTH, value);
            }
        }

        // ── Steps 3 + 4: trim and map placeholders ───────────────────────────
        out.into_iter()
            .map(|(key, value)| {
                let value = clean_value(&key, value);
                (key, value)
            })
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower rank wins a collision: exact lowercase first, then byte order.
fn collision_rank<'a>(key: &'a str, lower: &str) -> (bool, &'a str) {
    (key != lower, key)
}

fn clean_value(key: &str, value: FieldValue) -> FieldValue {
    let FieldValue::Text(s) = value else {
        return value;
    };

    let trimmed = s.trim();
    if trimmed.is_empty() && SENTINEL_FIELDS.contains(&key) {
        return FieldValue::text("");
    }
    if PLACEHOLDER_TOKENS.contains(&trimmed) {
        return FieldValue::Missing;
    }
    if trimmed.len() == s.len() {
        FieldValue::Text(s)
    } else {
        FieldValue::text(trimmed)
    }
}
