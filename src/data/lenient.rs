// ============================================================
// Layer 4 — Lenient Numeric Extraction
// ============================================================
// Best-effort number reading for exploratory tooling (the
// `describe` command). Not used by the cleaning rules, which
// stay strict.
//
// Fallback order for text values:
//   1. direct parse                      "12.5"      → 12.5
//   2. comma as decimal separator        "12,5"      → 12.5
//   3. first numeric substring           "4 rooms"   → 4.0
//                                        "ca. 7,5 m" → 7.5

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::field::FieldValue;

fn first_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("numeric pattern is valid")
    })
}

/// Strict numeric view: numbers, or text that parses as a whole.
pub fn parse_strict(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        other => other.as_f64(),
    }
}

/// Lenient numeric view following the fallback order above.
pub fn parse_lenient(value: &FieldValue) -> Option<f64> {
    let FieldValue::Text(s) = value else {
        return value.as_f64();
    };

    let s = s.trim();
    if let Some(v) = s.parse::<f64>().ok().filter(|v| v.is_finite()) {
        return Some(v);
    }

    let dotted = s.replace(',', ".");
    if let Some(v) = dotted.parse::<f64>().ok().filter(|v| v.is_finite()) {
        return Some(v);
    }

    first_number()
        .find(&dotted)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
