// ============================================================
// Layer 4 — Business-Rule Validator
// ============================================================
// Applies the listing business rules to coerced records, in
// this order. Rules 1-8 drop a record, 9 and 10 repair it:
//
//    1. price, size or year missing
//    2. exact duplicate of an earlier record in the batch
//    3. sold == "no" but sold_in_month present
//    4. sold == "yes" but sold_in_month missing
//       (optional) sold == "no" at all, in sold-only mode
//    5. price < 0, size <= 0, year outside [1800, current_year]
//    6. remodeled present and outside [year, current_year]
//    7. sun_factor present and outside [0, 1]
//    8. days_on_marked, bathrooms or kitchens present and negative
//    9. rooms == ""  →  rooms = "0 rooms"
//   10. integer columns that are present are cast to integers
//
// Duplicate detection keeps one fingerprint per distinct record
// that got past rule 1; memory grows with distinct records only.

use chrono::Datelike;
use std::collections::{BTreeMap, HashSet};

use crate::domain::field::FieldValue;
use crate::domain::listing::{fields, ListingRecord, INTEGER_FIELDS, REQUIRED_FIELDS};

/// Oldest build year accepted.
pub const MIN_YEAR: i32 = 1800;

/// Replacement for the empty `rooms` sentinel.
pub const ZERO_ROOMS: &str = "0 rooms";

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DropReason {
    MissingRequired,
    Duplicate,
    UnsoldWithMonth,
    SoldWithoutMonth,
    Unsold,
    NegativePrice,
    NonPositiveSize,
    YearOutOfRange,
    RemodeledOutOfRange,
    SunFactorOutOfRange,
    NegativeCount,
}

impl DropReason {
    pub const ALL: [DropReason; 11] = [
        DropReason::MissingRequired,
        DropReason::Duplicate,
        DropReason::UnsoldWithMonth,
        DropReason::SoldWithoutMonth,
        DropReason::Unsold,
        DropReason::NegativePrice,
        DropReason::NonPositiveSize,
        DropReason::YearOutOfRange,
        DropReason::RemodeledOutOfRange,
        DropReason::SunFactorOutOfRange,
        DropReason::NegativeCount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::MissingRequired     => "missing_required",
            DropReason::Duplicate           => "duplicate",
            DropReason::UnsoldWithMonth     => "unsold_with_month",
            DropReason::SoldWithoutMonth    => "sold_without_month",
            DropReason::Unsold              => "unsold",
            DropReason::NegativePrice       => "negative_price",
            DropReason::NonPositiveSize     => "non_positive_size",
            DropReason::YearOutOfRange      => "year_out_of_range",
            DropReason::RemodeledOutOfRange => "remodeled_out_of_range",
            DropReason::SunFactorOutOfRange => "sun_factor_out_of_range",
            DropReason::NegativeCount       => "negative_count",
        }
    }
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Newest acceptable build/remodel year
    pub current_year: i32,
    /// Also drop every record with sold == "no"
    pub sold_only: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            current_year: chrono::Local::now().year(),
            sold_only:    false,
        }
    }
}

/// Aggregate counters for one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationStats {
    pub total_seen:     usize,
    pub kept:           usize,
    pub rooms_repaired: usize,
    pub removed:        BTreeMap<DropReason, usize>,
}

impl ValidationStats {
    pub fn removed_for(&self, reason: DropReason) -> usize {
        self.removed.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_removed(&self) -> usize {
        self.removed.values().sum()
    }
}

/// Outcome for one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Keep(ListingRecord),
    Drop(DropReason),
}

pub struct Validator {
    config: ValidatorConfig,
    seen:   HashSet<String>,
    stats:  ValidationStats,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config, seen: HashSet::new(), stats: ValidationStats::default() }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn stats(&self) -> &ValidationStats {
        &self.stats
    }

    pub fn into_stats(self) -> ValidationStats {
        self.stats
    }

    pub fn validate(&mut self, record: ListingRecord) -> Verdict {
        self.stats.total_seen += 1;
        match self.check(record) {
            Ok(record) => {
                self.stats.kept += 1;
                Verdict::Keep(record)
            }
            Err(reason) => {
                *self.stats.removed.entry(reason).or_insert(0) += 1;
                Verdict::Drop(reason)
            }
        }
    }

    fn check(&mut self, mut record: ListingRecord) -> Result<ListingRecord, DropReason> {
        let current_year = f64::from(self.config.current_year);

        // ── Rule 1: required columns ─────────────────────────────────────────
        let (price, size, year) = match (
            record.get_f64(REQUIRED_FIELDS[0]),
            record.get_f64(REQUIRED_FIELDS[1]),
            record.get_f64(REQUIRED_FIELDS[2]),
        ) {
            (Some(p), Some(s), Some(y)) => (p, s, y),
            _ => return Err(DropReason::MissingRequired),
        };

        // ── Rule 2: duplicates ───────────────────────────────────────────────
        if !self.seen.insert(record.fingerprint()) {
            return Err(DropReason::Duplicate);
        }

        // ── Rules 3 + 4: sold / sold_in_month consistency ────────────────────
        let sold = record.get_text(fields::SOLD).map(str::to_lowercase);
        let has_month = month_present(record.get(fields::SOLD_IN_MONTH));
        match sold.as_deref() {
            Some("no") if has_month => return Err(DropReason::UnsoldWithMonth),
            Some("yes") if !has_month => return Err(DropReason::SoldWithoutMonth),
            Some("no") if self.config.sold_only => return Err(DropReason::Unsold),
            _ => {}
        }

        // ── Rule 5: impossible core values ───────────────────────────────────
        if price < 0.0 {
            return Err(DropReason::NegativePrice);
        }
        if size <= 0.0 {
            return Err(DropReason::NonPositiveSize);
        }
        if year < f64::from(MIN_YEAR) || year > current_year {
            return Err(DropReason::YearOutOfRange);
        }

        // ── Rule 6: remodel year ─────────────────────────────────────────────
        if let Some(remodeled) = record.get_f64(fields::REMODELED) {
            if !(remodeled >= year && remodeled <= current_year) {
                return Err(DropReason::RemodeledOutOfRange);
            }
        }

        // ── Rule 7: sun factor ───────────────────────────────────────────────
        if let Some(sun) = record.get_f64(fields::SUN_FACTOR) {
            if !(0.0..=1.0).contains(&sun) {
                return Err(DropReason::SunFactorOutOfRange);
            }
        }

        // ── Rule 8: counts ───────────────────────────────────────────────────
        let negative_count = [fields::DAYS_ON_MARKED, fields::BATHROOMS, fields::KITCHENS]
            .iter()
            .filter_map(|f| record.get_f64(f))
            .any(|v| v < 0.0);
        if negative_count {
            return Err(DropReason::NegativeCount);
        }

        // ── Rule 9: rooms sentinel ───────────────────────────────────────────
        if record.get_text(fields::ROOMS) == Some("") {
            record.insert(fields::ROOMS, FieldValue::text(ZERO_ROOMS));
            self.stats.rooms_repaired += 1;
        }

        // ── Rule 10: integer cast ────────────────────────────────────────────
        for field in INTEGER_FIELDS {
            if let Some(value) = record.get_mut(field) {
                if let Some(v) = value.as_f64() {
                    *value = FieldValue::Integer(v as i64);
                }
            }
        }

        Ok(record)
    }
}

/// A month is present when it holds anything but Missing or "".
fn month_present(value: &FieldValue) -> bool {
    match value {
        FieldValue::Missing => false,
        FieldValue::Text(s) => !s.is_empty(),
        _ => true,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const YEAR: i32 = 2025;

    fn validator() -> Validator {
        Validator::new(ValidatorConfig { current_year: YEAR, sold_only: false })
    }

    fn record(value: Value) -> ListingRecord {
        let Value::Object(map) = value else { panic!("fixture must be an object") };
        ListingRecord::from(map)
    }

    fn base() -> Value {
        json!({
            "price": 3_500_000, "size": 80, "year": 1990,
            "sold": "yes", "sold_in_month": "may",
        })
    }

    fn with(overrides: Value) -> ListingRecord {
        let mut v = base();
        for (k, val) in overrides.as_object().unwrap() {
            v[k] = val.clone();
        }
        record(v)
    }

    fn verdict(r: ListingRecord) -> Verdict {
        validator().validate(r)
    }

    #[test]
    fn test_valid_record_is_kept() {
        assert!(matches!(verdict(record(base())), Verdict::Keep(_)));
    }

    #[test]
    fn test_missing_price_counts_once() {
        let mut v = validator();
        let mut r = record(base());
        r.remove("price");
        assert_eq!(v.validate(r), Verdict::Drop(DropReason::MissingRequired));
        assert_eq!(v.stats().removed_for(DropReason::MissingRequired), 1);
        assert_eq!(v.stats().total_removed(), 1);
        assert_eq!(v.stats().kept, 0);
    }

    #[test]
    fn test_null_required_is_missing() {
        assert_eq!(verdict(with(json!({"size": null}))), Verdict::Drop(DropReason::MissingRequired));
        assert_eq!(verdict(with(json!({"year": null}))), Verdict::Drop(DropReason::MissingRequired));
    }

    #[test]
    fn test_duplicates_dropped() {
        let mut v = validator();
        assert!(matches!(v.validate(record(base())), Verdict::Keep(_)));
        assert_eq!(v.validate(record(base())), Verdict::Drop(DropReason::Duplicate));
        assert_eq!(v.stats().removed_for(DropReason::Duplicate), 1);
    }

    #[test]
    fn test_records_differing_only_in_key_layout_are_not_duplicates() {
        let mut v = validator();
        let first = with(json!({"a": null, "b": null}));
        let second = with(json!({"a=m;b": null}));
        assert!(matches!(v.validate(first), Verdict::Keep(_)));
        assert!(matches!(v.validate(second), Verdict::Keep(_)));
        assert_eq!(v.stats().removed_for(DropReason::Duplicate), 0);
    }

    #[test]
    fn test_large_ids_are_not_duplicates() {
        let mut v = validator();
        let big = 1i64 << 53;
        assert!(matches!(v.validate(with(json!({"listing_id": big}))), Verdict::Keep(_)));
        assert!(matches!(v.validate(with(json!({"listing_id": big + 1}))), Verdict::Keep(_)));
    }

    #[test]
    fn test_unsold_with_month_dropped() {
        assert_eq!(
            verdict(with(json!({"sold": "no", "sold_in_month": "june"}))),
            Verdict::Drop(DropReason::UnsoldWithMonth)
        );
        assert_eq!(
            verdict(with(json!({"sold": "NO", "sold_in_month": "june"}))),
            Verdict::Drop(DropReason::UnsoldWithMonth)
        );
    }

    #[test]
    fn test_unsold_without_month_kept() {
        assert!(matches!(
            verdict(with(json!({"sold": "no", "sold_in_month": null}))),
            Verdict::Keep(_)
        ));
    }

    #[test]
    fn test_sold_without_month_dropped() {
        assert_eq!(
            verdict(with(json!({"sold": "Yes", "sold_in_month": null}))),
            Verdict::Drop(DropReason::SoldWithoutMonth)
        );
        assert_eq!(
            verdict(with(json!({"sold_in_month": ""}))),
            Verdict::Drop(DropReason::SoldWithoutMonth)
        );
    }

    #[test]
    fn test_sold_only_mode_drops_unsold() {
        let mut v = Validator::new(ValidatorConfig { current_year: YEAR, sold_only: true });
        let r = with(json!({"sold": "no", "sold_in_month": null}));
        assert_eq!(v.validate(r), Verdict::Drop(DropReason::Unsold));
        assert!(matches!(v.validate(record(base())), Verdict::Keep(_)));
    }

    #[test]
    fn test_price_and_size_ranges() {
        assert_eq!(verdict(with(json!({"price": -1}))), Verdict::Drop(DropReason::NegativePrice));
        assert!(matches!(verdict(with(json!({"price": 0}))), Verdict::Keep(_)));
        assert_eq!(verdict(with(json!({"size": 0}))), Verdict::Drop(DropReason::NonPositiveSize));
    }

    #[test]
    fn test_year_bounds() {
        assert!(matches!(verdict(with(json!({"year": 1800}))), Verdict::Keep(_)));
        assert!(matches!(verdict(with(json!({"year": YEAR}))), Verdict::Keep(_)));
        assert_eq!(verdict(with(json!({"year": 1799}))), Verdict::Drop(DropReason::YearOutOfRange));
        assert_eq!(
            verdict(with(json!({"year": YEAR + 1}))),
            Verdict::Drop(DropReason::YearOutOfRange)
        );
    }

    #[test]
    fn test_remodeled_bounds() {
        assert!(matches!(verdict(with(json!({"remodeled": 1990}))), Verdict::Keep(_)));
        assert!(matches!(verdict(with(json!({"remodeled": null}))), Verdict::Keep(_)));
        assert_eq!(
            verdict(with(json!({"remodeled": 1985}))),
            Verdict::Drop(DropReason::RemodeledOutOfRange)
        );
        assert_eq!(
            verdict(with(json!({"remodeled": YEAR + 1}))),
            Verdict::Drop(DropReason::RemodeledOutOfRange)
        );
    }

    #[test]
    fn test_sun_factor_bounds() {
        assert!(matches!(verdict(with(json!({"sun_factor": 1.0}))), Verdict::Keep(_)));
        assert_eq!(
            verdict(with(json!({"sun_factor": 1.2}))),
            Verdict::Drop(DropReason::SunFactorOutOfRange)
        );
        assert_eq!(
            verdict(with(json!({"sun_factor": -0.1}))),
            Verdict::Drop(DropReason::SunFactorOutOfRange)
        );
    }

    #[test]
    fn test_negative_counts() {
        for field in ["days_on_marked", "bathrooms", "kitchens"] {
            let mut overrides = serde_json::Map::new();
            overrides.insert(field.to_string(), json!(-1));
            assert_eq!(
                verdict(with(Value::Object(overrides))),
                Verdict::Drop(DropReason::NegativeCount),
                "{field}"
            );
        }
    }

    #[test]
    fn test_empty_rooms_repaired() {
        let mut v = validator();
        let Verdict::Keep(r) = v.validate(with(json!({"rooms": ""}))) else {
            panic!("record should survive");
        };
        assert_eq!(r.get_text("rooms"), Some("0 rooms"));
        assert_eq!(v.stats().rooms_repaired, 1);
    }

    #[test]
    fn test_integer_columns_cast_when_present() {
        let Verdict::Keep(r) = verdict(with(json!({"bathrooms": 2.0, "lot_w": 12.7, "kitchens": null})))
        else {
            panic!("record should survive");
        };
        assert_eq!(r.get("bathrooms"), &FieldValue::Integer(2));
        assert_eq!(r.get("lot_w"), &FieldValue::Integer(12));
        assert_eq!(r.get("year"), &FieldValue::Integer(1990));
        assert!(r.get("kitchens").is_missing());
        assert_eq!(r.get("price"), &FieldValue::Integer(3_500_000));
        assert_eq!(r.get("sold"), &FieldValue::text("yes"));
    }

    #[test]
    fn test_stats_add_up() {
        let mut v = validator();
        v.validate(record(base()));
        v.validate(record(base()));
        v.validate(with(json!({"price": null})));
        v.validate(with(json!({"year": 3000})));
        let s = v.stats();
        assert_eq!(s.total_seen, 4);
        assert_eq!(s.kept + s.total_removed(), s.total_seen);
    }
}
