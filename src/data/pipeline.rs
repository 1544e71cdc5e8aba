// ============================================================
// Layer 4 — Cleaning Pipeline
// ============================================================
// Chains the three cleaning stages for one batch:
//
//   raw record → Normalizer → NumericCoercer → Validator
//
// Each record is handled independently; the only state shared
// across records is the validator's duplicate set and counters.

use crate::data::{
    coercer::NumericCoercer,
    normalizer::Normalizer,
    validator::{ValidationStats, Validator, ValidatorConfig, Verdict},
};
use crate::domain::listing::ListingRecord;

pub struct CleaningPipeline {
    normalizer: Normalizer,
    coercer:    NumericCoercer,
    validator:  Validator,
}

impl CleaningPipeline {
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            normalizer: Normalizer::new(),
            coercer:    NumericCoercer::new(),
            validator:  Validator::new(config),
        }
    }

    /// Normalize and coerce without validating. Both stages are
    /// idempotent, so applying this twice changes nothing.
    pub fn prepare(&self, record: ListingRecord) -> ListingRecord {
        self.coercer.coerce(self.normalizer.normalize(record))
    }

    pub fn process(&mut self, record: ListingRecord) -> Verdict {
        let prepared = self.prepare(record);
        self.validator.validate(prepared)
    }

    /// Clean a whole batch, keeping input order.
    pub fn clean_all<I>(&mut self, records: I) -> Vec<ListingRecord>
    where
        I: IntoIterator<Item = ListingRecord>,
    {
        records
            .into_iter()
            .filter_map(|r| match self.process(r) {
                Verdict::Keep(clean) => Some(clean),
                Verdict::Drop(_) => None,
            })
            .collect()
    }

    pub fn stats(&self) -> &ValidationStats {
        self.validator.stats()
    }

    pub fn into_stats(self) -> ValidationStats {
        self.validator.into_stats()
    }
}
