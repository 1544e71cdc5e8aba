// ============================================================
// Layer 2 — Describe Use Case
// ============================================================
// Exploratory look at a listings file, for picking model
// inputs:
//   - features(): every column seen, a sample value, and whether
//     the column reads as a number
//   - pair(x, y): how two columns move together
//
// Values go through the lenient parser here, so "4 rooms" and
// "12,5" still count as numbers. Malformed lines are ignored.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::data::lenient::{parse_lenient, parse_strict};
use crate::domain::field::FieldValue;
use crate::domain::listing::{ListingRecord, RawLine};
use crate::domain::traits::RecordSource;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureInfo {
    /// First present value seen for the column
    pub sample:  FieldValue,
    /// True when every present value parses strictly as a number
    pub numeric: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairSummary {
    pub n:           usize,
    pub mean_x:      f64,
    pub mean_y:      f64,
    /// Pearson correlation; None with fewer than two pairs or
    /// when either column is constant
    pub correlation: Option<f64>,
}

pub struct DescribeUseCase<S: RecordSource> {
    source: S,
    limit:  Option<usize>,
}

impl<S: RecordSource> DescribeUseCase<S> {
    pub fn new(source: S, limit: Option<usize>) -> Self {
        Self { source, limit }
    }

    fn records(&self) -> Result<Vec<ListingRecord>> {
        let records: Vec<ListingRecord> = self
            .source
            .read_lines()?
            .into_iter()
            .filter_map(|line| match line {
                RawLine::Record(r) => Some(r),
                RawLine::Malformed { .. } => None,
            })
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();
        tracing::debug!("Describing {} records", records.len());
        Ok(records)
    }

    pub fn features(&self) -> Result<BTreeMap<String, FeatureInfo>> {
        let mut out: BTreeMap<String, FeatureInfo> = BTreeMap::new();
        for record in self.records()? {
            for (key, value) in record.iter() {
                if value.is_missing() {
                    continue;
                }
                let numeric = parse_strict(value).is_some();
                out.entry(key.clone())
                    .and_modify(|info| info.numeric &= numeric)
                    .or_insert_with(|| FeatureInfo { sample: value.clone(), numeric });
            }
        }
        Ok(out)
    }

    pub fn pair(&self, x: &str, y: &str) -> Result<PairSummary> {
        let points: Vec<(f64, f64)> = self
            .records()?
            .iter()
            .filter_map(|r| Some((parse_lenient(r.get(x))?, parse_lenient(r.get(y))?)))
            .collect();
        Ok(summarize(&points))
    }
}

fn summarize(points: &[(f64, f64)]) -> PairSummary {
    let n = points.len();
    if n == 0 {
        return PairSummary { n, mean_x: f64::NAN, mean_y: f64::NAN, correlation: None };
    }

    let count  = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / count;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / count;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    let correlation = if n >= 2 && sxx > 0.0 && syy > 0.0 {
        Some(sxy / (sxx.sqrt() * syy.sqrt()))
    } else {
        None
    };
    PairSummary { n, mean_x, mean_y, correlation }
}
