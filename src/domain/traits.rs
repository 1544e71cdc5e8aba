// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to record sources and price
// estimators through these traits only:
//   - JsonlLoader implements RecordSource
//   - PricePredictor implements PriceEstimator

use anyhow::Result;

use crate::domain::listing::RawLine;
use crate::domain::request::PredictionRequest;
use crate::error::PredictError;

// ─── RecordSource ─────────────────────────────────────────────────────────────
/// Anything that yields listing lines, parsed or not.
pub trait RecordSource {
    /// Read every non-blank line. A line that is not a JSON object
    /// comes back as `RawLine::Malformed` rather than an error.
    fn read_lines(&self) -> Result<Vec<RawLine>>;
}

// ─── PriceEstimator ───────────────────────────────────────────────────────────
/// Anything that can turn a prediction request into a price.
pub trait PriceEstimator {
    fn estimate(&self, request: &PredictionRequest) -> std::result::Result<f64, PredictError>;
}
