// ============================================================
// Layer 3 — Prediction Request
// ============================================================
// The five inputs the price model needs. This is the shape the
// dashboard (or any other front end) hands to the core.

use serde::{Deserialize, Serialize};

/// Names of the numeric inputs, in `numeric_inputs` order.
pub const NUMERIC_INPUTS: [&str; 3] = ["size", "external_storage", "lot_width"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Living area in m²
    pub size: f64,

    /// External storage in m²
    pub external_storage: f64,

    /// Lot width in metres
    pub lot_width: f64,

    /// Sale month, one of the fixed month names
    pub sold_month: String,

    /// Listing agent identifier
    pub agent_id: String,
}

impl PredictionRequest {
    pub fn new(
        size:             f64,
        external_storage: f64,
        lot_width:        f64,
        sold_month:       impl Into<String>,
        agent_id:         impl Into<String>,
    ) -> Self {
        Self {
            size,
            external_storage,
            lot_width,
            sold_month: sold_month.into(),
            agent_id:   agent_id.into(),
        }
    }

    /// Numeric inputs in the order the scaler stores them.
    pub fn numeric_inputs(&self) -> [f64; 3] {
        [self.size, self.external_storage, self.lot_width]
    }

    /// First numeric input that is NaN or infinite, if any.
    pub fn non_finite_input(&self) -> Option<(&'static str, f64)> {
        NUMERIC_INPUTS
            .into_iter()
            .zip(self.numeric_inputs())
            .find(|(_, v)| !v.is_finite())
    }
}
