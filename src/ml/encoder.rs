// ============================================================
// Layer 5 — Feature Encoder
// ============================================================
// Turns a prediction request into the 39-slot feature vector:
//
//   [ standardised size, external_storage, lot_w
//   | 12 month slots (one-hot)
//   | 24 agent slots (one-hot) ]
//
// Pure: no I/O, no state beyond the two immutable category maps.
// An unknown month or agent fails the whole request; a default
// slot is never substituted.

use crate::domain::request::PredictionRequest;
use crate::domain::vocabulary::CategoryMap;
use crate::error::PredictError;
use crate::ml::model::{Scaler, NUMERIC_FEATURES};

/// Encoded model input. Only the encoder builds these.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn numeric(&self) -> &[f64] {
        &self.0[..NUMERIC_FEATURES.min(self.0.len())]
    }
}

pub struct FeatureEncoder {
    months: CategoryMap,
    agents: CategoryMap,
}

impl FeatureEncoder {
    /// Encoder over the fixed month and agent vocabularies.
    pub fn new() -> Self {
        Self::with_maps(CategoryMap::months(), CategoryMap::agents())
    }

    pub fn with_maps(months: CategoryMap, agents: CategoryMap) -> Self {
        Self { months, agents }
    }

    /// Length of every vector this encoder produces.
    pub fn dimension(&self) -> usize {
        NUMERIC_FEATURES + self.months.len() + self.agents.len()
    }

    pub fn months(&self) -> &CategoryMap {
        &self.months
    }

    pub fn agents(&self) -> &CategoryMap {
        &self.agents
    }

    pub fn encode(
        &self,
        scaler:  &Scaler,
        request: &PredictionRequest,
    ) -> Result<FeatureVector, PredictError> {
        if let Some((field, value)) = request.non_finite_input() {
            return Err(PredictError::NonFiniteInput { field, value });
        }
        // Categorical lookups before any arithmetic
        let month_slots = self.months.one_hot(&request.sold_month)?;
        let agent_slots = self.agents.one_hot(&request.agent_id)?;
        let numeric     = scaler.standardize(request.numeric_inputs());

        let mut xs = Vec::with_capacity(self.dimension());
        xs.extend_from_slice(&numeric);
        xs.extend_from_slice(&month_slots);
        xs.extend_from_slice(&agent_slots);

        tracing::debug!(
            numeric = ?numeric,
            month = ?self.months.decode(&month_slots),
            agent = ?self.agents.decode(&agent_slots),
            len = xs.len(),
            sum = xs.iter().sum::<f64>(),
            "Encoded feature vector"
        );

        Ok(FeatureVector(xs))
    }

    /// Split a vector back into (month, agent). None if either
    /// block is not a valid one-hot.
    pub fn decode_categories<'a>(&'a self, features: &FeatureVector) -> Option<(&'a str, &'a str)> {
        if features.len() != self.dimension() {
            return None;
        }
        let xs = features.as_slice();
        let month_end = NUMERIC_FEATURES + self.months.len();
        let month = self.months.decode(&xs[NUMERIC_FEATURES..month_end])?;
        let agent = self.agents.decode(&xs[month_end..])?;
        Some((month, agent))
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new()
    }
}
