// ============================================================
// Layer 5 — Price Model
// ============================================================
// The pre-trained linear model: one weight per feature slot,
// a bias, and the scaler used to standardise the three numeric
// inputs during training.
//
// Feature layout (39 slots):
//   [0..3)   size, external_storage, lot_w   (standardised)
//   [3..15)  sale month one-hot               (12)
//   [15..39) agent one-hot                    (24)
//
// A Model is validated once when it is built and never changes
// afterwards; fields are private and there are no setters.
// It is Send + Sync, so one instance can serve any number of
// concurrent requests by reference.

use serde::{Deserialize, Serialize};

use crate::domain::vocabulary::{AGENTS, MONTHS};
use crate::error::ModelError;

/// Number of standardised numeric inputs.
pub const NUMERIC_FEATURES: usize = 3;

/// Total feature slots the model expects.
pub const FEATURE_DIM: usize = NUMERIC_FEATURES + MONTHS.len() + AGENTS.len();

/// Training-time standardisation parameters, exactly as stored
/// in `scalers.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean:             Vec<f64>,
    pub std:              Vec<f64>,
    pub numeric_features: Vec<String>,
}

/// Validated standardisation for the three numeric inputs.
/// Only obtainable through `Scaler::new` (or deserialisation,
/// which goes through it), so every instance has the right shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScalerParams", into = "ScalerParams")]
pub struct Scaler {
    mean:             [f64; NUMERIC_FEATURES],
    std:              [f64; NUMERIC_FEATURES],
    numeric_features: [String; NUMERIC_FEATURES],
}

impl Scaler {
    pub fn new(
        mean:             Vec<f64>,
        std:              Vec<f64>,
        numeric_features: Vec<String>,
    ) -> Result<Self, ModelError> {
        let mean: [f64; NUMERIC_FEATURES] = mean.try_into().map_err(|v: Vec<f64>| {
            ModelError::ScalerShape { field: "mean", expected: NUMERIC_FEATURES, actual: v.len() }
        })?;
        let std: [f64; NUMERIC_FEATURES] = std.try_into().map_err(|v: Vec<f64>| {
            ModelError::ScalerShape { field: "std", expected: NUMERIC_FEATURES, actual: v.len() }
        })?;
        let numeric_features: [String; NUMERIC_FEATURES] =
            numeric_features.try_into().map_err(|v: Vec<String>| ModelError::ScalerShape {
                field:    "numeric_features",
                expected: NUMERIC_FEATURES,
                actual:   v.len(),
            })?;

        if mean.iter().any(|m| !m.is_finite()) {
            return Err(ModelError::NonFinite("scaler mean"));
        }
        for (std, feature) in std.iter().zip(&numeric_features) {
            if !std.is_finite() || *std == 0.0 {
                return Err(ModelError::DegenerateStd { feature: feature.clone(), value: *std });
            }
        }
        Ok(Self { mean, std, numeric_features })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn std(&self) -> &[f64] {
        &self.std
    }

    pub fn numeric_features(&self) -> &[String] {
        &self.numeric_features
    }

    /// `(value - mean) / std`, elementwise, in scaler order.
    pub fn standardize(&self, values: [f64; NUMERIC_FEATURES]) -> [f64; NUMERIC_FEATURES] {
        let mut out = [0.0; NUMERIC_FEATURES];
        for (o, ((v, m), s)) in out.iter_mut().zip(values.iter().zip(&self.mean).zip(&self.std)) {
            *o = (v - m) / s;
        }
        out
    }
}

impl TryFrom<ScalerParams> for Scaler {
    type Error = ModelError;

    fn try_from(p: ScalerParams) -> Result<Self, Self::Error> {
        Scaler::new(p.mean, p.std, p.numeric_features)
    }
}

impl From<Scaler> for ScalerParams {
    fn from(s: Scaler) -> Self {
        ScalerParams {
            mean:             s.mean.to_vec(),
            std:              s.std.to_vec(),
            numeric_features: s.numeric_features.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    weights: Vec<f64>,
    bias:    f64,
    scaler:  Scaler,
}

impl Model {
    pub fn new(weights: Vec<f64>, bias: f64, scaler: Scaler) -> Result<Self, ModelError> {
        if weights.len() != FEATURE_DIM {
            return Err(ModelError::WeightCount { expected: FEATURE_DIM, actual: weights.len() });
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NonFinite("weights"));
        }
        if !bias.is_finite() {
            return Err(ModelError::NonFinite("bias"));
        }

        Ok(Self { weights, bias, scaler })
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }
}
