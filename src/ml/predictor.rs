// ============================================================
// Layer 5 — Linear Predictor
// ============================================================
//   log_price = dot(features, weights) + bias
//   price     = exp(log_price) - 1        (inverse of log1p)
//
// A length mismatch between features and weights means the
// encoder and the model disagree about the layout. That is a
// defect, not bad input: the request fails with
// DimensionMismatch and nothing is truncated or padded.

use anyhow::Result;

use crate::domain::request::PredictionRequest;
use crate::domain::traits::PriceEstimator;
use crate::error::PredictError;
use crate::infra::model_store::ModelStore;
use crate::ml::encoder::{FeatureEncoder, FeatureVector};
use crate::ml::model::Model;

pub struct LinearPredictor;

impl LinearPredictor {
    pub fn log_price(weights: &[f64], bias: f64, features: &[f64]) -> Result<f64, PredictError> {
        if features.len() != weights.len() {
            return Err(PredictError::DimensionMismatch {
                expected: weights.len(),
                actual:   features.len(),
            });
        }
        let dot: f64 = features.iter().zip(weights).map(|(x, w)| x * w).sum();
        Ok(dot + bias)
    }

    pub fn predict(model: &Model, features: &FeatureVector) -> Result<f64, PredictError> {
        let log_price = Self::log_price(model.weights(), model.bias(), features.as_slice())?;
        let price = log_price.exp_m1();
        if !price.is_finite() {
            return Err(PredictError::PriceOverflow(log_price));
        }
        Ok(price)
    }
}

/// Encoder + model, ready to answer prediction requests.
/// Built once at start-up and shared by reference afterwards.
pub struct PricePredictor {
    model:   Model,
    encoder: FeatureEncoder,
}

impl PricePredictor {
    /// Pair a model with the fixed-vocabulary encoder. Fails if
    /// the two disagree on the feature dimension.
    pub fn new(model: Model) -> Result<Self, PredictError> {
        Self::with_encoder(model, FeatureEncoder::new())
    }

    pub fn with_encoder(model: Model, encoder: FeatureEncoder) -> Result<Self, PredictError> {
        if encoder.dimension() != model.weights().len() {
            return Err(PredictError::DimensionMismatch {
                expected: model.weights().len(),
                actual:   encoder.dimension(),
            });
        }
        Ok(Self { model, encoder })
    }

    /// Load the model artifacts from a store and build the predictor.
    pub fn from_store(store: &ModelStore) -> Result<Self> {
        let model = store.load()?;
        let predictor = Self::new(model)?;
        tracing::info!("Price model loaded from '{}'", store.dir().display());
        Ok(predictor)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }
}

impl PriceEstimator for PricePredictor {
    fn estimate(&self, request: &PredictionRequest) -> Result<f64, PredictError> {
        let features = self.encoder.encode(self.model.scaler(), request)?;
        LinearPredictor::predict(&self.model, &features)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vocabulary::CategoryMap;
    use crate::ml::model::tests::identity_scaler;
    use crate::ml::model::FEATURE_DIM;
    use std::sync::Arc;

    const FIRST_AGENT: &str = "19a0b5650c4d43619cbaeeac9cc7a20a";

    fn unit_weight_model() -> Model {
        let mut weights = vec![0.0; FEATURE_DIM];
        weights[0] = 1.0;
        Model::new(weights, 0.0, identity_scaler()).unwrap()
    }

    #[test]
    fn test_reference_prediction() {
        // weights = e0, bias 0, size 5, first month and agent → exp(5) - 1
        let p = PricePredictor::new(unit_weight_model()).unwrap();
        let req = PredictionRequest::new(5.0, 0.0, 0.0, "april", FIRST_AGENT);
        let price = p.estimate(&req).unwrap();
        assert!((price - 147.413_159_102_576_6).abs() < 1e-9, "got {price}");
    }

    #[test]
    fn test_bias_and_one_hot_weights_apply() {
        let mut weights = vec![0.0; FEATURE_DIM];
        weights[3] = 0.5;   // april
        weights[15] = 0.25; // first agent
        let model = Model::new(weights, 1.0, identity_scaler()).unwrap();
        let p = PricePredictor::new(model).unwrap();
        let req = PredictionRequest::new(80.0, 5.0, 12.0, "april", FIRST_AGENT);
        let price = p.estimate(&req).unwrap();
        assert!((price - (1.75f64.exp() - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_dimension_mismatch_is_reported() {
        let err = LinearPredictor::log_price(&[1.0, 2.0], 0.0, &[1.0]).unwrap_err();
        assert_eq!(err, PredictError::DimensionMismatch { expected: 2, actual: 1 });
        assert!(err.is_fatal());
    }

    #[test]
    fn test_encoder_model_disagreement_fails_at_build() {
        let small = FeatureEncoder::with_maps(
            CategoryMap::new("sold_in_month", ["jan", "feb"]),
            CategoryMap::agents(),
        );
        let err = PricePredictor::with_encoder(unit_weight_model(), small).err().unwrap();
        assert_eq!(err, PredictError::DimensionMismatch { expected: 39, actual: 29 });
    }

    #[test]
    fn test_unknown_agent_yields_no_price() {
        let p = PricePredictor::new(unit_weight_model()).unwrap();
        let req = PredictionRequest::new(5.0, 0.0, 0.0, "april", "ghost");
        assert!(matches!(p.estimate(&req), Err(PredictError::UnknownCategory { .. })));
    }

    #[test]
    fn test_huge_input_is_an_error_not_infinity() {
        let p = PricePredictor::new(unit_weight_model()).unwrap();
        let req = PredictionRequest::new(1e6, 0.0, 0.0, "april", FIRST_AGENT);
        assert_eq!(p.estimate(&req), Err(PredictError::PriceOverflow(1e6)));
    }

    #[test]
    fn test_nan_size_yields_no_price() {
        let p = PricePredictor::new(unit_weight_model()).unwrap();
        let req = PredictionRequest::new(f64::NAN, 0.0, 0.0, "april", FIRST_AGENT);
        assert!(matches!(p.estimate(&req), Err(PredictError::NonFiniteInput { field: "size", .. })));
    }

    #[test]
    fn test_shared_across_threads() {
        let p = Arc::new(PricePredictor::new(unit_weight_model()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let p = Arc::clone(&p);
                std::thread::spawn(move || {
                    let req = PredictionRequest::new(i as f64, 0.0, 0.0, "may", FIRST_AGENT);
                    p.estimate(&req).unwrap()
                })
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            let price = h.join().unwrap();
            assert!((price - (i as f64).exp_m1()).abs() < 1e-9);
        }
    }
}
