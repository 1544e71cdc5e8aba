// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
//   1. Load model artifacts once   (Layer 6 - infra)
//   2. Build encoder + predictor   (Layer 5 - ml)
//   3. Answer requests; an unknown month or agent is reported
//      to the caller, a layout mismatch is logged as a defect

use anyhow::Result;

use crate::domain::request::PredictionRequest;
use crate::domain::traits::PriceEstimator;
use crate::infra::model_store::ModelStore;
use crate::ml::predictor::PricePredictor;

pub const DEFAULT_MODEL_DIR: &str = "models";

pub struct PredictUseCase<E: PriceEstimator = PricePredictor> {
    estimator: E,
}

impl PredictUseCase<PricePredictor> {
    pub fn new(model_dir: &str) -> Result<Self> {
        let store     = ModelStore::new(model_dir);
        let predictor = PricePredictor::from_store(&store)?;
        Ok(Self::with_estimator(predictor))
    }
}

impl<E: PriceEstimator> PredictUseCase<E> {
    pub fn with_estimator(estimator: E) -> Self {
        Self { estimator }
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<f64> {
        match self.estimator.estimate(request) {
            Ok(price) => {
                tracing::debug!(price, "Prediction");
                Ok(price)
            }
            Err(e) => {
                if e.is_fatal() {
                    tracing::error!("Model and encoder disagree: {e}");
                } else {
                    tracing::warn!("Rejected request: {e}");
                }
                Err(e.into())
            }
        }
    }
}
