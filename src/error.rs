// ============================================================
// Typed Errors
// ============================================================
// Errors a caller has to tell apart get their own enum here.
// Everything else (file I/O, JSON framing) travels as
// anyhow::Error with context attached at the call site.
//
//   PredictError — raised per prediction request
//   ModelError   — raised once, while loading model artifacts

use thiserror::Error;

/// Failure of a single prediction request.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PredictError {
    /// A categorical input is not part of the fixed vocabulary.
    /// This is a user-input error; no partial feature vector exists.
    #[error("unknown {field} '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    /// A numeric input is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NonFiniteInput { field: &'static str, value: f64 },

    /// The model produced a price that does not fit in an f64.
    #[error("log-price {0} does not map to a finite price")]
    PriceOverflow(f64),

    /// Feature vector and weight vector disagree in length.
    /// The encoder and the model were built for different layouts.
    #[error("feature vector has {actual} dimensions but the model expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl PredictError {
    /// True for errors that point at a defect rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PredictError::DimensionMismatch { .. })
    }
}

/// Model artifacts that cannot form a usable `Model`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("weight vector has {actual} entries, expected {expected}")]
    WeightCount { expected: usize, actual: usize },

    #[error("scaler field '{field}' has {actual} entries, expected {expected}")]
    ScalerShape {
        field:    &'static str,
        expected: usize,
        actual:   usize,
    },

    #[error("scaler std for '{feature}' is {value}; it must be finite and non-zero")]
    DegenerateStd { feature: String, value: f64 },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}
