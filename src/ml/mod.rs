// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// Everything that touches model parameters lives here.
//
//   model.rs     — the immutable weights / bias / scaler bundle
//                  and its validation
//
//   encoder.rs   — request → 39-slot feature vector
//                  (standardised numerics + two one-hot blocks)
//
//   predictor.rs — dot product + bias, inverse log1p;
//                  PricePredictor pairs the encoder with a model
//
// Training is not part of this crate: the artifacts arrive
// pre-trained and are only ever read.

/// Immutable linear price model
pub mod model;

/// Feature encoding for prediction requests
pub mod encoder;

/// Linear inference
pub mod predictor;
