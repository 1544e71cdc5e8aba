// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal per use case (clean a file, filter outliers, answer a
// price request, describe a dataset).
//
// Rules for this layer:
//   - No model math here
//   - No printing here (that's Layer 1)
//   - File formats belong to Layers 4 and 6
//   - Only workflow coordination

// Raw listings → cleaned listings
pub mod clean_use_case;

// In-place removal of the days_on_marked sentinel
pub mod outlier_use_case;

// Price estimation from saved model artifacts
pub mod predict_use_case;

// Feature overview and pairwise statistics
pub mod describe_use_case;
