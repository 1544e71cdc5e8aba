// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting file concerns that don't belong to a business
// layer:
//
//   model_store.rs — reads the trained model artifacts (weights,
//                    bias, scaler) from a directory of JSON files
//                    and turns them into a validated Model
//
//   report.rs      — appends per-run cleaning counters to a CSV
//                    file for later inspection

/// Model artifact loading and saving
pub mod model_store;

/// Cleaning run CSV report
pub mod report;
