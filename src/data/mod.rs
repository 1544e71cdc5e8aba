// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw NDJSON line and a clean record.
//
//   houses.jsonl
//       │
//       ▼
//   JsonlLoader       → parses lines, flags malformed ones
//       │
//       ▼
//   Normalizer        → lowercase keys, typo fix, trim, placeholders
//       │
//       ▼
//   NumericCoercer    → numeric columns to numbers or Missing
//       │
//       ▼
//   Validator         → drop / repair by business rule
//       │
//       ▼
//   JsonlWriter       → houses_cleaned.jsonl
//
// Each module does exactly one step and is tested on its own.

/// Reads NDJSON listing files line by line
pub mod loader;

/// Key/whitespace/placeholder normalisation
pub mod normalizer;

/// Numeric coercion of the fixed numeric columns
pub mod coercer;

/// Business rules and their counters
pub mod validator;

/// Normalizer → Coercer → Validator in one place
pub mod pipeline;

/// Writes NDJSON output
pub mod writer;

/// Best-effort number extraction for exploratory tooling
pub mod lenient;
