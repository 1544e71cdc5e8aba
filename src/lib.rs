// ============================================================
// listing-price
// ============================================================
// Cleans raw real-estate listing exports and estimates sale
// prices with a pre-trained linear model.
//
//   Layer 1  cli          — argument parsing and printing
//   Layer 2  application  — one use case per command
//   Layer 3  domain       — records, vocabularies, traits
//   Layer 4  data         — NDJSON I/O and the cleaning stages
//   Layer 5  ml           — feature encoding and prediction
//   Layer 6  infra        — model artifacts, run reports
//            error        — typed errors callers match on

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod ml;
pub mod infra;
pub mod error;
