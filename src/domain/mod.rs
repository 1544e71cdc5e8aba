// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits describing listings, the
// fixed vocabularies and a prediction request.
//
// Rules for this layer:
//   - NO file I/O
//   - NO model arithmetic
//   - Only plain Rust types and traits

// One cell of a listing: Numeric | Integer | Text | Missing
pub mod field;

// A listing record and the canonical column names
pub mod listing;

// The inputs of one price prediction
pub mod request;

// Core abstractions (traits) that other layers implement
pub mod traits;

// Month and agent vocabularies with their one-hot maps
pub mod vocabulary;
