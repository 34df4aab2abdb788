// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits that define the core
// concepts of the career predictor.
//
// Rules for this layer:
//   - NO file I/O
//   - NO model fitting or numeric optimisation
//   - Only data types, lookup tables and small pure functions
//
// Think of this layer as the "dictionary" of the system —
// it defines what a rating, a subject, a career and a
// prediction ARE, not how they are computed.
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

/// The 7-step rating scale ("Not Interested" … "Professional")
pub mod rating;

/// The 17 assessed subjects and a user's skill profile
pub mod subject;

/// The closed set of 6 careers plus their static descriptions
pub mod career;

/// Ranked predictions, certainty buckets and request metrics
pub mod prediction;

/// Error taxonomy shared by every layer
pub mod error;

/// Core abstractions (traits) that other layers implement
pub mod traits;
