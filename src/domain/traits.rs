// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Callers program against these traits rather than concrete
// types, so a dataset can come from a CSV file or straight
// from memory, and the prediction path can run against the
// persisted model or a test double.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use crate::data::dataset::TabularDataset;
use crate::domain::error::CareerError;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Anything that can produce a labelled tabular dataset.
///
/// Implementations:
///   - CsvLoader      → reads a CSV file with a `Role` column
///   - TabularDataset → an in-memory dataset is its own source
pub trait DatasetSource {
    /// Load every row, or fail with CareerError::DataLoad.
    fn load(&self) -> Result<TabularDataset, CareerError>;
}

// ─── CareerScorer ─────────────────────────────────────────────────────────────
/// Anything that turns an encoded feature vector into one
/// probability per class.
///
/// Implementations:
///   - ModelArtifact → the persisted, trained classifier
pub trait CareerScorer {
    /// Class labels, index-aligned with `class_probabilities`
    fn classes(&self) -> &[String];

    /// Probability per class for one feature vector.
    /// Fails with CareerError::Prediction on malformed input.
    fn class_probabilities(&self, features: &[f64]) -> Result<Vec<f64>, CareerError>;
}
