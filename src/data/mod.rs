// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw inputs and numeric matrices.
//
// Training side:
//
//   test_dataset.csv
//       │
//       ▼
//   CsvLoader           → reads rows into a TabularDataset
//       │
//       ▼
//   SyntheticGenerator  → expands a few rows into thousands
//       │
//       ▼
//   stratified_split    → train / validation indices
//   stratified_folds    → k cross-validation folds
//
// Prediction side:
//
//   { subject → rating label }
//       │
//       ▼
//   FeatureEncoder      → 26 floats in [0, 1]
//
// Each module is responsible for exactly one step.
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Labelled rows with named columns
pub mod dataset;

/// Loads a labelled CSV file using the csv crate
pub mod loader;

/// Maps rating labels to a fixed-length feature vector
pub mod encoder;

/// Perturbation and rule-guided data synthesis
pub mod synthetic;

/// Stratified train/validation split and k-fold partitioning
pub mod splitter;
