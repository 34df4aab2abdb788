// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Five kinds of failure, none of them fatal to the process:
//
//   DataLoad     — a required dataset is missing or unreadable.
//                  Training aborts; the existing artifact stays.
//   ArtifactLoad — a persisted model blob is missing or corrupt.
//                  Recovered by retraining or the fallback scorer.
//   Prediction   — the trained model failed for one request.
//                  Recovered by the fallback scorer.
//   Training     — model fitting or evaluation could not run
//                  (no candidates, degenerate labels).
//                  Training aborts; the existing artifact stays.
//   NoRatings    — the caller sent nothing to score.
//                  Surfaced to the caller as-is.
//
// Reference: thiserror crate documentation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CareerError {
    #[error("Data load failed: {0}")]
    DataLoad(String),

    #[error("Artifact load failed: {0}")]
    ArtifactLoad(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("No ratings provided")]
    NoRatings,
}

impl CareerError {
    /// Every kind except NoRatings is recovered internally
    pub fn is_client_error(&self) -> bool {
        matches!(self, CareerError::NoRatings)
    }
}
