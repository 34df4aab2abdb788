// ============================================================
// Layer 5 — Model Artifact
// ============================================================
// Everything prediction needs from a training run, bundled:
//
//   ModelArtifact
//     ├── model            fitted classifier
//     ├── role_encoder     class index ↔ role name (sorted)
//     └── feature_columns  column order the model was fit on
//
// The three parts are persisted as separate blobs and are
// only meaningful together: class index i of the model is
// role_encoder.classes()[i], and input position j is
// feature_columns[j]. check_consistency() enforces that
// pairing for blobs read back from disk.
//
// Inputs are matched to the stored columns by name, not by
// position: align_features() reorders an encoder-ordered
// vector into the stored order, and a stored column the
// encoder does not produce is a PredictionFailure.
//
// ModelArtifact implements CareerScorer, so the prediction
// service treats it like any other scorer.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::error::CareerError;
use crate::domain::traits::CareerScorer;
use crate::ml::model::TrainedModel;

/// Bijection between role names and class indices, classes sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEncoder {
    classes: Vec<String>,
}

impl RoleEncoder {
    /// Fit on every label seen, deduplicated and sorted
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let classes = labels
            .iter()
            .map(|l| l.as_ref().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] { &self.classes }

    pub fn len(&self) -> usize { self.classes.len() }

    pub fn is_empty(&self) -> bool { self.classes.is_empty() }

    /// Index of a role, or None if it was never seen
    pub fn encode(&self, role: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == role)
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Encode every label; any unseen label is an error
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>, CareerError> {
        labels
            .iter()
            .map(|l| {
                self.encode(l.as_ref()).ok_or_else(|| {
                    CareerError::Training(format!("role '{}' unknown to the encoder", l.as_ref()))
                })
            })
            .collect()
    }
}

/// Fitted model plus the metadata needed to use it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model:           TrainedModel,
    pub role_encoder:    RoleEncoder,
    pub feature_columns: Vec<String>,
}

impl ModelArtifact {
    pub fn new(model: TrainedModel, role_encoder: RoleEncoder, feature_columns: Vec<String>) -> Self {
        Self { model, role_encoder, feature_columns }
    }

    /// Model width, class count and stored metadata agree, and
    /// the model's own indices are in range.
    pub fn check_consistency(&self) -> Result<(), String> {
        self.model.check_structure()?;
        if self.model.n_features() != self.feature_columns.len() {
            return Err(format!(
                "model takes {} features but {} feature columns are stored",
                self.model.n_features(),
                self.feature_columns.len()
            ));
        }
        if self.model.n_classes() != self.role_encoder.len() {
            return Err(format!(
                "model has {} classes but the role encoder has {}",
                self.model.n_classes(),
                self.role_encoder.len()
            ));
        }
        Ok(())
    }

    /// Log when the stored column order differs from the
    /// encoder's; returns whether they match exactly.
    pub fn check_columns(&self, expected: &[String]) -> bool {
        let matches = self.feature_columns == expected;
        if !matches {
            tracing::warn!(
                "Stored feature columns differ from the encoder's order ({} stored, {} expected); inputs will be matched by name",
                self.feature_columns.len(),
                expected.len()
            );
        }
        matches
    }

    /// Reorder `features`, laid out as `source_columns`, into the
    /// stored column order.
    pub fn align_features(&self, source_columns: &[String], features: &[f64]) -> Result<Vec<f64>, CareerError> {
        if features.len() != source_columns.len() {
            return Err(CareerError::Prediction(format!(
                "{} feature values for {} columns",
                features.len(),
                source_columns.len()
            )));
        }
        if self.feature_columns == source_columns {
            return Ok(features.to_vec());
        }

        self.feature_columns
            .iter()
            .map(|name| {
                source_columns
                    .iter()
                    .position(|c| c == name)
                    .map(|i| features[i])
                    .ok_or_else(|| CareerError::Prediction(format!("no input value for model column '{name}'")))
            })
            .collect()
    }
}

impl CareerScorer for ModelArtifact {
    fn classes(&self) -> &[String] {
        self.role_encoder.classes()
    }

    fn class_probabilities(&self, features: &[f64]) -> Result<Vec<f64>, CareerError> {
        let expected = self.model.n_features();
        if features.len() != expected || expected != self.feature_columns.len() {
            return Err(CareerError::Prediction(format!(
                "model expects {} features ({} columns stored), got {}",
                expected,
                self.feature_columns.len(),
                features.len()
            )));
        }
        self.model.check_structure().map_err(CareerError::Prediction)?;

        let x = Array2::from_shape_vec((1, features.len()), features.to_vec())
            .map_err(|e| CareerError::Prediction(e.to_string()))?;
        let probabilities = self.model.predict_proba(x.view()).row(0).to_vec();

        if probabilities.len() != self.role_encoder.len() {
            return Err(CareerError::Prediction(format!(
                "model returned {} probabilities for {} classes",
                probabilities.len(),
                self.role_encoder.len()
            )));
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(CareerError::Prediction("model returned non-finite probabilities".to_string()));
        }
        Ok(probabilities)
    }
}
