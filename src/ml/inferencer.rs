// ============================================================
// Layer 5 — Prediction Service
// ============================================================
// Two-tier scoring for one encoded profile:
//
//   1. Trained model (when an artifact is loaded)
//        probabilities → stable descending sort → top 5
//   2. Rule-based fallback (no artifact, or tier 1 failed)
//        weighted subject sums + jitter → normalise → top 5
//
// The encoder's vector is matched to the artifact's stored
// columns by name before scoring. Tier 1 fails on a column
// the encoder does not produce, a feature-length mismatch,
// a classifier error, a probability count that doesn't match the class
// list, or any non-finite probability. A failure only
// affects the current request and is logged at warn.
//
// The loaded artifact lives behind an ArtifactHandle:
// readers clone the Arc, and a retrain swaps in a whole new
// artifact at once, so a request never sees half of one.

use std::sync::{Arc, PoisonError, RwLock};

use crate::data::encoder::{FeatureEncoder, FeatureVector};
use crate::domain::career::Career;
use crate::domain::error::CareerError;
use crate::domain::prediction::{rank_classes, CareerPrediction, PredictionSource, TOP_K};
use crate::domain::subject::SkillProfile;
use crate::domain::traits::CareerScorer;
use crate::ml::artifact::ModelArtifact;
use crate::ml::fallback::FallbackScorer;

/// Shared, swappable slot for the current artifact.
#[derive(Debug, Default)]
pub struct ArtifactHandle {
    inner: RwLock<Option<Arc<ModelArtifact>>>,
}

impl ArtifactHandle {
    pub fn new(artifact: Option<ModelArtifact>) -> Self {
        Self { inner: RwLock::new(artifact.map(Arc::new)) }
    }

    /// Snapshot of the artifact in use right now
    pub fn current(&self) -> Option<Arc<ModelArtifact>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Swap in a freshly trained artifact
    pub fn replace(&self, artifact: ModelArtifact) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(artifact));
        tracing::info!("Model artifact swapped in");
    }

    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }
}

/// Scores for one request, before report assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPrediction {
    pub source:        PredictionSource,
    /// Class list the probabilities are aligned with
    pub classes:       Vec<String>,
    pub probabilities: Vec<f64>,
    /// Top careers, highest confidence first
    pub predictions:   Vec<CareerPrediction>,
}

impl ScoredPrediction {
    pub fn top_confidence(&self) -> f64 {
        self.predictions.first().map_or(0.0, |p| p.confidence)
    }
}

pub struct PredictionService {
    handle:   ArtifactHandle,
    fallback: FallbackScorer,
}

impl PredictionService {
    pub fn new(handle: ArtifactHandle, fallback: FallbackScorer) -> Self {
        Self { handle, fallback }
    }

    pub fn handle(&self) -> &ArtifactHandle {
        &self.handle
    }

    /// Score an encoder-ordered vector with the loaded artifact,
    /// or the fallback if none.
    pub fn predict(&self, features: &FeatureVector, profile: &SkillProfile) -> ScoredPrediction {
        match self.handle.current() {
            Some(artifact) => {
                let columns = FeatureEncoder::feature_columns();
                match artifact.align_features(&columns, features.as_slice()) {
                    Ok(aligned) => self.predict_with(artifact.as_ref(), &FeatureVector::from(aligned), profile),
                    Err(e) => self.fall_back(artifact.classes(), profile, &e),
                }
            }
            None => {
                tracing::debug!("No trained model loaded; using rule-based scoring");
                self.fallback_scores(&Career::default_classes(), profile)
            }
        }
    }

    /// Score with `scorer`, falling back on any failure.
    pub fn predict_with(
        &self,
        scorer:   &dyn CareerScorer,
        features: &FeatureVector,
        profile:  &SkillProfile,
    ) -> ScoredPrediction {
        let classes = scorer.classes();

        let checked = scorer.class_probabilities(features.as_slice()).and_then(|p| {
            if p.len() != classes.len() {
                Err(CareerError::Prediction(format!(
                    "{} probabilities for {} classes",
                    p.len(),
                    classes.len()
                )))
            } else if p.iter().any(|v| !v.is_finite()) {
                Err(CareerError::Prediction(
                    "non-finite probability".to_string(),
                ))
            } else {
                Ok(p)
            }
        });

        match checked {
            Ok(probabilities) => ScoredPrediction {
                source:      PredictionSource::TrainedModel,
                predictions: rank_classes(classes, &probabilities, TOP_K),
                classes:     classes.to_vec(),
                probabilities,
            },
            Err(e) => self.fall_back(classes, profile, &e),
        }
    }

    fn fall_back(&self, classes: &[String], profile: &SkillProfile, err: &CareerError) -> ScoredPrediction {
        tracing::warn!("Model prediction failed, using rule-based fallback: {}", err);
        if classes.is_empty() {
            self.fallback_scores(&Career::default_classes(), profile)
        } else {
            self.fallback_scores(classes, profile)
        }
    }

    fn fallback_scores(&self, classes: &[String], profile: &SkillProfile) -> ScoredPrediction {
        let probabilities = self.fallback.score(classes, profile);
        ScoredPrediction {
            source:      PredictionSource::RuleBasedFallback,
            predictions: rank_classes(classes, &probabilities, TOP_K),
            classes:     classes.to_vec(),
            probabilities,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::FeatureEncoder;
    use crate::ml::artifact::RoleEncoder;
    use crate::ml::model::Candidate;
    use crate::ml::tree::TreeParams;
    use ndarray::Array2;

    /// Scorer double that always fails
    struct BrokenScorer {
        classes: Vec<String>,
    }

    impl CareerScorer for BrokenScorer {
        fn classes(&self) -> &[String] { &self.classes }

        fn class_probabilities(&self, _: &[f64]) -> Result<Vec<f64>, CareerError> {
            Err(CareerError::Prediction("broken".to_string()))
        }
    }

    /// Scorer double that returns NaN
    struct NanScorer {
        classes: Vec<String>,
    }

    impl CareerScorer for NanScorer {
        fn classes(&self) -> &[String] { &self.classes }

        fn class_probabilities(&self, _: &[f64]) -> Result<Vec<f64>, CareerError> {
            Ok(vec![f64::NAN; self.classes.len()])
        }
    }

    /// Artifact over the 26 encoder columns: class 0 when AI/ML is high
    fn artifact() -> ModelArtifact {
        let columns = FeatureEncoder::feature_columns();
        let mut x   = Array2::<f64>::from_elem((4, columns.len()), 0.5);
        x[[0, 10]] = 1.0;
        x[[1, 10]] = 0.9;
        x[[2, 10]] = 0.1;
        x[[3, 10]] = 0.0;
        let model = Candidate::DecisionTree(TreeParams::default())
            .fit(x.view(), &[0, 0, 1, 1], 2)
            .unwrap();
        ModelArtifact::new(model, RoleEncoder::fit(&["Data Scientist", "Web Developer"]), columns)
    }

    fn service(artifact: Option<ModelArtifact>) -> PredictionService {
        PredictionService::new(ArtifactHandle::new(artifact), FallbackScorer::new(Some(42)))
    }

    fn profile() -> SkillProfile {
        SkillProfile::from_pairs([("AI/ML", "Professional"), ("Data Science", "Excellent")])
    }

    #[test]
    fn test_primary_path_uses_model() {
        let svc      = service(Some(artifact()));
        let profile  = profile();
        let features = FeatureEncoder::new().encode(&profile);
        let scored   = svc.predict(&features, &profile);
        assert_eq!(scored.source, PredictionSource::TrainedModel);
        assert_eq!(scored.predictions[0].name, "Data Scientist");
        assert_eq!(scored.top_confidence(), 1.0);
    }

    #[test]
    fn test_primary_path_is_idempotent() {
        let svc      = service(Some(artifact()));
        let profile  = profile();
        let features = FeatureEncoder::new().encode(&profile);
        assert_eq!(svc.predict(&features, &profile), svc.predict(&features, &profile));
    }

    #[test]
    fn test_no_artifact_uses_fallback_over_all_careers() {
        let svc      = service(None);
        let profile  = profile();
        let scored   = svc.predict(&FeatureEncoder::new().encode(&profile), &profile);
        assert_eq!(scored.source, PredictionSource::RuleBasedFallback);
        assert_eq!(scored.classes, Career::default_classes());
        assert_eq!(scored.predictions.len(), TOP_K);
        assert!((scored.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_failing_scorer_falls_back_with_its_classes() {
        let svc    = service(None);
        let broken = BrokenScorer { classes: vec!["Web Developer".into(), "Cloud Engineer".into()] };
        let scored = svc.predict_with(&broken, &FeatureVector::from(vec![0.5; 26]), &profile());
        assert_eq!(scored.source, PredictionSource::RuleBasedFallback);
        assert_eq!(scored.classes, broken.classes);
        assert_eq!(scored.predictions.len(), 2);
    }

    #[test]
    fn test_non_finite_probabilities_fall_back() {
        let svc    = service(None);
        let nan    = NanScorer { classes: Career::default_classes() };
        let scored = svc.predict_with(&nan, &FeatureVector::from(vec![0.5; 26]), &profile());
        assert_eq!(scored.source, PredictionSource::RuleBasedFallback);
        assert!(scored.probabilities.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_length_mismatch_falls_back() {
        let svc    = service(Some(artifact()));
        let scored = svc.predict(&FeatureVector::from(vec![0.5; 3]), &profile());
        assert_eq!(scored.source, PredictionSource::RuleBasedFallback);
    }

    #[test]
    fn test_reordered_columns_are_matched_by_name() {
        // Same decision rule, but the artifact stores its columns
        // reversed: AI/ML (encoder position 10) is stored at 15
        let mut columns = FeatureEncoder::feature_columns();
        columns.reverse();
        let ai_ml = columns.iter().position(|c| c == "Skill11").unwrap();
        assert_eq!(ai_ml, 15);

        let mut x = Array2::<f64>::from_elem((4, columns.len()), 0.5);
        x[[0, ai_ml]] = 1.0;
        x[[1, ai_ml]] = 0.9;
        x[[2, ai_ml]] = 0.1;
        x[[3, ai_ml]] = 0.0;
        let model = Candidate::DecisionTree(TreeParams::default())
            .fit(x.view(), &[0, 0, 1, 1], 2)
            .unwrap();
        let reversed = ModelArtifact::new(model, RoleEncoder::fit(&["Data Scientist", "Web Developer"]), columns);

        let svc      = service(Some(reversed));
        let profile  = profile();
        let features = FeatureEncoder::new().encode(&profile);
        let scored   = svc.predict(&features, &profile);
        assert_eq!(scored.source, PredictionSource::TrainedModel);
        assert_eq!(scored.predictions[0].name, "Data Scientist");
        assert_eq!(scored.top_confidence(), 1.0);
    }

    #[test]
    fn test_unknown_stored_column_falls_back() {
        let mut a = artifact();
        a.feature_columns[0] = "Cooking".to_string();
        let svc     = service(Some(a));
        let profile = profile();
        let scored  = svc.predict(&FeatureEncoder::new().encode(&profile), &profile);
        assert_eq!(scored.source, PredictionSource::RuleBasedFallback);
        assert_eq!(scored.classes, ["Data Scientist", "Web Developer"]);
    }

    #[test]
    fn test_model_narrower_than_columns_falls_back() {
        // A 2-feature model stored next to the 26 encoder columns
        let x = ndarray::array![[0.9, 0.1], [0.8, 0.2], [0.1, 0.9], [0.2, 0.8]];
        let model = Candidate::DecisionTree(TreeParams::default())
            .fit(x.view(), &[0, 0, 1, 1], 2)
            .unwrap();
        let narrow = ModelArtifact::new(
            model,
            RoleEncoder::fit(&["Data Scientist", "Web Developer"]),
            FeatureEncoder::feature_columns(),
        );

        let svc     = service(Some(narrow));
        let profile = profile();
        let scored  = svc.predict(&FeatureEncoder::new().encode(&profile), &profile);
        assert_eq!(scored.source, PredictionSource::RuleBasedFallback);
        assert_eq!(scored.predictions.len(), 2);
    }

    #[test]
    fn test_handle_swap_is_visible_to_next_request() {
        let svc = service(None);
        assert!(!svc.handle().is_loaded());
        svc.handle().replace(artifact());
        assert!(svc.handle().is_loaded());

        let profile = profile();
        let scored  = svc.predict(&FeatureEncoder::new().encode(&profile), &profile);
        assert_eq!(scored.source, PredictionSource::TrainedModel);
    }
}
