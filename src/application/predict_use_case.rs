// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Turns a raw ratings map into a PredictionReport:
//
//   Step 1: Reject an empty map           (NoRatings)
//   Step 2: Encode ratings → 26 features  (Layer 4 - data)
//   Step 3: Score model-or-fallback       (Layer 5 - ml)
//   Step 4: Certainty, completeness and
//           the real-time accuracy        (Layer 3 / 6)
//
// At construction the use case picks its model tier once:
//
//   stored artifact loads   → trained model
//   missing / corrupt blob  → train now, if allowed
//   still nothing           → rule-based fallback only
//
// Reference: Clean Architecture pattern

use serde::{Deserialize, Serialize};

use crate::application::train_use_case::{TrainConfig, TrainUseCase};
use crate::data::encoder::{FeatureEncoder, PersonalityProfile};
use crate::domain::error::CareerError;
use crate::domain::prediction::{PredictionReport, RealTimeMetrics};
use crate::domain::subject::{RatingMap, SkillProfile};
use crate::infra::checkpoint::ArtifactStore;
use crate::infra::metrics::{EvaluationMetrics, MetricsStore, MetricsSummary};
use crate::ml::artifact::ModelArtifact;
use crate::ml::fallback::FallbackScorer;
use crate::ml::inferencer::{ArtifactHandle, PredictionService};

// ─── Prediction Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    pub artifact_dir:     String,
    /// Dataset used if a model has to be trained on demand
    pub data_path:        String,
    /// Seed for the fallback jitter; None seeds from entropy
    pub noise_seed:       Option<u64>,
    pub train_if_missing: bool,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            artifact_dir:     "artifacts".to_string(),
            data_path:        "data/test_dataset.csv".to_string(),
            noise_seed:       None,
            train_if_missing: false,
        }
    }
}

/// Metrics snapshot stored under `artifact_dir`, if readable
pub fn load_metrics_store(artifact_dir: &str) -> MetricsStore {
    let latest = ArtifactStore::new(artifact_dir)
        .load_metrics()
        .unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored metrics: {}", e);
            None
        });
    MetricsStore::new(latest)
}

// ─── PredictUseCase ───────────────────────────────────────────────────────────
pub struct PredictUseCase {
    service: PredictionService,
    metrics: MetricsStore,
    encoder: FeatureEncoder,
}

impl PredictUseCase {
    /// Load (or train) the model tier described by `config`
    pub fn new(config: PredictConfig) -> Self {
        let store = ArtifactStore::new(&config.artifact_dir);

        let (artifact, metrics) = match store.load_artifact() {
            Ok(artifact) => {
                artifact.check_columns(&FeatureEncoder::feature_columns());
                (Some(artifact), load_metrics_store(&config.artifact_dir).latest().cloned())
            }
            Err(e) if config.train_if_missing => {
                tracing::info!("No usable model ({}); training a new one", e);
                let train_cfg = TrainConfig {
                    data_path:    config.data_path.clone(),
                    artifact_dir: config.artifact_dir.clone(),
                    ..TrainConfig::default()
                };
                match TrainUseCase::new(train_cfg).execute() {
                    Ok(outcome) => (Some(outcome.artifact), Some(outcome.metrics)),
                    Err(e) => {
                        tracing::warn!("Training failed ({:#}); using rule-based fallback", e);
                        (None, None)
                    }
                }
            }
            Err(e) => {
                tracing::warn!("No usable model ({}); using rule-based fallback", e);
                (None, None)
            }
        };

        Self::from_parts(artifact, metrics, config.noise_seed)
    }

    /// Assemble from already-loaded parts
    pub fn from_parts(
        artifact:   Option<ModelArtifact>,
        metrics:    Option<EvaluationMetrics>,
        noise_seed: Option<u64>,
    ) -> Self {
        Self {
            service: PredictionService::new(ArtifactHandle::new(artifact), FallbackScorer::new(noise_seed)),
            metrics: MetricsStore::new(metrics),
            encoder: FeatureEncoder::new(),
        }
    }

    /// Use real personality scores instead of the placeholders
    pub fn with_personality(mut self, personality: PersonalityProfile) -> Self {
        self.encoder = self.encoder.with_personality(personality);
        self
    }

    pub fn uses_trained_model(&self) -> bool {
        self.service.handle().is_loaded()
    }

    pub fn summary(&self) -> MetricsSummary {
        self.metrics.summary()
    }

    /// Score one ratings map.
    pub fn predict(&self, ratings: RatingMap) -> Result<PredictionReport, CareerError> {
        // ── Step 1: Nothing to score ──────────────────────────────────────────
        let profile = SkillProfile::new(ratings);
        if profile.is_empty() {
            return Err(CareerError::NoRatings);
        }

        // ── Step 2: Encode ────────────────────────────────────────────────────
        let features = self.encoder.encode(&profile);

        // ── Step 3: Score ─────────────────────────────────────────────────────
        let scored = self.service.predict(&features, &profile);

        // ── Step 4: Request-level indicators ──────────────────────────────────
        let real_time_metrics = RealTimeMetrics::new(scored.top_confidence(), profile.answered_subjects());
        let model_accuracy    = self.metrics.real_time_accuracy(profile.ratings(), &scored.probabilities);

        tracing::debug!(
            "Prediction via {:?}: top={:.3}, completeness={:.1}%",
            scored.source,
            real_time_metrics.top_confidence,
            real_time_metrics.completeness
        );

        Ok(PredictionReport {
            source:      scored.source,
            predictions: scored.predictions,
            model_accuracy,
            real_time_metrics,
        })
    }
}
