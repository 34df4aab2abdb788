// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the base dataset      (Layer 4 - data)
//   Step 2: Load the test dataset      (Layer 4 - data)
//   Step 3: Generate, split, compare,
//           refit and evaluate         (Layer 5 - ml)
//   Step 4: Persist artifact, metrics
//           and config together       (Layer 6 - infra)
//   Step 5: Append to the run log      (Layer 6 - infra)
//
// Nothing is written until Step 3 has succeeded, and Step 4
// is a single staged snapshot, so a failed run leaves the
// previous model, metrics and config untouched.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::CsvLoader;
use crate::domain::traits::DatasetSource;
use crate::infra::{
    checkpoint::ArtifactStore,
    metrics::RunLogger,
};
use crate::ml::trainer::{Trainer, TrainingOutcome};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a training run.
// Serialisable so the config of the latest run is saved next
// to the artifact it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Labelled CSV the synthetic rows are derived from
    pub data_path:           String,
    /// Held-out CSV for test accuracy; defaults to `data_path`
    pub test_data_path:      Option<String>,
    pub artifact_dir:        String,
    pub synthetic_rows:      usize,
    pub validation_fraction: f64,
    pub cv_folds:            usize,
    pub split_seed:          u64,
    /// None draws a fresh seed from the OS each run
    pub generator_seed:      Option<u64>,
    pub model_seed:          u64,
    pub n_estimators:        usize,
    pub max_depth:           Option<usize>,
    pub logistic_max_iter:   usize,
    pub logistic_c:          f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:           "data/test_dataset.csv".to_string(),
            test_data_path:      None,
            artifact_dir:        "artifacts".to_string(),
            synthetic_rows:      2000,
            validation_fraction: 0.2,
            cv_folds:            5,
            split_seed:          42,
            generator_seed:      None,
            model_seed:          42,
            n_estimators:        100,
            max_depth:           None,
            logistic_max_iter:   1000,
            logistic_c:          1.0,
        }
    }
}

impl TrainConfig {
    pub fn test_path(&self) -> &str {
        self.test_data_path.as_deref().unwrap_or(&self.data_path)
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingOutcome> {
        let cfg = &self.config;

        // ── Step 1: Base dataset ──────────────────────────────────────────────
        tracing::info!("Loading base dataset from '{}'", cfg.data_path);
        let base = CsvLoader::new(&cfg.data_path)
            .load()
            .with_context(|| format!("Cannot load base dataset '{}'", cfg.data_path))?;

        // ── Step 2: Test dataset ──────────────────────────────────────────────
        let test = CsvLoader::new(cfg.test_path())
            .load()
            .with_context(|| format!("Cannot load test dataset '{}'", cfg.test_path()))?;
        tracing::info!("Loaded {} base rows and {} test rows", base.len(), test.len());

        // ── Step 3: Train and evaluate (Layer 5) ──────────────────────────────
        let outcome = Trainer::new(cfg.clone()).train(&base, &test)?;

        // ── Step 4: Artifact, metrics and config as one snapshot ──────────────
        ArtifactStore::new(&cfg.artifact_dir).save_run(&outcome.artifact, &outcome.metrics, cfg)?;

        // ── Step 5: Run history ───────────────────────────────────────────────
        RunLogger::new(&cfg.artifact_dir)?
            .log(&outcome.metrics.candidates, &outcome.metrics.model_name)?;

        tracing::info!("Training complete!");
        Ok(outcome)
    }
}
