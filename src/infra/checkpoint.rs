// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Saves and restores everything a training run produces,
// as pretty-printed JSON in one directory:
//
//   artifacts/
//     career_model.json     ← fitted classifier
//     role_encoder.json     ← sorted class list
//     feature_columns.json  ← input column order
//     model_metrics.json    ← latest EvaluationMetrics
//     train_config.json     ← config of the latest run
//     training_runs.csv     ← run history (see metrics.rs)
//
// A run's five JSON files only make sense together, so they
// are written as one snapshot: every blob is serialised
// first, then written to a `.tmp` sibling, and only when all
// five temp files exist are they renamed over the old ones.
// A failed save therefore leaves the previous run's model,
// metrics and config alone.
//
// Missing, corrupt or mutually inconsistent blobs at load
// time are not fatal: callers get a CareerError::ArtifactLoad
// and decide whether to retrain or fall back to the
// rule-based scorer.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json crate documentation

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::application::train_use_case::TrainConfig;
use crate::domain::error::CareerError;
use crate::infra::metrics::EvaluationMetrics;
use crate::ml::artifact::{ModelArtifact, RoleEncoder};
use crate::ml::model::TrainedModel;

pub const MODEL_FILE:   &str = "career_model.json";
pub const ENCODER_FILE: &str = "role_encoder.json";
pub const COLUMNS_FILE: &str = "feature_columns.json";
pub const METRICS_FILE: &str = "model_metrics.json";
pub const CONFIG_FILE:  &str = "train_config.json";

/// Reads and writes training outputs under one directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// The directory is created on first save, not here
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// True if all three model blobs are present
    pub fn has_artifact(&self) -> bool {
        [MODEL_FILE, ENCODER_FILE, COLUMNS_FILE]
            .iter()
            .all(|name| self.dir.join(name).is_file())
    }

    /// Write model, encoder, columns, metrics and config as one
    /// snapshot.
    pub fn save_run(&self, artifact: &ModelArtifact, metrics: &EvaluationMetrics, cfg: &TrainConfig) -> Result<()> {
        // ── Step 1: serialise everything before touching disk ─────────────────
        let blobs = [
            (MODEL_FILE,   serde_json::to_string_pretty(&artifact.model)?),
            (ENCODER_FILE, serde_json::to_string_pretty(&artifact.role_encoder)?),
            (COLUMNS_FILE, serde_json::to_string_pretty(&artifact.feature_columns)?),
            (METRICS_FILE, serde_json::to_string_pretty(metrics)?),
            (CONFIG_FILE,  serde_json::to_string_pretty(cfg)?),
        ];

        // ── Step 2: stage, then swap in ───────────────────────────────────────
        self.write_staged(&blobs)?;

        tracing::info!(
            "Saved {} artifact ({} classes, {} features) with metrics and config to '{}'",
            artifact.model.name(),
            artifact.role_encoder.len(),
            artifact.feature_columns.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Load the three model blobs back into one artifact.
    pub fn load_artifact(&self) -> Result<ModelArtifact, CareerError> {
        let model: TrainedModel          = self.read_json(MODEL_FILE)?;
        let role_encoder: RoleEncoder    = self.read_json(ENCODER_FILE)?;
        let feature_columns: Vec<String> = self.read_json(COLUMNS_FILE)?;

        if role_encoder.is_empty() || feature_columns.is_empty() {
            return Err(CareerError::ArtifactLoad(
                "stored encoder or feature columns are empty".to_string(),
            ));
        }

        let artifact = ModelArtifact::new(model, role_encoder, feature_columns);
        artifact
            .check_consistency()
            .map_err(|e| CareerError::ArtifactLoad(format!("'{}' is inconsistent: {e}", self.dir.display())))?;

        tracing::debug!("Loaded {} artifact from '{}'", artifact.model.name(), self.dir.display());
        Ok(artifact)
    }

    /// `Ok(None)` if no run has been evaluated yet
    pub fn load_metrics(&self) -> Result<Option<EvaluationMetrics>, CareerError> {
        if !self.dir.join(METRICS_FILE).is_file() {
            return Ok(None);
        }
        self.read_json(METRICS_FILE).map(Some)
    }

    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Have you run 'train' first?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&json)?)
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, CareerError> {
        let path = self.dir.join(name);
        let json = fs::read_to_string(&path)
            .map_err(|e| CareerError::ArtifactLoad(format!("'{}': {e}", path.display())))?;
        serde_json::from_str(&json)
            .map_err(|e| CareerError::ArtifactLoad(format!("'{}' is corrupt: {e}", path.display())))
    }

    /// Write each blob to `<name>.tmp`, then rename all of them.
    fn write_staged(&self, blobs: &[(&str, String)]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create directory '{}'", self.dir.display()))?;

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(blobs.len());
        for (name, json) in blobs {
            let tmp = self.dir.join(format!("{name}.tmp"));
            if let Err(e) = fs::write(&tmp, json) {
                for (path, _) in &staged {
                    fs::remove_file(path).ok();
                }
                return Err(e).with_context(|| format!("Cannot write '{}'", tmp.display()));
            }
            staged.push((tmp, self.dir.join(name)));
        }

        for (tmp, target) in &staged {
            fs::rename(tmp, target)
                .with_context(|| format!("Cannot move '{}' into place", target.display()))?;
        }
        Ok(())
    }
}
