// ============================================================
// Layer 6 — Metrics Store & Run Log
// ============================================================
// Two records of how well the model does:
//
//   EvaluationMetrics — the snapshot of the latest training
//                       run. Persisted as model_metrics.json
//                       and overwritten by each run.
//
//   training_runs.csv — an append-only history, one row per
//                       candidate per run:
//
//     timestamp_unix,model,cv_mean,cv_std,selected
//     1760000000,RandomForest,0.9312,0.0110,true
//     1760000000,DecisionTree,0.8875,0.0154,false
//     ...
//
// MetricsStore answers two questions for the prediction side:
//
//   summary()            — headline numbers, or a fixed
//                          fallback summary before any
//                          training has happened
//   real_time_accuracy() — an advisory per-request estimate:
//
//     min(0.95, base + (max_p − 0.33)·0.1 + 0.05·not_low)
//
//     base    = test accuracy (0.85 without metrics)
//     max_p   = highest class probability of this request
//     not_low = fraction of supplied ratings that are not
//               "Not Interested" / "Poor" (0 if none supplied)
//
// The estimate is never persisted.
//
// Reference: csv crate documentation (Writer, Reader)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::domain::rating::RatingLabel;
use crate::domain::subject::{is_known_subject, RatingMap};

/// Base accuracy used before any model has been evaluated
pub const FALLBACK_BASE_ACCURACY: f64 = 0.85;

/// Ceiling of the real-time estimate
pub const MAX_REAL_TIME_ACCURACY: f64 = 0.95;

/// File name of the run history inside the artifact directory
pub const RUN_LOG_FILE: &str = "training_runs.csv";

/// Cross-validation result for one candidate model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub name:        String,
    pub cv_mean:     f64,
    pub cv_std:      f64,
    pub fold_scores: Vec<f64>,
}

/// Everything measured about the selected model in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub model_name:          String,
    /// Mean k-fold accuracy of the selected candidate
    pub cv_accuracy:         f64,
    pub cv_std:              f64,
    pub validation_accuracy: f64,
    /// Support-weighted over all classes
    pub precision:           f64,
    pub recall:              f64,
    pub f1_score:            f64,
    /// Accuracy on the original, hand-labelled dataset
    pub test_accuracy:       f64,
    /// Class order of the confusion matrix rows and columns
    pub classes:             Vec<String>,
    pub confusion_matrix:    Vec<Vec<usize>>,
    /// Only tree-based models report importances
    pub feature_importance:  Option<BTreeMap<String, f64>>,
    pub candidates:          Vec<CandidateScore>,
    pub training_rows:       usize,
    pub validation_rows:     usize,
}

/// Headline numbers shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub accuracy:    f64,
    pub precision:   f64,
    pub recall:      f64,
    pub f1_score:    f64,
    pub model_name:  String,
    pub cv_accuracy: f64,
}

impl MetricsSummary {
    /// Fixed summary reported while no model has been trained
    pub fn fallback() -> Self {
        Self {
            accuracy:    FALLBACK_BASE_ACCURACY,
            precision:   0.83,
            recall:      0.82,
            f1_score:    0.82,
            model_name:  "Fallback System".to_string(),
            cv_accuracy: 0.0,
        }
    }
}

impl From<&EvaluationMetrics> for MetricsSummary {
    fn from(m: &EvaluationMetrics) -> Self {
        Self {
            accuracy:    m.test_accuracy,
            precision:   m.precision,
            recall:      m.recall,
            f1_score:    m.f1_score,
            model_name:  m.model_name.clone(),
            cv_accuracy: m.cv_accuracy,
        }
    }
}

/// Holds the latest metrics snapshot, if any.
#[derive(Debug, Clone, Default)]
pub struct MetricsStore {
    latest: Option<EvaluationMetrics>,
}

impl MetricsStore {
    pub fn new(latest: Option<EvaluationMetrics>) -> Self {
        Self { latest }
    }

    /// Replace the snapshot after a training run
    pub fn set(&mut self, metrics: EvaluationMetrics) {
        self.latest = Some(metrics);
    }

    pub fn latest(&self) -> Option<&EvaluationMetrics> {
        self.latest.as_ref()
    }

    pub fn summary(&self) -> MetricsSummary {
        self.latest
            .as_ref()
            .map(MetricsSummary::from)
            .unwrap_or_else(MetricsSummary::fallback)
    }

    /// Advisory accuracy estimate for one request.
    pub fn real_time_accuracy(&self, ratings: &RatingMap, probabilities: &[f64]) -> f64 {
        let base  = self.latest.as_ref().map_or(FALLBACK_BASE_ACCURACY, |m| m.test_accuracy);
        let max_p = probabilities.iter().copied().fold(0.0_f64, f64::max);

        let confidence_bonus = (max_p - 0.33) * 0.1;

        // Keys outside the 17 subjects count towards neither side
        let (known, not_low) = ratings
            .iter()
            .filter(|(subject, _)| is_known_subject(subject))
            .fold((0usize, 0usize), |(known, not_low), (_, label)| {
                let low = RatingLabel::parse(label).is_some_and(RatingLabel::is_low);
                (known + 1, not_low + usize::from(!low))
            });
        let completeness_bonus = if known == 0 {
            0.0
        } else {
            not_low as f64 / known as f64 * 0.05
        };

        (base + confidence_bonus + completeness_bonus).min(MAX_REAL_TIME_ACCURACY)
    }
}

// ─── Run Log ──────────────────────────────────────────────────────────────────

/// One row of training_runs.csv
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub timestamp_unix: u64,
    pub model:          String,
    pub cv_mean:        f64,
    pub cv_std:         f64,
    pub selected:       bool,
}

/// Appends candidate scores to a CSV history file.
pub struct RunLogger {
    csv_path: PathBuf,
}

impl RunLogger {
    /// Create the directory if needed; the file is created on first log
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create directory '{}'", dir.display()))?;
        Ok(Self { csv_path: dir.join(RUN_LOG_FILE) })
    }

    /// Append one row per candidate; `selected` names the winner
    pub fn log(&self, candidates: &[CandidateScore], selected: &str) -> Result<()> {
        let timestamp_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        // Header only when the file is new, so runs can be appended
        let write_header = !self.csv_path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open run log '{}'", self.csv_path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        for c in candidates {
            writer.serialize(RunRecord {
                timestamp_unix,
                model:    c.name.clone(),
                cv_mean:  c.cv_mean,
                cv_std:   c.cv_std,
                selected: c.name == selected,
            })?;
        }
        writer.flush()?;

        tracing::debug!("Logged {} candidates to '{}'", candidates.len(), self.csv_path.display());
        Ok(())
    }

    /// Every row logged so far (empty if nothing was logged)
    pub fn records(&self) -> Result<Vec<RunRecord>> {
        if !self.csv_path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.csv_path)
            .with_context(|| format!("Cannot read run log '{}'", self.csv_path.display()))?;
        let records = reader.deserialize().collect::<Result<Vec<RunRecord>, _>>()?;
        Ok(records)
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
