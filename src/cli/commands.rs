// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and all their flags:
//
//   train    — fit and select a model, persist the artifact
//   predict  — score a ratings map, print the report as JSON
//   metrics  — print the metrics summary and stored snapshot
//   careers  — print the static details of one career
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::predict_use_case::PredictConfig;
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train candidate models on synthetic data and keep the best
    Train(TrainArgs),

    /// Predict the best-fitting careers for a set of skill ratings
    Predict(PredictArgs),

    /// Show evaluation metrics of the current model
    Metrics(MetricsArgs),

    /// Show the details of one career
    Careers(CareersArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Labelled CSV with a Role column
    #[arg(long, default_value = "data/test_dataset.csv")]
    pub data: String,

    /// Held-out CSV for test accuracy (defaults to --data)
    #[arg(long)]
    pub test_data: Option<String>,

    /// Directory for the model, encoder, columns and metrics
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Synthetic rows to generate (at least 1000 are used)
    #[arg(long, default_value_t = 2000)]
    pub synthetic_rows: usize,

    /// Fraction of synthetic rows held out for validation
    #[arg(long, default_value_t = 0.2)]
    pub validation_fraction: f64,

    /// Number of cross-validation folds
    #[arg(long, default_value_t = 5)]
    pub cv_folds: usize,

    /// Seed of the train/validation split
    #[arg(long, default_value_t = 42)]
    pub split_seed: u64,

    /// Seed of the synthetic generator (random when omitted)
    #[arg(long)]
    pub generator_seed: Option<u64>,

    /// Seed of the random forest
    #[arg(long, default_value_t = 42)]
    pub model_seed: u64,

    /// Trees in the random forest
    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    /// Depth limit for tree models (unlimited when omitted)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Gradient-descent iterations for logistic regression
    #[arg(long, default_value_t = 1000)]
    pub logistic_max_iter: usize,

    /// Inverse L2 strength for logistic regression
    #[arg(long, default_value_t = 1.0)]
    pub logistic_c: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:           a.data,
            test_data_path:      a.test_data,
            artifact_dir:        a.artifact_dir,
            synthetic_rows:      a.synthetic_rows,
            validation_fraction: a.validation_fraction,
            cv_folds:            a.cv_folds,
            split_seed:          a.split_seed,
            generator_seed:      a.generator_seed,
            model_seed:          a.model_seed,
            n_estimators:        a.n_estimators,
            max_depth:           a.max_depth,
            logistic_max_iter:   a.logistic_max_iter,
            logistic_c:          a.logistic_c,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// JSON file holding { "Subject": "Rating label", ... }
    #[arg(long)]
    pub ratings_file: Option<String>,

    /// One rating as "Subject=Label"; repeatable
    #[arg(long = "rating", value_name = "SUBJECT=LABEL")]
    pub ratings: Vec<String>,

    /// Nine comma-separated personality scores in [0, 1]
    #[arg(long, value_delimiter = ',')]
    pub personality: Option<Vec<f64>>,

    /// Directory where training saved its artifacts
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,

    /// Dataset to train on if no model exists yet
    #[arg(long, default_value = "data/test_dataset.csv")]
    pub data: String,

    /// Seed for the rule-based fallback's jitter
    #[arg(long)]
    pub noise_seed: Option<u64>,

    /// Train a model first when none is stored
    #[arg(long)]
    pub train_if_missing: bool,
}

impl From<&PredictArgs> for PredictConfig {
    fn from(a: &PredictArgs) -> Self {
        PredictConfig {
            artifact_dir:     a.artifact_dir.clone(),
            data_path:        a.data.clone(),
            noise_seed:       a.noise_seed,
            train_if_missing: a.train_if_missing,
        }
    }
}

/// All arguments for the `metrics` command
#[derive(Args, Debug)]
pub struct MetricsArgs {
    #[arg(long, default_value = "artifacts")]
    pub artifact_dir: String,
}

/// All arguments for the `careers` command
#[derive(Args, Debug)]
pub struct CareersArgs {
    /// Career name, e.g. "Data Scientist"; lists all when omitted
    pub name: Option<String>,
}

/// Split "Subject=Label" at the first '='
pub fn parse_rating(raw: &str) -> Option<(String, String)> {
    let (subject, label) = raw.split_once('=')?;
    let (subject, label) = (subject.trim(), label.trim());
    if subject.is_empty() || label.is_empty() {
        return None;
    }
    Some((subject.to_string(), label.to_string()))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(
            parse_rating("AI/ML = Professional"),
            Some(("AI/ML".to_string(), "Professional".to_string()))
        );
        assert_eq!(
            parse_rating("Cyber Security=Not Interested"),
            Some(("Cyber Security".to_string(), "Not Interested".to_string()))
        );
        assert_eq!(parse_rating("AI/ML"), None);
        assert_eq!(parse_rating("=Poor"), None);
    }
}
