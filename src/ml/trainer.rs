// ============================================================
// Layer 5 — Trainer / Model Selector
// ============================================================
// Turns a handful of labelled rows into a persisted-ready
// ModelArtifact:
//
//   base rows ──► SyntheticGenerator ──► ~2500 rows
//                                           │
//                              stratified 80/20 split (seed 42)
//                                  │                 │
//                               train              validation
//                                  │
//       k-fold CV per candidate:   RandomForest
//                                  DecisionTree
//                                  LogisticRegression
//                                  │
//       select_best (strict >, first-seen wins ties)
//                                  │
//       refit winner on the whole training split
//                                  │
//       validation: accuracy, weighted P/R/F1, confusion
//       test rows:  accuracy on the original labelled data
//
// The role encoder is fit on every synthetic label before
// the split, so class indices never depend on which rows
// happened to land in training.
//
// Reference: Hastie, Tibshirani & Friedman (2009) The Elements
//            of Statistical Learning §7.10 (Cross-Validation)

use ndarray::{Array2, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

use crate::application::train_use_case::TrainConfig;
use crate::data::dataset::TabularDataset;
use crate::data::splitter::{stratified_folds, stratified_split};
use crate::data::synthetic::SyntheticGenerator;
use crate::domain::error::CareerError;
use crate::infra::metrics::{CandidateScore, EvaluationMetrics};
use crate::ml::artifact::{ModelArtifact, RoleEncoder};
use crate::ml::evaluation::{accuracy, confusion_matrix, mean_std, weighted_scores};
use crate::ml::logistic::LogisticParams;
use crate::ml::model::{default_candidates, Candidate, TrainedModel};

/// Fewer synthetic rows than this are raised to it
pub const MIN_SYNTHETIC_ROWS: usize = 1000;

/// Everything a successful run produces.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub artifact: ModelArtifact,
    pub metrics:  EvaluationMetrics,
}

/// Index of the highest score; a later score must be strictly
/// greater to win, so ties go to the earlier candidate.
/// NaN never wins. None if no score is a number.
pub fn select_best(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    let mut best_score = f64::NEG_INFINITY;
    for (i, &score) in scores.iter().enumerate() {
        if score > best_score {
            best       = Some(i);
            best_score = score;
        }
    }
    best
}

/// Accuracy of `candidate` on each of the given folds.
pub fn cross_validate(
    candidate: &Candidate,
    x:         ArrayView2<f64>,
    y:         &[usize],
    n_classes: usize,
    folds:     &[(Vec<usize>, Vec<usize>)],
) -> Result<Vec<f64>, CareerError> {
    folds
        .iter()
        .map(|(train, test)| {
            let x_train = x.select(Axis(0), train);
            let y_train = pick(y, train);
            let model   = candidate.fit(x_train.view(), &y_train, n_classes)?;
            let pred    = model.predict(x.select(Axis(0), test).view());
            Ok(accuracy(&pick(y, test), &pred))
        })
        .collect()
}

fn pick(y: &[usize], indices: &[usize]) -> Vec<usize> {
    indices.iter().map(|&i| y[i]).collect()
}

/// Runs the whole selection pipeline for one config.
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Candidates in comparison order
    pub fn candidates(&self) -> Vec<Candidate> {
        let cfg = &self.config;
        default_candidates(
            cfg.n_estimators,
            cfg.max_depth,
            cfg.model_seed,
            LogisticParams {
                c:        cfg.logistic_c,
                max_iter: cfg.logistic_max_iter,
                ..LogisticParams::default()
            },
        )
    }

    /// Train on synthetic rows derived from `base`; report test
    /// accuracy on `test`.
    pub fn train(
        &self,
        base: &TabularDataset,
        test: &TabularDataset,
    ) -> Result<TrainingOutcome, CareerError> {
        let cfg = &self.config;

        if test.is_empty() {
            return Err(CareerError::DataLoad("test dataset has no rows".to_string()));
        }

        // ── Step 1: Synthesise training rows ──────────────────────────────────
        let rows = cfg.synthetic_rows.max(MIN_SYNTHETIC_ROWS);
        if rows != cfg.synthetic_rows {
            tracing::warn!(
                "Requested {} synthetic rows; raising to the minimum of {}",
                cfg.synthetic_rows,
                MIN_SYNTHETIC_ROWS
            );
        }
        let mut rng = match cfg.generator_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        let synthetic = SyntheticGenerator::new().generate(base, rows, &mut rng)?;
        tracing::info!("Generated {} synthetic rows from {} base rows", synthetic.len(), base.len());

        // ── Step 2: Features and labels ───────────────────────────────────────
        let feature_columns = synthetic.numeric_columns();
        if feature_columns.is_empty() {
            return Err(CareerError::Training("dataset has no numeric feature columns".to_string()));
        }
        let skipped = synthetic.columns().len() - feature_columns.len();
        if skipped > 0 {
            tracing::warn!("Ignoring {} non-numeric column(s)", skipped);
        }

        let labels    = synthetic.labels();
        let encoder   = RoleEncoder::fit(&labels);
        let n_classes = encoder.len();
        let x         = synthetic.feature_matrix(&feature_columns)?;
        let y         = encoder.transform(&labels)?;
        tracing::info!("{} features, {} classes", feature_columns.len(), n_classes);

        // ── Step 3: Stratified train / validation split ───────────────────────
        let (train_idx, val_idx) = stratified_split(&y, cfg.validation_fraction, cfg.split_seed);
        if train_idx.is_empty() || val_idx.is_empty() {
            return Err(CareerError::Training(format!(
                "split left {} training and {} validation rows",
                train_idx.len(),
                val_idx.len()
            )));
        }
        let x_train = x.select(Axis(0), &train_idx);
        let y_train = pick(&y, &train_idx);
        let x_val   = x.select(Axis(0), &val_idx);
        let y_val   = pick(&y, &val_idx);

        // ── Step 4: Cross-validate every candidate ────────────────────────────
        let candidates = self.candidates();
        let folds      = stratified_folds(&y_train, cfg.cv_folds);
        let mut scores = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            let fold_scores = cross_validate(candidate, x_train.view(), &y_train, n_classes, &folds)?;
            let (mean, std) = mean_std(&fold_scores);
            tracing::info!(
                "{} CV accuracy: {:.4} (+/- {:.4})",
                candidate.name(),
                mean,
                std * 2.0
            );
            scores.push(CandidateScore {
                name:    candidate.name().to_string(),
                cv_mean: mean,
                cv_std:  std,
                fold_scores,
            });
        }

        // ── Step 5: Select and refit ──────────────────────────────────────────
        let means: Vec<f64> = scores.iter().map(|s| s.cv_mean).collect();
        let best = select_best(&means)
            .ok_or_else(|| CareerError::Training("no candidate produced a CV score".to_string()))?;
        let winner = &candidates[best];
        tracing::info!("Best model: {} ({:.4})", winner.name(), means[best]);

        let model = winner.fit(x_train.view(), &y_train, n_classes)?;

        // ── Step 6: Validation metrics ────────────────────────────────────────
        let val_pred = model.predict(x_val.view());
        let weighted = weighted_scores(&y_val, &val_pred, n_classes);
        let val_acc  = accuracy(&y_val, &val_pred);

        // ── Step 7: Accuracy on the original labelled rows ────────────────────
        let test_accuracy = test_accuracy(&model_predictions(&model, test, &feature_columns)?, test, &encoder);

        let feature_importance = model.feature_importances().map(|imp| {
            feature_columns
                .iter()
                .cloned()
                .zip(imp)
                .collect::<BTreeMap<_, _>>()
        });

        let metrics = EvaluationMetrics {
            model_name:          winner.name().to_string(),
            cv_accuracy:         scores[best].cv_mean,
            cv_std:              scores[best].cv_std,
            validation_accuracy: val_acc,
            precision:           weighted.precision,
            recall:              weighted.recall,
            f1_score:            weighted.f1,
            test_accuracy,
            classes:             encoder.classes().to_vec(),
            confusion_matrix:    confusion_matrix(&y_val, &val_pred, n_classes),
            feature_importance,
            candidates:          scores,
            training_rows:       train_idx.len(),
            validation_rows:     val_idx.len(),
        };

        tracing::info!(
            "Validation accuracy={:.4} precision={:.4} recall={:.4} f1={:.4} | test accuracy={:.4}",
            metrics.validation_accuracy,
            metrics.precision,
            metrics.recall,
            metrics.f1_score,
            metrics.test_accuracy
        );

        Ok(TrainingOutcome {
            artifact: ModelArtifact::new(model, encoder, feature_columns),
            metrics,
        })
    }
}

fn model_predictions(
    model:           &TrainedModel,
    test:            &TabularDataset,
    feature_columns: &[String],
) -> Result<Vec<usize>, CareerError> {
    let x: Array2<f64> = test.feature_matrix(feature_columns)?;
    Ok(model.predict(x.view()))
}

/// Roles the encoder never saw always count as misses
fn test_accuracy(predictions: &[usize], test: &TabularDataset, encoder: &RoleEncoder) -> f64 {
    let correct = test
        .rows()
        .iter()
        .zip(predictions)
        .filter(|&(row, &pred)| encoder.encode(&row.role) == Some(pred))
        .count();
    correct as f64 / test.len().max(1) as f64
}
