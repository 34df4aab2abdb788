// ============================================================
// Layer 5 — Candidate Models
// ============================================================
// The three classifier families compared during training:
//
//   Candidate                      TrainedModel
//   ─────────────────────────      ──────────────────────────
//   RandomForest(ForestParams)  →  RandomForest(RandomForest)
//   DecisionTree(TreeParams)    →  DecisionTree(DecisionTree)
//   LogisticRegression(params)  →  LogisticRegression(...)
//
// A Candidate is an untrained configuration; fit() turns it
// into a TrainedModel. The order of `default_candidates` is
// the order ties are resolved in during selection.
//
// TrainedModel is a plain enum rather than a trait object so
// it serialises straight to JSON and back.

use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::domain::error::CareerError;
use crate::ml::forest::{ForestParams, RandomForest};
use crate::ml::logistic::{LogisticParams, LogisticRegression};
use crate::ml::tree::{DecisionTree, TreeParams};

/// An untrained model configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Candidate {
    RandomForest(ForestParams),
    DecisionTree(TreeParams),
    LogisticRegression(LogisticParams),
}

impl Candidate {
    pub fn name(&self) -> &'static str {
        match self {
            Candidate::RandomForest(_)       => "RandomForest",
            Candidate::DecisionTree(_)       => "DecisionTree",
            Candidate::LogisticRegression(_) => "LogisticRegression",
        }
    }

    /// Fit on rows `x` with class indices `y` in `0..n_classes`.
    pub fn fit(
        &self,
        x:         ArrayView2<f64>,
        y:         &[usize],
        n_classes: usize,
    ) -> Result<TrainedModel, CareerError> {
        if x.nrows() == 0 || x.nrows() != y.len() {
            return Err(CareerError::Training(format!(
                "{}: {} rows but {} labels",
                self.name(),
                x.nrows(),
                y.len()
            )));
        }
        if let Some(&bad) = y.iter().find(|&&label| label >= n_classes) {
            return Err(CareerError::Training(format!(
                "{}: label {bad} outside {n_classes} classes",
                self.name()
            )));
        }

        let model = match self {
            Candidate::RandomForest(params) => {
                TrainedModel::RandomForest(RandomForest::fit(params, x, y, n_classes))
            }
            Candidate::DecisionTree(params) => {
                let rows: Vec<usize> = (0..y.len()).collect();
                let mut rng = StdRng::seed_from_u64(0);
                TrainedModel::DecisionTree(DecisionTree::grow(params, x, y, &rows, n_classes, &mut rng))
            }
            Candidate::LogisticRegression(params) => {
                TrainedModel::LogisticRegression(LogisticRegression::fit(params, x, y, n_classes)?)
            }
        };
        Ok(model)
    }
}

/// Random forest, decision tree, logistic regression, in that order.
pub fn default_candidates(n_estimators: usize, max_depth: Option<usize>, seed: u64, logistic: LogisticParams) -> Vec<Candidate> {
    vec![
        Candidate::RandomForest(ForestParams { n_estimators, max_depth, seed }),
        Candidate::DecisionTree(TreeParams { max_depth, ..TreeParams::default() }),
        Candidate::LogisticRegression(logistic),
    ]
}

/// A fitted classifier of any supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model")]
pub enum TrainedModel {
    RandomForest(RandomForest),
    DecisionTree(DecisionTree),
    LogisticRegression(LogisticRegression),
}

impl TrainedModel {
    pub fn name(&self) -> &'static str {
        match self {
            TrainedModel::RandomForest(_)       => "RandomForest",
            TrainedModel::DecisionTree(_)       => "DecisionTree",
            TrainedModel::LogisticRegression(_) => "LogisticRegression",
        }
    }

    /// Width of the input rows the model was fit on
    pub fn n_features(&self) -> usize {
        match self {
            TrainedModel::RandomForest(m)       => m.n_features(),
            TrainedModel::DecisionTree(m)       => m.n_features(),
            TrainedModel::LogisticRegression(m) => m.n_features(),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            TrainedModel::RandomForest(m)       => m.n_classes(),
            TrainedModel::DecisionTree(m)       => m.n_classes(),
            TrainedModel::LogisticRegression(m) => m.n_classes(),
        }
    }

    /// Internal consistency of a deserialised model: node and
    /// feature indices in range, per-class outputs of the right
    /// width. A model that passes cannot index out of bounds on
    /// a row of `n_features()` values.
    pub fn check_structure(&self) -> Result<(), String> {
        match self {
            TrainedModel::RandomForest(m)       => m.check_structure(),
            TrainedModel::DecisionTree(m)       => m.check_structure(),
            TrainedModel::LogisticRegression(m) => m.check_structure(),
        }
    }

    /// [rows × classes] class probabilities
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        match self {
            TrainedModel::RandomForest(m)       => m.predict_proba(x),
            TrainedModel::LogisticRegression(m) => m.predict_proba(x),
            TrainedModel::DecisionTree(m)       => {
                let mut out = Array2::<f64>::zeros((x.nrows(), m.n_classes()));
                for (r, row) in x.rows().into_iter().enumerate() {
                    for (c, p) in m.predict_row(&row.to_vec()).iter().enumerate() {
                        out[[r, c]] = *p;
                    }
                }
                out
            }
        }
    }

    /// Most probable class per row; the lowest index wins ties
    pub fn predict(&self, x: ArrayView2<f64>) -> Vec<usize> {
        self.predict_proba(x)
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
                    .0
            })
            .collect()
    }

    /// Impurity-based importances; linear models have none
    pub fn feature_importances(&self) -> Option<Vec<f64>> {
        match self {
            TrainedModel::RandomForest(m)       => Some(m.feature_importances()),
            TrainedModel::DecisionTree(m)       => Some(m.importances().to_vec()),
            TrainedModel::LogisticRegression(_) => None,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn data() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.9, 0.1], [0.8, 0.2], [0.85, 0.15],
            [0.1, 0.9], [0.2, 0.8], [0.15, 0.85],
        ];
        (x, vec![0, 0, 0, 1, 1, 1])
    }

    #[test]
    fn test_default_candidate_order() {
        let names: Vec<_> = default_candidates(10, None, 42, LogisticParams::default())
            .iter()
            .map(Candidate::name)
            .collect();
        assert_eq!(names, ["RandomForest", "DecisionTree", "LogisticRegression"]);
    }

    #[test]
    fn test_every_candidate_fits_and_predicts() {
        let (x, y) = data();
        for candidate in default_candidates(10, None, 1, LogisticParams::default()) {
            let model = candidate.fit(x.view(), &y, 2).unwrap();
            assert_eq!(model.name(), candidate.name());
            assert_eq!(model.predict(x.view()), y);
            let p = model.predict_proba(x.view());
            assert_eq!(p.dim(), (6, 2));
            assert_eq!(model.n_features(), 2);
            assert_eq!(model.n_classes(), 2);
            assert!(model.check_structure().is_ok());
        }
    }

    #[test]
    fn test_importances_only_for_trees() {
        let (x, y) = data();
        let c = default_candidates(5, None, 1, LogisticParams::default());
        assert!(c[0].fit(x.view(), &y, 2).unwrap().feature_importances().is_some());
        assert!(c[1].fit(x.view(), &y, 2).unwrap().feature_importances().is_some());
        assert!(c[2].fit(x.view(), &y, 2).unwrap().feature_importances().is_none());
    }

    #[test]
    fn test_rejects_bad_labels() {
        let (x, _) = data();
        let c = Candidate::DecisionTree(TreeParams::default());
        assert!(c.fit(x.view(), &[0, 1], 2).is_err());
        assert!(c.fit(x.view(), &[0, 0, 0, 1, 1, 5], 2).is_err());
    }

    #[test]
    fn test_model_survives_json() {
        let (x, y) = data();
        let model = Candidate::DecisionTree(TreeParams::default()).fit(x.view(), &y, 2).unwrap();
        let json  = serde_json::to_string(&model).unwrap();
        let back: TrainedModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.predict(x.view()), y);
    }
}
