// ============================================================
// Layer 5 — Random Forest
// ============================================================
// An ensemble of CART trees, each grown on its own bootstrap
// sample and restricted to √n_features random candidate
// features per node:
//
//   for t in 1..=n_estimators:
//       rows_t = n draws with replacement from the training rows
//       tree_t = grow(rows_t, max_features = √n)
//
//   P(class | x) = mean_t  P_t(class | x)
//
// Averaging the leaf distributions (soft voting) rather than
// counting hard votes gives smoother probabilities.
//
// Everything random flows from one StdRng seeded with
// `seed`, so a fixed seed gives a bit-identical forest.
//
// Reference: Breiman (2001) Random Forests

use ndarray::{Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ml::tree::{DecisionTree, MaxFeatures, TreeParams};

/// Ensemble size, depth limit and seed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth:    Option<usize>,
    pub seed:         u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self { n_estimators: 100, max_depth: None, seed: 42 }
    }
}

/// A fitted forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees:     Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    pub fn fit(params: &ForestParams, x: ArrayView2<f64>, y: &[usize], n_classes: usize) -> Self {
        let n        = y.len();
        let mut rng  = StdRng::seed_from_u64(params.seed);
        let tree_cfg = TreeParams {
            max_depth:         params.max_depth,
            min_samples_split: 2,
            max_features:      MaxFeatures::Sqrt,
        };

        let trees = (0..params.n_estimators.max(1))
            .map(|_| {
                let bootstrap: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::grow(&tree_cfg, x, y, &bootstrap, n_classes, &mut rng)
            })
            .collect::<Vec<_>>();

        tracing::debug!("Random forest grown: {} trees", trees.len());
        Self { trees, n_classes }
    }

    /// [rows × classes] mean of the trees' leaf distributions
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        let weight  = 1.0 / self.trees.len().max(1) as f64;

        for (r, row) in x.rows().into_iter().enumerate() {
            let row = row.to_vec();
            for tree in &self.trees {
                for (c, p) in tree.predict_row(&row).iter().enumerate() {
                    out[[r, c]] += p * weight;
                }
            }
        }
        out
    }

    /// Mean of the per-tree importances, renormalised to sum to 1
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut total = vec![0.0; self.n_features()];
        for tree in &self.trees {
            for (slot, v) in total.iter_mut().zip(tree.importances()) {
                *slot += v;
            }
        }
        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            total.iter_mut().for_each(|v| *v /= sum);
        }
        total
    }

    pub fn n_trees(&self) -> usize { self.trees.len() }

    pub fn n_classes(&self) -> usize { self.n_classes }

    pub fn n_features(&self) -> usize {
        self.trees.first().map_or(0, DecisionTree::n_features)
    }

    /// Every tree is itself consistent and agrees with the
    /// forest on input width and class count.
    pub fn check_structure(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        let n_features = self.n_features();
        for (t, tree) in self.trees.iter().enumerate() {
            tree.check_structure().map_err(|e| format!("tree {t}: {e}"))?;
            if tree.n_features() != n_features || tree.n_classes() != self.n_classes {
                return Err(format!(
                    "tree {t} is {} features × {} classes, forest is {} × {}",
                    tree.n_features(),
                    tree.n_classes(),
                    n_features,
                    self.n_classes
                ));
            }
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.10, 0.90, 0.5], [0.15, 0.85, 0.4], [0.20, 0.80, 0.6], [0.12, 0.88, 0.5],
            [0.90, 0.10, 0.5], [0.85, 0.15, 0.6], [0.80, 0.20, 0.4], [0.88, 0.12, 0.5],
        ];
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    fn small() -> ForestParams {
        ForestParams { n_estimators: 15, max_depth: None, seed: 7 }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = toy();
        let forest = RandomForest::fit(&small(), x.view(), &y, 2);
        let p = forest.predict_proba(x.view());
        for row in p.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_separates_clear_clusters() {
        let (x, y) = toy();
        let forest = RandomForest::fit(&small(), x.view(), &y, 2);
        let p = forest.predict_proba(array![[0.05, 0.95, 0.5], [0.95, 0.05, 0.5]].view());
        assert!(p[[0, 0]] > 0.5);
        assert!(p[[1, 1]] > 0.5);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = toy();
        let a = RandomForest::fit(&small(), x.view(), &y, 2);
        let b = RandomForest::fit(&small(), x.view(), &y, 2);
        assert_eq!(a, b);
        assert_eq!(a.n_trees(), 15);
    }

    #[test]
    fn test_shape_accessors_and_structure() {
        let (x, y) = toy();
        let forest = RandomForest::fit(&small(), x.view(), &y, 4);
        assert_eq!(forest.n_features(), 3);
        assert_eq!(forest.n_classes(), 4);
        assert!(forest.check_structure().is_ok());

        let empty = RandomForest { trees: Vec::new(), n_classes: 2 };
        assert!(empty.check_structure().is_err());
    }

    #[test]
    fn test_importances_normalised() {
        let (x, y) = toy();
        let forest = RandomForest::fit(&small(), x.view(), &y, 2);
        let imp = forest.feature_importances();
        assert_eq!(imp.len(), 3);
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        // The constant-ish third column carries the least signal
        assert!(imp[2] < imp[0] + imp[1]);
    }
}
