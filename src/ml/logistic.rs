// ============================================================
// Layer 5 — Multinomial Logistic Regression
// ============================================================
// One linear score per class, squashed through softmax:
//
//   z = x·W + b            W: [features × classes]
//   p = softmax(z)         p_c = e^{z_c} / Σ_k e^{z_k}
//
// Fitting is delegated to linfa-logistic, which minimises the
// L2-penalised cross-entropy with L-BFGS:
//
//   J(W, b) = −Σ_i log p_{i, y_i}  +  (α/2)·‖W‖²
//   α       = 1 / C
//
// linfa only knows the classes present in the training
// labels, so its probability columns are scattered back onto
// the full 0..n_classes range; a class absent from the fold
// gets probability 0.
//
// Reference: Bishop (2006) Pattern Recognition and Machine
//            Learning §4.3.4

use linfa::prelude::*;
use linfa_logistic::{MultiFittedLogisticRegression, MultiLogisticRegression};
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::domain::error::CareerError;

/// Regularisation strength and stopping rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularisation strength (larger = weaker penalty)
    pub c:        f64,
    pub max_iter: usize,
    pub tol:      f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self { c: 1.0, max_iter: 1000, tol: 1e-4 }
    }
}

/// A fitted linear softmax classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    fitted:    MultiFittedLogisticRegression<f64, usize>,
    n_classes: usize,
}

impl LogisticRegression {
    pub fn fit(
        params:    &LogisticParams,
        x:         ArrayView2<f64>,
        y:         &[usize],
        n_classes: usize,
    ) -> Result<Self, CareerError> {
        let dataset = Dataset::new(x.to_owned(), Array1::from(y.to_vec()));

        let fitted = MultiLogisticRegression::default()
            .alpha(1.0 / params.c.max(f64::EPSILON))
            .gradient_tolerance(params.tol)
            .max_iterations(params.max_iter as u64)
            .fit(&dataset)
            .map_err(|e| CareerError::Training(format!("LogisticRegression: {e}")))?;

        tracing::debug!(
            "Logistic regression fitted: {} features, {} of {} classes seen",
            fitted.params().nrows(),
            fitted.classes().len(),
            n_classes
        );
        Ok(Self { fitted, n_classes })
    }

    /// [rows × classes] softmax probabilities
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Array2<f64> {
        let seen    = self.fitted.predict_probabilities(&x);
        let mut out = Array2::<f64>::zeros((x.nrows(), self.n_classes));
        for (col, &class) in self.fitted.classes().iter().enumerate() {
            if class < self.n_classes {
                out.column_mut(class).assign(&seen.column(col));
            }
        }
        out
    }

    /// [features × seen classes] coefficient matrix
    pub fn weights(&self) -> &Array2<f64> { self.fitted.params() }

    pub fn n_features(&self) -> usize { self.fitted.params().nrows() }

    pub fn n_classes(&self) -> usize { self.n_classes }

    /// Shape checks for a model read back from disk.
    pub fn check_structure(&self) -> Result<(), String> {
        let classes = self.fitted.classes();
        if classes.is_empty() {
            return Err("logistic regression has no classes".to_string());
        }
        if let Some(&bad) = classes.iter().find(|&&c| c >= self.n_classes) {
            return Err(format!("logistic class {bad} outside {} classes", self.n_classes));
        }
        if self.fitted.params().ncols() != classes.len() || self.fitted.intercept().len() != classes.len() {
            return Err(format!(
                "logistic coefficients are {:?} with {} intercepts for {} classes",
                self.fitted.params().dim(),
                self.fitted.intercept().len(),
                classes.len()
            ));
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn separable() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [0.9, 0.1], [0.8, 0.2], [0.95, 0.05], [0.85, 0.1],
            [0.1, 0.9], [0.2, 0.8], [0.05, 0.95], [0.1, 0.85],
        ];
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn test_learns_linearly_separable_classes() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&LogisticParams::default(), x.view(), &y, 2).unwrap();
        let p = model.predict_proba(x.view());
        for (i, &label) in y.iter().enumerate() {
            assert!(p[[i, label]] > 0.5, "row {i} misclassified");
        }
        for row in p.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_stronger_penalty_shrinks_weights() {
        let x = array![[1.0, 0.0], [0.9, 0.1], [0.0, 1.0], [0.1, 0.9]];
        let y = [0, 0, 1, 1];
        let weak   = LogisticRegression::fit(&LogisticParams { c: 100.0, ..Default::default() }, x.view(), &y, 2).unwrap();
        let strong = LogisticRegression::fit(&LogisticParams { c: 0.01,  ..Default::default() }, x.view(), &y, 2).unwrap();
        let norm = |m: &LogisticRegression| m.weights().iter().map(|w| w * w).sum::<f64>();
        assert!(norm(&strong) < norm(&weak));
    }

    #[test]
    fn test_absent_class_gets_zero_probability() {
        // Labels 0 and 2 only; class 1 never appears in this fold
        let (x, y) = separable();
        let y: Vec<usize> = y.iter().map(|&l| l * 2).collect();
        let model = LogisticRegression::fit(&LogisticParams::default(), x.view(), &y, 3).unwrap();
        let p = model.predict_proba(x.view());
        assert_eq!(p.dim(), (8, 3));
        assert!(p.column(1).iter().all(|&v| v == 0.0));
        assert!(p[[0, 0]] > 0.5);
        assert!(p[[7, 2]] > 0.5);
        assert_eq!(model.n_classes(), 3);
        assert_eq!(model.n_features(), 2);
        assert!(model.check_structure().is_ok());
    }

    #[test]
    fn test_survives_json_exactly() {
        let (x, y) = separable();
        let model = LogisticRegression::fit(&LogisticParams::default(), x.view(), &y, 2).unwrap();
        let json  = serde_json::to_string(&model).unwrap();
        let back: LogisticRegression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
