// ============================================================
// Layer 5 — Evaluation Metrics
// ============================================================
// Classification scores computed on class indices:
//
//   accuracy   = correct / total
//   precision  = TP / (TP + FP)      per class
//   recall     = TP / (TP + FN)      per class
//   f1         = 2·P·R / (P + R)     per class
//
// Per-class scores are combined with support weighting
// (each class weighted by how many true rows it has), so a
// large class counts for more than a rare one. A class that
// is never predicted has precision 0 rather than NaN.
//
// confusion[t][p] counts rows of true class t predicted as p.

use serde::{Deserialize, Serialize};

/// Support-weighted precision, recall and F1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeightedScores {
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

/// Fraction of positions where prediction equals truth (0 if empty)
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// [n_classes × n_classes] counts, rows = truth, columns = prediction
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Vec<Vec<usize>> {
    let mut matrix = vec![vec![0usize; n_classes]; n_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t < n_classes && p < n_classes {
            matrix[t][p] += 1;
        }
    }
    matrix
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Support-weighted precision / recall / F1 over all classes
pub fn weighted_scores(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> WeightedScores {
    let matrix = confusion_matrix(y_true, y_pred, n_classes);
    let total: usize = matrix.iter().flatten().sum();
    if total == 0 {
        return WeightedScores::default();
    }

    let mut scores = WeightedScores::default();
    for c in 0..n_classes {
        let tp        = matrix[c][c];
        let support   = matrix[c].iter().sum::<usize>();
        let predicted = matrix.iter().map(|row| row[c]).sum::<usize>();

        let precision = ratio(tp, predicted);
        let recall    = ratio(tp, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        let weight = support as f64 / total as f64;
        scores.precision += weight * precision;
        scores.recall    += weight * recall;
        scores.f1        += weight * f1;
    }
    scores
}

/// Population mean and standard deviation
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n    = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var  = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 2, 1], &[0, 1, 1, 1]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_confusion_matrix_counts() {
        let m = confusion_matrix(&[0, 0, 1, 2], &[0, 1, 1, 2], 3);
        assert_eq!(m, vec![vec![1, 1, 0], vec![0, 1, 0], vec![0, 0, 1]]);
    }

    #[test]
    fn test_perfect_predictions_score_one() {
        let y = [0, 1, 2, 2, 1];
        let s = weighted_scores(&y, &y, 3);
        assert!((s.precision - 1.0).abs() < 1e-12);
        assert!((s.recall - 1.0).abs() < 1e-12);
        assert!((s.f1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_scores_by_hand() {
        // class 0: support 2, TP 1, predicted 1 → P 1.0, R 0.5, F1 2/3
        // class 1: support 2, TP 2, predicted 3 → P 2/3, R 1.0, F1 0.8
        let s = weighted_scores(&[0, 0, 1, 1], &[0, 1, 1, 1], 2);
        assert!((s.precision - (0.5 * 1.0 + 0.5 * 2.0 / 3.0)).abs() < 1e-12);
        assert!((s.recall - 0.75).abs() < 1e-12);
        assert!((s.f1 - (0.5 * 2.0 / 3.0 + 0.5 * 0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_never_predicted_class_has_zero_precision() {
        let s = weighted_scores(&[0, 1], &[0, 0], 2);
        // class 0: P 0.5, R 1.0; class 1: P 0 (no predictions), R 0
        assert!((s.precision - 0.25).abs() < 1e-12);
        assert!(s.f1.is_finite());
    }

    #[test]
    fn test_mean_std() {
        let (m, s) = mean_std(&[0.7, 0.8, 0.9]);
        assert!((m - 0.8).abs() < 1e-12);
        assert!((s - (0.02_f64 / 3.0).sqrt()).abs() < 1e-12);
    }
}
