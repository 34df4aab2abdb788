// ============================================================
// Layer 4 — Stratified Splitter
// ============================================================
// Two ways of partitioning row indices while keeping every
// career represented in the same proportion:
//
//   stratified_split  — one shuffled train/validation split
//                       (80/20 by default), driven by a fixed
//                       seed so reruns produce the same split
//
//   stratified_folds  — k folds for cross-validation; rows of
//                       each class are dealt round-robin across
//                       the folds in their original order
//
// Both functions work on labels only and return indices, so
// the caller decides how to slice features and labels.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: Kohavi (1995) A Study of Cross-Validation and
//            Bootstrap for Accuracy Estimation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Row indices grouped by label, labels in sorted order.
fn indices_by_class(labels: &[usize]) -> BTreeMap<usize, Vec<usize>> {
    let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        groups.entry(label).or_default().push(i);
    }
    groups
}

/// Split row indices into (train, validation), stratified by label.
///
/// Each class contributes `round(n_class * validation_fraction)`
/// rows to validation. The same seed always gives the same split.
///
/// # Example
/// ```ignore
/// let (train, val) = stratified_split(&labels, 0.2, 42);
/// // ~80% of each class in train, ~20% in val
/// ```
pub fn stratified_split(
    labels:              &[usize],
    validation_fraction: f64,
    seed:                u64,
) -> (Vec<usize>, Vec<usize>) {
    let mut rng   = StdRng::seed_from_u64(seed);
    let fraction  = validation_fraction.clamp(0.0, 1.0);
    let mut train = Vec::with_capacity(labels.len());
    let mut val   = Vec::new();

    for (_, mut group) in indices_by_class(labels) {
        group.shuffle(&mut rng);
        let n_val = ((group.len() as f64) * fraction).round() as usize;
        let n_val = n_val.min(group.len());
        val.extend_from_slice(&group[..n_val]);
        train.extend_from_slice(&group[n_val..]);
    }

    // Mix classes so downstream code never sees class-sorted runs
    train.shuffle(&mut rng);
    val.shuffle(&mut rng);

    tracing::debug!(
        "Stratified split: {} training, {} validation",
        train.len(),
        val.len()
    );

    (train, val)
}

/// Build `k` stratified folds as (train_indices, test_indices) pairs.
///
/// Every row lands in exactly one test fold. Positions refer to
/// `labels`, so callers index into the same arrays.
pub fn stratified_folds(labels: &[usize], k: usize) -> Vec<(Vec<usize>, Vec<usize>)> {
    let k = k.max(2).min(labels.len().max(2));
    let mut fold_of = vec![0usize; labels.len()];

    // Deal rows round-robin, continuing the count across classes
    // so fold sizes differ by at most one overall
    let mut counter = 0usize;
    for (_, group) in indices_by_class(labels) {
        for i in group {
            fold_of[i] = counter % k;
            counter += 1;
        }
    }

    (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..labels.len()).partition(|&i| fold_of[i] == fold);
            (train, test)
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn balanced_labels(classes: usize, per_class: usize) -> Vec<usize> {
        (0..classes * per_class).map(|i| i % classes).collect()
    }

    #[test]
    fn test_correct_split_sizes() {
        let labels       = balanced_labels(4, 25);
        let (train, val) = stratified_split(&labels, 0.2, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(val.len(),   20);
    }

    #[test]
    fn test_split_is_stratified() {
        let labels = balanced_labels(5, 40);
        let (_, val) = stratified_split(&labels, 0.2, 42);
        for class in 0..5 {
            assert_eq!(val.iter().filter(|&&i| labels[i] == class).count(), 8);
        }
    }

    #[test]
    fn test_all_items_preserved() {
        let labels = balanced_labels(3, 17);
        let (mut train, val) = stratified_split(&labels, 0.3, 1);
        train.extend(val);
        train.sort_unstable();
        assert_eq!(train, (0..labels.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_same_seed_same_split() {
        let labels = balanced_labels(3, 30);
        assert_eq!(stratified_split(&labels, 0.2, 42), stratified_split(&labels, 0.2, 42));
    }

    #[test]
    fn test_empty_dataset() {
        let (train, val) = stratified_split(&[], 0.2, 42);
        assert!(train.is_empty());
        assert!(val.is_empty());
    }

    #[test]
    fn test_folds_cover_every_row_once() {
        let labels = balanced_labels(6, 20);
        let folds  = stratified_folds(&labels, 5);
        assert_eq!(folds.len(), 5);

        let mut seen = vec![0usize; labels.len()];
        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), labels.len());
            for &i in test {
                seen[i] += 1;
            }
        }
        assert!(seen.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_fold_sizes_balanced() {
        let labels = balanced_labels(3, 11);
        for (_, test) in stratified_folds(&labels, 5) {
            assert!(test.len() == 6 || test.len() == 7);
        }
    }
}
