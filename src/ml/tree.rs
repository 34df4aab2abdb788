// ============================================================
// Layer 5 — Decision Tree (CART)
// ============================================================
// A classification tree grown greedily with Gini impurity:
//
//   gini(node) = 1 − Σ_c p_c²
//
// At every node we try each candidate feature, sort the
// node's rows by that feature and sweep every threshold that
// falls between two distinct values. The split with the
// lowest weighted child impurity wins, provided it actually
// lowers impurity. Growth stops at a pure node, at
// max_depth, or when a node has fewer than
// min_samples_split rows.
//
// Leaves store the class distribution of their rows, so
// predict_proba returns genuine per-class fractions.
//
// Nodes live in a flat Vec and refer to children by index;
// the tree is built with an explicit work stack, so deep
// trees never overflow the call stack.
//
// Feature importance = total weighted impurity decrease per
// feature, normalised to sum to 1.
//
// Reference: Breiman et al. (1984) Classification and
//            Regression Trees

use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How many features a node may consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Every feature (single decision tree)
    All,
    /// √n_features, resampled at each node (random forest)
    Sqrt,
}

impl MaxFeatures {
    fn count(self, n_features: usize) -> usize {
        match self {
            MaxFeatures::All  => n_features,
            MaxFeatures::Sqrt => ((n_features as f64).sqrt().floor() as usize).clamp(1, n_features.max(1)),
        }
    }
}

/// Growth limits for one tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub max_features:      MaxFeatures,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth:         None,
            min_samples_split: 2,
            max_features:      MaxFeatures::All,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        distribution: Vec<f64>,
    },
    Split {
        feature:   usize,
        threshold: f64,
        left:      usize,
        right:     usize,
    },
}

/// A fitted classification tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes:       Vec<Node>,
    n_classes:   usize,
    n_features:  usize,
    importances: Vec<f64>,
}

/// Best threshold found for one node.
struct SplitChoice {
    feature:   usize,
    threshold: f64,
    /// n_left·gini_left + n_right·gini_right
    weighted:  f64,
}

/// Rows waiting to be turned into a node.
struct Pending {
    node:    usize,
    samples: Vec<usize>,
    depth:   usize,
}

fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

fn class_counts(y: &[usize], samples: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0.0; n_classes];
    for &i in samples {
        counts[y[i]] += 1.0;
    }
    counts
}

impl DecisionTree {
    /// Grow a tree on the rows listed in `samples`.
    ///
    /// `samples` may contain repeats (bootstrap draws); every
    /// repeat counts as a separate row. `rng` is only used when
    /// `params.max_features` subsamples features.
    pub fn grow(
        params:    &TreeParams,
        x:         ArrayView2<f64>,
        y:         &[usize],
        samples:   &[usize],
        n_classes: usize,
        rng:       &mut StdRng,
    ) -> Self {
        let n_features  = x.ncols();
        let max_depth   = params.max_depth.unwrap_or(usize::MAX);
        let n_try       = params.max_features.count(n_features);
        let mut nodes   = vec![Node::Leaf { distribution: Vec::new() }];
        let mut imports = vec![0.0; n_features];
        let mut stack   = vec![Pending { node: 0, samples: samples.to_vec(), depth: 0 }];

        while let Some(p) = stack.pop() {
            let counts   = class_counts(y, &p.samples, n_classes);
            let n        = p.samples.len() as f64;
            let impurity = gini(&counts, n);

            let splittable = impurity > 0.0
                && p.samples.len() >= params.min_samples_split
                && p.depth < max_depth;

            let choice = if splittable {
                let features: Vec<usize> = if n_try >= n_features {
                    (0..n_features).collect()
                } else {
                    sample(rng, n_features, n_try).into_vec()
                };
                best_split(x, y, &p.samples, &features, &counts, n_classes)
                    .filter(|c| c.weighted < impurity * n - 1e-12)
            } else {
                None
            };

            match choice {
                Some(split) => {
                    imports[split.feature] += impurity * n - split.weighted;

                    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = p
                        .samples
                        .iter()
                        .partition(|&&i| x[[i, split.feature]] <= split.threshold);

                    let left  = nodes.len();
                    let right = left + 1;
                    nodes.push(Node::Leaf { distribution: Vec::new() });
                    nodes.push(Node::Leaf { distribution: Vec::new() });
                    nodes[p.node] = Node::Split {
                        feature:   split.feature,
                        threshold: split.threshold,
                        left,
                        right,
                    };

                    stack.push(Pending { node: left,  samples: left_rows,  depth: p.depth + 1 });
                    stack.push(Pending { node: right, samples: right_rows, depth: p.depth + 1 });
                }
                None => {
                    let distribution = if n > 0.0 {
                        counts.iter().map(|c| c / n).collect()
                    } else {
                        vec![1.0 / n_classes.max(1) as f64; n_classes]
                    };
                    nodes[p.node] = Node::Leaf { distribution };
                }
            }
        }

        let total: f64 = imports.iter().sum();
        if total > 0.0 {
            imports.iter_mut().for_each(|v| *v /= total);
        }

        Self { nodes, n_classes, n_features, importances: imports }
    }

    /// Class distribution of the leaf a row lands in
    pub fn predict_row(&self, row: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split { feature, threshold, left, right } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_classes(&self) -> usize { self.n_classes }

    pub fn n_features(&self) -> usize { self.n_features }

    /// Normalised impurity decrease per feature
    pub fn importances(&self) -> &[f64] { &self.importances }

    pub fn node_count(&self) -> usize { self.nodes.len() }

    /// Every split reads a feature below `n_features` and points
    /// forward to an existing node; every leaf holds `n_classes`
    /// probabilities. Forward-only children also rule out cycles.
    pub fn check_structure(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        if self.importances.len() != self.n_features {
            return Err(format!(
                "tree has {} importances for {} features",
                self.importances.len(),
                self.n_features
            ));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } if distribution.len() != self.n_classes => {
                    return Err(format!(
                        "leaf {idx} holds {} probabilities for {} classes",
                        distribution.len(),
                        self.n_classes
                    ));
                }
                Node::Leaf { .. } => {}
                Node::Split { feature, left, right, .. } => {
                    if *feature >= self.n_features {
                        return Err(format!("node {idx} splits on feature {feature} of {}", self.n_features));
                    }
                    for &child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} points to child {child} of {}", self.nodes.len()));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Lowest weighted-Gini threshold over the candidate features.
fn best_split(
    x:         ArrayView2<f64>,
    y:         &[usize],
    samples:   &[usize],
    features:  &[usize],
    parent:    &[f64],
    n_classes: usize,
) -> Option<SplitChoice> {
    let n = samples.len();
    let mut best: Option<SplitChoice> = None;
    let mut sorted = samples.to_vec();

    for &f in features {
        sorted.sort_by(|&a, &b| x[[a, f]].partial_cmp(&x[[b, f]]).unwrap_or(Ordering::Equal));

        let mut left  = vec![0.0; n_classes];
        let mut right = parent.to_vec();

        for pos in 0..n - 1 {
            let i = sorted[pos];
            left[y[i]]  += 1.0;
            right[y[i]] -= 1.0;

            let here = x[[i, f]];
            let next = x[[sorted[pos + 1], f]];
            if next - here <= 1e-12 {
                continue;
            }

            let n_left   = (pos + 1) as f64;
            let n_right  = (n - pos - 1) as f64;
            let weighted = n_left * gini(&left, n_left) + n_right * gini(&right, n_right);

            if best.as_ref().map_or(true, |b| weighted < b.weighted) {
                best = Some(SplitChoice {
                    feature:   f,
                    threshold: (here + next) / 2.0,
                    weighted,
                });
            }
        }
    }

    best
}
