// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All classifier math lives here. No other layer fits or
// evaluates a model directly.
//
// What's in this layer:
//
//   tree.rs       — CART decision tree (gini, class distributions
//                   in the leaves, impurity-based importances)
//
//   forest.rs     — Bagged trees with sqrt(n) features per split,
//                   soft voting over the tree distributions
//
//   logistic.rs   — Multinomial logistic regression, L2 penalty,
//                   fitted by linfa-logistic
//
//   model.rs      — Candidate specs and the fitted TrainedModel
//                   that wraps whichever classifier won
//
//   evaluation.rs — Accuracy, confusion matrix, weighted P/R/F1
//
//   artifact.rs   — Role label encoder + model + feature columns,
//                   the unit that is persisted and loaded
//
//   trainer.rs    — Synthesis → CV → selection → refit → metrics
//
//   fallback.rs   — Rule-based weighted scoring with jitter
//
//   inferencer.rs — Model-or-fallback scoring for one request
//
// Reference: Breiman (2001) Random Forests
//            Hastie et al., ESL §4.4 (Logistic Regression)

/// CART decision tree
pub mod tree;

/// Random forest of CART trees
pub mod forest;

/// Multinomial logistic regression
pub mod logistic;

/// Candidate configurations and the fitted model enum
pub mod model;

/// Classification metrics
pub mod evaluation;

/// Persistable model artifact and role encoder
pub mod artifact;

/// Model selection and training pipeline
pub mod trainer;

/// Rule-based fallback scorer
pub mod fallback;

/// Two-tier prediction service
pub mod inferencer;
