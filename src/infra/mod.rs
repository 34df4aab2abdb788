// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any one
// business layer:
//
//   checkpoint.rs — Saving and loading the model artifact
//                   (model, role encoder, feature columns),
//                   the metrics snapshot and the TrainConfig
//                   as JSON files in one directory. Files are
//                   staged then renamed so a reader never sees
//                   a half-written set.
//
//   metrics.rs    — The evaluation metrics record, the
//                   summary shown to users, the real-time
//                   accuracy estimate, and a CSV log of every
//                   candidate's CV score per training run.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Artifact and metrics persistence
pub mod checkpoint;

/// Evaluation metrics, summaries and the training-run CSV log
pub mod metrics;
