// ============================================================
// Layer 3 — Predictions
// ============================================================
// What the prediction core hands back to a caller:
//
//   PredictionReport
//     ├── source             model or rule-based fallback
//     ├── predictions        top-5 careers, highest first
//     ├── model_accuracy     advisory real-time estimate
//     └── real_time_metrics  certainty / completeness / ratio
//
// Ranking is a stable descending sort on confidence, so two
// careers with identical confidence keep their class order.
//
// Certainty buckets use strict comparisons:
//   top > 0.8 → high,  top > 0.6 → medium,  else → low
// (0.8 itself is "medium", 0.6 itself is "low").

use serde::Serialize;
use std::cmp::Ordering;

use crate::domain::career::{career_info, CareerInfo};
use crate::domain::subject::SUBJECT_COUNT;

/// How many careers a report lists
pub const TOP_K: usize = 5;

/// One ranked career.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerPrediction {
    pub name:       String,
    pub confidence: f64,
    /// None when the class label isn't one of the six known careers
    pub info:       Option<&'static CareerInfo>,
}

impl CareerPrediction {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        let name = name.into();
        let info = career_info(&name);
        Self { name, confidence, info }
    }
}

/// Coarse bucket derived from the top confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    High,
    Medium,
    Low,
}

impl Certainty {
    pub fn from_confidence(top_confidence: f64) -> Self {
        if top_confidence > 0.8 {
            Certainty::High
        } else if top_confidence > 0.6 {
            Certainty::Medium
        } else {
            Certainty::Low
        }
    }
}

/// Which tier produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    TrainedModel,
    RuleBasedFallback,
}

/// Per-request quality indicators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealTimeMetrics {
    pub certainty:        Certainty,
    /// Percentage of the 17 subjects the caller rated (0–100)
    pub completeness:     f64,
    pub top_confidence:   f64,
    /// top_confidence as a percentage with one decimal, e.g. "87.3%"
    pub confidence_ratio: String,
}

impl RealTimeMetrics {
    pub fn new(top_confidence: f64, answered_subjects: usize) -> Self {
        Self {
            certainty:        Certainty::from_confidence(top_confidence),
            completeness:     completeness(answered_subjects),
            top_confidence,
            confidence_ratio: format!("{:.1}%", top_confidence * 100.0),
        }
    }
}

/// Everything returned for one prediction request.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub source:            PredictionSource,
    pub predictions:       Vec<CareerPrediction>,
    pub model_accuracy:    f64,
    pub real_time_metrics: RealTimeMetrics,
}

/// Percentage of assessed subjects answered, capped at 100.
pub fn completeness(answered_subjects: usize) -> f64 {
    (answered_subjects as f64 / SUBJECT_COUNT as f64 * 100.0).min(100.0)
}

/// Rank class probabilities, highest first, keeping class order on ties.
///
/// `classes[i]` must be the label for `probabilities[i]`; any
/// extra entries on either side are ignored.
pub fn rank_classes(
    classes:       &[String],
    probabilities: &[f64],
    top_k:         usize,
) -> Vec<CareerPrediction> {
    let n = classes.len().min(probabilities.len());
    let mut order: Vec<usize> = (0..n).collect();

    // slice::sort_by is stable — equal scores keep index order
    order.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(Ordering::Equal)
    });

    order
        .into_iter()
        .take(top_k)
        .map(|i| CareerPrediction::new(classes[i].clone(), probabilities[i]))
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_certainty_buckets() {
        assert_eq!(Certainty::from_confidence(0.85), Certainty::High);
        assert_eq!(Certainty::from_confidence(0.7),  Certainty::Medium);
        assert_eq!(Certainty::from_confidence(0.5),  Certainty::Low);
    }

    #[test]
    fn test_certainty_boundaries_fall_to_lower_bucket() {
        assert_eq!(Certainty::from_confidence(0.8), Certainty::Medium);
        assert_eq!(Certainty::from_confidence(0.6), Certainty::Low);
    }

    #[test]
    fn test_completeness_values() {
        assert_eq!(completeness(0), 0.0);
        assert!((completeness(9) - 52.941).abs() < 0.01);
        assert_eq!(completeness(17), 100.0);
        assert_eq!(completeness(40), 100.0);
    }

    #[test]
    fn test_confidence_ratio_format() {
        let m = RealTimeMetrics::new(0.8734, 17);
        assert_eq!(m.confidence_ratio, "87.3%");
        assert_eq!(m.certainty, Certainty::High);
    }

    #[test]
    fn test_rank_is_descending_and_truncated() {
        let c = classes(&["a", "b", "c", "d", "e", "f"]);
        let p = [0.05, 0.4, 0.1, 0.3, 0.1, 0.05];
        let ranked = rank_classes(&c, &p, TOP_K);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c", "e", "a"]);
    }

    #[test]
    fn test_rank_ties_keep_class_order() {
        let c = classes(&["x", "y", "z"]);
        let ranked = rank_classes(&c, &[0.25, 0.5, 0.25], 3);
        assert_eq!(ranked[1].name, "x");
        assert_eq!(ranked[2].name, "z");
    }

    #[test]
    fn test_info_attached_for_known_careers() {
        let c = classes(&["Data Scientist", "Mystery Role"]);
        let ranked = rank_classes(&c, &[0.6, 0.4], 2);
        assert!(ranked[0].info.is_some());
        assert!(ranked[1].info.is_none());
    }
}
