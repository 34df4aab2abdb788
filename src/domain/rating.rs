// ============================================================
// Layer 3 — Rating Scale
// ============================================================
// Users rate each subject on a fixed, ordered 7-step scale.
// Each label maps to an integer 0–6:
//
//   Not Interested → 0      Intermediate → 4
//   Poor           → 1      Excellent    → 5
//   Beginner       → 2      Professional → 6
//   Average        → 3
//
// Any label outside this set maps to the midpoint (3) so a
// typo in a form never turns into an error.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

/// Highest value on the scale, used to normalise into [0, 1]
pub const MAX_RATING: f64 = 6.0;

/// Value used for any label the scale doesn't recognise
pub const MIDPOINT_RATING: u8 = 3;

/// One step of the rating scale, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RatingLabel {
    NotInterested,
    Poor,
    Beginner,
    Average,
    Intermediate,
    Excellent,
    Professional,
}

impl RatingLabel {
    /// Every label in scale order
    pub const ALL: [RatingLabel; 7] = [
        RatingLabel::NotInterested,
        RatingLabel::Poor,
        RatingLabel::Beginner,
        RatingLabel::Average,
        RatingLabel::Intermediate,
        RatingLabel::Excellent,
        RatingLabel::Professional,
    ];

    /// The label text exactly as it appears in the assessment form
    pub fn label(self) -> &'static str {
        match self {
            RatingLabel::NotInterested => "Not Interested",
            RatingLabel::Poor          => "Poor",
            RatingLabel::Beginner      => "Beginner",
            RatingLabel::Average       => "Average",
            RatingLabel::Intermediate  => "Intermediate",
            RatingLabel::Excellent     => "Excellent",
            RatingLabel::Professional  => "Professional",
        }
    }

    /// Parse an exact label string. Returns None for anything else.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == label)
    }

    /// Integer position on the scale (0–6)
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Position on the scale divided by 6.0, always in [0, 1]
    pub fn normalized(self) -> f64 {
        f64::from(self.value()) / MAX_RATING
    }

    /// True for the two labels that signal no real ability
    pub fn is_low(self) -> bool {
        matches!(self, RatingLabel::NotInterested | RatingLabel::Poor)
    }
}

/// Map a raw label string to 0–6, defaulting to the midpoint.
pub fn rating_value(label: &str) -> u8 {
    RatingLabel::parse(label)
        .map(RatingLabel::value)
        .unwrap_or(MIDPOINT_RATING)
}

/// Map a raw label string straight into [0, 1].
pub fn normalized_rating(label: &str) -> f64 {
    f64::from(rating_value(label)) / MAX_RATING
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_label_maps_exactly() {
        let expected = [
            ("Not Interested", 0),
            ("Poor",           1),
            ("Beginner",       2),
            ("Average",        3),
            ("Intermediate",   4),
            ("Excellent",      5),
            ("Professional",   6),
        ];
        for (label, value) in expected {
            assert_eq!(rating_value(label), value, "label {label}");
        }
    }

    #[test]
    fn test_unknown_label_is_midpoint() {
        assert_eq!(rating_value("Expert"), 3);
        assert_eq!(rating_value(""), 3);
        // Matching is exact — casing differences are unknown labels
        assert_eq!(rating_value("professional"), 3);
    }

    #[test]
    fn test_normalized_range() {
        assert_eq!(normalized_rating("Not Interested"), 0.0);
        assert_eq!(normalized_rating("Professional"), 1.0);
        assert!((normalized_rating("Average") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_low_labels() {
        assert!(RatingLabel::NotInterested.is_low());
        assert!(RatingLabel::Poor.is_low());
        assert!(!RatingLabel::Beginner.is_low());
    }
}
