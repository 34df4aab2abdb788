// ============================================================
// Layer 4 — Feature Encoder
// ============================================================
// Turns a SkillProfile into the fixed 26-element vector the
// classifier was trained on:
//
//   [ Skill1 … Skill17 | Personality1 … Personality9 ]
//     rating / 6.0       personality source
//
// Skill values: each subject's label → 0–6 → divided by 6.0.
// Skipped subjects read as "Average" (0.5) and unknown
// labels as the midpoint (also 0.5).
//
// Personality values: there is no personality test yet, so
// the encoder carries an explicit PersonalityProfile that
// defaults to fixed placeholder values. A caller with real
// trait scores passes them through `with_personality`.
//
// encode() never fails; every output entry is in [0, 1].

use serde::{Deserialize, Serialize};

use crate::domain::rating::normalized_rating;
use crate::domain::subject::{SkillProfile, SUBJECTS, SUBJECT_COUNT};

/// Number of personality trait features
pub const PERSONALITY_COUNT: usize = 9;

/// Total encoded length: 17 skills + 9 traits
pub const FEATURE_LEN: usize = SUBJECT_COUNT + PERSONALITY_COUNT;

/// Feature column names for the personality traits
pub const PERSONALITY_COLUMNS: [&str; PERSONALITY_COUNT] = [
    "Personality1", "Personality2", "Personality3",
    "Personality4", "Personality5", "Personality6",
    "Personality7", "Personality8", "Personality9",
];

/// Placeholder trait values used until real personality input exists
pub const DEFAULT_PERSONALITY: [f64; PERSONALITY_COUNT] =
    [0.6, 0.7, 0.6, 0.6, 0.5, 0.6, 0.5, 0.6, 0.6];

/// Nine personality trait scores in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    traits: [f64; PERSONALITY_COUNT],
}

impl PersonalityProfile {
    /// Clamp each score into [0, 1]; non-finite scores take the default
    pub fn new(traits: [f64; PERSONALITY_COUNT]) -> Self {
        let mut clean = DEFAULT_PERSONALITY;
        for (slot, v) in clean.iter_mut().zip(traits) {
            if v.is_finite() {
                *slot = v.clamp(0.0, 1.0);
            }
        }
        Self { traits: clean }
    }

    pub fn traits(&self) -> &[f64; PERSONALITY_COUNT] {
        &self.traits
    }
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self { traits: DEFAULT_PERSONALITY }
    }
}

/// An encoded, fixed-length feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Encodes skill profiles in training-time column order.
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder {
    personality: PersonalityProfile,
}

impl FeatureEncoder {
    /// Encoder using the placeholder personality values
    pub fn new() -> Self {
        Self::default()
    }

    /// Use real personality scores instead of the placeholders
    pub fn with_personality(mut self, personality: PersonalityProfile) -> Self {
        self.personality = personality;
        self
    }

    /// Column names in encoded order
    pub fn feature_columns() -> Vec<String> {
        SUBJECTS
            .iter()
            .map(|(_, column)| column.to_string())
            .chain(PERSONALITY_COLUMNS.iter().map(|c| c.to_string()))
            .collect()
    }

    /// Encode one profile into a 26-element vector in [0, 1]
    pub fn encode(&self, profile: &SkillProfile) -> FeatureVector {
        let mut values = Vec::with_capacity(FEATURE_LEN);

        // ── Skills, in fixed subject order ────────────────────────────────────
        for (subject, _) in SUBJECTS.iter() {
            values.push(normalized_rating(profile.rating_for(subject)));
        }

        // ── Personality traits ────────────────────────────────────────────────
        values.extend_from_slice(self.personality.traits());

        FeatureVector(values)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rating::RatingLabel;

    #[test]
    fn test_empty_profile_is_all_average() {
        let v = FeatureEncoder::new().encode(&SkillProfile::default());
        assert_eq!(v.len(), FEATURE_LEN);
        for x in &v.as_slice()[..SUBJECT_COUNT] {
            assert!((x - 0.5).abs() < 1e-12);
        }
        assert_eq!(&v.as_slice()[SUBJECT_COUNT..], &DEFAULT_PERSONALITY);
    }

    #[test]
    fn test_encoding_is_in_range_for_every_label() {
        let encoder = FeatureEncoder::new();
        for label in RatingLabel::ALL {
            let profile = SkillProfile::from_pairs(
                SUBJECTS.iter().map(|(s, _)| (*s, label.label())),
            );
            let v = encoder.encode(&profile);
            assert_eq!(v.len(), 26);
            assert!(v.as_slice().iter().all(|x| (0.0..=1.0).contains(x)));
            assert!((v.as_slice()[0] - label.normalized()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_subject_lands_in_its_column() {
        let profile = SkillProfile::from_pairs([("AI/ML", "Professional"), ("Networking", "Not Interested")]);
        let v = FeatureEncoder::new().encode(&profile);
        // AI/ML is Skill11 → index 10, Networking is Skill5 → index 4
        assert_eq!(v.as_slice()[10], 1.0);
        assert_eq!(v.as_slice()[4], 0.0);
    }

    #[test]
    fn test_unknown_label_encodes_as_midpoint() {
        let profile = SkillProfile::from_pairs([("Cloud Computing", "Wizard")]);
        let v = FeatureEncoder::new().encode(&profile);
        assert!((v.as_slice()[16] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_personality_override_is_clamped() {
        let mut traits = [0.9; PERSONALITY_COUNT];
        traits[0] = 1.7;
        traits[1] = f64::NAN;
        let encoder = FeatureEncoder::new().with_personality(PersonalityProfile::new(traits));
        let v = encoder.encode(&SkillProfile::default());
        let p = &v.as_slice()[SUBJECT_COUNT..];
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], DEFAULT_PERSONALITY[1]);
        assert_eq!(p[2], 0.9);
    }

    #[test]
    fn test_columns_match_vector_length() {
        let cols = FeatureEncoder::feature_columns();
        assert_eq!(cols.len(), FEATURE_LEN);
        assert_eq!(cols[0], "Skill1");
        assert_eq!(cols[25], "Personality9");
    }
}
