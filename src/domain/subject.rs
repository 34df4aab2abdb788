// ============================================================
// Layer 3 — Subjects and Skill Profiles
// ============================================================
// The assessment asks about 17 fixed subjects. Each subject
// is tied to one feature column (Skill1 … Skill17) and the
// order below IS the feature order — the trained model
// expects exactly this sequence.
//
// A SkillProfile wraps the raw { subject → label } map that
// the caller submits. Subjects the caller skipped read as
// "Average"; keys that aren't known subjects are kept (the
// fallback scorer ignores them) but never count towards
// completeness.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw ratings as submitted by a caller: subject name → label text
pub type RatingMap = BTreeMap<String, String>;

/// Label used for any subject the caller didn't rate
pub const DEFAULT_RATING_LABEL: &str = "Average";

/// (subject name, feature column) in feature order
pub const SUBJECTS: [(&str, &str); 17] = [
    ("Database Fundamentals",           "Skill1"),
    ("Computer Architecture",           "Skill2"),
    ("Distributed Computing Systems",   "Skill3"),
    ("Cyber Security",                  "Skill4"),
    ("Networking",                      "Skill5"),
    ("Software Development",            "Skill6"),
    ("Programming Skills",              "Skill7"),
    ("Project Management",              "Skill8"),
    ("Computer Forensics Fundamentals", "Skill9"),
    ("Technical Communication",         "Skill10"),
    ("AI/ML",                           "Skill11"),
    ("Data Science",                    "Skill12"),
    ("Web Development",                 "Skill13"),
    ("Mobile Development",              "Skill14"),
    ("Graphics Designing",              "Skill15"),
    ("System Administration",           "Skill16"),
    ("Cloud Computing",                 "Skill17"),
];

/// Number of assessed subjects
pub const SUBJECT_COUNT: usize = SUBJECTS.len();

/// True if `name` is one of the 17 assessed subjects
pub fn is_known_subject(name: &str) -> bool {
    SUBJECTS.iter().any(|(subject, _)| *subject == name)
}

/// A user's self-reported ratings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillProfile {
    ratings: RatingMap,
}

impl SkillProfile {
    /// Wrap a raw ratings map
    pub fn new(ratings: RatingMap) -> Self {
        Self { ratings }
    }

    /// Build a profile from (subject, label) pairs
    pub fn from_pairs<I, S, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        let ratings = pairs
            .into_iter()
            .map(|(s, l)| (s.into(), l.into()))
            .collect();
        Self { ratings }
    }

    /// Label for a subject, or "Average" if the caller skipped it
    pub fn rating_for(&self, subject: &str) -> &str {
        self.ratings
            .get(subject)
            .map(String::as_str)
            .unwrap_or(DEFAULT_RATING_LABEL)
    }

    /// How many of the 17 assessed subjects the caller rated
    pub fn answered_subjects(&self) -> usize {
        SUBJECTS
            .iter()
            .filter(|(subject, _)| self.ratings.contains_key(*subject))
            .count()
    }

    /// True if the caller supplied no ratings at all
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// The raw map exactly as submitted
    pub fn ratings(&self) -> &RatingMap {
        &self.ratings
    }
}
