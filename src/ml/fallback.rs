// ============================================================
// Layer 5 — Rule-Based Fallback Scorer
// ============================================================
// Used whenever the trained model is missing or fails. Each
// career has a hand-tuned weight per subject:
//
//   score(role) = Σ_subject weight(role, subject) · rating/6
//   score      += N(0, 0.05)          jitter so ties vary
//   score       = max(score, 0.1)     every role stays visible
//   p(role)     = score / Σ score     normalise to sum to 1
//
// Only subjects the caller actually rated contribute; a
// skipped subject adds nothing. Roles missing from
// the weight table score 0 before jitter, so they end up at
// the 0.1 floor.
//
// The noise RNG sits behind a Mutex so one scorer can be
// shared across threads; seed it for reproducible output.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use std::sync::{Mutex, PoisonError};

use crate::domain::career::Career;
use crate::domain::rating::normalized_rating;
use crate::domain::subject::SkillProfile;

/// Standard deviation of the jitter added to each score
pub const FALLBACK_NOISE_STD: f64 = 0.05;

/// Lowest score any role can have before normalisation
pub const FALLBACK_FLOOR: f64 = 0.1;

/// Subject weights for one career.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleWeights {
    pub career:  Career,
    pub weights: &'static [(&'static str, f64)],
}

pub const FALLBACK_WEIGHTS: &[RoleWeights] = &[
    RoleWeights {
        career: Career::DataScientist,
        weights: &[
            ("AI/ML", 0.25),
            ("Data Science", 0.25),
            ("Programming Skills", 0.15),
            ("Database Fundamentals", 0.15),
            ("Technical Communication", 0.10),
            ("Project Management", 0.10),
        ],
    },
    RoleWeights {
        career: Career::SoftwareDeveloper,
        weights: &[
            ("Programming Skills", 0.30),
            ("Software Development", 0.25),
            ("Database Fundamentals", 0.15),
            ("Web Development", 0.15),
            ("Project Management", 0.10),
            ("Technical Communication", 0.05),
        ],
    },
    RoleWeights {
        career: Career::CloudEngineer,
        weights: &[
            ("Cloud Computing", 0.30),
            ("Networking", 0.20),
            ("System Administration", 0.20),
            ("Cyber Security", 0.15),
            ("Programming Skills", 0.10),
            ("Project Management", 0.05),
        ],
    },
    RoleWeights {
        career: Career::CybersecurityAnalyst,
        weights: &[
            ("Cyber Security", 0.35),
            ("Networking", 0.20),
            ("Computer Forensics Fundamentals", 0.20),
            ("System Administration", 0.15),
            ("Technical Communication", 0.10),
        ],
    },
    RoleWeights {
        career: Career::WebDeveloper,
        weights: &[
            ("Web Development", 0.35),
            ("Programming Skills", 0.25),
            ("Graphics Designing", 0.15),
            ("Database Fundamentals", 0.15),
            ("Software Development", 0.10),
        ],
    },
    RoleWeights {
        career: Career::AiMlEngineer,
        weights: &[
            ("AI/ML", 0.35),
            ("Programming Skills", 0.25),
            ("Data Science", 0.20),
            ("Computer Architecture", 0.10),
            ("Technical Communication", 0.10),
        ],
    },
];

/// Subject weights for a role, if it has any
pub fn weights_for(role: &str) -> Option<&'static [(&'static str, f64)]> {
    let career = Career::parse(role)?;
    FALLBACK_WEIGHTS.iter().find(|w| w.career == career).map(|w| w.weights)
}

/// Noise-free weighted score of one role
pub fn weighted_score(role: &str, profile: &SkillProfile) -> f64 {
    weights_for(role).map_or(0.0, |weights| {
        weights
            .iter()
            .filter_map(|(subject, w)| {
                profile.ratings().get(*subject).map(|label| w * normalized_rating(label))
            })
            .sum()
    })
}

/// Jittered, floored, normalised scorer.
#[derive(Debug)]
pub struct FallbackScorer {
    noise_std: f64,
    rng:       Mutex<StdRng>,
}

impl FallbackScorer {
    /// `Some(seed)` gives reproducible jitter; `None` seeds from entropy
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_entropy(),
        };
        Self { noise_std: FALLBACK_NOISE_STD, rng: Mutex::new(rng) }
    }

    /// Floored scores in class order, before normalisation
    pub fn raw_scores(&self, classes: &[String], profile: &SkillProfile) -> Vec<f64> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        classes
            .iter()
            .map(|role| {
                let z: f64 = StandardNormal.sample(&mut *rng);
                let score  = weighted_score(role, profile) + z * self.noise_std;
                score.max(FALLBACK_FLOOR)
            })
            .collect()
    }

    /// Probabilities in class order, summing to 1
    pub fn score(&self, classes: &[String], profile: &SkillProfile) -> Vec<f64> {
        let raw   = self.raw_scores(classes, profile);
        let total = raw.iter().sum::<f64>();
        if total > 0.0 {
            raw.iter().map(|s| s / total).collect()
        } else {
            raw
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn classes() -> Vec<String> {
        Career::default_classes()
    }

    #[test]
    fn test_every_career_has_weights() {
        for career in Career::ALL {
            let w = weights_for(career.name()).unwrap();
            assert!((w.iter().map(|(_, v)| v).sum::<f64>() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_raw_scores_respect_floor() {
        let scorer  = FallbackScorer::new(Some(3));
        let profile = SkillProfile::from_pairs([("AI/ML", "Not Interested")]);
        for _ in 0..50 {
            assert!(scorer.raw_scores(&classes(), &profile).iter().all(|&s| s >= FALLBACK_FLOOR));
        }
    }

    #[test]
    fn test_scores_sum_to_one() {
        let scorer  = FallbackScorer::new(Some(9));
        let profile = SkillProfile::from_pairs([("Cyber Security", "Professional")]);
        let p = scorer.score(&classes(), &profile);
        assert_eq!(p.len(), 6);
        assert!((p.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_skipped_subjects_add_nothing() {
        assert_eq!(weighted_score("Data Scientist", &SkillProfile::default()), 0.0);
        let one = SkillProfile::from_pairs([("AI/ML", "Professional")]);
        assert!((weighted_score("Data Scientist", &one) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_role_sits_on_floor() {
        let scorer = FallbackScorer::new(Some(1));
        assert_eq!(weighted_score("Astronaut", &SkillProfile::default()), 0.0);
        let raw = scorer.raw_scores(&["Astronaut".to_string()], &SkillProfile::default());
        // Only jitter lifts it above the floor
        assert!(raw[0] >= FALLBACK_FLOOR && raw[0] < FALLBACK_FLOOR + 6.0 * FALLBACK_NOISE_STD);
    }

    #[test]
    fn test_strong_profile_favours_matching_role() {
        let scorer  = FallbackScorer::new(Some(42));
        let profile = SkillProfile::from_pairs([
            ("Cyber Security", "Professional"),
            ("Networking", "Professional"),
            ("Computer Forensics Fundamentals", "Professional"),
            ("System Administration", "Excellent"),
            ("AI/ML", "Not Interested"),
            ("Data Science", "Not Interested"),
            ("Web Development", "Not Interested"),
            ("Programming Skills", "Poor"),
        ]);
        let p    = scorer.score(&classes(), &profile);
        let best = p.iter().enumerate().fold(0, |b, (i, &v)| if v > p[b] { i } else { b });
        assert_eq!(classes()[best], "Cybersecurity Analyst");
    }

    #[test]
    fn test_same_seed_same_scores() {
        let profile = SkillProfile::from_pairs([("AI/ML", "Intermediate")]);
        let a = FallbackScorer::new(Some(5)).score(&classes(), &profile);
        let b = FallbackScorer::new(Some(5)).score(&classes(), &profile);
        assert_eq!(a, b);
    }
}
