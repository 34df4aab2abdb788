// ============================================================
// Layer 4 — Synthetic Data Generator
// ============================================================
// The labelled dataset is tiny (a handful of rows per
// career), far too small to train on directly. The generator
// expands it in two passes:
//
//   Pass 1 — perturbed rows, balanced across roles
//     For each role present in the base data, emit
//     target_count / n_roles rows. Each numeric column is
//     the role's column mean plus N(0, 0.1) noise, clamped
//     to [0, 1]. Text columns copy the role's first value.
//
//   Pass 2 — unconstrained rows
//     Emit target_count / 4 rows with no role template:
//       - columns whose name contains "Skill" ~ U[0, 1]
//       - other numeric columns              ~ U[0.3, 0.8]
//     The label comes from the routing table: the first rule
//     whose columns exceed its threshold wins; if none match,
//     a base role is picked uniformly at random.
//
// The routing table is data, not code, so it can be tuned
// and tested on its own.
//
// Randomness comes from the caller's RNG — pass a seeded
// StdRng for reproducible output.
//
// Reference: rand / rand_distr crate documentation

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::data::dataset::{Cell, TabularDataset, TrainingExample};
use crate::domain::error::CareerError;

/// One rule of the role-routing heuristic:
/// "if any of `columns` is above `threshold`, label as `role`".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingRule {
    pub columns:   &'static [&'static str],
    pub threshold: f64,
    pub role:      &'static str,
}

impl RoutingRule {
    /// True if any named column in `row` is above the threshold.
    /// Columns missing from the dataset never match.
    pub fn matches(&self, columns: &[String], row: &[Cell]) -> bool {
        self.columns.iter().any(|name| {
            columns
                .iter()
                .position(|c| c == name)
                .and_then(|i| row.get(i))
                .and_then(Cell::as_number)
                .is_some_and(|v| v > self.threshold)
        })
    }
}

/// Skill11 = AI/ML, Skill12 = Data Science,
/// Skill6 = Software Development, Skill7 = Programming Skills
pub const DEFAULT_ROUTING: &[RoutingRule] = &[
    RoutingRule { columns: &["Skill11", "Skill12"], threshold: 0.7, role: "Data Scientist" },
    RoutingRule { columns: &["Skill6",  "Skill7"],  threshold: 0.7, role: "Software Developer" },
];

/// Tunable knobs for synthesis.
#[derive(Debug, Clone)]
pub struct SyntheticGenerator {
    /// σ of the Gaussian noise added to role means
    pub noise_std:      f64,
    /// Columns containing this marker are treated as skills
    pub skill_marker:   String,
    /// Range for skill columns in unconstrained rows
    pub skill_range:    (f64, f64),
    /// Range for every other numeric column in unconstrained rows
    pub other_range:    (f64, f64),
    /// Rules that label unconstrained rows
    pub routing:        Vec<RoutingRule>,
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self {
            noise_std:    0.1,
            skill_marker: "Skill".to_string(),
            skill_range:  (0.0, 1.0),
            other_range:  (0.3, 0.8),
            routing:      DEFAULT_ROUTING.to_vec(),
        }
    }
}

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label for an unconstrained row: first matching rule, else `None`
    pub fn route(&self, columns: &[String], row: &[Cell]) -> Option<&'static str> {
        self.routing
            .iter()
            .find(|rule| rule.matches(columns, row))
            .map(|rule| rule.role)
    }

    /// Build roughly `target_count * 1.25` synthetic rows from `base`.
    ///
    /// The base rows themselves are NOT included in the output.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        base:         &TabularDataset,
        target_count: usize,
        rng:          &mut R,
    ) -> Result<TabularDataset, CareerError> {
        let roles = base.roles();
        if roles.is_empty() {
            return Err(CareerError::DataLoad(
                "cannot synthesise from an empty dataset".to_string(),
            ));
        }

        let noise = Normal::new(0.0, self.noise_std)
            .map_err(|e| CareerError::DataLoad(format!("invalid noise σ: {e}")))?;

        let columns    = base.columns().to_vec();
        let numeric: Vec<bool> = (0..columns.len()).map(|i| base.is_numeric_column(i)).collect();
        let mut output = TabularDataset::new(columns.clone());

        // ── Pass 1: perturbed rows per role ──────────────────────────────────
        let per_role = target_count / roles.len();
        for role in &roles {
            let template = role_template(base, role, &numeric);
            for _ in 0..per_role {
                let cells = template
                    .iter()
                    .map(|cell| match cell {
                        Cell::Number(mean) => Cell::Number((mean + noise.sample(rng)).clamp(0.0, 1.0)),
                        Cell::Text(text)   => Cell::Text(text.clone()),
                    })
                    .collect();
                output.push(TrainingExample::new(cells, role.clone()))?;
            }
        }

        // ── Pass 2: unconstrained, rule-labelled rows ────────────────────────
        let skill_dist = Uniform::new_inclusive(self.skill_range.0, self.skill_range.1);
        let other_dist = Uniform::new_inclusive(self.other_range.0, self.other_range.1);
        let first_row  = &base.rows()[0].cells;

        for _ in 0..target_count / 4 {
            let cells: Vec<Cell> = columns
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    if !numeric[i] {
                        first_row[i].clone()
                    } else if name.contains(self.skill_marker.as_str()) {
                        Cell::Number(skill_dist.sample(rng))
                    } else {
                        Cell::Number(other_dist.sample(rng))
                    }
                })
                .collect();

            let role = match self.route(&columns, &cells) {
                Some(role) => role.to_string(),
                None       => roles
                    .choose(rng)
                    .cloned()
                    .unwrap_or_else(|| roles[0].clone()),
            };
            output.push(TrainingExample::new(cells, role))?;
        }

        tracing::debug!(
            "Synthesised {} rows ({} per role + {} unconstrained)",
            output.len(),
            per_role,
            target_count / 4
        );
        Ok(output)
    }
}

/// Column means for numeric columns, first observed value for
/// text columns, over the rows labelled `role`.
fn role_template(base: &TabularDataset, role: &str, numeric: &[bool]) -> Vec<Cell> {
    let rows: Vec<&TrainingExample> = base.rows().iter().filter(|r| r.role == role).collect();
    let n = rows.len().max(1) as f64;

    numeric
        .iter()
        .enumerate()
        .map(|(i, &is_numeric)| {
            if is_numeric {
                let sum: f64 = rows.iter().filter_map(|r| r.cells[i].as_number()).sum();
                Cell::Number(sum / n)
            } else {
                rows.first()
                    .map(|r| r.cells[i].clone())
                    .unwrap_or_else(|| Cell::Text(String::new()))
            }
        })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn base() -> TabularDataset {
        let columns = ["Skill6", "Skill11", "Personality1", "Track"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = |v: [f64; 3], track: &str, role: &str| {
            let mut cells: Vec<Cell> = v.iter().copied().map(Cell::Number).collect();
            cells.push(Cell::Text(track.to_string()));
            TrainingExample::new(cells, role)
        };
        TabularDataset::from_rows(
            columns,
            vec![
                row([0.9, 0.1, 0.6], "eng",  "Software Developer"),
                row([0.8, 0.2, 0.5], "eng2", "Software Developer"),
                row([0.2, 0.9, 0.7], "sci",  "Data Scientist"),
                row([0.1, 0.8, 0.6], "sci2", "Data Scientist"),
                row([0.3, 0.3, 0.4], "web",  "Web Developer"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_output_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let out = SyntheticGenerator::new().generate(&base(), 300, &mut rng).unwrap();
        // 300 / 3 roles × 3 + 300 / 4
        assert_eq!(out.len(), 300 + 75);
        assert_eq!(out.columns(), base().columns());
    }

    #[test]
    fn test_numeric_values_stay_in_unit_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = SyntheticGenerator::new().generate(&base(), 600, &mut rng).unwrap();
        for row in out.rows() {
            for cell in &row.cells[..3] {
                let v = cell.as_number().unwrap();
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_perturbed_rows_copy_first_text_value() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = SyntheticGenerator::new().generate(&base(), 30, &mut rng).unwrap();
        // First 10 rows belong to the first-seen role
        for row in &out.rows()[..10] {
            assert_eq!(row.role, "Software Developer");
            assert_eq!(row.cells[3], Cell::Text("eng".to_string()));
        }
    }

    #[test]
    fn test_every_role_is_balanced_in_pass_one() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = SyntheticGenerator::new().generate(&base(), 90, &mut rng).unwrap();
        let pass_one = &out.rows()[..90];
        for role in base().roles() {
            assert_eq!(pass_one.iter().filter(|r| r.role == role).count(), 30);
        }
    }

    #[test]
    fn test_pass_one_scatters_around_role_mean() {
        let mut rng = StdRng::seed_from_u64(23);
        let out = SyntheticGenerator::new().generate(&base(), 3000, &mut rng).unwrap();
        let web: Vec<&TrainingExample> = out.rows()[..3000]
            .iter()
            .filter(|r| r.role == "Web Developer")
            .collect();
        assert_eq!(web.len(), 1000);

        // Web Developer's base means sit well inside (0, 1), so the
        // clamp barely touches the N(0, 0.1) noise
        for (col, base_mean) in [0.3, 0.3, 0.4].into_iter().enumerate() {
            let values: Vec<f64> = web.iter().map(|r| r.cells[col].as_number().unwrap()).collect();
            let n    = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let std  = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
            assert!((mean - base_mean).abs() < 0.02, "column {col}: mean {mean}");
            assert!((std - 0.1).abs() < 0.015, "column {col}: std {std}");
        }
    }

    #[test]
    fn test_unconstrained_rows_follow_routing() {
        let mut rng = StdRng::seed_from_u64(19);
        let ds  = base();
        let generator = SyntheticGenerator::new();
        let out = generator.generate(&ds, 400, &mut rng).unwrap();
        for row in &out.rows()[399..] {
            let skill6  = row.cells[0].as_number().unwrap();
            let skill11 = row.cells[1].as_number().unwrap();
            let other   = row.cells[2].as_number().unwrap();
            assert!((0.3..=0.8).contains(&other));
            if skill11 > 0.7 {
                assert_eq!(row.role, "Data Scientist");
            } else if skill6 > 0.7 {
                assert_eq!(row.role, "Software Developer");
            } else {
                assert!(ds.roles().contains(&row.role));
            }
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let generator = SyntheticGenerator::new();
        let a = generator.generate(&base(), 120, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generator.generate(&base(), 120, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rule_ignores_missing_columns() {
        let rule = RoutingRule { columns: &["Skill99"], threshold: 0.1, role: "x" };
        let cols = vec!["Skill1".to_string()];
        assert!(!rule.matches(&cols, &[Cell::Number(0.9)]));
    }

    #[test]
    fn test_empty_base_rejected() {
        let empty = TabularDataset::new(vec!["Skill1".to_string()]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(SyntheticGenerator::new().generate(&empty, 100, &mut rng).is_err());
    }
}
