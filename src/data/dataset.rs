// ============================================================
// Layer 4 — Tabular Dataset
// ============================================================
// A small in-memory table: named feature columns plus one
// career label ("Role") per row.
//
// Cells are either numbers or text. CSV values that parse
// as f64 become Cell::Number; anything else stays as
// Cell::Text. A column counts as numeric only if EVERY row
// holds a number in it — only numeric columns are fed to the
// classifiers.
//
// Example:
//   columns: [Skill1, Skill2, …, Personality9]
//   row:     [0.83, 0.50, …, 0.60]  → "Data Scientist"

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::domain::error::CareerError;
use crate::domain::traits::DatasetSource;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Parse a raw CSV field, preferring a number when possible
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _                      => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(_)   => None,
        }
    }
}

/// One labelled row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub cells: Vec<Cell>,
    pub role:  String,
}

impl TrainingExample {
    pub fn new(cells: Vec<Cell>, role: impl Into<String>) -> Self {
        Self { cells, role: role.into() }
    }

    /// Convenience constructor for all-numeric rows
    pub fn numeric(values: &[f64], role: impl Into<String>) -> Self {
        Self::new(values.iter().copied().map(Cell::Number).collect(), role)
    }
}

/// Column names plus labelled rows, all rows the same width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    columns: Vec<String>,
    rows:    Vec<TrainingExample>,
}

impl TabularDataset {
    /// An empty dataset with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    /// Build a dataset, rejecting rows whose width doesn't match
    pub fn from_rows(
        columns: Vec<String>,
        rows:    Vec<TrainingExample>,
    ) -> Result<Self, CareerError> {
        let mut ds = Self::new(columns);
        for row in rows {
            ds.push(row)?;
        }
        Ok(ds)
    }

    /// Append one row
    pub fn push(&mut self, row: TrainingExample) -> Result<(), CareerError> {
        if row.cells.len() != self.columns.len() {
            return Err(CareerError::DataLoad(format!(
                "row has {} cells but the dataset has {} columns",
                row.cells.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append every row of another dataset with identical columns
    pub fn extend(&mut self, other: TabularDataset) -> Result<(), CareerError> {
        if other.columns != self.columns {
            return Err(CareerError::DataLoad(
                "cannot merge datasets with different columns".to_string(),
            ));
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    pub fn columns(&self) -> &[String] { &self.columns }

    pub fn rows(&self) -> &[TrainingExample] { &self.rows }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Labels in row order
    pub fn labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.role.clone()).collect()
    }

    /// Distinct roles in first-seen order
    pub fn roles(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.role) {
                seen.push(row.role.clone());
            }
        }
        seen
    }

    /// True if every row holds a number in column `idx`
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        !self.rows.is_empty()
            && self
                .rows
                .iter()
                .all(|r| matches!(r.cells.get(idx), Some(Cell::Number(_))))
    }

    /// Names of all numeric columns, in column order
    pub fn numeric_columns(&self) -> Vec<String> {
        (0..self.columns.len())
            .filter(|&i| self.is_numeric_column(i))
            .map(|i| self.columns[i].clone())
            .collect()
    }

    /// A new dataset holding only the rows at `indices`
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: self.columns.clone(),
            rows:    indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Dense [rows × features] matrix over the named columns.
    ///
    /// Fails if a column is missing or a selected cell isn't numeric.
    pub fn feature_matrix(&self, feature_columns: &[String]) -> Result<Array2<f64>, CareerError> {
        let indices = feature_columns
            .iter()
            .map(|name| {
                self.column_index(name).ok_or_else(|| {
                    CareerError::DataLoad(format!("dataset has no column '{name}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut x = Array2::<f64>::zeros((self.rows.len(), indices.len()));
        for (r, row) in self.rows.iter().enumerate() {
            for (c, &col) in indices.iter().enumerate() {
                x[[r, c]] = row.cells[col].as_number().ok_or_else(|| {
                    CareerError::DataLoad(format!(
                        "row {r} has a non-numeric value in column '{}'",
                        self.columns[col]
                    ))
                })?;
            }
        }
        Ok(x)
    }
}

/// An in-memory dataset is its own source
impl DatasetSource for TabularDataset {
    fn load(&self) -> Result<TabularDataset, CareerError> {
        if self.is_empty() {
            return Err(CareerError::DataLoad("dataset is empty".to_string()));
        }
        Ok(self.clone())
    }
}
