// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Loads a labelled CSV file using the csv crate.
//
// Expected layout (header row required):
//
//   Skill1,Skill2,…,Skill17,Personality1,…,Personality9,Role
//   0.83,0.50,…,0.67,0.60,…,0.60,Data Scientist
//
// The "Role" column holds the career label and may appear
// anywhere in the header; every other column becomes a
// feature column. Values are parsed into Cell::Number when
// they look numeric and kept as Cell::Text otherwise.
//
// Any failure — missing file, malformed CSV, no Role column,
// no rows — is reported as CareerError::DataLoad.
//
// Reference: csv crate documentation

use std::path::{Path, PathBuf};

use crate::data::dataset::{Cell, TabularDataset, TrainingExample};
use crate::domain::error::CareerError;
use crate::domain::traits::DatasetSource;

/// Name of the label column
pub const LABEL_COLUMN: &str = "Role";

/// Loads a labelled dataset from one CSV file.
pub struct CsvLoader {
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for CsvLoader {
    fn load(&self) -> Result<TabularDataset, CareerError> {
        let shown   = self.path.display().to_string();
        let fail    = |msg: String| CareerError::DataLoad(format!("'{shown}': {msg}"));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| fail(e.to_string()))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| fail(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let label_idx = headers
            .iter()
            .position(|h| h == LABEL_COLUMN)
            .ok_or_else(|| fail(format!("no '{LABEL_COLUMN}' column")))?;

        let feature_columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != label_idx)
            .map(|(_, h)| h.clone())
            .collect();

        let mut dataset = TabularDataset::new(feature_columns);

        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| fail(format!("record {}: {e}", line + 1)))?;

            let role = record
                .get(label_idx)
                .filter(|r| !r.is_empty())
                .ok_or_else(|| fail(format!("record {} has no role", line + 1)))?
                .to_string();

            let cells: Vec<Cell> = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != label_idx)
                .map(|(_, raw)| Cell::parse(raw))
                .collect();

            dataset.push(TrainingExample::new(cells, role))?;
        }

        if dataset.is_empty() {
            return Err(fail("file has a header but no rows".to_string()));
        }

        tracing::info!(
            "Loaded {} rows × {} columns from '{}'",
            dataset.len(),
            dataset.columns().len(),
            shown
        );
        Ok(dataset)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_loads_role_column_anywhere() {
        let f  = write_csv("Skill1,Role,Skill2\n0.5,Web Developer,0.25\n0.75,Data Scientist,1\n");
        let ds = CsvLoader::new(f.path()).load().unwrap();
        assert_eq!(ds.columns(), &["Skill1".to_string(), "Skill2".to_string()]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].role, "Web Developer");
        assert_eq!(ds.rows()[1].cells[1], Cell::Number(1.0));
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let err = CsvLoader::new("does/not/exist.csv").load().unwrap_err();
        assert!(matches!(err, CareerError::DataLoad(_)));
    }

    #[test]
    fn test_missing_role_column_rejected() {
        let f = write_csv("Skill1,Skill2\n0.1,0.2\n");
        assert!(CsvLoader::new(f.path()).load().is_err());
    }

    #[test]
    fn test_header_only_rejected() {
        let f = write_csv("Skill1,Role\n");
        assert!(CsvLoader::new(f.path()).load().is_err());
    }
}
