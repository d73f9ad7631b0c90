//! In-memory tabular data backed by CSV files.
//!
//! Cells are kept as text; numeric interpretation happens only where a score
//! is actually consumed.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::debug;

/// Join/merge key shared by every dataset in the pipeline.
pub const KEY_COLUMN: &str = "Time (s)";

/// Name of the per-record score column added by the annotator.
pub const SCORE_COLUMN: &str = "Score";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("column '{column}' not found (available: {available})")]
    MissingColumn { column: String, available: String },

    #[error("value '{value}' in column '{column}' is not numeric")]
    InvalidNumber { column: String, value: String },

    #[error("no input tables to merge")]
    EmptyInput,
}

/// An ordered collection of rows under a named header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads a whole CSV file (header row required) into memory.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut rdr = csv::Reader::from_reader(file);

        let columns: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.with_context(|| format!("reading {}", path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(path = %path.display(), rows = rows.len(), "Table loaded");
        Ok(Table { columns, rows })
    }

    /// Writes the table as CSV, overwriting any existing file.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer =
            csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;

        debug!(path = %path.display(), rows = self.rows.len(), "Table written");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column, or a schema error listing what exists.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::MissingColumn {
                column: name.to_string(),
                available: self.columns.join(", "),
            })
    }

    /// Projection onto the named columns, preserving row order.
    pub fn select(&self, names: &[&str]) -> Result<Table, TableError> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<Result<Vec<_>, _>>()?;

        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(Table {
            columns: names.iter().map(|n| n.to_string()).collect(),
            rows,
        })
    }
}

/// Parses a score cell. An empty cell counts as zero, matching the hole an
/// outer join leaves for a key absent from one side.
pub fn parse_score(column: &str, value: &str) -> Result<f64, TableError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed.parse().map_err(|_| TableError::InvalidNumber {
        column: column.to_string(),
        value: value.to_string(),
    })
}

/// Renders a score without a trailing `.0` when it is integral.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        score.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn sample_table() -> Table {
        Table {
            columns: vec![KEY_COLUMN.to_string(), "Voltage".to_string()],
            rows: vec![
                vec!["1.5".to_string(), "3.3".to_string()],
                vec!["2.0".to_string(), "5.0".to_string()],
            ],
        }
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let path = temp_path("telemetry_scorer_test_roundtrip.csv");
        let _ = fs::remove_file(&path);

        let table = sample_table();
        table.write_csv(&path).unwrap();
        let loaded = Table::read_csv(&path).unwrap();

        assert_eq!(loaded, table);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_missing_file_fails() {
        let path = temp_path("telemetry_scorer_test_does_not_exist.csv");
        let _ = fs::remove_file(&path);

        assert!(Table::read_csv(&path).is_err());
    }

    #[test]
    fn test_column_index_found_and_missing() {
        let table = sample_table();

        assert_eq!(table.column_index(KEY_COLUMN).unwrap(), 0);
        assert_eq!(table.column_index("Voltage").unwrap(), 1);

        let err = table.column_index("Score").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { .. }));
        assert!(err.to_string().contains("Score"));
    }

    #[test]
    fn test_select_preserves_row_order() {
        let table = sample_table();
        let selected = table.select(&[KEY_COLUMN]).unwrap();

        assert_eq!(selected.columns, vec![KEY_COLUMN.to_string()]);
        assert_eq!(selected.rows, vec![vec!["1.5".to_string()], vec!["2.0".to_string()]]);
    }

    #[test]
    fn test_select_missing_column_fails() {
        let table = sample_table();
        assert!(table.select(&["Latitude"]).is_err());
    }

    #[test]
    fn test_parse_score_empty_is_zero() {
        assert_eq!(parse_score(SCORE_COLUMN, "").unwrap(), 0.0);
        assert_eq!(parse_score(SCORE_COLUMN, "  ").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_score_values() {
        assert_eq!(parse_score(SCORE_COLUMN, "9").unwrap(), 9.0);
        assert_eq!(parse_score(SCORE_COLUMN, "2.5").unwrap(), 2.5);
        assert!(parse_score(SCORE_COLUMN, "n/a").is_err());
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(9.0), "9");
        assert_eq!(format_score(12.0), "12");
        assert_eq!(format_score(2.5), "2.5");
    }
}
