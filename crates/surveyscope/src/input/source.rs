//! Survey table and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

/// Metadata about the uploaded survey file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path (or upload name) of the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// An ordered sequence of survey rows sharing one header.
///
/// Tables are never mutated after loading; the filter and every later step
/// build derived copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl SurveyTable {
    /// Create a new survey table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Create a table with the same header and the given rows.
    pub fn derive(&self, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Get the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get the index of a column, failing with a schema error naming it.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SurveyError::missing_field(name))
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Get a cell as a category label; missing values yield `None`.
    pub fn label(&self, row: usize, col: usize) -> Option<&str> {
        self.get(row, col)
            .filter(|v| !Self::is_null_value(v))
            .map(str::trim)
    }

    /// Get a cell as a number; missing or non-numeric values yield `None`.
    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        self.label(row, col)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// First `n` rows as a derived table, for previews.
    pub fn head(&self, n: usize) -> Self {
        self.derive(self.rows.iter().take(n).cloned().collect())
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SurveyTable {
        SurveyTable::new(
            vec!["type".to_string(), "score".to_string()],
            vec![
                vec!["학생".to_string(), " 4 ".to_string()],
                vec!["NA".to_string(), "abc".to_string()],
                vec!["교사".to_string(), "".to_string()],
            ],
        )
    }

    #[test]
    fn test_is_null_value() {
        assert!(SurveyTable::is_null_value(""));
        assert!(SurveyTable::is_null_value("  "));
        assert!(SurveyTable::is_null_value("NA"));
        assert!(SurveyTable::is_null_value("n/a"));
        assert!(SurveyTable::is_null_value("NaN"));
        assert!(SurveyTable::is_null_value("null"));
        assert!(SurveyTable::is_null_value("."));
        assert!(!SurveyTable::is_null_value("0"));
        assert!(!SurveyTable::is_null_value("예"));
    }

    #[test]
    fn test_typed_accessors() {
        let t = table();
        assert_eq!(t.label(0, 0), Some("학생"));
        assert_eq!(t.label(1, 0), None);
        assert_eq!(t.number(0, 1), Some(4.0));
        assert_eq!(t.number(1, 1), None);
        assert_eq!(t.number(2, 1), None);
    }

    #[test]
    fn test_require_column_names_missing_field() {
        let err = table().require_column("trust").unwrap_err();
        match err {
            SurveyError::Schema { field } => assert_eq!(field, "trust"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_head_keeps_header() {
        let t = table();
        let head = t.head(2);
        assert_eq!(head.headers, t.headers);
        assert_eq!(head.row_count(), 2);
    }
}
