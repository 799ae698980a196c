//! Error types for the surveyscope library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for surveyscope operations.
///
/// Every failure is scoped to the interaction that triggered it; nothing in
/// the pipeline is fatal to a dashboard session.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid delimiter detected or specified.
    #[error("Invalid delimiter: {0}")]
    InvalidDelimiter(String),

    /// A required field is absent from the table schema.
    #[error("Schema error: required field '{field}' is not present in the table")]
    Schema { field: String },

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A font download or other external resource failed.
    #[error("External resource error: {0}")]
    ExternalResource(String),

    /// The chart or word-cloud renderer failed.
    #[error("Render error: {0}")]
    Render(String),

    /// Writing a PDF, spreadsheet or image failed.
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SurveyError {
    /// Build a schema error for a missing field.
    pub fn missing_field(field: impl Into<String>) -> Self {
        SurveyError::Schema {
            field: field.into(),
        }
    }

    /// Whether this error should be shown as an informational notice rather
    /// than a failure.
    pub fn is_informational(&self) -> bool {
        matches!(self, SurveyError::EmptyData(_))
    }
}

/// Result type alias for surveyscope operations.
pub type Result<T> = std::result::Result<T, SurveyError>;
