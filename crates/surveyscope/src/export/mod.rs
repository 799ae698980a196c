//! Exports of the current dashboard view: PDF report, Excel sheet and PNG chart.

mod excel;
mod pdf;
mod png;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chart::ChartKind;
use crate::error::SurveyError;

pub use excel::{SHEET_NAME, write_xlsx, xlsx_bytes};
pub use pdf::{ChartSection, DocumentSummary, pdf_bytes, write_pdf};
pub use png::{png_bytes, write_png};

/// Note written into documents in place of an animated chart.
pub const ANIMATED_CHART_NOTE: &str = "Animated charts are not included in this document.";

/// Note written when the filtered table has no rows.
pub const NO_DATA_NOTE: &str = "No respondents matched the usage filter; no chart was drawn.";

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Xlsx,
    Png,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Png => "png",
        }
    }

    /// MIME type for downloads.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Png => "image/png",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "png" => Ok(ExportFormat::Png),
            other => Err(SurveyError::Export(format!(
                "unknown export format '{}' (expected pdf, xlsx or png)",
                other
            ))),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory written to when no explicit output path is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name without extension.
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
    /// Heading of the PDF report.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_stem: default_file_stem(),
            title: default_title(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_stem() -> String {
    "survey_dashboard".to_string()
}

fn default_title() -> String {
    "Survey Dashboard Report".to_string()
}

impl ExportConfig {
    /// Default output path for a format.
    pub fn output_path(&self, format: ExportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.file_stem, format.extension()))
    }
}

/// What an export describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Selected metric.
    pub metric: String,
    /// Selected chart kind.
    pub chart_kind: ChartKind,
    /// Rows in the uploaded table.
    pub source_rows: usize,
    /// Rows left after the usage filter.
    pub filtered_rows: usize,
    /// When the export was produced.
    pub generated_at: DateTime<Utc>,
}

impl ExportMetadata {
    pub fn new(
        metric: impl Into<String>,
        chart_kind: ChartKind,
        source_rows: usize,
        filtered_rows: usize,
    ) -> Self {
        Self {
            metric: metric.into(),
            chart_kind,
            source_rows,
            filtered_rows,
            generated_at: Utc::now(),
        }
    }

    /// Human-readable lines for report headers.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Metric: {}", self.metric),
            format!("Chart type: {}", self.chart_kind.label()),
            format!(
                "Respondents: {} of {} used the tool",
                self.filtered_rows, self.source_rows
            ),
            format!(
                "Generated: {}",
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_output_path() {
        let config = ExportConfig::default();
        assert_eq!(
            config.output_path(ExportFormat::Xlsx),
            PathBuf::from("./survey_dashboard.xlsx")
        );
    }

    #[test]
    fn test_metadata_lines() {
        let meta = ExportMetadata::new("유용성 점수", ChartKind::Pie, 10, 7);
        let lines = meta.lines();
        assert_eq!(lines[0], "Metric: 유용성 점수");
        assert_eq!(lines[1], "Chart type: Pie chart");
        assert_eq!(lines[2], "Respondents: 7 of 10 used the tool");
    }
}
