//! Per-column summaries shown in the data preview.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::SurveyTable;

/// Maximum distinct labels tracked per column.
const MAX_VALUE_COUNTS: usize = 20;

/// Statistics for numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
}

impl NumericStatistics {
    /// Compute statistics over a set of values. Returns `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let variance = if count > 1 {
            sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64
        } else {
            0.0
        };

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            std: variance.sqrt(),
            median: quantile(&sorted, 0.5),
            q1: quantile(&sorted, 0.25),
            q3: quantile(&sorted, 0.75),
        })
    }

    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whisker bounds at 1.5 IQR, clamped to the observed range.
    pub fn whiskers(&self) -> (f64, f64) {
        let iqr = self.iqr();
        (
            (self.q1 - 1.5 * iqr).max(self.min),
            (self.q3 + 1.5 * iqr).min(self.max),
        )
    }
}

/// Linear-interpolated quantile of sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Summary of a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Column name.
    pub name: String,
    /// Total number of values (including nulls).
    pub count: usize,
    /// Number of null/missing values.
    pub null_count: usize,
    /// Number of unique non-null values.
    pub unique_count: usize,
    /// Label frequencies for low-cardinality columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_counts: Option<IndexMap<String, usize>>,
    /// Numeric statistics when every non-null value parses as a number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericStatistics>,
}

impl ColumnSummary {
    /// Summarize one column of a table.
    pub fn compute(table: &SurveyTable, index: usize) -> Self {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        let mut numbers = Vec::new();
        let mut all_numeric = true;
        let mut null_count = 0;

        for row in 0..table.row_count() {
            match table.label(row, index) {
                None => null_count += 1,
                Some(label) => {
                    *counts.entry(label.to_string()).or_insert(0) += 1;
                    match table.number(row, index) {
                        Some(v) => numbers.push(v),
                        None => all_numeric = false,
                    }
                }
            }
        }

        let numeric = if all_numeric {
            NumericStatistics::from_values(&numbers)
        } else {
            None
        };

        let unique_count = counts.len();
        let value_counts = (numeric.is_none() && unique_count <= MAX_VALUE_COUNTS).then_some(counts);

        Self {
            name: table.headers.get(index).cloned().unwrap_or_default(),
            count: table.row_count(),
            null_count,
            unique_count,
            value_counts,
            numeric,
        }
    }

    /// Summarize every column of a table.
    pub fn compute_all(table: &SurveyTable) -> Vec<Self> {
        (0..table.column_count())
            .map(|i| Self::compute(table, i))
            .collect()
    }

    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.count as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_statistics() {
        let stats = NumericStatistics::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(stats.count, 5);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.whiskers(), (1.0, 5.0));
        assert!(NumericStatistics::from_values(&[]).is_none());
    }

    #[test]
    fn test_column_summary_categorical_and_numeric() {
        let table = SurveyTable::new(
            vec!["감정".to_string(), "점수".to_string()],
            vec![
                vec!["기쁨".to_string(), "4".to_string()],
                vec!["기쁨".to_string(), "".to_string()],
                vec!["불안".to_string(), "2".to_string()],
            ],
        );

        let summaries = ColumnSummary::compute_all(&table);
        let emotion = &summaries[0];
        assert_eq!(emotion.unique_count, 2);
        assert_eq!(emotion.value_counts.as_ref().unwrap()["기쁨"], 2);
        assert!(emotion.numeric.is_none());

        let score = &summaries[1];
        assert_eq!(score.null_count, 1);
        assert_eq!(score.numeric.as_ref().unwrap().mean, 3.0);
        assert!((score.null_percentage() - 33.333).abs() < 0.01);
    }
}
