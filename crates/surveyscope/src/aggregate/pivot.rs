//! Two-way pivot mean for heatmaps and grouped bars.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::mean::MeanAccumulator;
use crate::error::Result;
use crate::input::SurveyTable;

/// Mean of a numeric field per (row label, column label) pair.
///
/// Pairs with no observation are `None` and must render as a gap, never as
/// zero. Row and column labels are sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Field supplying row labels.
    pub row_field: String,
    /// Field supplying column labels.
    pub column_field: String,
    /// Aggregated numeric field.
    pub value_field: String,
    /// Row labels.
    pub rows: Vec<String>,
    /// Column labels.
    pub columns: Vec<String>,
    /// Cells, row-major: `cells[r][c]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    /// Cell value for a pair of labels.
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|l| l == row)?;
        let c = self.columns.iter().position(|l| l == column)?;
        self.cells[r][c]
    }

    /// Whether the table has no labels at all.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Number of cells without observations.
    pub fn gap_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_none()).count()
    }

    /// Swap the row and column axes.
    pub fn transpose(&self) -> Self {
        let cells = (0..self.columns.len())
            .map(|c| self.cells.iter().map(|row| row[c]).collect())
            .collect();

        Self {
            row_field: self.column_field.clone(),
            column_field: self.row_field.clone(),
            value_field: self.value_field.clone(),
            rows: self.columns.clone(),
            columns: self.rows.clone(),
            cells,
        }
    }

    /// Range of defined cell values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Pivot `value_field` by `row_field` × `column_field`, averaging each pair.
pub fn pivot_mean(
    table: &SurveyTable,
    row_field: &str,
    column_field: &str,
    value_field: &str,
) -> Result<PivotTable> {
    let row_idx = table.require_column(row_field)?;
    let col_idx = table.require_column(column_field)?;
    let value_idx = table.require_column(value_field)?;

    let mut groups: BTreeMap<(String, String), MeanAccumulator> = BTreeMap::new();
    let mut row_labels = BTreeSet::new();
    let mut col_labels = BTreeSet::new();

    for row in 0..table.row_count() {
        let (Some(r), Some(c), Some(v)) = (
            table.label(row, row_idx),
            table.label(row, col_idx),
            table.number(row, value_idx),
        ) else {
            continue;
        };
        row_labels.insert(r.to_string());
        col_labels.insert(c.to_string());
        groups
            .entry((r.to_string(), c.to_string()))
            .or_default()
            .add(v);
    }

    let rows: Vec<String> = row_labels.into_iter().collect();
    let columns: Vec<String> = col_labels.into_iter().collect();
    let cells = rows
        .iter()
        .map(|r| {
            columns
                .iter()
                .map(|c| {
                    groups
                        .get(&(r.clone(), c.clone()))
                        .and_then(MeanAccumulator::mean)
                })
                .collect()
        })
        .collect();

    Ok(PivotTable {
        row_field: row_field.to_string(),
        column_field: column_field.to_string(),
        value_field: value_field.to_string(),
        rows,
        columns,
        cells,
    })
}
