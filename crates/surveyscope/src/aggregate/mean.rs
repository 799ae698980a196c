//! Mean-by-category and frequency aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::SurveyTable;

/// Category label → scalar (mean score or count).
///
/// Labels are exactly the distinct values of the grouping field that carry
/// at least one usable observation; absent categories are never zero-filled.
/// Entries iterate in label order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Grouping field.
    pub field: String,
    /// Aggregated field (`None` for counts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_field: Option<String>,
    /// Per-category values.
    pub values: BTreeMap<String, f64>,
}

impl AggregationResult {
    /// Number of categories.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no category survived aggregation.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for one category.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.values.get(label).copied()
    }

    /// Category labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// (label, value) pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Running sum and count for one group.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub(crate) fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Mean of `value_field` per distinct `group_field` label.
///
/// Rows with a missing label are dropped; rows with a missing or
/// non-numeric value are excluded from their group's mean rather than
/// counted as zero.
pub fn mean_by_category(
    table: &SurveyTable,
    group_field: &str,
    value_field: &str,
) -> Result<AggregationResult> {
    let group_idx = table.require_column(group_field)?;
    let value_idx = table.require_column(value_field)?;

    let mut groups: BTreeMap<String, MeanAccumulator> = BTreeMap::new();
    for row in 0..table.row_count() {
        let (Some(label), Some(value)) = (table.label(row, group_idx), table.number(row, value_idx))
        else {
            continue;
        };
        groups.entry(label.to_string()).or_default().add(value);
    }

    let values = groups
        .into_iter()
        .filter_map(|(label, acc)| acc.mean().map(|m| (label, m)))
        .collect();

    Ok(AggregationResult {
        field: group_field.to_string(),
        value_field: Some(value_field.to_string()),
        values,
    })
}

/// Frequency of each non-missing label of `field`.
pub fn category_counts(table: &SurveyTable, field: &str) -> Result<AggregationResult> {
    let idx = table.require_column(field)?;

    let mut values: BTreeMap<String, f64> = BTreeMap::new();
    for row in 0..table.row_count() {
        if let Some(label) = table.label(row, idx) {
            *values.entry(label.to_string()).or_insert(0.0) += 1.0;
        }
    }

    Ok(AggregationResult {
        field: field.to_string(),
        value_field: None,
        values,
    })
}
