//! Raw value distributions for box plots and histograms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::SurveyTable;

/// Usable values of `value_field` grouped by `group_field` label.
///
/// Same exclusion rules as the mean aggregation: rows with a missing label
/// or a missing/non-numeric value are skipped.
pub fn values_by_category(
    table: &SurveyTable,
    group_field: &str,
    value_field: &str,
) -> Result<BTreeMap<String, Vec<f64>>> {
    let group_idx = table.require_column(group_field)?;
    let value_idx = table.require_column(value_field)?;

    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in 0..table.row_count() {
        let (Some(label), Some(value)) = (table.label(row, group_idx), table.number(row, value_idx))
        else {
            continue;
        };
        groups.entry(label.to_string()).or_default().push(value);
    }

    Ok(groups)
}

/// Equal-width bins shared by every series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, one more than the number of bins.
    pub edges: Vec<f64>,
    /// Per-series counts, one per bin.
    pub series: BTreeMap<String, Vec<usize>>,
}

impl Histogram {
    /// Bin grouped values into `bins` equal-width bins over their combined range.
    pub fn from_groups(groups: &BTreeMap<String, Vec<f64>>, bins: usize) -> Self {
        let bins = bins.max(1);
        let (min, max) = groups
            .values()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if !min.is_finite() {
            return Self {
                edges: Vec::new(),
                series: BTreeMap::new(),
            };
        }

        // A constant column still gets one visible bin
        let (min, max) = if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (max - min) / bins as f64;
        let edges = (0..=bins).map(|i| min + width * i as f64).collect();

        let series = groups
            .iter()
            .map(|(label, values)| {
                let mut counts = vec![0usize; bins];
                for &v in values {
                    let idx = (((v - min) / width) as usize).min(bins - 1);
                    counts[idx] += 1;
                }
                (label.clone(), counts)
            })
            .collect();

        Self { edges, series }
    }

    /// Number of bins.
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    /// Largest stacked bin height.
    pub fn max_stacked(&self) -> usize {
        (0..self.bin_count())
            .map(|i| self.series.values().map(|c| c[i]).sum::<usize>())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SurveyTable {
        SurveyTable::new(
            vec!["type".to_string(), "score".to_string()],
            [("학생", "1"), ("학생", "5"), ("교사", "3"), ("", "4"), ("교사", "x")]
                .iter()
                .map(|(a, b)| vec![a.to_string(), b.to_string()])
                .collect(),
        )
    }

    #[test]
    fn test_values_by_category() {
        let groups = values_by_category(&table(), "type", "score").unwrap();
        assert_eq!(groups["학생"], vec![1.0, 5.0]);
        assert_eq!(groups["교사"], vec![3.0]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let groups = values_by_category(&table(), "type", "score").unwrap();
        let hist = Histogram::from_groups(&groups, 4);

        assert_eq!(hist.bin_count(), 4);
        assert_eq!(hist.edges[0], 1.0);
        assert_eq!(hist.edges[4], 5.0);
        let total: usize = hist.series.values().flatten().sum();
        assert_eq!(total, 3);
        // The maximum lands in the last bin
        assert_eq!(hist.series["학생"][3], 1);
    }

    #[test]
    fn test_constant_values_get_one_wide_bin() {
        let mut groups = BTreeMap::new();
        groups.insert("a".to_string(), vec![2.0, 2.0]);
        let hist = Histogram::from_groups(&groups, 1);
        assert_eq!(hist.edges, vec![1.5, 2.5]);
        assert_eq!(hist.max_stacked(), 2);
    }

    #[test]
    fn test_no_values_no_bins() {
        let hist = Histogram::from_groups(&BTreeMap::new(), 10);
        assert_eq!(hist.bin_count(), 0);
        assert_eq!(hist.max_stacked(), 0);
    }
}
