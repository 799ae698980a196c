//! Aggregations over filtered survey rows.

mod distribution;
mod hierarchy;
mod mean;
mod pivot;

pub use distribution::{Histogram, values_by_category};
pub use hierarchy::{HierarchyNode, hierarchy_counts};
pub use mean::{AggregationResult, category_counts, mean_by_category};
pub use pivot::{PivotTable, pivot_mean};
