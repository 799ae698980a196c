//! Survey field bindings and column summaries.

mod column;
mod fields;

pub use column::{ColumnSummary, NumericStatistics};
pub use fields::{FieldReport, FieldRole, SurveyFields};
