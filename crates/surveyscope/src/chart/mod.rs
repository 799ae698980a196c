//! Chart selection and declarative chart descriptions.

mod kind;
mod selector;
mod spec;

pub use kind::ChartKind;
pub use selector::{Aggregation, CHART_TABLE, ChartEntry, ChartSelector, SpecContext, entry};
pub use spec::{ChartData, ChartOutcome, ChartSpec, Layout, Margin, Plot};
