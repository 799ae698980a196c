//! Surveyscope: survey CSV aggregation and chart selection for questionnaire dashboards.
//!
//! The pipeline runs strictly forward on every interaction: load the survey,
//! keep the respondents whose usage flag matches the affirmative sentinel,
//! aggregate scores by category, select one of seven chart families, and
//! derive the opinion corpus for a word cloud. The current view can be
//! exported as PDF, Excel or PNG.
//!
//! # Example
//!
//! ```no_run
//! use surveyscope::{ChartKind, ChartRequest, Dashboard, FontResolution, SurveyConfig};
//!
//! let dashboard = Dashboard::load(
//!     "survey.csv",
//!     SurveyConfig::default(),
//!     FontResolution::builtin(),
//! )
//! .unwrap();
//!
//! let outcome = dashboard.chart(&ChartRequest::new(ChartKind::Heatmap)).unwrap();
//! if let Some(plot) = outcome.plot() {
//!     println!("{}", plot.title);
//! }
//! ```

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod font;
pub mod input;
pub mod opinion;
pub mod render;
pub mod schema;

mod dashboard;

pub use crate::dashboard::{ChartRequest, Dashboard};
pub use aggregate::{AggregationResult, PivotTable, category_counts, mean_by_category, pivot_mean};
pub use chart::{ChartKind, ChartOutcome, ChartSelector, ChartSpec, Plot};
pub use config::SurveyConfig;
pub use error::{Result, SurveyError};
pub use export::{ExportFormat, ExportMetadata};
pub use filter::filter_affirmative;
pub use font::{FontConfig, FontResolution, FontSource};
pub use input::{Parser, SourceMetadata, SurveyTable};
pub use opinion::{WordCloudConfig, WordCloudRequest, WordFrequencies, extract_corpus};
pub use schema::SurveyFields;
