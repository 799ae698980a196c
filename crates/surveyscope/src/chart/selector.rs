//! Chart selection: chart kind + filtered rows → declarative chart.
//!
//! Dispatch is a closed table keyed by [`ChartKind`]. Each entry names the
//! aggregation its chart needs, builds the [`ChartSpec`] from the configured
//! field bindings, and prepares the chart input. Adding a chart kind means
//! adding a row to [`CHART_TABLE`].

use tracing::debug;

use super::kind::ChartKind;
use super::spec::{ChartData, ChartOutcome, ChartSpec, Layout, Plot};
use crate::aggregate::{category_counts, hierarchy_counts, mean_by_category, pivot_mean};
use crate::error::{Result, SurveyError};
use crate::input::SurveyTable;
use crate::schema::SurveyFields;

/// Aggregation a chart family needs before rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Mean of the metric per category.
    MeanByCategory,
    /// Frequency per category.
    CategoryCounts,
    /// Mean of the metric per pair of categories.
    PivotMean,
    /// Counts along a path of categories.
    HierarchyCounts,
    /// Raw filtered rows.
    None,
}

/// Inputs for building a chart spec.
#[derive(Debug, Clone, Copy)]
pub struct SpecContext<'a> {
    /// Field bindings.
    pub fields: &'a SurveyFields,
    /// Selected metric (numeric score column).
    pub metric: &'a str,
    /// Field driving animation frames.
    pub frame: &'a str,
    /// Optional second grouping for bar charts.
    pub bar_group: Option<&'a str>,
}

/// One row of the dispatch table.
pub struct ChartEntry {
    pub kind: ChartKind,
    pub aggregation: Aggregation,
    build: fn(&SpecContext<'_>) -> ChartSpec,
    prepare: fn(&ChartSpec, &SurveyTable) -> Result<ChartData>,
}

impl ChartEntry {
    /// Build the spec for this chart family.
    pub fn build(&self, ctx: &SpecContext<'_>) -> ChartSpec {
        (self.build)(ctx)
    }

    /// Prepare the chart input from filtered rows.
    pub fn prepare(&self, spec: &ChartSpec, table: &SurveyTable) -> Result<ChartData> {
        (self.prepare)(spec, table)
    }
}

/// Dispatch table: chart kind → (aggregation, spec builder, input preparation).
pub static CHART_TABLE: [ChartEntry; 7] = [
    ChartEntry {
        kind: ChartKind::GroupedBar,
        aggregation: Aggregation::MeanByCategory,
        build: |ctx| ChartSpec::GroupedBar {
            category: ctx.fields.user_type.clone(),
            value: ctx.metric.to_string(),
            group: ctx.bar_group.map(str::to_string),
        },
        prepare: prepare_grouped_bar,
    },
    ChartEntry {
        kind: ChartKind::Pie,
        aggregation: Aggregation::CategoryCounts,
        build: |ctx| ChartSpec::Pie {
            names: ctx.fields.emotion.clone(),
        },
        prepare: prepare_pie,
    },
    ChartEntry {
        kind: ChartKind::Box,
        aggregation: Aggregation::None,
        build: |ctx| ChartSpec::Box {
            category: ctx.fields.user_type.clone(),
            value: ctx.metric.to_string(),
        },
        prepare: prepare_rows,
    },
    ChartEntry {
        kind: ChartKind::Histogram,
        aggregation: Aggregation::None,
        build: |ctx| ChartSpec::Histogram {
            value: ctx.metric.to_string(),
            color: Some(ctx.fields.user_type.clone()),
        },
        prepare: prepare_rows,
    },
    ChartEntry {
        kind: ChartKind::Heatmap,
        aggregation: Aggregation::PivotMean,
        build: |ctx| ChartSpec::Heatmap {
            rows: ctx.fields.user_type.clone(),
            columns: ctx.fields.emotion.clone(),
            value: ctx.metric.to_string(),
        },
        prepare: prepare_heatmap,
    },
    ChartEntry {
        kind: ChartKind::Treemap,
        aggregation: Aggregation::HierarchyCounts,
        build: |ctx| ChartSpec::Treemap {
            path: vec![ctx.fields.user_type.clone(), ctx.fields.emotion.clone()],
        },
        prepare: prepare_treemap,
    },
    ChartEntry {
        kind: ChartKind::AnimatedBar,
        aggregation: Aggregation::None,
        build: |ctx| ChartSpec::AnimatedBar {
            category: ctx.fields.user_type.clone(),
            value: ctx.metric.to_string(),
            frame: ctx.frame.to_string(),
        },
        prepare: prepare_rows,
    },
];

/// Look up the dispatch entry for a chart kind.
pub fn entry(kind: ChartKind) -> &'static ChartEntry {
    CHART_TABLE
        .iter()
        .find(|e| e.kind == kind)
        .unwrap_or_else(|| unreachable!("every ChartKind has a dispatch entry"))
}

fn prepare_grouped_bar(spec: &ChartSpec, table: &SurveyTable) -> Result<ChartData> {
    match spec {
        ChartSpec::GroupedBar {
            category,
            value,
            group: Some(group),
        } => pivot_mean(table, category, group, value).map(ChartData::GroupedMeans),
        ChartSpec::GroupedBar {
            category, value, ..
        } => mean_by_category(table, category, value).map(ChartData::Means),
        other => Err(mismatch(other)),
    }
}

fn prepare_pie(spec: &ChartSpec, table: &SurveyTable) -> Result<ChartData> {
    match spec {
        ChartSpec::Pie { names } => category_counts(table, names).map(ChartData::Counts),
        other => Err(mismatch(other)),
    }
}

fn prepare_heatmap(spec: &ChartSpec, table: &SurveyTable) -> Result<ChartData> {
    match spec {
        ChartSpec::Heatmap {
            rows,
            columns,
            value,
        } => pivot_mean(table, rows, columns, value).map(ChartData::Pivot),
        other => Err(mismatch(other)),
    }
}

fn prepare_treemap(spec: &ChartSpec, table: &SurveyTable) -> Result<ChartData> {
    match spec {
        ChartSpec::Treemap { path } => hierarchy_counts(table, path).map(ChartData::Hierarchy),
        other => Err(mismatch(other)),
    }
}

fn prepare_rows(_spec: &ChartSpec, table: &SurveyTable) -> Result<ChartData> {
    Ok(ChartData::Rows(table.clone()))
}

fn mismatch(spec: &ChartSpec) -> SurveyError {
    SurveyError::Render(format!(
        "chart spec '{}' routed to the wrong preparation step",
        spec.kind()
    ))
}

/// Selects and prepares charts for a set of field bindings.
pub struct ChartSelector<'a> {
    fields: &'a SurveyFields,
    layout: Layout,
    bar_group: Option<String>,
}

impl<'a> ChartSelector<'a> {
    /// Create a selector with default layout.
    pub fn new(fields: &'a SurveyFields) -> Self {
        Self {
            fields,
            layout: Layout::default(),
            bar_group: None,
        }
    }

    /// Use a custom layout.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Split bar charts into one bar per label of `group`.
    pub fn with_bar_group(mut self, group: impl Into<String>) -> Self {
        self.bar_group = Some(group.into());
        self
    }

    /// Build the spec for a chart kind without preparing data.
    pub fn spec(&self, kind: ChartKind, filtered: &SurveyTable, metric: &str) -> ChartSpec {
        let ctx = SpecContext {
            fields: self.fields,
            metric,
            frame: self.fields.animation_field(filtered),
            bar_group: self.bar_group.as_deref(),
        };
        entry(kind).build(&ctx)
    }

    /// Select a chart for already-filtered rows.
    ///
    /// Fails with a schema error when any field the chart reads is absent.
    /// Returns [`ChartOutcome::NoData`] when the filtered table is empty, in
    /// which case nothing is aggregated or rendered.
    pub fn select(
        &self,
        kind: ChartKind,
        filtered: &SurveyTable,
        metric: &str,
    ) -> Result<ChartOutcome> {
        let entry = entry(kind);
        let spec = self.spec(kind, filtered, metric);

        if let Some(missing) = spec.fields().into_iter().find(|f| !filtered.has_column(f)) {
            return Err(SurveyError::missing_field(missing));
        }

        if filtered.is_empty() {
            debug!(chart = %kind, "no rows to plot");
            return Ok(ChartOutcome::NoData);
        }

        let data = entry.prepare(&spec, filtered)?;
        debug!(chart = %kind, aggregation = ?entry.aggregation, "prepared chart");

        Ok(ChartOutcome::Plot(Box::new(Plot {
            title: spec.title(),
            spec,
            data,
            layout: self.layout.clone(),
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filtered() -> SurveyTable {
        let headers = ["사용 여부", "사용자 유형", "감정", "사용 빈도", "유용성 점수", "신뢰도 점수"];
        let rows = [
            ["예", "학생", "기쁨", "매일", "4", "3"],
            ["예", "교사", "불안", "가끔", "5", "4"],
            ["예", "학생", "불안", "매일", "2", ""],
        ];
        SurveyTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_every_kind_has_one_entry() {
        for kind in ChartKind::ALL {
            assert_eq!(CHART_TABLE.iter().filter(|e| e.kind == kind).count(), 1);
        }
    }

    #[test]
    fn test_aggregation_per_kind() {
        assert_eq!(entry(ChartKind::GroupedBar).aggregation, Aggregation::MeanByCategory);
        assert_eq!(entry(ChartKind::Pie).aggregation, Aggregation::CategoryCounts);
        assert_eq!(entry(ChartKind::Box).aggregation, Aggregation::None);
        assert_eq!(entry(ChartKind::Histogram).aggregation, Aggregation::None);
        assert_eq!(entry(ChartKind::Heatmap).aggregation, Aggregation::PivotMean);
        assert_eq!(entry(ChartKind::AnimatedBar).aggregation, Aggregation::None);
    }

    #[test]
    fn test_bar_uses_mean_by_category() {
        let fields = SurveyFields::default();
        let selector = ChartSelector::new(&fields);
        let outcome = selector
            .select(ChartKind::GroupedBar, &filtered(), "유용성 점수")
            .unwrap();

        let plot = outcome.plot().unwrap();
        match &plot.data {
            ChartData::Means(means) => {
                assert_eq!(means.get("학생"), Some(3.0));
                assert_eq!(means.get("교사"), Some(5.0));
            }
            other => panic!("expected means, got {other:?}"),
        }
        assert_eq!(plot.title, "Average 유용성 점수 by 사용자 유형");
    }

    #[test]
    fn test_bar_group_uses_pivot() {
        let fields = SurveyFields::default();
        let selector = ChartSelector::new(&fields).with_bar_group("감정");
        let plot = selector
            .select(ChartKind::GroupedBar, &filtered(), "유용성 점수")
            .unwrap()
            .into_plot()
            .unwrap();

        assert!(matches!(plot.data, ChartData::GroupedMeans(ref p) if p.get("교사", "기쁨").is_none()));
    }

    #[test]
    fn test_raw_charts_keep_rows() {
        let fields = SurveyFields::default();
        let selector = ChartSelector::new(&fields);
        for kind in [ChartKind::Box, ChartKind::Histogram, ChartKind::AnimatedBar] {
            let plot = selector
                .select(kind, &filtered(), "유용성 점수")
                .unwrap()
                .into_plot()
                .unwrap();
            assert!(matches!(plot.data, ChartData::Rows(ref t) if t.row_count() == 3));
        }
    }

    #[test]
    fn test_animated_bar_frames_fall_back_to_usage_frequency() {
        let fields = SurveyFields::default();
        let spec = ChartSelector::new(&fields).spec(ChartKind::AnimatedBar, &filtered(), "유용성 점수");
        assert!(matches!(spec, ChartSpec::AnimatedBar { ref frame, .. } if frame == "사용 빈도"));
    }

    #[test]
    fn test_empty_table_is_no_data() {
        let fields = SurveyFields::default();
        let empty = filtered().derive(Vec::new());
        for kind in ChartKind::ALL {
            let outcome = ChartSelector::new(&fields)
                .select(kind, &empty, "유용성 점수")
                .unwrap();
            assert!(outcome.is_no_data());
        }
    }

    #[test]
    fn test_missing_metric_is_schema_error() {
        let fields = SurveyFields::default();
        let err = ChartSelector::new(&fields)
            .select(ChartKind::Box, &filtered(), "만족도 점수")
            .unwrap_err();
        assert!(matches!(err, SurveyError::Schema { ref field } if field == "만족도 점수"));
    }
}
