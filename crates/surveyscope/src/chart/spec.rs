//! Declarative chart descriptions handed to the rendering collaborators.

use serde::{Deserialize, Serialize};

use super::kind::ChartKind;
use crate::aggregate::{AggregationResult, HierarchyNode, PivotTable};
use crate::input::SurveyTable;

/// One chart family together with the field names it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChartSpec {
    /// Mean of `value` per `category`, optionally split into bars per `group`.
    #[serde(rename = "bar")]
    GroupedBar {
        category: String,
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group: Option<String>,
    },
    /// Share of each `names` label.
    Pie { names: String },
    /// Distribution of `value` per `category`.
    Box { category: String, value: String },
    /// Distribution of `value`, optionally colored by a category.
    Histogram {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    /// Mean of `value` per (`rows`, `columns`) pair.
    Heatmap {
        rows: String,
        columns: String,
        value: String,
    },
    /// Nested counts along `path`.
    Treemap { path: Vec<String> },
    /// Bars of `value` per `category`, one frame per `frame` label.
    AnimatedBar {
        category: String,
        value: String,
        frame: String,
    },
}

impl ChartSpec {
    /// The chart family of this spec.
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::GroupedBar { .. } => ChartKind::GroupedBar,
            ChartSpec::Pie { .. } => ChartKind::Pie,
            ChartSpec::Box { .. } => ChartKind::Box,
            ChartSpec::Histogram { .. } => ChartKind::Histogram,
            ChartSpec::Heatmap { .. } => ChartKind::Heatmap,
            ChartSpec::Treemap { .. } => ChartKind::Treemap,
            ChartSpec::AnimatedBar { .. } => ChartKind::AnimatedBar,
        }
    }

    /// Every field the chart reads.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ChartSpec::GroupedBar {
                category,
                value,
                group,
            } => {
                let mut fields = vec![category.as_str(), value.as_str()];
                fields.extend(group.as_deref());
                fields
            }
            ChartSpec::Pie { names } => vec![names.as_str()],
            ChartSpec::Box { category, value } => vec![category.as_str(), value.as_str()],
            ChartSpec::Histogram { value, color } => {
                let mut fields = vec![value.as_str()];
                fields.extend(color.as_deref());
                fields
            }
            ChartSpec::Heatmap {
                rows,
                columns,
                value,
            } => vec![rows.as_str(), columns.as_str(), value.as_str()],
            ChartSpec::Treemap { path } => path.iter().map(String::as_str).collect(),
            ChartSpec::AnimatedBar {
                category,
                value,
                frame,
            } => vec![category.as_str(), value.as_str(), frame.as_str()],
        }
    }

    /// Numeric field the chart plots, if any.
    pub fn value_field(&self) -> Option<&str> {
        match self {
            ChartSpec::GroupedBar { value, .. }
            | ChartSpec::Box { value, .. }
            | ChartSpec::Histogram { value, .. }
            | ChartSpec::Heatmap { value, .. }
            | ChartSpec::AnimatedBar { value, .. } => Some(value.as_str()),
            ChartSpec::Pie { .. } | ChartSpec::Treemap { .. } => None,
        }
    }

    /// Default chart title.
    pub fn title(&self) -> String {
        match self {
            ChartSpec::GroupedBar {
                category,
                value,
                group: None,
            } => format!("Average {} by {}", value, category),
            ChartSpec::GroupedBar {
                category,
                value,
                group: Some(group),
            } => format!("Average {} by {} and {}", value, category, group),
            ChartSpec::Pie { names } => format!("Distribution of {}", names),
            ChartSpec::Box { category, value } => format!("{} distribution by {}", value, category),
            ChartSpec::Histogram { value, .. } => format!("Distribution of {}", value),
            ChartSpec::Heatmap {
                rows,
                columns,
                value,
            } => format!("Average {} by {} and {}", value, rows, columns),
            ChartSpec::Treemap { path } => format!("{} breakdown", path.join(" / ")),
            ChartSpec::AnimatedBar {
                category,
                value,
                frame,
            } => format!("{} by {} across {}", value, category, frame),
        }
    }
}

/// Chart input prepared by the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ChartData {
    /// Mean per category.
    Means(AggregationResult),
    /// Mean per (category, group) pair.
    GroupedMeans(PivotTable),
    /// Frequency per category.
    Counts(AggregationResult),
    /// Mean per (row, column) pair.
    Pivot(PivotTable),
    /// Nested counts.
    Hierarchy(Vec<HierarchyNode>),
    /// Filtered rows, unaggregated.
    Rows(SurveyTable),
}

/// Axis margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            l: 30,
            r: 30,
            t: 50,
            b: 30,
        }
    }
}

/// Layout configuration applied to every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// X-axis tick label angle in degrees.
    #[serde(default)]
    pub tick_angle: i32,
    /// Axis tick font size.
    #[serde(default = "default_axis_font_size")]
    pub axis_font_size: u32,
    /// Raster width for static exports.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Raster height for static exports.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Plot margins.
    #[serde(default)]
    pub margin: Margin,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            tick_angle: 0,
            axis_font_size: default_axis_font_size(),
            width: default_width(),
            height: default_height(),
            margin: Margin::default(),
        }
    }
}

fn default_axis_font_size() -> u32 {
    14
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    500
}

/// A chart ready for rendering: exactly one spec per rendering pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    /// Chart title.
    pub title: String,
    /// Chart description.
    pub spec: ChartSpec,
    /// Prepared input.
    pub data: ChartData,
    /// Layout defaults.
    pub layout: Layout,
}

impl Plot {
    /// The chart family.
    pub fn kind(&self) -> ChartKind {
        self.spec.kind()
    }
}

/// Outcome of chart selection.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// A chart to render.
    Plot(Box<Plot>),
    /// The filtered table is empty; nothing should be rendered.
    NoData,
}

impl ChartOutcome {
    /// The plot, if there is one.
    pub fn plot(&self) -> Option<&Plot> {
        match self {
            ChartOutcome::Plot(plot) => Some(plot),
            ChartOutcome::NoData => None,
        }
    }

    /// Consume into the plot, if there is one.
    pub fn into_plot(self) -> Option<Plot> {
        match self {
            ChartOutcome::Plot(plot) => Some(*plot),
            ChartOutcome::NoData => None,
        }
    }

    /// Whether the selector signalled "no data to plot".
    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartOutcome::NoData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_and_kind() {
        let spec = ChartSpec::GroupedBar {
            category: "사용자 유형".to_string(),
            value: "유용성 점수".to_string(),
            group: Some("감정".to_string()),
        };
        assert_eq!(spec.kind(), ChartKind::GroupedBar);
        assert_eq!(spec.fields(), vec!["사용자 유형", "유용성 점수", "감정"]);
        assert_eq!(spec.value_field(), Some("유용성 점수"));
    }

    #[test]
    fn test_titles() {
        let bar = ChartSpec::GroupedBar {
            category: "type".to_string(),
            value: "trust".to_string(),
            group: None,
        };
        assert_eq!(bar.title(), "Average trust by type");

        let pie = ChartSpec::Pie {
            names: "emotion".to_string(),
        };
        assert_eq!(pie.title(), "Distribution of emotion");
        assert_eq!(pie.value_field(), None);
    }

    #[test]
    fn test_spec_serializes_with_tag() {
        let spec = ChartSpec::Heatmap {
            rows: "a".to_string(),
            columns: "b".to_string(),
            value: "c".to_string(),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["type"], "heatmap");
        assert_eq!(json["rows"], "a");
    }

    #[test]
    fn test_layout_defaults() {
        let layout = Layout::default();
        assert_eq!(layout.tick_angle, 0);
        assert_eq!(layout.axis_font_size, 14);
        assert_eq!(layout.margin, Margin { l: 30, r: 30, t: 50, b: 30 });
    }
}
