//! Chart families offered by the dashboard.

use serde::{Deserialize, Serialize};

/// Discriminator selecting which chart family to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Mean score per category.
    #[serde(rename = "bar")]
    GroupedBar,
    /// Category share.
    Pie,
    /// Score distribution per category.
    Box,
    /// Score distribution.
    Histogram,
    /// Mean score per pair of categories.
    Heatmap,
    /// Nested category counts.
    Treemap,
    /// Bars faceted into animation frames.
    AnimatedBar,
}

impl ChartKind {
    /// Every chart kind, in menu order.
    pub const ALL: [ChartKind; 7] = [
        ChartKind::GroupedBar,
        ChartKind::Pie,
        ChartKind::Box,
        ChartKind::Histogram,
        ChartKind::Heatmap,
        ChartKind::Treemap,
        ChartKind::AnimatedBar,
    ];

    /// Stable tag used on the command line and in URLs.
    pub fn tag(&self) -> &'static str {
        match self {
            ChartKind::GroupedBar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Box => "box",
            ChartKind::Histogram => "histogram",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Treemap => "treemap",
            ChartKind::AnimatedBar => "animated-bar",
        }
    }

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::GroupedBar => "Bar chart",
            ChartKind::Pie => "Pie chart",
            ChartKind::Box => "Box plot",
            ChartKind::Histogram => "Histogram",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Treemap => "Treemap",
            ChartKind::AnimatedBar => "Animated bar chart",
        }
    }

    /// Whether the chart can be rendered as a single static image.
    pub fn is_static(&self) -> bool {
        !matches!(self, ChartKind::AnimatedBar)
    }
}

impl std::str::FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "bar" | "grouped-bar" | "막대그래프" => Ok(ChartKind::GroupedBar),
            "pie" | "원형차트" => Ok(ChartKind::Pie),
            "box" | "boxplot" => Ok(ChartKind::Box),
            "histogram" | "hist" => Ok(ChartKind::Histogram),
            "heatmap" => Ok(ChartKind::Heatmap),
            "treemap" => Ok(ChartKind::Treemap),
            "animated-bar" | "animated" => Ok(ChartKind::AnimatedBar),
            _ => Err(format!(
                "Unknown chart kind: {}. Use: bar, pie, box, histogram, heatmap, treemap, or animated-bar.",
                s
            )),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
