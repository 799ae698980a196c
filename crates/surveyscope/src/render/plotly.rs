//! Plotly figure JSON for interactive rendering in the browser.
//!
//! The figure is a plain `{data, layout, frames}` object that plotly.js
//! draws with `Plotly.newPlot`. Pivot gaps are emitted as `null` so they
//! render as empty cells rather than zeros.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use super::palette;
use crate::aggregate::{AggregationResult, HierarchyNode, PivotTable, values_by_category};
use crate::chart::{ChartData, ChartSpec, Layout, Plot};
use crate::error::{Result, SurveyError};
use crate::input::SurveyTable;

/// Build the Plotly figure for a prepared chart.
pub fn figure(plot: &Plot) -> Result<Value> {
    let mut layout = base_layout(&plot.title, &plot.layout);
    let mut frames = Vec::new();

    let data = match (&plot.spec, &plot.data) {
        (ChartSpec::GroupedBar { category, value, .. }, ChartData::Means(means)) => {
            axis_titles(&mut layout, category, value);
            vec![bar_trace(means)]
        }
        (ChartSpec::GroupedBar { category, value, .. }, ChartData::GroupedMeans(pivot)) => {
            axis_titles(&mut layout, category, value);
            layout["barmode"] = json!("group");
            grouped_bar_traces(pivot)
        }
        (ChartSpec::Pie { .. }, ChartData::Counts(counts)) => vec![pie_trace(counts)],
        (ChartSpec::Box { category, value }, ChartData::Rows(rows)) => {
            axis_titles(&mut layout, category, value);
            box_traces(rows, category, value)?
        }
        (ChartSpec::Histogram { value, color }, ChartData::Rows(rows)) => {
            axis_titles(&mut layout, value, "count");
            layout["barmode"] = json!("relative");
            histogram_traces(rows, value, color.as_deref())?
        }
        (ChartSpec::Heatmap { rows, columns, .. }, ChartData::Pivot(pivot)) => {
            axis_titles(&mut layout, columns, rows);
            vec![heatmap_trace(pivot)]
        }
        (ChartSpec::Treemap { .. }, ChartData::Hierarchy(nodes)) => vec![treemap_trace(nodes)],
        (
            ChartSpec::AnimatedBar {
                category,
                value,
                frame,
            },
            ChartData::Rows(rows),
        ) => {
            axis_titles(&mut layout, category, value);
            layout["barmode"] = json!("relative");
            let animation = animated_bars(rows, category, value, frame)?;
            layout["updatemenus"] = animation.menus;
            layout["sliders"] = animation.sliders;
            frames = animation.frames;
            animation.initial
        }
        (spec, _) => {
            return Err(SurveyError::Render(format!(
                "no Plotly mapping for '{}' with the prepared data",
                spec.kind()
            )));
        }
    };

    Ok(json!({
        "data": data,
        "layout": layout,
        "frames": frames,
    }))
}

fn base_layout(title: &str, layout: &Layout) -> Value {
    let tick_font = json!({ "size": layout.axis_font_size });
    json!({
        "title": { "text": title },
        "xaxis": { "tickangle": layout.tick_angle, "tickfont": tick_font.clone() },
        "yaxis": { "tickfont": tick_font },
        "margin": {
            "l": layout.margin.l,
            "r": layout.margin.r,
            "t": layout.margin.t,
            "b": layout.margin.b,
        },
    })
}

fn axis_titles(layout: &mut Value, x: &str, y: &str) {
    layout["xaxis"]["title"] = json!({ "text": x });
    layout["yaxis"]["title"] = json!({ "text": y });
}

fn bar_trace(means: &AggregationResult) -> Value {
    let labels: Vec<&str> = means.labels().collect();
    let colors: Vec<String> = (0..labels.len()).map(palette::hex).collect();
    json!({
        "type": "bar",
        "x": labels,
        "y": means.values.values().collect::<Vec<_>>(),
        "marker": { "color": colors },
    })
}

fn grouped_bar_traces(pivot: &PivotTable) -> Vec<Value> {
    pivot
        .columns
        .iter()
        .enumerate()
        .map(|(j, group)| {
            let y: Vec<Option<f64>> = pivot.cells.iter().map(|row| row[j]).collect();
            json!({
                "type": "bar",
                "name": group,
                "x": pivot.rows,
                "y": y,
                "marker": { "color": palette::hex(j) },
            })
        })
        .collect()
}

fn pie_trace(counts: &AggregationResult) -> Value {
    let colors: Vec<String> = (0..counts.len()).map(palette::hex).collect();
    json!({
        "type": "pie",
        "labels": counts.labels().collect::<Vec<_>>(),
        "values": counts.values.values().collect::<Vec<_>>(),
        "marker": { "colors": colors },
    })
}

fn box_traces(rows: &SurveyTable, category: &str, value: &str) -> Result<Vec<Value>> {
    let groups = values_by_category(rows, category, value)?;
    Ok(groups
        .iter()
        .enumerate()
        .map(|(i, (label, values))| {
            json!({
                "type": "box",
                "name": label,
                "y": values,
                "marker": { "color": palette::hex(i) },
            })
        })
        .collect())
}

fn histogram_traces(rows: &SurveyTable, value: &str, color: Option<&str>) -> Result<Vec<Value>> {
    let groups = match color {
        Some(color) => values_by_category(rows, color, value)?,
        None => {
            let idx = rows.require_column(value)?;
            let values: Vec<f64> = (0..rows.row_count())
                .filter_map(|row| rows.number(row, idx))
                .collect();
            BTreeMap::from([(value.to_string(), values)])
        }
    };

    Ok(groups
        .iter()
        .enumerate()
        .map(|(i, (label, values))| {
            json!({
                "type": "histogram",
                "name": label,
                "x": values,
                "marker": { "color": palette::hex(i) },
            })
        })
        .collect())
}

fn heatmap_trace(pivot: &PivotTable) -> Value {
    json!({
        "type": "heatmap",
        "x": pivot.columns,
        "y": pivot.rows,
        "z": pivot.cells,
        "hoverongaps": false,
        "colorscale": "Blues",
    })
}

fn treemap_trace(nodes: &[HierarchyNode]) -> Value {
    json!({
        "type": "treemap",
        "ids": nodes.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
        "labels": nodes.iter().map(|n| n.label.as_str()).collect::<Vec<_>>(),
        "parents": nodes.iter().map(|n| n.parent.as_str()).collect::<Vec<_>>(),
        "values": nodes.iter().map(|n| n.count).collect::<Vec<_>>(),
        "branchvalues": "total",
    })
}

struct Animation {
    initial: Vec<Value>,
    frames: Vec<Value>,
    menus: Value,
    sliders: Value,
}

/// One frame per `frame` label, each holding the raw bars of that slice.
fn animated_bars(rows: &SurveyTable, category: &str, value: &str, frame: &str) -> Result<Animation> {
    let cat_idx = rows.require_column(category)?;
    let val_idx = rows.require_column(value)?;
    let frame_idx = rows.require_column(frame)?;

    let mut slices: BTreeMap<&str, (Vec<&str>, Vec<f64>)> = BTreeMap::new();
    for row in 0..rows.row_count() {
        let (Some(label), Some(v), Some(f)) = (
            rows.label(row, cat_idx),
            rows.number(row, val_idx),
            rows.label(row, frame_idx),
        ) else {
            continue;
        };
        let slice = slices.entry(f).or_default();
        slice.0.push(label);
        slice.1.push(v);
    }

    let traces: Vec<(&str, Value)> = slices
        .iter()
        .map(|(name, (x, y))| {
            (
                *name,
                json!({
                    "type": "bar",
                    "x": x,
                    "y": y,
                    "marker": { "color": palette::hex(0) },
                }),
            )
        })
        .collect();

    let frames = traces
        .iter()
        .map(|(name, trace)| json!({ "name": name, "data": [trace] }))
        .collect();

    let steps: Vec<Value> = traces
        .iter()
        .map(|(name, _)| {
            json!({
                "label": name,
                "method": "animate",
                "args": [[name], { "mode": "immediate", "frame": { "duration": 500 } }],
            })
        })
        .collect();

    let initial = traces.first().map(|(_, t)| vec![t.clone()]).unwrap_or_default();

    Ok(Animation {
        initial,
        frames,
        menus: json!([{
            "type": "buttons",
            "showactive": false,
            "buttons": [{
                "label": "Play",
                "method": "animate",
                "args": [null, { "fromcurrent": true, "frame": { "duration": 500 } }],
            }],
        }]),
        sliders: json!([{ "currentvalue": { "prefix": format!("{}: ", frame) }, "steps": steps }]),
    })
}
