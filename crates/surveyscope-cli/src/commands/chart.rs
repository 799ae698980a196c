//! Chart command - build a chart and print its Plotly figure.

use std::path::{Path, PathBuf};

use colored::Colorize;
use surveyscope::{ChartKind, ChartRequest};

use super::open_dashboard;

pub fn run(
    file: PathBuf,
    kind: ChartKind,
    metric: Option<String>,
    group: Option<String>,
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dash = open_dashboard(&file, config)?;

    let mut request = ChartRequest::new(kind);
    if let Some(metric) = metric {
        request = request.with_metric(metric);
    }
    if let Some(group) = group {
        request = request.with_group(group);
    }

    let Some(figure) = dash.figure(&request)? else {
        println!(
            "{} no respondents answered '{}' to '{}'; nothing to plot",
            "Note:".yellow(),
            dash.config().fields.affirmative,
            dash.config().fields.usage_flag
        );
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&figure)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!(
                "{} {} chart written to {}",
                "✓".green(),
                kind.label(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
