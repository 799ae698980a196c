//! Export command - write the current view as PDF, Excel or PNG.

use std::path::{Path, PathBuf};

use colored::Colorize;
use surveyscope::{ChartKind, ChartRequest, ExportFormat};

use super::open_dashboard;

pub fn run(
    file: PathBuf,
    format: ExportFormat,
    kind: ChartKind,
    metric: Option<String>,
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dash = open_dashboard(&file, config)?;

    let mut request = ChartRequest::new(kind);
    if let Some(metric) = metric {
        request = request.with_metric(metric);
    }

    let path = output.unwrap_or_else(|| dash.config().export.output_path(format));
    dash.export_to(format, &request, &path)?;

    println!(
        "{} Exported {} to {}",
        "✓".green(),
        format.to_string().to_uppercase(),
        path.display().to_string().white().bold()
    );
    if format == ExportFormat::Pdf && !kind.is_static() {
        println!(
            "  {} animated charts are not embedded in PDF reports",
            "Note:".yellow()
        );
    }

    Ok(())
}
