//! Preview command - show what the dashboard sees in a survey file.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::open_dashboard;

pub fn run(
    file: PathBuf,
    rows: usize,
    json_output: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dash = open_dashboard(&file, config)?;
    let report = dash.field_report();
    let filtered = dash.filtered().ok();
    let head = dash.table().head(rows);

    if json_output {
        let preview = serde_json::json!({
            "source": dash.source(),
            "fields": report,
            "metrics": dash.metrics(),
            "respondents": {
                "total": dash.table().row_count(),
                "users": filtered.as_ref().map(|t| t.row_count()),
            },
            "columns": dash.summaries(),
            "headers": head.headers,
            "rows": head.rows,
        });
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let source = dash.source();
    println!("{} {}", "Survey".cyan().bold(), source.file.white());
    println!(
        "  {} rows, {} columns ({})",
        source.row_count, source.column_count, source.format
    );
    println!();

    println!("{}", "Fields:".yellow().bold());
    for (role, column) in &report.present {
        println!("  {} {:?} → {}", "✓".green(), role, column);
    }
    for (role, column) in &report.missing_required {
        println!("  {} {:?} → {} (missing)", "✗".red(), role, column);
    }
    for (role, column) in &report.missing_optional {
        println!("  {} {:?} → {} (optional, missing)", "-".dimmed(), role, column);
    }
    println!();

    match &filtered {
        Some(users) => println!(
            "Respondents who used the tool: {} of {}",
            users.row_count().to_string().white().bold(),
            dash.table().row_count()
        ),
        None => println!(
            "{} usage column '{}' not found; nothing will be charted",
            "Warning:".yellow(),
            dash.config().fields.usage_flag
        ),
    }

    println!("{}", "Columns:".yellow().bold());
    for column in dash.summaries() {
        let kind = if column.numeric.is_some() { "numeric" } else { "text" };
        println!(
            "  {:<20} {:<8} {:>3} unique, {:.0}% missing",
            column.name,
            kind,
            column.unique_count,
            column.null_percentage()
        );
    }
    println!();

    let metrics = dash.metrics();
    if !metrics.is_empty() {
        println!("Metrics: {}", metrics.join(", "));
    }
    println!();

    if !head.is_empty() {
        println!("{}", format!("First {} rows:", head.row_count()).yellow().bold());
        println!("  {}", head.headers.join(" | ").dimmed());
        for row in &head.rows {
            println!("  {}", row.join(" | "));
        }
    }

    if !report.is_complete() {
        println!();
        println!(
            "Bind the missing fields in {} (run {} to create one).",
            "surveyscope.toml".cyan(),
            "surveyscope init-config".cyan().bold()
        );
    }

    Ok(())
}
