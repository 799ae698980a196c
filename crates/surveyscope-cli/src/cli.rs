//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use surveyscope::{ChartKind, ExportFormat};

/// Surveyscope: survey dashboards from questionnaire CSVs
#[derive(Parser)]
#[command(name = "surveyscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: ./surveyscope.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the columns, field bindings and respondent counts of a survey
    Preview {
        /// Path to the survey file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to print
        #[arg(short = 'n', long, default_value = "5")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build a chart and print its Plotly figure
    Chart {
        /// Path to the survey file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Chart kind (bar, pie, box, histogram, heatmap, treemap, animated-bar)
        #[arg(short, long, default_value = "bar")]
        kind: ChartKind,

        /// Score column to plot (default: first configured score)
        #[arg(short, long)]
        metric: Option<String>,

        /// Second grouping column for bar charts
        #[arg(short, long)]
        group: Option<String>,

        /// Write the figure JSON to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the word-cloud request for the opinion column
    Wordcloud {
        /// Path to the survey file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of words to list (ignored with --json)
        #[arg(short = 'n', long, default_value = "20")]
        top: usize,

        /// Output the full request as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the current view as PDF, Excel or PNG
    Export {
        /// Path to the survey file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Export format (pdf, xlsx, png)
        #[arg(short, long, default_value = "pdf")]
        format: ExportFormat,

        /// Chart kind to include
        #[arg(short, long, default_value = "bar")]
        kind: ChartKind,

        /// Score column to plot (default: first configured score)
        #[arg(short, long)]
        metric: Option<String>,

        /// Output path (default: <export.output_dir>/<export.file_stem>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the dashboard in a browser
    Serve {
        /// Survey file to load at startup; otherwise upload from the page
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Write a default surveyscope.toml
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "surveyscope.toml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
