//! Surveyscope CLI - survey dashboards from questionnaire CSVs.

mod cli;
mod commands;
mod server;
mod web;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use surveyscope::SurveyError;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Preview { file, rows, json } => commands::preview::run(file, rows, json, config),

        Commands::Chart {
            file,
            kind,
            metric,
            group,
            output,
        } => commands::chart::run(file, kind, metric, group, output, config),

        Commands::Wordcloud { file, top, json } => {
            commands::wordcloud::run(file, top, json, config)
        }

        Commands::Export {
            file,
            format,
            kind,
            metric,
            output,
        } => commands::export::run(file, format, kind, metric, output, config),

        Commands::Serve {
            file,
            port,
            no_open,
        } => commands::serve::run(file, port, no_open, config),

        Commands::InitConfig { output, force } => commands::init_config::run(output, force),
    };

    if let Err(e) = result {
        let informational = e
            .downcast_ref::<SurveyError>()
            .is_some_and(SurveyError::is_informational);
        if informational {
            eprintln!("{} {}", "Note:".yellow().bold(), e);
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "surveyscope=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
