//! Serve command - run the local dashboard.

use std::path::{Path, PathBuf};

use colored::Colorize;
use surveyscope::{Dashboard, FontResolution, SurveyConfig};

use crate::server::{app, state::AppState};

pub fn run(
    file: Option<PathBuf>,
    port: u16,
    no_open: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SurveyConfig::resolve(config)?;

    // The font download blocks, so it happens before the runtime starts
    let font = FontResolution::resolve(&config.font);

    let state = match &file {
        Some(path) => AppState::with_dashboard(Dashboard::load(path, config, font)?),
        None => AppState::new(config, font),
    };

    // Print server info
    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting dashboard at".cyan().bold(),
        url.white().bold()
    );
    println!();
    match &file {
        Some(path) => println!("  File: {}", path.display()),
        None => println!("  No file loaded; upload a CSV from the page"),
    }
    match state.font.path() {
        Some(path) => println!("  Font: {}", path.display()),
        None => println!("  Font: {}", "built-in (Hangul may not render)".yellow()),
    }
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    // Open browser if requested
    if !no_open {
        if let Err(e) = open::that(&url) {
            eprintln!("{} Could not open browser: {}", "Warning:".yellow(), e);
        }
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))?;

    println!("{}", "Shutting down...".yellow());
    Ok(())
}
