//! Example: Summarize a survey file without starting the dashboard.
//!
//! Usage:
//!   cargo run --example summarize -- <file_path>
//!
//! Example:
//!   cargo run --example summarize -- survey.csv

use std::env;
use std::path::Path;

use surveyscope::aggregate::mean_by_category;
use surveyscope::{Dashboard, FontResolution, SurveyConfig};

fn main() -> surveyscope::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example summarize -- <file_path>");
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.exists() {
        eprintln!("Error: File not found: {}", path.display());
        std::process::exit(1);
    }

    let config = SurveyConfig::load_default()?.unwrap_or_default();
    let dashboard = Dashboard::load(path, config, FontResolution::builtin())?;

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("Survey: {}", dashboard.source().file);
    println!("{}", separator);

    let report = dashboard.field_report();
    for (role, column) in &report.missing_required {
        println!("  missing {:?} column '{}'", role, column);
    }

    let filtered = dashboard.filtered()?;
    println!(
        "Respondents who used the tool: {} of {}",
        filtered.row_count(),
        dashboard.table().row_count()
    );
    println!();

    let user_type = &dashboard.config().fields.user_type;
    for metric in dashboard.metrics() {
        println!("## Average {} by {}", metric, user_type);
        let means = mean_by_category(&filtered, user_type, metric)?;
        for (label, mean) in means.iter() {
            println!("  {:20} {:.2}", label, mean);
        }
        println!();
    }

    if let Some(request) = dashboard.word_cloud()? {
        println!("## Most frequent opinion words");
        for word in request.words.words.iter().take(10) {
            println!("  {:20} {}", word.word, word.count);
        }
    }

    Ok(())
}
