//! Init-config command - write the default configuration file.

use std::path::PathBuf;

use colored::Colorize;
use surveyscope::SurveyConfig;

pub fn run(output: PathBuf, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if output.exists() && !force {
        return Err(format!(
            "{} already exists. Use --force to overwrite.",
            output.display()
        )
        .into());
    }

    std::fs::write(&output, SurveyConfig::default_toml()?)?;
    println!("{} Wrote {}", "✓".green(), output.display());

    Ok(())
}
