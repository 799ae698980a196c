//! Wordcloud command - word frequencies of the opinion column.

use std::path::{Path, PathBuf};

use colored::Colorize;

use super::open_dashboard;

pub fn run(
    file: PathBuf,
    top: usize,
    json_output: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let dash = open_dashboard(&file, config)?;

    let Some(request) = dash.word_cloud()? else {
        println!(
            "{} no opinions to draw a word cloud from",
            "Note:".yellow()
        );
        return Ok(());
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    println!(
        "{} ({} distinct words)",
        "Opinion words".cyan().bold(),
        request.words.words.len()
    );
    for word in request.words.words.iter().take(top) {
        let bar = "█".repeat((word.weight * 30.0).round().max(1.0) as usize);
        println!("  {:>5}  {} {}", word.count, bar.cyan(), word.word);
    }

    match &request.config.font_path {
        Some(path) => println!("\nFont: {}", path.display()),
        None => println!(
            "\n{} no Hangul font resolved; the word cloud will use the default font",
            "Warning:".yellow()
        ),
    }

    Ok(())
}
