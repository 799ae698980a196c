//! CLI command implementations.

pub mod chart;
pub mod export;
pub mod init_config;
pub mod preview;
pub mod serve;
pub mod wordcloud;

use std::path::Path;

use surveyscope::{Dashboard, FontResolution, SurveyConfig};

/// Load configuration, resolve the session font and load a survey.
pub(crate) fn open_dashboard(
    file: &Path,
    config: Option<&Path>,
) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let config = SurveyConfig::resolve(config)?;
    let font = FontResolution::resolve(&config.font);
    Ok(Dashboard::load(file, config, font)?)
}
