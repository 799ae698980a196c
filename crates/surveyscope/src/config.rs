//! Configuration file handling.
//!
//! Settings live in `surveyscope.toml`. Every section is optional and falls
//! back to the defaults of the Korean survey form.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::Layout;
use crate::error::{Result, SurveyError};
use crate::export::ExportConfig;
use crate::font::FontConfig;
use crate::opinion::WordCloudConfig;
use crate::schema::SurveyFields;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "surveyscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    /// Column bindings and the affirmative sentinel.
    #[serde(default)]
    pub fields: SurveyFields,

    /// Chart layout defaults.
    #[serde(default)]
    pub layout: Layout,

    /// Word-cloud rendering settings.
    #[serde(default)]
    pub wordcloud: WordCloudConfig,

    /// Font resolution.
    #[serde(default)]
    pub font: FontConfig,

    /// Export destinations.
    #[serde(default)]
    pub export: ExportConfig,
}

impl SurveyConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: SurveyConfig = toml::from_str(&content).map_err(|e| {
            SurveyError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try to load configuration from the working directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Load an explicit file, else the default file, else built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Ok(Self::load_default()?.unwrap_or_default()),
        }
    }

    /// Generate the default configuration file content.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&SurveyConfig::default())
            .map_err(|e| SurveyError::Config(format!("Failed to serialize defaults: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SurveyConfig::default();
        assert_eq!(config.fields.usage_flag, "사용 여부");
        assert_eq!(config.fields.affirmative, "예");
        assert_eq!(config.layout.axis_font_size, 14);
        assert_eq!(config.wordcloud.width, 800);
        assert_eq!(config.font.timeout_seconds, 10);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[fields]
usage_flag = "Used AI"
affirmative = "Yes"
scores = ["Usefulness", "Trust"]

[layout]
tick_angle = -45

[font]
download = false
"#;

        let config: SurveyConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.fields.usage_flag, "Used AI");
        assert_eq!(config.fields.affirmative, "Yes");
        assert_eq!(config.fields.scores, vec!["Usefulness", "Trust"]);
        // Untouched fields keep their defaults
        assert_eq!(config.fields.emotion, "감정");
        assert_eq!(config.layout.tick_angle, -45);
        assert_eq!(config.layout.margin.t, 50);
        assert!(!config.font.download);
        assert_eq!(config.wordcloud.background, "white");
    }

    #[test]
    fn test_default_toml_round_trips() {
        let toml_str = SurveyConfig::default_toml().unwrap();
        assert!(toml_str.contains("[fields]"));
        assert!(toml_str.contains("[wordcloud]"));

        let parsed: SurveyConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, SurveyConfig::default());
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[fields\nbroken").unwrap();

        assert!(matches!(
            SurveyConfig::load(&path),
            Err(SurveyError::Config(_))
        ));
        assert!(matches!(
            SurveyConfig::load(&dir.path().join("absent.toml")),
            Err(SurveyError::Io { .. })
        ));
    }
}
