//! Font resolution for Hangul-capable text in word clouds, rasters and PDFs.
//!
//! A font is resolved once per session and passed explicitly to every
//! renderer. Sources are tried in order: the cached download, a fresh
//! download into the cache, platform font paths, and finally the renderer's
//! built-in default (no path).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, SurveyError};

/// Default download location of the Korean font.
pub const DEFAULT_FONT_URL: &str =
    "https://github.com/google/fonts/raw/main/ofl/nanumgothic/NanumGothic-Regular.ttf";

/// Font resolution settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Directory holding the downloaded font.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// File name of the downloaded font inside `cache_dir`.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Where to download the font from.
    #[serde(default = "default_url")]
    pub url: String,
    /// Attempt a download when the font is not cached.
    #[serde(default = "default_true")]
    pub download: bool,
    /// Download timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Platform font files tried after the cache, in order.
    #[serde(default = "default_platform_paths")]
    pub platform_paths: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            file_name: default_file_name(),
            url: default_url(),
            download: true,
            timeout_seconds: default_timeout(),
            platform_paths: default_platform_paths(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./fonts")
}

fn default_file_name() -> String {
    "NanumGothic-Regular.ttf".to_string()
}

fn default_url() -> String {
    DEFAULT_FONT_URL.to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    10
}

fn default_platform_paths() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
        "/usr/share/fonts/nanum/NanumGothic.ttf",
        "/Library/Fonts/NanumGothic.ttf",
        "/System/Library/Fonts/Supplemental/AppleGothic.ttf",
        "C:\\Windows\\Fonts\\malgun.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

impl FontConfig {
    /// Path of the cached download.
    pub fn cached_path(&self) -> PathBuf {
        self.cache_dir.join(&self.file_name)
    }
}

/// Where a resolved font came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSource {
    /// Previously downloaded file in the cache directory.
    Cached,
    /// Downloaded during this resolution.
    Downloaded,
    /// Installed system font.
    Platform,
    /// No font file; renderers use their built-in default.
    Default,
}

/// The font chosen for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontResolution {
    pub path: Option<PathBuf>,
    pub source: FontSource,
}

impl FontResolution {
    /// Resolution that uses the renderer's built-in font.
    pub fn builtin() -> Self {
        Self {
            path: None,
            source: FontSource::Default,
        }
    }

    /// Resolve a font according to `config`.
    ///
    /// Never fails: a failed download is logged and the next source is tried.
    /// Uses a blocking HTTP client, so call it outside any async runtime.
    pub fn resolve(config: &FontConfig) -> Self {
        let cached = config.cached_path();
        if cached.is_file() {
            debug!(path = %cached.display(), "using cached font");
            return Self::found(cached, FontSource::Cached);
        }

        if config.download {
            match download(config, &cached) {
                Ok(()) => {
                    info!(path = %cached.display(), "downloaded font");
                    return Self::found(cached, FontSource::Downloaded);
                }
                Err(e) => warn!(error = %e, "font download failed, falling back"),
            }
        }

        if let Some(path) = config.platform_paths.iter().find(|p| p.is_file()) {
            debug!(path = %path.display(), "using platform font");
            return Self::found(path.clone(), FontSource::Platform);
        }

        warn!("no Hangul font found; text may not render");
        Self::builtin()
    }

    fn found(path: PathBuf, source: FontSource) -> Self {
        Self {
            path: Some(path),
            source,
        }
    }

    /// Path of the font file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the font file.
    ///
    /// Returns `Ok(None)` for the built-in default.
    pub fn load_bytes(&self) -> Result<Option<Vec<u8>>> {
        match &self.path {
            Some(path) => fs::read(path)
                .map(Some)
                .map_err(|source| SurveyError::Io {
                    path: path.clone(),
                    source,
                }),
            None => Ok(None),
        }
    }
}

fn download(config: &FontConfig, target: &Path) -> Result<()> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .build()
        .map_err(|e| {
            SurveyError::ExternalResource(format!("Failed to create HTTP client: {}", e))
        })?;

    let response = client
        .get(&config.url)
        .send()
        .map_err(|e| SurveyError::ExternalResource(format!("Font request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(SurveyError::ExternalResource(format!(
            "Font download returned {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .map_err(|e| SurveyError::ExternalResource(format!("Font body unreadable: {}", e)))?;

    fs::create_dir_all(&config.cache_dir).map_err(|source| SurveyError::Io {
        path: config.cache_dir.clone(),
        source,
    })?;
    fs::write(target, &bytes).map_err(|source| SurveyError::Io {
        path: target.to_path_buf(),
        source,
    })?;

    Ok(())
}
