//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use surveyscope::{Dashboard, FontResolution, SurveyConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// The loaded survey, if any has been uploaded yet.
    pub dashboard: Arc<RwLock<Option<Dashboard>>>,
    /// Configuration applied to every upload.
    pub config: Arc<SurveyConfig>,
    /// Font resolved once at startup.
    pub font: Arc<FontResolution>,
}

impl AppState {
    /// Create state with no survey loaded.
    pub fn new(config: SurveyConfig, font: FontResolution) -> Self {
        Self {
            dashboard: Arc::new(RwLock::new(None)),
            config: Arc::new(config),
            font: Arc::new(font),
        }
    }

    /// Create state with a survey already loaded.
    pub fn with_dashboard(dashboard: Dashboard) -> Self {
        let config = dashboard.config().clone();
        let font = dashboard.font().clone();
        Self {
            dashboard: Arc::new(RwLock::new(Some(dashboard))),
            config: Arc::new(config),
            font: Arc::new(font),
        }
    }

    /// Replace the loaded survey with an upload.
    pub async fn load(&self, name: &str, bytes: &[u8]) -> surveyscope::Result<()> {
        let dashboard = Dashboard::from_upload(
            name,
            bytes,
            (*self.config).clone(),
            (*self.font).clone(),
        )?;
        *self.dashboard.write().await = Some(dashboard);
        Ok(())
    }
}
