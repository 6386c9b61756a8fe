//! Application state for the HTTP server.

use std::sync::Arc;

use crate::archive::LightCurveArchive;
use crate::config::AppConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Archive used by the real-data endpoints
    pub archive: Arc<dyn LightCurveArchive>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state with the given archive and configuration.
    pub fn new(archive: Arc<dyn LightCurveArchive>, config: AppConfig) -> Self {
        Self {
            archive,
            config: Arc::new(config),
        }
    }
}
