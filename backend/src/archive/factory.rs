//! Archive factory for dependency injection.

use std::sync::Arc;
#[cfg(feature = "remote-archive")]
use std::time::Duration;

use tracing::info;

use super::{ArchiveError, ArchiveResult, LightCurveArchive, LocalArchive};
#[cfg(feature = "remote-archive")]
use super::{DiskCache, HttpArchive};
use crate::config::{ArchiveKind, ArchiveSettings};

/// Builds the archive selected by configuration.
pub struct ArchiveFactory;

impl ArchiveFactory {
    /// Create an archive instance from settings.
    ///
    /// # Errors
    /// Fails when the remote archive is selected without its feature, when the
    /// URL is missing or invalid, or when the cache directory cannot be created.
    pub fn create(settings: &ArchiveSettings) -> ArchiveResult<Arc<dyn LightCurveArchive>> {
        match settings.kind {
            ArchiveKind::Local => {
                info!(root = %settings.root.display(), "Using local light-curve archive");
                Ok(Self::create_local(settings))
            }
            ArchiveKind::Http => Self::create_http(settings),
        }
    }

    pub fn create_local(settings: &ArchiveSettings) -> Arc<dyn LightCurveArchive> {
        Arc::new(LocalArchive::new(settings.root.clone()))
    }

    #[cfg(feature = "remote-archive")]
    pub fn create_http(settings: &ArchiveSettings) -> ArchiveResult<Arc<dyn LightCurveArchive>> {
        let url = settings.url.as_deref().ok_or_else(|| {
            ArchiveError::Configuration("HTTP archive requires a base URL".to_string())
        })?;
        let cache_dir = settings.resolved_cache_dir();
        let cache = DiskCache::new(&cache_dir)?;
        info!(url, cache_dir = %cache_dir.display(), "Using remote light-curve archive");

        let archive = HttpArchive::new(url, Duration::from_secs(settings.timeout_secs), Arc::new(cache))?;
        Ok(Arc::new(archive))
    }

    #[cfg(not(feature = "remote-archive"))]
    pub fn create_http(_settings: &ArchiveSettings) -> ArchiveResult<Arc<dyn LightCurveArchive>> {
        Err(ArchiveError::Configuration(
            "Remote archive feature not enabled".to_string(),
        ))
    }
}
