//! Real-data pipeline: search, download, clean and flatten archive light curves.

use tracing::{info, warn};

use crate::algorithms::{normalize, remove_nans, savgol_flatten, stitch, CleaningError};
use crate::archive::{download_all, ArchiveError, LightCurveArchive, ProductRef};
use crate::models::{LightCurve, Mission, RawLightCurve};

/// Reasons the pipeline produced no light curve.
///
/// Every variant is a "no data" condition from the client's point of view.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No light curves for '{target}' (TESS, author=SPOC). Try author=QLP.")]
    NoTessSpocResults { target: String },

    #[error("No light curves for '{target}' (mission={mission}, author={author}).")]
    NoResults {
        target: String,
        mission: Mission,
        author: String,
    },

    #[error("Download returned no light curves.")]
    EmptyDownload,

    #[error("Downloaded light curve is empty after cleaning.")]
    EmptyAfterCleaning,

    #[error("Flattened light curve is empty; try a different window_length (e.g., 201 or 801).")]
    EmptyAfterFlatten,

    #[error("{0}")]
    Cleaning(#[from] CleaningError),

    #[error("{0}")]
    Archive(#[from] ArchiveError),
}

/// What to load and how to flatten it.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRequest {
    pub target: String,
    pub mission: Mission,
    pub window_length: usize,
    /// Archive author; `None` picks the mission default
    pub author: Option<String>,
}

impl PipelineRequest {
    pub fn new(target: impl Into<String>, mission: Mission, window_length: usize) -> Self {
        Self {
            target: target.into(),
            mission,
            window_length,
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn resolved_author(&self) -> &str {
        self.author
            .as_deref()
            .unwrap_or_else(|| self.mission.default_author())
    }
}

/// Cleaned light curve and its flattened counterpart.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub raw: LightCurve,
    pub flat: LightCurve,
    pub segments: usize,
}

/// Download `products`, retrying once after invalidating their cached copies.
///
/// Only the products of this request are invalidated; other requests' cache
/// entries are untouched.
pub async fn download_with_retry(
    archive: &dyn LightCurveArchive,
    products: &[ProductRef],
) -> Result<Vec<RawLightCurve>, ArchiveError> {
    match download_all(archive, products).await {
        Ok(segments) => Ok(segments),
        Err(first) => {
            warn!(
                archive = archive.name(),
                error = %first,
                "Download failed; invalidating cached products and retrying once"
            );
            for product in products {
                if let Err(e) = archive.invalidate(product).await {
                    warn!(product_id = %product.product_id, error = %e, "failed to invalidate product");
                }
            }
            download_all(archive, products).await
        }
    }
}

/// Load, clean and flatten the light curve of a target.
pub async fn load_and_flatten(
    archive: &dyn LightCurveArchive,
    request: &PipelineRequest,
) -> Result<PipelineOutput, PipelineError> {
    let author = request.resolved_author();
    let products = archive.search(&request.target, request.mission, author).await?;
    if products.is_empty() {
        if request.mission == Mission::Tess && author == "SPOC" {
            return Err(PipelineError::NoTessSpocResults {
                target: request.target.clone(),
            });
        }
        return Err(PipelineError::NoResults {
            target: request.target.clone(),
            mission: request.mission,
            author: author.to_string(),
        });
    }
    info!(
        target_id = %request.target,
        mission = %request.mission,
        author,
        products = products.len(),
        "Found light-curve products"
    );

    let segments = download_with_retry(archive, &products).await?;
    if segments.iter().all(RawLightCurve::is_empty) {
        return Err(PipelineError::EmptyDownload);
    }

    let raw = normalize(&remove_nans(&stitch(&segments))?)?;
    if raw.is_empty() {
        return Err(PipelineError::EmptyAfterCleaning);
    }

    let flat = savgol_flatten(&raw, request.window_length);
    if flat.is_empty() {
        return Err(PipelineError::EmptyAfterFlatten);
    }

    Ok(PipelineOutput {
        raw,
        flat,
        segments: segments.len(),
    })
}
