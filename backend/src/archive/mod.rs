//! Light-curve archives.
//!
//! An archive answers two questions: which products exist for a target, and what
//! does a given product contain. The pipeline only sees the [`LightCurveArchive`]
//! trait; concrete archives are picked at startup by [`ArchiveFactory`].
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  services::pipeline          │  search → download_all → clean → flatten
//! └──────────────┬───────────────┘
//!                │ Arc<dyn LightCurveArchive>
//!       ┌────────┴─────────┐
//!       ▼                  ▼
//!  LocalArchive       HttpArchive ──► ProductCache (DiskCache / MemoryCache)
//! ```

pub mod cache;
pub mod factory;
pub mod local;
#[cfg(feature = "remote-archive")]
pub mod remote;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::models::{Mission, RawLightCurve};

pub use cache::{cache_key, DiskCache, MemoryCache, ProductCache};
pub use factory::ArchiveFactory;
pub use local::LocalArchive;
#[cfg(feature = "remote-archive")]
pub use remote::HttpArchive;

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Error type for archive operations
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The search parameters cannot be mapped onto the archive.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A product listed by a search is no longer available.
    #[error("Product '{0}' not found")]
    ProductNotFound(String),

    /// Network or HTTP-level failure talking to a remote archive.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Product bytes could not be decoded, either from the source or from the cache.
    #[error("Corrupt product '{product_id}': {reason}")]
    Corrupt { product_id: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// One downloadable light-curve segment (a Kepler quarter, a TESS sector...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    /// Archive-unique identifier, also used as the cache key
    pub product_id: String,
    pub target: String,
    pub mission: Mission,
    /// Pipeline that produced the product (Kepler, SPOC, QLP...)
    pub author: String,
    /// Human-readable segment label
    pub segment: String,
}

/// Source of light-curve products.
#[async_trait]
pub trait LightCurveArchive: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// List the products available for `target`, in archive order.
    ///
    /// An empty list is a valid answer; it is not an error.
    async fn search(
        &self,
        target: &str,
        mission: Mission,
        author: &str,
    ) -> ArchiveResult<Vec<ProductRef>>;

    /// Fetch the contents of one product.
    async fn download(&self, product: &ProductRef) -> ArchiveResult<RawLightCurve>;

    /// Forget any locally cached copy of `product`.
    async fn invalidate(&self, _product: &ProductRef) -> ArchiveResult<()> {
        Ok(())
    }
}

/// Download every product concurrently, failing on the first error.
pub async fn download_all(
    archive: &dyn LightCurveArchive,
    products: &[ProductRef],
) -> ArchiveResult<Vec<RawLightCurve>> {
    try_join_all(products.iter().map(|p| archive.download(p))).await
}

/// Decode a product document and check that its columns line up.
pub fn decode_product(product_id: &str, bytes: &[u8]) -> ArchiveResult<RawLightCurve> {
    let raw: RawLightCurve = serde_json::from_slice(bytes).map_err(|e| ArchiveError::Corrupt {
        product_id: product_id.to_string(),
        reason: e.to_string(),
    })?;
    if raw.time.len() != raw.flux.len() {
        return Err(ArchiveError::Corrupt {
            product_id: product_id.to_string(),
            reason: format!(
                "time has {} samples but flux has {}",
                raw.time.len(),
                raw.flux.len()
            ),
        });
    }
    Ok(raw)
}
