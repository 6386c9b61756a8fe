//! Archive served over HTTP.
//!
//! Protocol:
//! - `GET {base}/search?target=..&mission=..&author=..` returns a JSON array of
//!   [`ProductRef`]; 404 means no products.
//! - `GET {base}/products/{product_id}` returns one [`RawLightCurve`] document.
//!
//! Product bytes are kept in a [`ProductCache`]. A cached entry that no longer
//! decodes is reported as [`ArchiveError::Corrupt`]; callers recover with
//! [`LightCurveArchive::invalidate`] and a fresh download.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::{debug, info, warn};

use super::{decode_product, ArchiveError, ArchiveResult, LightCurveArchive, ProductCache, ProductRef};
use crate::models::{Mission, RawLightCurve};

/// Remote archive client with a product cache.
pub struct HttpArchive {
    base_url: Url,
    client: reqwest::Client,
    cache: Arc<dyn ProductCache>,
}

impl std::fmt::Debug for HttpArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpArchive")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl From<reqwest::Error> for ArchiveError {
    fn from(err: reqwest::Error) -> Self {
        ArchiveError::Transport(err.to_string())
    }
}

impl HttpArchive {
    pub fn new(base_url: &str, timeout: Duration, cache: Arc<dyn ProductCache>) -> ArchiveResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ArchiveError::Configuration(format!("invalid archive URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ArchiveError::Configuration(format!(
                "archive URL '{}' cannot be used as a base",
                base_url
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArchiveError::Configuration(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            client,
            cache,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ArchiveResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ArchiveError::Configuration("archive URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_product(&self, product: &ProductRef) -> ArchiveResult<Vec<u8>> {
        let url = self.endpoint(&["products", &product.product_id])?;
        info!(url = %url.as_str(), "Downloading light-curve product");

        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(ArchiveError::ProductNotFound(product.product_id.clone())),
            status if !status.is_success() => Err(ArchiveError::Transport(format!(
                "product download failed with status {}",
                status
            ))),
            _ => Ok(response.bytes().await?.to_vec()),
        }
    }
}

#[async_trait]
impl LightCurveArchive for HttpArchive {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(
        &self,
        target: &str,
        mission: Mission,
        author: &str,
    ) -> ArchiveResult<Vec<ProductRef>> {
        let url = self.endpoint(&["search"])?;
        let response = self
            .client
            .get(url)
            .query(&[("target", target), ("mission", mission.as_str()), ("author", author)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            status if !status.is_success() => Err(ArchiveError::Transport(format!(
                "search failed with status {}",
                status
            ))),
            _ => {
                let products: Vec<ProductRef> = response.json().await?;
                debug!(target_id = target, count = products.len(), "remote archive search");
                Ok(products)
            }
        }
    }

    async fn download(&self, product: &ProductRef) -> ArchiveResult<RawLightCurve> {
        if let Some(bytes) = self.cache.get(&product.product_id)? {
            debug!(product_id = %product.product_id, "product cache hit");
            return decode_product(&product.product_id, &bytes);
        }

        let bytes = self.fetch_product(product).await?;
        let raw = decode_product(&product.product_id, &bytes)?;
        if let Err(e) = self.cache.put(&product.product_id, &bytes) {
            warn!(product_id = %product.product_id, error = %e, "failed to cache product");
        }
        Ok(raw)
    }

    async fn invalidate(&self, product: &ProductRef) -> ArchiveResult<()> {
        self.cache.evict(&product.product_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::MemoryCache;

    fn archive(base: &str) -> ArchiveResult<HttpArchive> {
        HttpArchive::new(base, Duration::from_secs(5), Arc::new(MemoryCache::new()))
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(archive("not a url"), Err(ArchiveError::Configuration(_))));
        assert!(matches!(archive("mailto:someone@example.com"), Err(ArchiveError::Configuration(_))));
    }

    #[test]
    fn test_endpoint_encodes_product_id() {
        let archive = archive("https://archive.example.org/api/").unwrap();
        let url = archive.endpoint(&["products", "Kepler/Kepler/KIC 1/q01"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://archive.example.org/api/products/Kepler%2FKepler%2FKIC%201%2Fq01"
        );
    }

    #[tokio::test]
    async fn test_download_serves_from_cache() {
        let cache = Arc::new(MemoryCache::new());
        let product = ProductRef {
            product_id: "kplr-q1".into(),
            target: "Kepler-10".into(),
            mission: Mission::Kepler,
            author: "Kepler".into(),
            segment: "q1".into(),
        };
        cache
            .put(&product.product_id, br#"{"time": [0.0], "flux": [1.0]}"#)
            .unwrap();
        // unroutable base: only the cache can answer
        let archive =
            HttpArchive::new("http://127.0.0.1:9/", Duration::from_millis(200), cache.clone()).unwrap();
        let raw = archive.download(&product).await.unwrap();
        assert_eq!(raw.time, vec![0.0]);

        archive.invalidate(&product).await.unwrap();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_cache_entry_is_reported() {
        let cache = Arc::new(MemoryCache::new());
        let product = ProductRef {
            product_id: "kplr-q2".into(),
            target: "Kepler-10".into(),
            mission: Mission::Kepler,
            author: "Kepler".into(),
            segment: "q2".into(),
        };
        cache.put(&product.product_id, b"truncated{").unwrap();
        let archive =
            HttpArchive::new("http://127.0.0.1:9/", Duration::from_millis(200), cache).unwrap();
        let err = archive.download(&product).await.unwrap_err();
        assert!(matches!(err, ArchiveError::Corrupt { .. }));
    }
}
