//! Archive backed by a directory tree.
//!
//! Layout: `<root>/<mission>/<author>/<target>/<segment>.json`, one
//! [`RawLightCurve`] document per segment.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{decode_product, ArchiveError, ArchiveResult, LightCurveArchive, ProductRef};
use crate::models::{Mission, RawLightCurve};

const PRODUCT_EXTENSION: &str = "json";

/// Local, read-only archive.
#[derive(Debug, Clone)]
pub struct LocalArchive {
    root: PathBuf,
}

impl LocalArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn target_dir(&self, target: &str, mission: Mission, author: &str) -> ArchiveResult<PathBuf> {
        check_component("target", target)?;
        check_component("author", author)?;
        Ok(self.root.join(mission.as_str()).join(author).join(target))
    }

    fn product_path(&self, product: &ProductRef) -> ArchiveResult<PathBuf> {
        check_component("segment", &product.segment)?;
        Ok(self
            .target_dir(&product.target, product.mission, &product.author)?
            .join(format!("{}.{}", product.segment, PRODUCT_EXTENSION)))
    }
}

/// Reject values that would not stay a single path component under the root.
fn check_component(field: &str, value: &str) -> ArchiveResult<()> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if bad {
        return Err(ArchiveError::InvalidQuery(format!(
            "{} '{}' is not a valid archive name",
            field, value
        )));
    }
    Ok(())
}

#[async_trait]
impl LightCurveArchive for LocalArchive {
    fn name(&self) -> &str {
        "local"
    }

    async fn search(
        &self,
        target: &str,
        mission: Mission,
        author: &str,
    ) -> ArchiveResult<Vec<ProductRef>> {
        let dir = self.target_dir(target, mission, author)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut segments = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PRODUCT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                segments.push(stem.to_string());
            }
        }
        segments.sort();
        debug!(dir = %dir.display(), count = segments.len(), "local archive search");

        Ok(segments
            .into_iter()
            .map(|segment| ProductRef {
                product_id: format!("{}/{}/{}/{}", mission, author, target, segment),
                target: target.to_string(),
                mission,
                author: author.to_string(),
                segment,
            })
            .collect())
    }

    async fn download(&self, product: &ProductRef) -> ArchiveResult<RawLightCurve> {
        let path = self.product_path(product)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ArchiveError::ProductNotFound(product.product_id.clone()))
            }
            Err(e) => return Err(e.into()),
        };
        decode_product(&product.product_id, &bytes)
    }
}
