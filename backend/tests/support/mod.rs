#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use exo_backend::archive::{ArchiveError, ArchiveResult, LightCurveArchive, ProductRef};
use exo_backend::models::{Mission, RawLightCurve};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Every environment variable read by `AppConfig::from_env`, cleared.
pub const CONFIG_VARS_UNSET: [(&str, Option<&str>); 9] = [
    ("HOST", None),
    ("PORT", None),
    ("CORS_ORIGINS", None),
    ("ARCHIVE_TYPE", None),
    ("ARCHIVE_URL", None),
    ("ARCHIVE_ROOT", None),
    ("EXO_CACHE_DIR", None),
    ("ARCHIVE_TIMEOUT_SECS", None),
    ("EXO_CONFIG", None),
];

/// A flat light curve of `n` samples at 30-minute cadence starting at `t0`.
pub fn flat_segment(t0: f64, n: usize, level: f64) -> RawLightCurve {
    RawLightCurve {
        time: (0..n).map(|i| t0 + i as f64 * 0.02).collect(),
        flux: vec![Some(level); n],
    }
}

/// Write a product document into a local archive tree.
pub fn write_product(root: &Path, mission: Mission, author: &str, target: &str, segment: &str, raw: &RawLightCurve) {
    let dir = root.join(mission.as_str()).join(author).join(target);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(format!("{}.json", segment)),
        serde_json::to_vec(raw).unwrap(),
    )
    .unwrap();
}

/// In-memory archive that can be told to fail its first downloads.
#[derive(Default)]
pub struct FakeArchive {
    products: Vec<ProductRef>,
    data: HashMap<String, RawLightCurve>,
    failures_remaining: AtomicUsize,
    pub downloads: AtomicUsize,
    pub searches: Mutex<Vec<(String, Mission, String)>>,
    pub invalidated: Mutex<Vec<String>>,
}

impl FakeArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, target: &str, mission: Mission, author: &str, segment: &str, raw: RawLightCurve) -> Self {
        let product_id = format!("{}-{}", target, segment);
        self.products.push(ProductRef {
            product_id: product_id.clone(),
            target: target.to_string(),
            mission,
            author: author.to_string(),
            segment: segment.to_string(),
        });
        self.data.insert(product_id, raw);
        self
    }

    /// Make the next `n` download calls fail with a corruption error.
    pub fn failing_downloads(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn invalidated(&self) -> Vec<String> {
        self.invalidated.lock().unwrap().clone()
    }
}

#[async_trait]
impl LightCurveArchive for FakeArchive {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, target: &str, mission: Mission, author: &str) -> ArchiveResult<Vec<ProductRef>> {
        self.searches
            .lock()
            .unwrap()
            .push((target.to_string(), mission, author.to_string()));
        Ok(self
            .products
            .iter()
            .filter(|p| p.target == target && p.mission == mission && p.author == author)
            .cloned()
            .collect())
    }

    async fn download(&self, product: &ProductRef) -> ArchiveResult<RawLightCurve> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ArchiveError::Corrupt {
                product_id: product.product_id.clone(),
                reason: "simulated cache corruption".to_string(),
            });
        }
        self.data
            .get(&product.product_id)
            .cloned()
            .ok_or_else(|| ArchiveError::ProductNotFound(product.product_id.clone()))
    }

    async fn invalidate(&self, product: &ProductRef) -> ArchiveResult<()> {
        self.invalidated.lock().unwrap().push(product.product_id.clone());
        Ok(())
    }
}
