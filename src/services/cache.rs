use crate::models::Dataset;
use crate::services::dataset::{normalize_region, DataLoadError, DatasetLoader};
use std::sync::Arc;
use std::time::Duration;

/// Per-region dataset cache
///
/// Each region is loaded at most once per TTL window; concurrent first requests
/// for the same region share a single load.
pub struct DatasetCache {
    loader: Arc<DatasetLoader>,
    datasets: moka::future::Cache<String, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(loader: DatasetLoader, max_regions: u64, ttl_secs: u64) -> Self {
        let datasets = moka::future::CacheBuilder::new(max_regions)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            loader: Arc::new(loader),
            datasets,
        }
    }

    /// Get a region's dataset, loading it on first use
    pub async fn get_or_load(&self, region: &str) -> Result<Arc<Dataset>, Arc<DataLoadError>> {
        let key = normalize_region(region).map_err(Arc::new)?;

        if let Some(dataset) = self.datasets.get(&key).await {
            tracing::trace!("Dataset cache hit: {}", key);
            return Ok(dataset);
        }

        let loader = Arc::clone(&self.loader);
        let region = key.clone();
        self.datasets
            .try_get_with(key, async move { loader.load(&region).await.map(Arc::new) })
            .await
    }

    pub fn region_count(&self) -> u64 {
        self.datasets.entry_count()
    }
}
