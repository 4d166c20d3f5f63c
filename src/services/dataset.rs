use crate::models::{Dataset, PostcodeTable, School, SuburbCentroid};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const SCHOOLS_FILE: &str = "schools.min.json";
pub const POSTCODES_FILE: &str = "postcode_centroids.min.json";
pub const SUBURBS_FILE: &str = "suburb_centroids.min.json";

/// Errors that can occur while loading a region's data files
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Invalid region code: {0:?}")]
    InvalidRegion(String),

    #[error("Request for {file} failed: {source}")]
    Request {
        file: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request for {file} returned {status}")]
    Status {
        file: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to read {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where region directories live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Http(String),
    Local(PathBuf),
}

impl DatasetSource {
    /// `http(s)://` prefixes are fetched remotely, anything else is a directory
    pub fn parse(base: &str) -> Self {
        let base = base.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            DatasetSource::Http(base.trim_end_matches('/').to_string())
        } else {
            DatasetSource::Local(PathBuf::from(base))
        }
    }
}

/// Loads the three data files of a region
///
/// The schools list, postcode centroids and suburb centroids are fetched
/// concurrently and joined; the dataset is only returned once all three parsed.
pub struct DatasetLoader {
    source: DatasetSource,
    client: Client,
}

impl DatasetLoader {
    pub fn new(base: &str, timeout_secs: u64) -> Result<Self, DataLoadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(DataLoadError::Client)?;

        Ok(Self {
            source: DatasetSource::parse(base),
            client,
        })
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Load a region's dataset
    pub async fn load(&self, region: &str) -> Result<Dataset, DataLoadError> {
        let region = normalize_region(region)?;

        tracing::info!("Loading dataset for region {} from {:?}", region, self.source);

        let (schools, postcodes, suburbs) = tokio::try_join!(
            self.fetch::<Vec<School>>(&region, SCHOOLS_FILE),
            self.fetch::<PostcodeTable>(&region, POSTCODES_FILE),
            self.fetch::<Vec<SuburbCentroid>>(&region, SUBURBS_FILE),
        )?;

        tracing::info!(
            "Loaded {} schools, {} postcodes, {} suburbs for {}",
            schools.len(),
            postcodes.len(),
            suburbs.len(),
            region
        );

        Ok(Dataset {
            region,
            schools,
            postcodes,
            suburbs,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, region: &str, file: &str) -> Result<T, DataLoadError> {
        let name = format!("{}/{}", region, file);

        let bytes = match &self.source {
            DatasetSource::Http(base) => {
                let url = format!("{}/{}", base, name);
                tracing::debug!("Fetching {}", url);

                let response = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|source| DataLoadError::Request { file: name.clone(), source })?;

                if !response.status().is_success() {
                    return Err(DataLoadError::Status {
                        file: name,
                        status: response.status(),
                    });
                }

                response
                    .bytes()
                    .await
                    .map_err(|source| DataLoadError::Request { file: name.clone(), source })?
                    .to_vec()
            }
            DatasetSource::Local(dir) => {
                let path = dir.join(region).join(file);
                tracing::debug!("Reading {}", path.display());

                tokio::fs::read(&path)
                    .await
                    .map_err(|source| DataLoadError::Io { file: name.clone(), source })?
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| DataLoadError::Parse { file: name, source })
    }
}

/// Lowercase a region code, rejecting anything that is not a plain identifier
pub fn normalize_region(region: &str) -> Result<String, DataLoadError> {
    let code = region.trim().to_lowercase();
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return Err(DataLoadError::InvalidRegion(region.to_string()));
    }
    Ok(code)
}
