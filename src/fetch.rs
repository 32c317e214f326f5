//! Dataset fetching.
//!
//! A dataset location is either an HTTP(S) URL or a local path (optionally
//! spelled `file://...`). Remote locations go through `reqwest`; any non-2xx
//! status is a failure, so an error page never reaches the engine as an
//! "image".

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Default timeout for remote dataset downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("HTTP {status} fetching '{location}'")]
    Http { location: String, status: u16 },

    #[error("Network error fetching '{location}': {message}")]
    Network { location: String, message: String },

    #[error("Failed to read '{path}': {message}")]
    Io { path: String, message: String },
}

/// Where a dataset image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    Remote(String),
    Local(PathBuf),
}

impl DatasetLocation {
    /// Parse from a URL or file path.
    ///
    /// Supported formats:
    /// - `http://...` / `https://...` → Remote
    /// - `file:///path/to/image.sqlite` → Local
    /// - anything else → Local, treated as a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::Remote(location.to_string());
        }
        if let Some(path) = location.strip_prefix("file://") {
            return Self::Local(PathBuf::from(path));
        }
        Self::Local(PathBuf::from(location))
    }
}

/// Fetches the raw bytes of a dataset image.
pub trait DatasetFetcher {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Fetcher for HTTP(S) URLs and local paths.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network {
                location: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }

    async fn fetch_remote(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let network = |e: reqwest::Error| FetchError::Network {
            location: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(network)?;
        debug!(url, bytes = body.len(), "Fetched remote dataset");
        Ok(body.to_vec())
    }
}

impl DatasetFetcher for HttpFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, FetchError> {
        match DatasetLocation::parse(location) {
            DatasetLocation::Remote(url) => self.fetch_remote(&url).await,
            DatasetLocation::Local(path) => {
                let bytes = tokio::fs::read(&path).await.map_err(|e| FetchError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                debug!(path = %path.display(), bytes = bytes.len(), "Read local dataset");
                Ok(bytes)
            }
        }
    }
}
