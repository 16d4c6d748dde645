/// Sources of the raw satellite documents
use crate::errors::DataError;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const SATELLITES_DOCUMENT: &str = "satellites.json";
pub const SATELLITE_DETAIL_DOCUMENT: &str = "satellite-detail.json";
pub const POSITIONS_DOCUMENT: &str = "positions.json";

/// Something that can hand out a named JSON document
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn read(&self, document: &str) -> Result<String, DataError>;
}

/// Documents bundled with the application
pub struct AssetSource {
    dir: PathBuf,
}

impl AssetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DataSource for AssetSource {
    async fn read(&self, document: &str) -> Result<String, DataError> {
        let path = self.dir.join(document);
        debug!(path = %path.display(), "reading bundled document");
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

/// Documents served over HTTP from `{base_url}/{document}`
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("satellite-tracker/1.0")
            .build()?;
        Ok(Self { client, base_url })
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn read(&self, document: &str) -> Result<String, DataError> {
        let url = format!("{}/{}", self.base_url, document);
        debug!(%url, "fetching document");
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(DataError::Status(resp.status().as_u16()));
        }

        Ok(resp.text().await?)
    }
}
