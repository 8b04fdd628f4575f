use serde::Deserialize;
use std::time::Duration;

use crate::services::vision::DEFAULT_VISION_ENDPOINT;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:3000")
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Bucket holding label photos
    pub storage_bucket: String,

    /// S3-compatible endpoint URL
    pub storage_endpoint: String,

    /// Storage region name ("auto" for R2)
    #[serde(default = "default_storage_region")]
    pub storage_region: String,

    /// Storage access key ID
    pub storage_access_key: String,

    /// Storage secret access key
    pub storage_secret_key: String,

    /// Base URL objects in the bucket are publicly served from
    pub storage_public_url: String,

    /// Google Cloud Vision API key
    pub vision_api_key: String,

    /// Vision `images:annotate` URL
    #[serde(default = "default_vision_endpoint")]
    pub vision_endpoint: String,

    /// Per-request timeout for the Vision API, in seconds
    #[serde(default = "default_vision_timeout_secs")]
    pub vision_timeout_secs: u64,

    /// maxResults for LABEL_DETECTION
    #[serde(default = "default_vision_max_labels")]
    pub vision_max_labels: u32,

    /// Request body limit in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_storage_region() -> String {
    "auto".to_string()
}

fn default_vision_endpoint() -> String {
    DEFAULT_VISION_ENDPOINT.to_string()
}

fn default_vision_timeout_secs() -> u64 {
    10
}

fn default_vision_max_labels() -> u32 {
    10
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn vision_timeout(&self) -> Duration {
        Duration::from_secs(self.vision_timeout_secs)
    }
}
