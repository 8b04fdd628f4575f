use async_trait::async_trait;
use axum::body::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use s3::creds::Credentials;
use s3::{Bucket, Region};
use uuid::Uuid;

use crate::models::label::LabelImage;

/// Key prefix for every uploaded label photo.
const LABEL_PREFIX: &str = "labels";

/// Name used in the key when the upload carried no usable file name.
const FALLBACK_FILE_NAME: &str = "label";

/// Bytes escaped in a URL path segment: everything except RFC 3986 unreserved.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Write-once store for label photos.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under a fresh key and return where it can be fetched.
    ///
    /// Every call creates a new object; existing objects are never replaced.
    async fn store(
        &self,
        bytes: Bytes,
        file_name: &str,
        content_type: &str,
    ) -> Result<LabelImage, StorageError>;
}

/// S3-compatible object storage (R2, Supabase Storage, MinIO, S3).
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    public_base_url: String,
}

impl S3ObjectStore {
    pub fn new(
        bucket_name: &str,
        region: &str,
        endpoint: &str,
        access_key: &str,
        secret_key: &str,
        public_base_url: &str,
    ) -> Result<Self, StorageError> {
        let region = Region::Custom {
            region: region.to_string(),
            endpoint: endpoint.to_string(),
        };

        let credentials =
            Credentials::new(Some(access_key), Some(secret_key), None, None, None)
                .map_err(|e| StorageError::Config(e.to_string()))?;

        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StorageError::Config(e.to_string()))?;

        Ok(Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn store(
        &self,
        bytes: Bytes,
        file_name: &str,
        content_type: &str,
    ) -> Result<LabelImage, StorageError> {
        let key = label_key(file_name);

        let response = self
            .bucket
            .put_object_with_content_type(&key, &bytes, content_type)
            .await
            .map_err(StorageError::S3)?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Status(status));
        }

        Ok(LabelImage {
            public_url: public_url(&self.public_base_url, &key),
            storage_key: key,
            content_type: content_type.to_string(),
            bytes,
        })
    }
}

/// Fresh key of the form `labels/{uuid}-{file_name}`.
pub fn label_key(file_name: &str) -> String {
    format!("{}/{}-{}", LABEL_PREFIX, Uuid::new_v4(), key_file_name(file_name))
}

/// Public URL of `key` under `base_url`, each key segment percent-encoded.
pub fn public_url(base_url: &str, key: &str) -> String {
    let path = key
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/");

    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Last path component of a client-supplied file name, so keys stay
/// directly under the label prefix.
fn key_file_name(file_name: &str) -> &str {
    let name = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." || name.chars().any(|c| c.is_control()) {
        FALLBACK_FILE_NAME
    } else {
        name
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("S3 operation failed: {0}")]
    S3(#[from] s3::error::S3Error),

    #[error("Object store rejected upload with status {0}")]
    Status(u16),

    #[error("Storage configuration error: {0}")]
    Config(String),
}
