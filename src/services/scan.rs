use std::time::Instant;

use crate::models::scan::{LabelUpload, ScanRequest, ScanResult};
use crate::services::extraction;
use crate::services::storage::{ObjectStore, StorageError};
use crate::services::vision::{VisionError, VisionService};

/// Scan a label photo: store it, OCR it, and guess the wine fields.
///
/// Steps run strictly in order and the first failure aborts the scan, so
/// the vision service is never called for an image that was not stored.
pub async fn scan_label(
    store: &dyn ObjectStore,
    vision: &dyn VisionService,
    request: ScanRequest,
) -> Result<ScanResult, ScanError> {
    let start = Instant::now();
    metrics::counter!("label_scans_total").increment(1);

    let result = run_pipeline(store, vision, request).await;

    match &result {
        Ok(_) => {
            metrics::histogram!("label_scan_seconds").record(start.elapsed().as_secs_f64());
        }
        Err(e) => {
            metrics::counter!("label_scans_failed", "stage" => e.stage()).increment(1);
        }
    }

    result
}

async fn run_pipeline(
    store: &dyn ObjectStore,
    vision: &dyn VisionService,
    request: ScanRequest,
) -> Result<ScanResult, ScanError> {
    let (device_id, upload) = validate(request)?;

    tracing::debug!(
        device_id = %device_id,
        file_name = %upload.file_name,
        size = upload.bytes.len(),
        "Uploading label image"
    );
    let image = store
        .store(upload.bytes, &upload.file_name, &upload.content_type)
        .await
        .map_err(|e| {
            tracing::error!(device_id = %device_id, error = %e, "Label upload failed");
            ScanError::Storage(e)
        })?;

    tracing::info!(
        device_id = %device_id,
        storage_key = %image.storage_key,
        content_type = %image.content_type,
        "Label image stored"
    );

    // No compensating delete if this fails: the stored image is left behind.
    let ocr_start = Instant::now();
    let annotations = vision.annotate(&image.bytes).await.map_err(|e| {
        tracing::error!(
            device_id = %device_id,
            storage_key = %image.storage_key,
            error = %e,
            "Vision annotation failed"
        );
        ScanError::Vision(e)
    })?;
    let ocr_duration = ocr_start.elapsed();
    metrics::histogram!("vision_request_seconds").record(ocr_duration.as_secs_f64());

    let fields = extraction::extract(&annotations.full_text, &annotations.label_descriptions);

    tracing::info!(
        device_id = %device_id,
        ocr_duration_ms = ocr_duration.as_millis() as u64,
        text_chars = annotations.full_text.chars().count(),
        labels = annotations.label_descriptions.len(),
        name = %fields.name,
        varietal = ?fields.varietal,
        vintage = ?fields.vintage,
        "Label scan complete"
    );

    Ok(ScanResult::new(device_id, fields, image.public_url))
}

fn validate(request: ScanRequest) -> Result<(String, LabelUpload), ScanError> {
    let upload = request
        .file
        .filter(|f| !f.bytes.is_empty())
        .ok_or(ScanError::Validation("Missing fields: file"))?;

    if request.device_id.is_empty() {
        return Err(ScanError::Validation("Missing fields: device_id"));
    }

    Ok((request.device_id, upload))
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("{0}")]
    Validation(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Vision(#[from] VisionError),
}

impl ScanError {
    /// Pipeline step that failed, for metrics labels.
    pub fn stage(&self) -> &'static str {
        match self {
            ScanError::Validation(_) => "validation",
            ScanError::Storage(_) => "storage",
            ScanError::Vision(_) => "vision",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::{LabelImage, VisionAnnotations};
    use async_trait::async_trait;
    use axum::body::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl ObjectStore for CountingStore {
        async fn store(
            &self,
            bytes: Bytes,
            file_name: &str,
            content_type: &str,
        ) -> Result<LabelImage, StorageError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StorageError::Status(403));
            }
            let storage_key = format!("labels/test-{}", file_name);
            Ok(LabelImage {
                public_url: format!("https://cdn.test/{}", storage_key),
                storage_key,
                content_type: content_type.to_string(),
                bytes,
            })
        }
    }

    struct CountingVision {
        calls: AtomicUsize,
        text: Option<&'static str>,
    }

    #[async_trait]
    impl VisionService for CountingVision {
        async fn annotate(&self, _image_bytes: &[u8]) -> Result<VisionAnnotations, VisionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.text {
                Some(text) => Ok(VisionAnnotations {
                    full_text: text.to_string(),
                    label_descriptions: vec!["wine".to_string()],
                }),
                None => Err(VisionError::Api {
                    code: 14,
                    message: "unavailable".to_string(),
                }),
            }
        }
    }

    fn store(fail: bool) -> CountingStore {
        CountingStore {
            calls: AtomicUsize::new(0),
            fail,
        }
    }

    fn vision(text: Option<&'static str>) -> CountingVision {
        CountingVision {
            calls: AtomicUsize::new(0),
            text,
        }
    }

    fn request(device_id: &str, bytes: &'static [u8]) -> ScanRequest {
        ScanRequest {
            device_id: device_id.to_string(),
            file: Some(LabelUpload {
                bytes: Bytes::from_static(bytes),
                file_name: "label.png".to_string(),
                content_type: "image/png".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_successful_scan() {
        let store = store(false);
        let vision = vision(Some("Domaine Example\nPinot Noir\n2019"));

        let result = scan_label(&store, &vision, request("device-1", b"png"))
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(result.device_id, "device-1");
        assert_eq!(result.name, "Domaine Example");
        assert_eq!(result.producer, "");
        assert_eq!(result.varietal, "pinot noir");
        assert_eq!(result.vintage, Some(2019));
        assert_eq!(result.label_image_url, "https://cdn.test/labels/test-label.png");
    }

    #[tokio::test]
    async fn test_storage_failure_skips_vision() {
        let store = store(true);
        let vision = vision(Some("unused"));

        let err = scan_label(&store, &vision, request("device-1", b"png"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::Storage(_)));
        assert_eq!(err.stage(), "storage");
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_vision_failure_after_upload() {
        let store = store(false);
        let vision = vision(None);

        let err = scan_label(&store, &vision, request("device-1", b"png"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::Vision(_)));
        assert_eq!(err.to_string(), "Vision API error 14: unavailable");
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_validation_makes_no_calls() {
        let store = store(false);
        let vision = vision(Some("unused"));

        let missing_device = scan_label(&store, &vision, request("", b"png")).await;
        assert!(matches!(missing_device, Err(ScanError::Validation(_))));

        let empty_file = scan_label(&store, &vision, request("device-1", b"")).await;
        assert!(matches!(empty_file, Err(ScanError::Validation(_))));

        let no_file = ScanRequest {
            device_id: "device-1".to_string(),
            file: None,
        };
        assert!(matches!(
            scan_label(&store, &vision, no_file).await,
            Err(ScanError::Validation(_))
        ));

        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }
}
