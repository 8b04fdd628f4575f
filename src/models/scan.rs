use axum::body::Bytes;
use serde::Serialize;

use crate::models::label::ExtractedWineFields;

/// The `file` part of a scan upload.
#[derive(Debug, Clone)]
pub struct LabelUpload {
    pub bytes: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// A label scan as received from the client.
///
/// Fields are optional here so that the pipeline, not the HTTP layer,
/// decides what a complete request is.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub device_id: String,
    pub file: Option<LabelUpload>,
}

/// Successful scan response.
///
/// `region`, `alcohol` and `notes` are never extracted and are always
/// empty; they exist so the client can prefill its form from one object.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScanResult {
    pub ok: bool,
    pub device_id: String,
    pub name: String,
    pub producer: String,
    pub varietal: String,
    pub vintage: Option<i32>,
    pub region: String,
    pub alcohol: String,
    pub notes: String,
    pub label_image_url: String,
}

impl ScanResult {
    pub fn new(device_id: String, fields: ExtractedWineFields, label_image_url: String) -> Self {
        Self {
            ok: true,
            device_id,
            name: fields.name,
            producer: fields.producer,
            varietal: fields
                .varietal
                .map(|v| v.to_string())
                .unwrap_or_default(),
            vintage: fields.vintage,
            region: String::new(),
            alcohol: String::new(),
            notes: String::new(),
            label_image_url,
        }
    }
}

/// Failed scan response body.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub ok: bool,
    pub error: String,
}

impl ScanFailure {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
