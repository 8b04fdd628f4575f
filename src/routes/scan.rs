use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::app_state::AppState;
use crate::models::scan::{LabelUpload, ScanFailure, ScanRequest};
use crate::services::scan::{self, ScanError};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /scan_wine — Scan a label photo and return the guessed wine fields.
///
/// Multipart fields: `file` (image) and `device_id`.
pub async fn scan_wine(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected non-multipart scan request");
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };

    let request = match read_scan_request(&mut multipart).await {
        Ok(r) => r,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match scan::scan_label(state.storage.as_ref(), state.vision.as_ref(), request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn read_scan_request(multipart: &mut Multipart) -> Result<ScanRequest, String> {
    let mut request = ScanRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Malformed multipart body: {}", e))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            // Only the first file part counts.
            Some("file") if request.file.is_some() => {}
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let declared_type = field.content_type().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file: {}", e))?;

                request.file = Some(LabelUpload {
                    content_type: resolve_content_type(declared_type.as_deref(), &bytes),
                    file_name,
                    bytes,
                });
            }
            Some("device_id") => {
                request.device_id = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read device_id: {}", e))?;
            }
            _ => {}
        }
    }

    Ok(request)
}

/// Declared part type, else sniffed from the image header.
fn resolve_content_type(declared: Option<&str>, bytes: &Bytes) -> String {
    match declared {
        Some(ct) if !ct.trim().is_empty() => ct.to_string(),
        _ => image::guess_format(bytes)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_string()),
    }
}

impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        match self {
            ScanError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ScanFailure::new(other.to_string())),
            )
                .into_response(),
        }
    }
}
