use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::models::label::VisionAnnotations;

/// Google Cloud Vision `images:annotate` REST endpoint.
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Longest slice of an error response body kept in `VisionError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// OCR + label detection for a single image.
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn annotate(&self, image_bytes: &[u8]) -> Result<VisionAnnotations, VisionError>;
}

/// Client for the Google Cloud Vision REST API.
///
/// Requests are bounded by a timeout and never retried: a failed OCR call
/// goes straight back to the user.
pub struct GoogleVisionClient {
    http: Client,
    endpoint: String,
    api_key: String,
    max_labels: u32,
}

#[derive(Serialize)]
struct AnnotateRequest<'a> {
    requests: [AnnotateImageRequest<'a>; 1],
}

#[derive(Serialize)]
struct AnnotateImageRequest<'a> {
    image: ImageContent,
    features: [Feature<'a>; 2],
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    #[serde(rename = "maxResults", skip_serializing_if = "Option::is_none")]
    max_results: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    full_text_annotation: Option<TextAnnotation>,
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

#[derive(Debug, Default, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Default, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl GoogleVisionClient {
    pub fn new(
        endpoint: &str,
        api_key: &str,
        timeout: Duration,
        max_labels: u32,
    ) -> Result<Self, VisionError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VisionError::Http(e.without_url()))?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            max_labels,
        })
    }
}

#[async_trait]
impl VisionService for GoogleVisionClient {
    async fn annotate(&self, image_bytes: &[u8]) -> Result<VisionAnnotations, VisionError> {
        let request_body = annotate_request(image_bytes, self.max_labels);

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| VisionError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VisionError::Http(e.without_url()))?;
        parse_annotations(&bytes)
    }
}

fn annotate_request(image_bytes: &[u8], max_labels: u32) -> AnnotateRequest<'static> {
    AnnotateRequest {
        requests: [AnnotateImageRequest {
            image: ImageContent {
                content: base64::engine::general_purpose::STANDARD.encode(image_bytes),
            },
            features: [
                Feature {
                    kind: "TEXT_DETECTION",
                    max_results: None,
                },
                Feature {
                    kind: "LABEL_DETECTION",
                    max_results: Some(max_labels),
                },
            ],
        }],
    }
}

/// Decode an `images:annotate` body, defaulting anything missing to empty.
fn parse_annotations(body: &[u8]) -> Result<VisionAnnotations, VisionError> {
    let parsed: AnnotateResponse = serde_json::from_slice(body).map_err(VisionError::Parse)?;

    let Some(first) = parsed.responses.into_iter().next() else {
        return Ok(VisionAnnotations::default());
    };

    if let Some(error) = first.error {
        return Err(VisionError::Api {
            code: error.code,
            message: error.message,
        });
    }

    Ok(VisionAnnotations {
        full_text: first
            .full_text_annotation
            .map(|t| t.text)
            .unwrap_or_default(),
        label_descriptions: first
            .label_annotations
            .into_iter()
            .map(|l| l.description.to_lowercase())
            .collect(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// Transport failure. The request URL carries the API key, so it is
    /// stripped before the error is stored.
    #[error("Vision request failed: {0}")]
    Http(reqwest::Error),

    #[error("Vision API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse Vision API response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Vision API error {code}: {message}")]
    Api { code: i32, message: String },
}
