use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::db::queries;
use crate::models::wine::{ListWinesParams, NewWine, WineResponse};

/// POST /add_wine — Save a wine for a device.
pub async fn add_wine(
    State(state): State<AppState>,
    payload: Result<Json<NewWine>, JsonRejection>,
) -> Response {
    let wine = match payload {
        Ok(Json(wine)) => wine,
        Err(JsonRejection::MissingJsonContentType(_)) => {
            return (StatusCode::BAD_REQUEST, "Bad Request: Expected JSON").into_response();
        }
        Err(rejection) => {
            return (StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    if !wine.has_required_fields() {
        tracing::debug!("Rejected wine with missing fields");
        return (
            StatusCode::BAD_REQUEST,
            "Missing required fields: device_id, name, date_purchased",
        )
            .into_response();
    }

    if let Err(report) = wine.validate() {
        tracing::debug!(error = %report, "Rejected wine with invalid fields");
        return (
            StatusCode::BAD_REQUEST,
            format!("Invalid wine fields: {}", report),
        )
            .into_response();
    }

    match queries::insert_wine(&state.db, &wine).await {
        Ok(saved) => {
            tracing::info!(wine_id = %saved.id, device_id = %saved.device_id, "Wine saved");
            Json(WineResponse::ok()).into_response()
        }
        Err(e) => {
            tracing::error!(device_id = %wine.device_id, error = %e, "Database insert failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WineResponse::error(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /list_wines?device_id=... — Wines saved for a device, newest first.
pub async fn list_wines(
    State(state): State<AppState>,
    Query(params): Query<ListWinesParams>,
) -> Response {
    let Some(device_id) = params.device_id.filter(|d| !d.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing device_id parameter").into_response();
    };

    match queries::list_wines(&state.db, &device_id).await {
        Ok(wines) => Json(wines).into_response(),
        Err(e) => {
            tracing::error!(device_id = %device_id, error = %e, "Database query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WineResponse::error(e.to_string())),
            )
                .into_response()
        }
    }
}
