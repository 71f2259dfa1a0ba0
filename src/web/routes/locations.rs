use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::services::location_service;
use crate::state::AppState;

pub async fn list_locations_handler(State(state): State<AppState>) -> Response {
    match location_service::list_locations(&state.pool).await {
        Ok(locations) => Json(locations).into_response(),
        Err(e) => {
            error!("Location list failed: {}", e);
            internal_error()
        }
    }
}

pub async fn location_detail_handler(
    State(state): State<AppState>,
    Path(location_id): Path<String>,
) -> Response {
    match location_service::get_location(&state.pool, &location_id).await {
        Ok(Some(location)) => Json(location).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "location_not_found" })),
        )
            .into_response(),
        Err(e) => {
            error!(location_id = %location_id, "Location lookup failed: {}", e);
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal" })),
    )
        .into_response()
}
