use axum::{
    routing::{get, post},
    Json, Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::state::AppState;

pub mod routes;

use routes::{locations, reports};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/api/locations", get(locations::list_locations_handler))
        .route(
            "/api/locations/:location_id",
            get(locations::location_detail_handler),
        )
        .route("/api/reports", post(reports::submit_report_handler))
        .route("/api/reports/check", post(reports::check_report_handler))
        .route("/api/reports/:report_id", get(reports::report_detail_handler))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
