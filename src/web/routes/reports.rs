use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use crate::services::duplicate_service::DuplicateError;
use crate::services::geofence_service::Coordinate;
use crate::services::report_service::{self, SubmitError, SubmitReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitReportBody {
    pub reporter_id: String,
    pub location_id: String,
    pub issue_type: String,
    pub description: Option<String>,
    pub user_latitude: f64,
    pub user_longitude: f64,
    pub verifies_report_id: Option<i64>,
}

impl SubmitReportBody {
    fn into_request(self) -> SubmitReport {
        SubmitReport {
            reporter_id: self.reporter_id.trim().to_string(),
            location_id: self.location_id,
            issue_type: self.issue_type,
            description: self.description.unwrap_or_default(),
            user_coordinate: Coordinate {
                latitude: self.user_latitude,
                longitude: self.user_longitude,
            },
            verifies_report_id: self.verifies_report_id,
        }
    }
}

fn invalid_body_response(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid_body", "detail": rejection.body_text() })),
    )
        .into_response()
}

pub async fn submit_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReportBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return invalid_body_response(rejection),
    };
    if body.reporter_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing_reporter_id" })),
        )
            .into_response();
    }

    match report_service::submit_report(&state, body.into_request()).await {
        Ok(submitted) => (StatusCode::CREATED, Json(submitted)).into_response(),
        Err(e) => submit_error_response(e),
    }
}

pub async fn check_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitReportBody>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return invalid_body_response(rejection),
    };
    match report_service::check_report(&state, body.into_request()).await {
        Ok(check) => Json(json!({
            "geofence": {
                "within_radius": check.geofence.within_radius,
                "distance_m": check.geofence.distance_m,
                "radius_m": check.radius_m,
            },
            "duplicate": {
                "found": check.duplicate.found,
                "report_id": check.duplicate.report_id(),
            },
        }))
        .into_response(),
        Err(e) => submit_error_response(e),
    }
}

pub async fn report_detail_handler(
    State(state): State<AppState>,
    Path(report_id): Path<i64>,
) -> Response {
    match report_service::load_report_view(&state.pool, report_id).await {
        Ok(Some(view)) => Json(view).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => submit_error_response(e),
    }
}

fn submit_error_response(err: SubmitError) -> Response {
    let (status, body) = match &err {
        SubmitError::MissingIssueType => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "missing_issue_type" }),
        ),
        SubmitError::Geo(e) => (
            StatusCode::BAD_REQUEST,
            json!({ "error": "invalid_coordinate", "detail": e.to_string() }),
        ),
        SubmitError::LocationNotFound(_) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "location_not_found" }),
        ),
        SubmitError::ReportNotFound(id) => (
            StatusCode::NOT_FOUND,
            json!({ "error": "report_not_found", "report_id": id }),
        ),
        SubmitError::ReportClosed(id) => (
            StatusCode::CONFLICT,
            json!({ "error": "report_closed", "report_id": id }),
        ),
        SubmitError::SelfVerification(id) => (
            StatusCode::FORBIDDEN,
            json!({ "error": "self_verification", "report_id": id }),
        ),
        SubmitError::VerificationLocationMismatch(id) => (
            StatusCode::CONFLICT,
            json!({ "error": "verification_location_mismatch", "report_id": id }),
        ),
        SubmitError::AlreadyVerified(id) => (
            StatusCode::CONFLICT,
            json!({ "error": "already_verified", "report_id": id }),
        ),
        SubmitError::OutsideGeofence {
            distance_m,
            radius_m,
        } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "outside_geofence",
                "distance_m": distance_m,
                "radius_m": radius_m,
            }),
        ),
        SubmitError::Duplicate { existing_report_id } => (
            StatusCode::CONFLICT,
            json!({
                "error": "duplicate_report",
                "existing_report_id": existing_report_id,
            }),
        ),
        SubmitError::DuplicateCheck(DuplicateError::Query(e)) => {
            warn!("Duplicate check query failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "store_unavailable" }),
            )
        }
        SubmitError::DuplicateCheck(_) | SubmitError::Corrupt(_) | SubmitError::Database(_) => {
            error!("Report request failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "internal" }),
            )
        }
    };

    (status, Json(body)).into_response()
}
