use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::DuplicatePolicy;
use crate::database::timestamps::{format_timestamp, parse_timestamp};
use crate::database::{location_repo, points_repo, report_repo};
use crate::models::{LocationRow, ReportRow, ReportStatus};
use crate::services::duplicate_service::{DuplicateError, DuplicateMatch, ReportCandidate};
use crate::services::geofence_service::{self, Coordinate, GeoError, GeofenceResult};
use crate::state::AppState;

pub const INITIAL_REPORT_POINTS: i64 = 100;
pub const PEER_VERIFICATION_POINTS: i64 = 50;

#[derive(Debug, Clone)]
pub struct SubmitReport {
    pub reporter_id: String,
    pub location_id: String,
    pub issue_type: String,
    pub description: String,
    pub user_coordinate: Coordinate,
    pub verifies_report_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub report_id: i64,
    pub reporter_id: String,
    pub location_id: String,
    pub location_name: String,
    pub issue_type: String,
    pub description: String,
    pub status: ReportStatus,
    pub coordinate: Coordinate,
    pub verifies_report_id: Option<i64>,
    pub points_awarded: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmittedReport {
    pub report: ReportView,
    // Set when the duplicate policy is `warn` and a match was found.
    pub duplicate_of: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCheck {
    pub geofence: GeofenceResult,
    pub radius_m: f64,
    pub duplicate: DuplicateMatch,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("issue type must not be empty")]
    MissingIssueType,

    #[error("location {0} not found")]
    LocationNotFound(String),

    #[error("report {0} not found")]
    ReportNotFound(i64),

    #[error("report {0} is already closed")]
    ReportClosed(i64),

    #[error("report {0} belongs to the same reporter")]
    SelfVerification(i64),

    #[error("report {0} is for a different location")]
    VerificationLocationMismatch(i64),

    #[error("report {0} was already verified by this reporter")]
    AlreadyVerified(i64),

    #[error("{distance_m:.2} m from the location, limit is {radius_m} m")]
    OutsideGeofence { distance_m: f64, radius_m: f64 },

    #[error("duplicate of open report {existing_report_id}")]
    Duplicate { existing_report_id: i64 },

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error("duplicate check failed: {0}")]
    DuplicateCheck(DuplicateError),

    #[error("stored data is inconsistent: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<DuplicateError> for SubmitError {
    fn from(err: DuplicateError) -> Self {
        match err {
            DuplicateError::InvalidCoordinate(geo) => SubmitError::Geo(geo),
            other => SubmitError::DuplicateCheck(other),
        }
    }
}

pub async fn submit_report(
    state: &AppState,
    req: SubmitReport,
) -> Result<SubmittedReport, SubmitError> {
    let issue_type = req.issue_type.trim();
    if issue_type.is_empty() {
        return Err(SubmitError::MissingIssueType);
    }
    req.user_coordinate.validate()?;

    let (location, target) = load_target(&state.pool, &req.location_id).await?;
    let radius_m = state.geofence.max_reporting_distance_m;
    let geofence = geofence_service::check_within_radius(req.user_coordinate, target, radius_m)?;
    if !geofence.within_radius {
        info!(
            reporter_id = %req.reporter_id,
            location_id = %location.location_id,
            distance_m = geofence.distance_m,
            radius_m,
            "📍 report rejected: outside geofence"
        );
        return Err(SubmitError::OutsideGeofence {
            distance_m: geofence.distance_m,
            radius_m,
        });
    }

    let _guard = state.submit_lock.lock().await;
    let now = Utc::now();

    let (verifies_report_id, duplicate_of) = match req.verifies_report_id {
        Some(target_id) => {
            check_verification_target(&state.pool, &req, &location.location_id, target_id).await?;
            (Some(target_id), None)
        }
        None => {
            let candidate = ReportCandidate {
                reporter_coordinate: req.user_coordinate,
                target_coordinate: target,
                radius_m,
                issue_type: issue_type.to_string(),
                submitted_at: now,
            };
            let found = state
                .duplicate_filter
                .find_duplicate(
                    &candidate,
                    state.duplicates.window,
                    state.duplicates.proximity_m,
                )
                .await?;

            match found.report_id() {
                None => (None, None),
                Some(existing_report_id) => {
                    resolve_duplicate(state, &req, &location.location_id, existing_report_id)
                        .await?
                }
            }
        }
    };

    let award = if verifies_report_id.is_some() {
        Some((PEER_VERIFICATION_POINTS, "PEER_VERIFICATION"))
    } else if duplicate_of.is_some() {
        None
    } else {
        Some((INITIAL_REPORT_POINTS, "INITIAL_REPORT"))
    };
    let points = award.map(|(p, _)| p).unwrap_or(0);

    let created_at = format_timestamp(now);
    let mut tx = state.pool.begin().await?;

    let report_id = report_repo::insert_report(
        &mut *tx,
        report_repo::NewReport {
            reporter_id: &req.reporter_id,
            location_id: &location.location_id,
            issue_type,
            description: req.description.trim(),
            status: ReportStatus::Pending,
            reporter_latitude: Some(req.user_coordinate.latitude),
            reporter_longitude: Some(req.user_coordinate.longitude),
            verifies_report_id,
            points_awarded: points,
            created_at: &created_at,
        },
    )
    .await?;

    if let Some(target_id) = verifies_report_id {
        report_repo::transition_report_status(
            &mut *tx,
            target_id,
            ReportStatus::Pending,
            ReportStatus::Verified,
        )
        .await?;
    }

    if let Some((points, reason)) = award {
        points_repo::insert_point_log(
            &mut *tx,
            points_repo::NewPointLog {
                user_id: &req.reporter_id,
                points,
                reason,
                report_id,
                created_at: &created_at,
            },
        )
        .await?;
        points_repo::add_user_points(&mut *tx, &req.reporter_id, points).await?;
    }

    tx.commit().await?;
    drop(_guard);

    info!(
        report_id,
        reporter_id = %req.reporter_id,
        location_id = %location.location_id,
        issue_type,
        verifies_report_id = ?verifies_report_id,
        duplicate_of = ?duplicate_of,
        points,
        "report stored"
    );

    let report = load_report_view(&state.pool, report_id)
        .await?
        .ok_or_else(|| SubmitError::Corrupt(format!("report {report_id} vanished after insert")))?;

    Ok(SubmittedReport {
        report,
        duplicate_of,
    })
}

/// Runs the geofence and duplicate checks without writing anything.
pub async fn check_report(state: &AppState, req: SubmitReport) -> Result<ReportCheck, SubmitError> {
    let issue_type = req.issue_type.trim();
    if issue_type.is_empty() {
        return Err(SubmitError::MissingIssueType);
    }
    req.user_coordinate.validate()?;

    let (_location, target) = load_target(&state.pool, &req.location_id).await?;
    let radius_m = state.geofence.max_reporting_distance_m;
    let geofence = geofence_service::check_within_radius(req.user_coordinate, target, radius_m)?;

    let duplicate = if req.verifies_report_id.is_some() {
        DuplicateMatch::none()
    } else {
        let candidate = ReportCandidate {
            reporter_coordinate: req.user_coordinate,
            target_coordinate: target,
            radius_m,
            issue_type: issue_type.to_string(),
            submitted_at: Utc::now(),
        };
        state
            .duplicate_filter
            .find_duplicate(
                &candidate,
                state.duplicates.window,
                state.duplicates.proximity_m,
            )
            .await?
    };

    Ok(ReportCheck {
        geofence,
        radius_m,
        duplicate,
    })
}

pub async fn load_report_view(
    pool: &SqlitePool,
    report_id: i64,
) -> Result<Option<ReportView>, SubmitError> {
    let Some(row) = report_repo::load_report(pool, report_id).await? else {
        return Ok(None);
    };
    to_report_view(row).map(Some)
}

async fn load_target(
    pool: &SqlitePool,
    location_id: &str,
) -> Result<(LocationRow, Coordinate), SubmitError> {
    // Location ids are UUIDs stored in hyphenated lowercase form.
    let Ok(uuid) = Uuid::parse_str(location_id.trim()) else {
        return Err(SubmitError::LocationNotFound(location_id.to_string()));
    };
    let location_id = uuid.to_string();

    let location = location_repo::load_location(pool, &location_id)
        .await?
        .ok_or(SubmitError::LocationNotFound(location_id))?;

    let target = Coordinate::new(location.latitude, location.longitude).map_err(|e| {
        SubmitError::Corrupt(format!("location {}: {}", location.location_id, e))
    })?;

    Ok((location, target))
}

async fn check_verification_target(
    pool: &SqlitePool,
    req: &SubmitReport,
    location_id: &str,
    target_id: i64,
) -> Result<(), SubmitError> {
    let target = report_repo::load_report(pool, target_id)
        .await?
        .ok_or(SubmitError::ReportNotFound(target_id))?;

    let status = ReportStatus::parse(&target.status)
        .ok_or_else(|| SubmitError::Corrupt(format!("report {target_id} has status {}", target.status)))?;
    if status.is_terminal() {
        return Err(SubmitError::ReportClosed(target_id));
    }
    if target.reporter_id == req.reporter_id {
        return Err(SubmitError::SelfVerification(target_id));
    }
    if target.location_id != location_id {
        return Err(SubmitError::VerificationLocationMismatch(target_id));
    }
    if report_repo::has_verified(pool, target_id, &req.reporter_id).await? {
        return Err(SubmitError::AlreadyVerified(target_id));
    }
    Ok(())
}

/// Applies the configured policy to a detected duplicate. Returns
/// `(verifies_report_id, duplicate_of)` for the new report.
async fn resolve_duplicate(
    state: &AppState,
    req: &SubmitReport,
    location_id: &str,
    existing_report_id: i64,
) -> Result<(Option<i64>, Option<i64>), SubmitError> {
    match state.duplicates.policy {
        DuplicatePolicy::Reject => {
            info!(
                reporter_id = %req.reporter_id,
                existing_report_id,
                "report rejected: duplicate"
            );
            Err(SubmitError::Duplicate { existing_report_id })
        }
        DuplicatePolicy::Link => {
            match check_verification_target(&state.pool, req, location_id, existing_report_id)
                .await
            {
                Ok(()) => Ok((Some(existing_report_id), None)),
                // Own reports and neighbouring locations cannot be linked.
                Err(
                    SubmitError::SelfVerification(_)
                    | SubmitError::VerificationLocationMismatch(_),
                ) => {
                    info!(
                        reporter_id = %req.reporter_id,
                        existing_report_id,
                        "report rejected: duplicate cannot be linked"
                    );
                    Err(SubmitError::Duplicate { existing_report_id })
                }
                Err(e) => Err(e),
            }
        }
        DuplicatePolicy::Warn => Ok((None, Some(existing_report_id))),
    }
}

fn to_report_view(row: ReportRow) -> Result<ReportView, SubmitError> {
    let status = ReportStatus::parse(&row.status).ok_or_else(|| {
        SubmitError::Corrupt(format!("report {} has status {}", row.report_id, row.status))
    })?;
    let created_at = parse_timestamp(&row.created_at).ok_or_else(|| {
        SubmitError::Corrupt(format!(
            "report {} has timestamp {}",
            row.report_id, row.created_at
        ))
    })?;

    Ok(ReportView {
        report_id: row.report_id,
        reporter_id: row.reporter_id,
        location_id: row.location_id,
        location_name: row.location_name,
        issue_type: row.issue_type,
        description: row.description,
        status,
        coordinate: Coordinate {
            latitude: row.latitude,
            longitude: row.longitude,
        },
        verifies_report_id: row.verifies_report_id,
        points_awarded: row.points_awarded,
        created_at,
    })
}
