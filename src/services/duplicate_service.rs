//! Spatio-temporal duplicate detection for new reports.
//!
//! The filter never touches storage directly. It asks a [`ReportQuery`] for
//! candidates and re-applies the full predicate to whatever comes back, so the
//! result only depends on the query contract, not on how faithfully a given
//! store implements it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::ReportStatus;
use crate::services::geofence_service::{haversine_m, Coordinate, GeoError};

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_PROXIMITY_M: f64 = 10.0;

/// Read-only view of a persisted report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExistingReport {
    pub report_id: i64,
    pub location_id: Uuid,
    pub coordinate: Coordinate,
    pub issue_type: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// A report about to be created.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCandidate {
    pub reporter_coordinate: Coordinate,
    pub target_coordinate: Coordinate,
    pub radius_m: f64,
    pub issue_type: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub found: bool,
    pub existing: Option<ExistingReport>,
}

impl DuplicateMatch {
    pub fn none() -> Self {
        Self {
            found: false,
            existing: None,
        }
    }

    pub fn of(report: ExistingReport) -> Self {
        Self {
            found: true,
            existing: Some(report),
        }
    }

    pub fn report_id(&self) -> Option<i64> {
        self.existing.as_ref().map(|r| r.report_id)
    }
}

#[derive(Debug, Clone, Error)]
#[error("report query failed: {0}")]
pub struct ReportQueryError(pub String);

impl From<sqlx::Error> for ReportQueryError {
    fn from(err: sqlx::Error) -> Self {
        ReportQueryError(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum DuplicateError {
    #[error("duplicate filter misconfigured: {0}")]
    Configuration(String),

    #[error(transparent)]
    InvalidCoordinate(#[from] GeoError),

    #[error(transparent)]
    Query(#[from] ReportQueryError),
}

/// Access to existing reports filtered by category, status, time and space.
///
/// Implementations return reports with a matching issue type (ASCII
/// case-insensitive), `created_at >= since`, a status in `statuses`, and a
/// great-circle distance to `point` of at most `proximity_m`. Ordering is not
/// part of the contract.
#[async_trait]
pub trait ReportQuery: Send + Sync {
    async fn find_reports_near(
        &self,
        point: Coordinate,
        proximity_m: f64,
        since: DateTime<Utc>,
        issue_type: &str,
        statuses: &[ReportStatus],
    ) -> Result<Vec<ExistingReport>, ReportQueryError>;
}

#[derive(Default)]
pub struct DuplicateFilterBuilder {
    query: Option<Arc<dyn ReportQuery>>,
    open_statuses: Option<Vec<ReportStatus>>,
}

impl DuplicateFilterBuilder {
    pub fn query(mut self, query: Arc<dyn ReportQuery>) -> Self {
        self.query = Some(query);
        self
    }

    pub fn open_statuses(mut self, statuses: impl IntoIterator<Item = ReportStatus>) -> Self {
        self.open_statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn default_open_statuses(self) -> Self {
        self.open_statuses(ReportStatus::OPEN)
    }

    pub fn build(self) -> Result<DuplicateFilter, DuplicateError> {
        let query = self.query.ok_or_else(|| {
            DuplicateError::Configuration("report query is not configured".to_string())
        })?;
        let requested = self.open_statuses.ok_or_else(|| {
            DuplicateError::Configuration("open status set is not configured".to_string())
        })?;

        if requested.is_empty() {
            return Err(DuplicateError::Configuration(
                "open status set is empty".to_string(),
            ));
        }
        if let Some(s) = requested.iter().find(|s| s.is_terminal()) {
            return Err(DuplicateError::Configuration(format!(
                "terminal status {} cannot be in the open set",
                s.as_str()
            )));
        }
        let mut open_statuses: Vec<ReportStatus> = Vec::with_capacity(requested.len());
        for status in requested {
            if !open_statuses.contains(&status) {
                open_statuses.push(status);
            }
        }

        Ok(DuplicateFilter {
            query,
            open_statuses,
        })
    }
}

#[derive(Clone)]
pub struct DuplicateFilter {
    query: Arc<dyn ReportQuery>,
    open_statuses: Vec<ReportStatus>,
}

impl DuplicateFilter {
    pub fn builder() -> DuplicateFilterBuilder {
        DuplicateFilterBuilder::default()
    }

    pub fn open_statuses(&self) -> &[ReportStatus] {
        &self.open_statuses
    }

    /// Returns the earliest open report of the same issue type within
    /// `proximity_m` of the candidate's target, created no earlier than
    /// `window` before the candidate's submission time.
    pub async fn find_duplicate(
        &self,
        candidate: &ReportCandidate,
        window: Duration,
        proximity_m: f64,
    ) -> Result<DuplicateMatch, DuplicateError> {
        if window <= Duration::zero() {
            return Err(DuplicateError::Configuration(format!(
                "search window must be positive, got {}s",
                window.num_seconds()
            )));
        }
        if !(proximity_m.is_finite() && proximity_m > 0.0) {
            return Err(DuplicateError::Configuration(format!(
                "proximity must be positive, got {proximity_m}"
            )));
        }
        candidate.target_coordinate.validate()?;

        let since = candidate
            .submitted_at
            .checked_sub_signed(window)
            .ok_or_else(|| {
                DuplicateError::Configuration(format!(
                    "search window of {}s reaches past the representable time range",
                    window.num_seconds()
                ))
            })?;
        let issue_type = candidate.issue_type.trim();
        let rows = self
            .query
            .find_reports_near(
                candidate.target_coordinate,
                proximity_m,
                since,
                issue_type,
                &self.open_statuses,
            )
            .await?;

        let earliest = rows
            .into_iter()
            .filter(|r| {
                r.issue_type.trim().eq_ignore_ascii_case(issue_type)
                    && r.created_at >= since
                    && self.open_statuses.contains(&r.status)
                    && haversine_m(candidate.target_coordinate, r.coordinate) <= proximity_m
            })
            .min_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then(a.report_id.cmp(&b.report_id))
            });

        debug!(
            issue_type,
            proximity_m,
            since = %since,
            duplicate_of = ?earliest.as_ref().map(|r| r.report_id),
            "duplicate check"
        );

        Ok(earliest.map(DuplicateMatch::of).unwrap_or_else(DuplicateMatch::none))
    }
}
