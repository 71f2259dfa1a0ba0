use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::database::report_repo;
use crate::database::timestamps::{format_timestamp, parse_timestamp};
use crate::models::{ReportRow, ReportStatus};
use crate::services::duplicate_service::{ExistingReport, ReportQuery, ReportQueryError};
use crate::services::geofence_service::{self, Coordinate};

/// [`ReportQuery`] over the `reports`/`locations` tables: bounding-box
/// prefilter in SQL, exact Haversine check here.
#[derive(Clone)]
pub struct SqliteReportQuery {
    pool: SqlitePool,
}

impl SqliteReportQuery {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportQuery for SqliteReportQuery {
    async fn find_reports_near(
        &self,
        point: Coordinate,
        proximity_m: f64,
        since: DateTime<Utc>,
        issue_type: &str,
        statuses: &[ReportStatus],
    ) -> Result<Vec<ExistingReport>, ReportQueryError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }

        let bbox = geofence_service::bounding_box(point, proximity_m);
        let rows = report_repo::list_open_reports_in_bbox(
            &self.pool,
            issue_type,
            &format_timestamp(since),
            statuses,
            bbox,
        )
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(to_existing_report)
            .filter(|r| geofence_service::haversine_m(point, r.coordinate) <= proximity_m)
            .collect())
    }
}

pub fn to_existing_report(row: ReportRow) -> Option<ExistingReport> {
    let status = ReportStatus::parse(&row.status);
    let created_at = parse_timestamp(&row.created_at);
    let location_id = Uuid::parse_str(&row.location_id).ok();

    match (status, created_at, location_id) {
        (Some(status), Some(created_at), Some(location_id)) => Some(ExistingReport {
            report_id: row.report_id,
            location_id,
            coordinate: Coordinate {
                latitude: row.latitude,
                longitude: row.longitude,
            },
            issue_type: row.issue_type,
            status,
            created_at,
        }),
        _ => {
            warn!(
                report_id = row.report_id,
                status = %row.status,
                created_at = %row.created_at,
                "skipping report row with unreadable fields"
            );
            None
        }
    }
}
