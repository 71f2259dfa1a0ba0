use sqlx::{SqliteConnection, SqlitePool};

use crate::models::{ReportRow, ReportStatus};
use crate::services::geofence_service::BoundingBox;

const SQL_LOAD_REPORT: &str = r#"
SELECT
  r.report_id,
  r.reporter_id,
  r.location_id,
  l.name AS location_name,
  r.issue_type,
  r.description,
  r.status,
  l.latitude,
  l.longitude,
  r.reporter_latitude,
  r.reporter_longitude,
  r.verifies_report_id,
  r.points_awarded,
  r.created_at
FROM reports r
JOIN locations l
  ON l.location_id = r.location_id
WHERE r.report_id = ?1
LIMIT 1
"#;

pub async fn load_report(pool: &SqlitePool, report_id: i64) -> sqlx::Result<Option<ReportRow>> {
    sqlx::query_as::<_, ReportRow>(SQL_LOAD_REPORT)
        .bind(report_id)
        .fetch_optional(pool)
        .await
}

// Status set is passed as ",PENDING,VERIFIED," so the statement stays static.
const SQL_LIST_OPEN_REPORTS_IN_BBOX: &str = r#"
SELECT
  r.report_id,
  r.reporter_id,
  r.location_id,
  l.name AS location_name,
  r.issue_type,
  r.description,
  r.status,
  l.latitude,
  l.longitude,
  r.reporter_latitude,
  r.reporter_longitude,
  r.verifies_report_id,
  r.points_awarded,
  r.created_at
FROM reports r
JOIN locations l
  ON l.location_id = r.location_id
WHERE lower(trim(r.issue_type)) = lower(trim(?1))
  AND r.created_at >= ?2
  AND instr(?3, ',' || r.status || ',') > 0
  AND l.latitude BETWEEN ?4 AND ?5
  AND l.longitude BETWEEN ?6 AND ?7
ORDER BY r.created_at ASC, r.report_id ASC
"#;

pub async fn list_open_reports_in_bbox(
    pool: &SqlitePool,
    issue_type: &str,
    since: &str,
    statuses: &[ReportStatus],
    bbox: BoundingBox,
) -> sqlx::Result<Vec<ReportRow>> {
    let status_list = format!(
        ",{},",
        statuses
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    );

    sqlx::query_as::<_, ReportRow>(SQL_LIST_OPEN_REPORTS_IN_BBOX)
        .bind(issue_type)
        .bind(since)
        .bind(status_list)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .fetch_all(pool)
        .await
}

const SQL_HAS_VERIFIED: &str = r#"
SELECT EXISTS (
  SELECT 1
  FROM reports
  WHERE verifies_report_id = ?1
    AND reporter_id = ?2
)
"#;

pub async fn has_verified(
    pool: &SqlitePool,
    report_id: i64,
    reporter_id: &str,
) -> sqlx::Result<bool> {
    sqlx::query_scalar::<_, bool>(SQL_HAS_VERIFIED)
        .bind(report_id)
        .bind(reporter_id)
        .fetch_one(pool)
        .await
}

pub struct NewReport<'a> {
    pub reporter_id: &'a str,
    pub location_id: &'a str,
    pub issue_type: &'a str,
    pub description: &'a str,
    pub status: ReportStatus,
    pub reporter_latitude: Option<f64>,
    pub reporter_longitude: Option<f64>,
    pub verifies_report_id: Option<i64>,
    pub points_awarded: i64,
    pub created_at: &'a str,
}

const SQL_INSERT_REPORT: &str = r#"
INSERT INTO reports (
  reporter_id,
  location_id,
  issue_type,
  description,
  status,
  reporter_latitude,
  reporter_longitude,
  verifies_report_id,
  points_awarded,
  created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub async fn insert_report(conn: &mut SqliteConnection, report: NewReport<'_>) -> sqlx::Result<i64> {
    let res = sqlx::query(SQL_INSERT_REPORT)
        .bind(report.reporter_id)
        .bind(report.location_id)
        .bind(report.issue_type)
        .bind(report.description)
        .bind(report.status.as_str())
        .bind(report.reporter_latitude)
        .bind(report.reporter_longitude)
        .bind(report.verifies_report_id)
        .bind(report.points_awarded)
        .bind(report.created_at)
        .execute(conn)
        .await?;
    Ok(res.last_insert_rowid())
}

const SQL_TRANSITION_REPORT_STATUS: &str = r#"
UPDATE reports
SET status = ?3
WHERE report_id = ?1
  AND status = ?2
"#;

/// Moves a report from `from` to `to`; returns 0 if it was not in `from`.
pub async fn transition_report_status(
    conn: &mut SqliteConnection,
    report_id: i64,
    from: ReportStatus,
    to: ReportStatus,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_TRANSITION_REPORT_STATUS)
        .bind(report_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}
