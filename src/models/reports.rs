// Report row joined with its location's coordinate.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub report_id: i64,
    pub reporter_id: String,
    pub location_id: String,
    pub location_name: String,
    pub issue_type: String,
    pub description: String,
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
    pub reporter_latitude: Option<f64>,
    pub reporter_longitude: Option<f64>,
    pub verifies_report_id: Option<i64>,
    pub points_awarded: i64,
    pub created_at: String,
}
