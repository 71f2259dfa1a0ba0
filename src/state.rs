use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::config::{DuplicateSettings, GeofenceSettings};
use crate::database::SqliteReportQuery;
use crate::models::ReportStatus;
use crate::services::duplicate_service::{DuplicateError, DuplicateFilter};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub geofence: GeofenceSettings,
    pub duplicates: DuplicateSettings,
    pub duplicate_filter: DuplicateFilter,
    // Serializes duplicate-check-then-insert within this process.
    pub submit_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        geofence: GeofenceSettings,
        duplicates: DuplicateSettings,
    ) -> Result<Self, DuplicateError> {
        let duplicate_filter = DuplicateFilter::builder()
            .query(Arc::new(SqliteReportQuery::new(pool.clone())))
            .open_statuses(ReportStatus::OPEN)
            .build()?;

        Ok(Self {
            pool,
            geofence,
            duplicates,
            duplicate_filter,
            submit_lock: Arc::new(Mutex::new(())),
        })
    }
}
