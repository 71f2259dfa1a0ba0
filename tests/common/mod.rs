#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use civic_reports::config::{DuplicatePolicy, DuplicateSettings, GeofenceSettings};
use civic_reports::database::timestamps::format_timestamp;
use civic_reports::database::{location_repo, report_repo, schema};
use civic_reports::models::ReportStatus;
use civic_reports::services::geofence_service::Coordinate;
use civic_reports::services::report_service::SubmitReport;
use civic_reports::state::AppState;

/// Futala Lake Promenade, Nagpur.
pub const FUTALA: Coordinate = Coordinate {
    latitude: 21.1594,
    longitude: 79.0494,
};

// One degree of latitude on the Haversine sphere.
pub const METERS_PER_DEGREE_LAT: f64 = 111_194.93;

pub fn north_of(origin: Coordinate, meters: f64) -> Coordinate {
    Coordinate {
        latitude: origin.latitude + meters / METERS_PER_DEGREE_LAT,
        longitude: origin.longitude,
    }
}

pub fn east_of(origin: Coordinate, meters: f64) -> Coordinate {
    Coordinate {
        latitude: origin.latitude,
        longitude: origin.longitude
            + meters / (METERS_PER_DEGREE_LAT * origin.latitude.to_radians().cos()),
    }
}

/// In-memory database; one connection so every query sees the same data.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    schema::migrate(&pool).await.expect("schema");
    pool
}

pub async fn add_location(pool: &SqlitePool, name: &str, at: Coordinate) -> String {
    let location_id = Uuid::new_v4().to_string();
    location_repo::insert_location(
        pool,
        location_repo::NewLocation {
            location_id: &location_id,
            name,
            description: "",
            latitude: at.latitude,
            longitude: at.longitude,
            location_type: "PARK",
            created_at: &format_timestamp(Utc::now()),
        },
    )
    .await
    .expect("insert location");
    location_id
}

/// Stores a report directly, bypassing the submission checks.
pub async fn add_report(
    pool: &SqlitePool,
    reporter_id: &str,
    location_id: &str,
    issue_type: &str,
    status: ReportStatus,
    created_at: DateTime<Utc>,
) -> i64 {
    let mut conn = pool.acquire().await.expect("connection");
    report_repo::insert_report(
        &mut *conn,
        report_repo::NewReport {
            reporter_id,
            location_id,
            issue_type,
            description: "",
            status,
            reporter_latitude: None,
            reporter_longitude: None,
            verifies_report_id: None,
            points_awarded: 0,
            created_at: &format_timestamp(created_at),
        },
    )
    .await
    .expect("insert report")
}

pub fn app_state(pool: SqlitePool, policy: DuplicatePolicy) -> AppState {
    AppState::new(
        pool,
        GeofenceSettings::default(),
        DuplicateSettings {
            policy,
            ..DuplicateSettings::default()
        },
    )
    .expect("duplicate filter")
}

pub fn report_request(
    reporter_id: &str,
    location_id: &str,
    issue_type: &str,
    at: Coordinate,
) -> SubmitReport {
    SubmitReport {
        reporter_id: reporter_id.to_string(),
        location_id: location_id.to_string(),
        issue_type: issue_type.to_string(),
        description: "overflowing".to_string(),
        user_coordinate: at,
        verifies_report_id: None,
    }
}

pub async fn count_reports(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM reports")
        .fetch_one(pool)
        .await
        .expect("count")
}
