use sqlx::SqlitePool;

const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS locations (
  location_id TEXT PRIMARY KEY,
  name TEXT NOT NULL,
  description TEXT NOT NULL DEFAULT '',
  latitude REAL NOT NULL,
  longitude REAL NOT NULL,
  location_type TEXT NOT NULL DEFAULT 'OTHER',
  created_at TEXT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS reports (
  report_id INTEGER PRIMARY KEY AUTOINCREMENT,
  reporter_id TEXT NOT NULL,
  location_id TEXT NOT NULL REFERENCES locations (location_id),
  issue_type TEXT NOT NULL,
  description TEXT NOT NULL DEFAULT '',
  status TEXT NOT NULL DEFAULT 'PENDING',
  reporter_latitude REAL,
  reporter_longitude REAL,
  verifies_report_id INTEGER REFERENCES reports (report_id),
  points_awarded INTEGER NOT NULL DEFAULT 0,
  created_at TEXT NOT NULL
)
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_reports_issue_created
  ON reports (issue_type, created_at)
"#,
    r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_reports_one_verification_per_reporter
  ON reports (verifies_report_id, reporter_id)
  WHERE verifies_report_id IS NOT NULL
"#,
    r#"
CREATE INDEX IF NOT EXISTS idx_locations_lat_lon
  ON locations (latitude, longitude)
"#,
    r#"
CREATE TABLE IF NOT EXISTS users (
  user_id TEXT PRIMARY KEY,
  total_points INTEGER NOT NULL DEFAULT 0
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS point_log (
  point_log_id INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id TEXT NOT NULL,
  points INTEGER NOT NULL,
  reason TEXT NOT NULL,
  report_id INTEGER REFERENCES reports (report_id),
  created_at TEXT NOT NULL
)
"#,
];

pub async fn migrate(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
