use sqlx::{SqliteConnection, SqlitePool};

const SQL_INSERT_POINT_LOG: &str = r#"
INSERT INTO point_log (
  user_id,
  points,
  reason,
  report_id,
  created_at
) VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub struct NewPointLog<'a> {
    pub user_id: &'a str,
    pub points: i64,
    pub reason: &'a str, // INITIAL_REPORT|PEER_VERIFICATION
    pub report_id: i64,
    pub created_at: &'a str,
}

pub async fn insert_point_log(
    conn: &mut SqliteConnection,
    entry: NewPointLog<'_>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_POINT_LOG)
        .bind(entry.user_id)
        .bind(entry.points)
        .bind(entry.reason)
        .bind(entry.report_id)
        .bind(entry.created_at)
        .execute(conn)
        .await?;
    Ok(())
}

const SQL_ADD_USER_POINTS: &str = r#"
INSERT INTO users (user_id, total_points)
VALUES (?1, ?2)
ON CONFLICT (user_id) DO UPDATE SET total_points = total_points + excluded.total_points
"#;

pub async fn add_user_points(
    conn: &mut SqliteConnection,
    user_id: &str,
    points: i64,
) -> sqlx::Result<()> {
    sqlx::query(SQL_ADD_USER_POINTS)
        .bind(user_id)
        .bind(points)
        .execute(conn)
        .await?;
    Ok(())
}

const SQL_LOAD_USER_POINTS: &str = r#"
SELECT total_points
FROM users
WHERE user_id = ?1
LIMIT 1
"#;

pub async fn load_user_points(pool: &SqlitePool, user_id: &str) -> sqlx::Result<Option<i64>> {
    sqlx::query_scalar::<_, i64>(SQL_LOAD_USER_POINTS)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}
