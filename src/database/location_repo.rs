use sqlx::SqlitePool;

use crate::models::LocationRow;

const SQL_LOAD_LOCATION: &str = r#"
SELECT
  location_id,
  name,
  description,
  latitude,
  longitude,
  location_type
FROM locations
WHERE location_id = ?1
LIMIT 1
"#;

pub async fn load_location(
    pool: &SqlitePool,
    location_id: &str,
) -> sqlx::Result<Option<LocationRow>> {
    sqlx::query_as::<_, LocationRow>(SQL_LOAD_LOCATION)
        .bind(location_id)
        .fetch_optional(pool)
        .await
}

const SQL_LIST_LOCATIONS: &str = r#"
SELECT
  location_id,
  name,
  description,
  latitude,
  longitude,
  location_type
FROM locations
ORDER BY name ASC, location_id ASC
"#;

pub async fn list_locations(pool: &SqlitePool) -> sqlx::Result<Vec<LocationRow>> {
    sqlx::query_as::<_, LocationRow>(SQL_LIST_LOCATIONS)
        .fetch_all(pool)
        .await
}

const SQL_FIND_LOCATION_ID_BY_NAME: &str = r#"
SELECT location_id
FROM locations
WHERE lower(name) = lower(?1)
LIMIT 1
"#;

pub async fn find_location_id_by_name(
    pool: &SqlitePool,
    name: &str,
) -> sqlx::Result<Option<String>> {
    sqlx::query_scalar::<_, String>(SQL_FIND_LOCATION_ID_BY_NAME)
        .bind(name)
        .fetch_optional(pool)
        .await
}

pub struct NewLocation<'a> {
    pub location_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub location_type: &'a str, // TOILET|BUS_STAND|PARK|STREET|OTHER
    pub created_at: &'a str,
}

const SQL_INSERT_LOCATION: &str = r#"
INSERT INTO locations (
  location_id,
  name,
  description,
  latitude,
  longitude,
  location_type,
  created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub async fn insert_location(pool: &SqlitePool, loc: NewLocation<'_>) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_LOCATION)
        .bind(loc.location_id)
        .bind(loc.name)
        .bind(loc.description)
        .bind(loc.latitude)
        .bind(loc.longitude)
        .bind(loc.location_type)
        .bind(loc.created_at)
        .execute(pool)
        .await?;
    Ok(())
}
