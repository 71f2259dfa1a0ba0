use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::location_repo;
use crate::models::LocationRow;

/// All locations, ordered by name.
pub async fn list_locations(pool: &SqlitePool) -> sqlx::Result<Vec<LocationRow>> {
    location_repo::list_locations(pool).await
}

/// Looks up a location by UUID, e.g. the id encoded in its QR code. Ids that
/// are not UUIDs are treated as unknown.
pub async fn get_location(pool: &SqlitePool, location_id: &str) -> sqlx::Result<Option<LocationRow>> {
    let Ok(uuid) = Uuid::parse_str(location_id.trim()) else {
        return Ok(None);
    };
    location_repo::load_location(pool, &uuid.to_string()).await
}
