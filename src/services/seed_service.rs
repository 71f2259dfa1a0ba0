use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::location_repo;
use crate::database::timestamps::format_timestamp;

#[derive(Debug, Default)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

struct SeedLocation {
    name: &'static str,
    description: &'static str,
    latitude: f64,
    longitude: f64,
    location_type: &'static str,
}

const NAGPUR_LOCATIONS: &[SeedLocation] = &[
    SeedLocation {
        name: "Futala Lake Promenade",
        description: "Popular hangout spot near Futala Lake.",
        latitude: 21.1594,
        longitude: 79.0494,
        location_type: "PARK",
    },
    SeedLocation {
        name: "Sitabuldi Market Bin",
        description: "Main public bin at the market entrance.",
        latitude: 21.1432,
        longitude: 79.0799,
        location_type: "OTHER",
    },
    SeedLocation {
        name: "Nagpur Railway Station - Platform 1 Toilet",
        description: "Public toilet facility on the main platform.",
        latitude: 21.153,
        longitude: 79.092,
        location_type: "TOILET",
    },
    SeedLocation {
        name: "Zero Mile Stone",
        description: "Historic monument and surrounding area.",
        latitude: 21.146,
        longitude: 79.080,
        location_type: "PARK",
    },
    SeedLocation {
        name: "Sadar Bus Stand",
        description: "Main bus stand in the Sadar area.",
        latitude: 21.165,
        longitude: 79.085,
        location_type: "BUS_STAND",
    },
    SeedLocation {
        name: "Ambazari Lake Garden Entrance",
        description: "Main gate of the Ambazari Garden.",
        latitude: 21.139,
        longitude: 79.035,
        location_type: "PARK",
    },
    SeedLocation {
        name: "WHC Road Pothole Spot",
        description: "Segment of West High Court road known for frequent potholes.",
        latitude: 21.145,
        longitude: 79.055,
        location_type: "STREET",
    },
    SeedLocation {
        name: "NMC Head Office",
        description: "Main administrative building for the NMC.",
        latitude: 21.150,
        longitude: 79.082,
        location_type: "OTHER",
    },
];

/// Inserts the sample Nagpur locations that are not present yet (by name).
pub async fn seed_locations(pool: &SqlitePool) -> sqlx::Result<SeedReport> {
    let mut report = SeedReport::default();
    let created_at = format_timestamp(Utc::now());

    for loc in NAGPUR_LOCATIONS {
        if location_repo::find_location_id_by_name(pool, loc.name)
            .await?
            .is_some()
        {
            report.skipped += 1;
            continue;
        }

        let location_id = Uuid::new_v4().to_string();
        location_repo::insert_location(
            pool,
            location_repo::NewLocation {
                location_id: &location_id,
                name: loc.name,
                description: loc.description,
                latitude: loc.latitude,
                longitude: loc.longitude,
                location_type: loc.location_type,
                created_at: &created_at,
            },
        )
        .await?;
        report.inserted += 1;
    }

    info!(
        "📍 Location seed done: inserted={}, skipped={}",
        report.inserted, report.skipped
    );
    Ok(report)
}
