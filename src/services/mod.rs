pub mod duplicate_service;
pub mod geofence_service;
pub mod location_service;
pub mod report_service;
pub mod seed_service;
