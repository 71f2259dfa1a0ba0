pub mod location_repo;
pub mod points_repo;
pub mod report_query;
pub mod report_repo;
pub mod schema;
pub mod timestamps;

pub use report_query::SqliteReportQuery;
