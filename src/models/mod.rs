pub mod locations;
pub mod report_status;
pub mod reports;

pub use locations::LocationRow;
pub use report_status::ReportStatus;
pub use reports::ReportRow;
