pub mod locations;
pub mod reports;
