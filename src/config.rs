use std::env;

use chrono::Duration;
use thiserror::Error;

use crate::services::duplicate_service::{DEFAULT_PROXIMITY_M, DEFAULT_WINDOW_DAYS};

pub const DEFAULT_MAX_REPORTING_DISTANCE_M: f64 = 50.0;
pub const MAX_DUPLICATE_WINDOW_DAYS: i64 = 3650;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set (e.g. in .env)")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// What to do when a new report duplicates an open one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    Reject,
    Link,
    Warn,
}

impl DuplicatePolicy {
    pub fn parse(input: &str) -> Option<DuplicatePolicy> {
        match input.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(DuplicatePolicy::Reject),
            "link" => Some(DuplicatePolicy::Link),
            "warn" => Some(DuplicatePolicy::Warn),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceSettings {
    pub max_reporting_distance_m: f64,
}

impl Default for GeofenceSettings {
    fn default() -> Self {
        Self {
            max_reporting_distance_m: DEFAULT_MAX_REPORTING_DISTANCE_M,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateSettings {
    pub window: Duration,
    pub proximity_m: f64,
    pub policy: DuplicatePolicy,
}

impl Default for DuplicateSettings {
    fn default() -> Self {
        Self {
            window: Duration::days(DEFAULT_WINDOW_DAYS),
            proximity_m: DEFAULT_PROXIMITY_M,
            policy: DuplicatePolicy::Reject,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub geofence: GeofenceSettings,
    pub duplicates: DuplicateSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from any key lookup; `from_env` passes the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match get("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: v.clone(),
                reason: "expected a port number",
            })?,
            None => 3000,
        };

        let max_reporting_distance_m = parse_positive_f64(
            "MAX_REPORTING_DISTANCE_METERS",
            get("MAX_REPORTING_DISTANCE_METERS"),
            DEFAULT_MAX_REPORTING_DISTANCE_M,
        )?;

        let window = match get("DUPLICATE_WINDOW_DAYS") {
            Some(v) => match v.trim().parse::<i64>() {
                Ok(days) if days > 0 && days <= MAX_DUPLICATE_WINDOW_DAYS => {
                    Duration::try_days(days).ok_or(ConfigError::Invalid {
                        key: "DUPLICATE_WINDOW_DAYS",
                        value: v.clone(),
                        reason: "out of range",
                    })?
                }
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DUPLICATE_WINDOW_DAYS",
                        value: v,
                        reason: "expected a whole number of days between 1 and 3650",
                    })
                }
            },
            None => Duration::days(DEFAULT_WINDOW_DAYS),
        };

        let proximity_m = parse_positive_f64(
            "DUPLICATE_PROXIMITY_METERS",
            get("DUPLICATE_PROXIMITY_METERS"),
            DEFAULT_PROXIMITY_M,
        )?;

        let policy = match get("DUPLICATE_POLICY") {
            Some(v) => DuplicatePolicy::parse(&v).ok_or(ConfigError::Invalid {
                key: "DUPLICATE_POLICY",
                value: v.clone(),
                reason: "expected reject, link or warn",
            })?,
            None => DuplicatePolicy::Reject,
        };

        Ok(Settings {
            database_url,
            host,
            port,
            geofence: GeofenceSettings {
                max_reporting_distance_m,
            },
            duplicates: DuplicateSettings {
                window,
                proximity_m,
                policy,
            },
        })
    }
}

fn parse_positive_f64(
    key: &'static str,
    raw: Option<String>,
    default: f64,
) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw,
            reason: "expected a positive number of meters",
        }),
    }
}
