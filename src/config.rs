//! Runtime settings from environment variables
//!
//! | Variable                | Default                                                  |
//! |-------------------------|----------------------------------------------------------|
//! | `DATABASE_URL`          | `postgresql://localhost:5432/carbon_tracker`             |
//! | `ORS_API_KEY`           | unset                                                    |
//! | `EMISSION_FACTORS_PATH` | `data/emission_factors.json`                             |
//! | `LOCATIONS_PATH`        | unset (built-in airports only)                           |
//! | `DISTANCE_TIMEOUT_SECS` | `10`                                                     |

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATABASE_URL: &str = "postgresql://localhost:5432/carbon_tracker";
pub const DEFAULT_FACTORS_PATH: &str = "data/emission_factors.json";
pub const DEFAULT_DISTANCE_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Connection string handed to the persistence adapter
    pub database_url: String,
    /// Key for a hosted routing service, if one is plugged in
    pub distance_api_key: Option<String>,
    pub emission_factors_path: PathBuf,
    pub locations_path: Option<PathBuf>,
    pub distance_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            distance_api_key: None,
            emission_factors_path: PathBuf::from(DEFAULT_FACTORS_PATH),
            locations_path: None,
            distance_timeout: Duration::from_secs(DEFAULT_DISTANCE_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup
    ///
    /// Empty values count as unset. An unparsable timeout falls back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let emission_factors_path = get("EMISSION_FACTORS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FACTORS_PATH));

        let timeout_secs = match get("DISTANCE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Invalid DISTANCE_TIMEOUT_SECS '{}', using {}s",
                    raw,
                    DEFAULT_DISTANCE_TIMEOUT_SECS
                );
                DEFAULT_DISTANCE_TIMEOUT_SECS
            }),
            None => DEFAULT_DISTANCE_TIMEOUT_SECS,
        };

        Self {
            database_url,
            distance_api_key: get("ORS_API_KEY"),
            emission_factors_path,
            locations_path: get("LOCATIONS_PATH").map(PathBuf::from),
            distance_timeout: Duration::from_secs(timeout_secs),
        }
    }
}
