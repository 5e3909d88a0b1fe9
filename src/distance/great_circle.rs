//! Great-circle distance over a location gazetteer
//!
//! Locations resolve in this order:
//! 1. literal coordinates, `"lat,lon"` in decimal degrees
//! 2. IATA airport code (case-insensitive)
//! 3. place name (case-insensitive, surrounding whitespace ignored)
//!
//! The distance is the haversine distance on a sphere of mean Earth radius.
//! Flights are longer than the great circle, so this is a lower bound.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{DistanceError, DistanceEstimator};

/// Mean Earth radius (IUGG), km
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }

    /// Parse `"lat,lon"`
    pub fn parse(s: &str) -> Option<Self> {
        let (lat, lon) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        Self::new(lat, lon)
    }
}

/// Named gazetteer entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// IATA code, e.g. `LHR`
    pub code: String,
    /// Place name, e.g. `London`
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Airports served by the built-in gazetteer: (IATA, city, lat, lon)
static AIRPORTS: &[(&str, &str, f64, f64)] = &[
    ("LHR", "London", 51.4700, -0.4543),
    ("CDG", "Paris", 49.0097, 2.5479),
    ("BER", "Berlin", 52.3667, 13.5033),
    ("MAD", "Madrid", 40.4719, -3.5626),
    ("FCO", "Rome", 41.8003, 12.2389),
    ("AMS", "Amsterdam", 52.3105, 4.7683),
    ("DUB", "Dublin", 53.4264, -6.2499),
    ("EDI", "Edinburgh", 55.9500, -3.3725),
    ("MAN", "Manchester", 53.3537, -2.2750),
    ("OSL", "Oslo", 60.1976, 11.1004),
    ("JFK", "New York", 40.6413, -73.7781),
    ("LAX", "Los Angeles", 33.9416, -118.4085),
    ("ORD", "Chicago", 41.9742, -87.9073),
    ("YYZ", "Toronto", 43.6777, -79.6248),
    ("GRU", "Sao Paulo", -23.4356, -46.4731),
    ("DXB", "Dubai", 25.2532, 55.3657),
    ("DEL", "Delhi", 28.5562, 77.1000),
    ("SIN", "Singapore", 1.3644, 103.9915),
    ("HND", "Tokyo", 35.5494, 139.7798),
    ("SYD", "Sydney", -33.9399, 151.1753),
    ("JNB", "Johannesburg", -26.1392, 28.2460),
];

/// Haversine distance between two points, km
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let (lat1, lat2) = (a.lat.to_radians(), b.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Offline distance estimator backed by a gazetteer
#[derive(Debug, Clone, Default)]
pub struct GreatCircleEstimator {
    /// Upper-cased codes and lower-cased names → coordinates
    index: FxHashMap<String, Coordinates>,
}

impl GreatCircleEstimator {
    /// Estimator over the built-in airport list
    pub fn builtin() -> Self {
        let mut estimator = Self::default();
        for &(code, name, lat, lon) in AIRPORTS {
            estimator.insert(code, name, Coordinates { lat, lon });
        }
        estimator
    }

    /// Estimator over an explicit list of locations
    ///
    /// Entries with out-of-range coordinates are skipped with a warning.
    pub fn from_locations(locations: &[Location]) -> Self {
        let mut estimator = Self::default();
        for loc in locations {
            match Coordinates::new(loc.lat, loc.lon) {
                Some(coords) => estimator.insert(&loc.code, &loc.name, coords),
                None => tracing::warn!(
                    "Skipping location {} ({}): invalid coordinates {}, {}",
                    loc.code,
                    loc.name,
                    loc.lat,
                    loc.lon
                ),
            }
        }
        estimator
    }

    /// Load a JSON array of `Location`s, on top of the built-in airports
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read locations file: {:?}", path))?;

        let locations: Vec<Location> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse locations JSON: {:?}", path))?;

        let mut estimator = Self::builtin();
        estimator.index.extend(Self::from_locations(&locations).index);

        tracing::info!("Loaded {} locations from {:?}", locations.len(), path);
        Ok(estimator)
    }

    /// Number of resolvable keys (codes and names)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Resolve an identifier to coordinates
    pub fn resolve(&self, location: &str) -> Result<Coordinates, DistanceError> {
        if let Some(coords) = Coordinates::parse(location) {
            return Ok(coords);
        }

        let trimmed = location.trim();
        self.index
            .get(&trimmed.to_uppercase())
            .or_else(|| self.index.get(&trimmed.to_lowercase()))
            .copied()
            .ok_or_else(|| DistanceError::UnknownLocation(location.to_string()))
    }

    fn insert(&mut self, code: &str, name: &str, coords: Coordinates) {
        if !code.trim().is_empty() {
            self.index.insert(code.trim().to_uppercase(), coords);
        }
        if !name.trim().is_empty() {
            self.index.insert(name.trim().to_lowercase(), coords);
        }
    }
}

impl DistanceEstimator for GreatCircleEstimator {
    fn distance_km(&self, origin: &str, destination: &str) -> Result<f64, DistanceError> {
        let from = self.resolve(origin)?;
        let to = self.resolve(destination)?;
        if from == to {
            return Err(DistanceError::NoRoute);
        }
        Ok(haversine_km(from, to))
    }
}
