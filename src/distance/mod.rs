//! Distance estimation for trips given as endpoints
//!
//! The calculators only see the `DistanceEstimator` trait. Implementations:
//! - `GreatCircleEstimator`: haversine distance over a location gazetteer
//! - `TimeoutEstimator`: bounds any estimator with a deadline
//! - `FixedDistance` / `Unreachable`: stubs for tests and offline use

pub mod great_circle;
pub mod timeout;

pub use great_circle::{haversine_km, Coordinates, GreatCircleEstimator, Location};
pub use timeout::TimeoutEstimator;

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Why a distance could not be produced
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    #[error("unknown location '{0}'")]
    UnknownLocation(String),

    #[error("no route between the given locations")]
    NoRoute,

    #[error("distance service timed out after {0:?}")]
    Timeout(Duration),

    #[error("distance service unavailable: {0}")]
    Unavailable(String),
}

/// Resolve the distance between two locations
///
/// Identifiers may be coordinates, airport codes or place names, depending on
/// what the implementation understands.
pub trait DistanceEstimator: Send + Sync {
    fn distance_km(&self, origin: &str, destination: &str) -> Result<f64, DistanceError>;
}

impl<T: DistanceEstimator + ?Sized> DistanceEstimator for Arc<T> {
    fn distance_km(&self, origin: &str, destination: &str) -> Result<f64, DistanceError> {
        (**self).distance_km(origin, destination)
    }
}

impl<T: DistanceEstimator + ?Sized> DistanceEstimator for Box<T> {
    fn distance_km(&self, origin: &str, destination: &str) -> Result<f64, DistanceError> {
        (**self).distance_km(origin, destination)
    }
}

/// Always returns the same distance
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance(pub f64);

impl DistanceEstimator for FixedDistance {
    fn distance_km(&self, _origin: &str, _destination: &str) -> Result<f64, DistanceError> {
        Ok(self.0)
    }
}

/// Always fails, standing in for a service that cannot be reached
#[derive(Debug, Clone, Default)]
pub struct Unreachable;

impl DistanceEstimator for Unreachable {
    fn distance_km(&self, _origin: &str, _destination: &str) -> Result<f64, DistanceError> {
        Err(DistanceError::Unavailable("service unreachable".to_string()))
    }
}
