//! Transportation emissions
//!
//! `co2e = distance_km × factor(mode, fuel) / passengers`
//!
//! Flights may be given as two endpoints instead of a distance. The distance
//! then comes from the injected `DistanceEstimator`. A failed lookup is an
//! error; no distance is ever assumed.

use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::distance::DistanceEstimator;
use crate::error::{ensure_quantity, CalculationError};
use crate::estimate::{Category, EmissionEstimate};
use crate::factors::FactorTables;

/// Mode whose distance may be estimated from endpoints
pub const FLIGHT_MODE: &str = "flight";

/// Variant looked up when no fuel type is given
pub const DEFAULT_VARIANT: &str = "average";

/// How far the trip went
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripDistance {
    /// Reported distance
    Km(f64),
    /// Endpoints to be resolved by the distance estimator (flights only)
    Route { origin: String, destination: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportInput {
    /// car, bus, train, flight, ...
    pub mode: String,
    /// petrol, diesel, electric, hybrid for vehicles; haul class for flights
    pub fuel: Option<String>,
    pub distance: TripDistance,
    /// Occupants sharing the trip's emissions, at least 1
    pub passengers: u32,
}

impl TransportInput {
    pub fn new(mode: &str, fuel: Option<&str>, distance_km: f64) -> Self {
        Self {
            mode: mode.to_string(),
            fuel: fuel.map(str::to_string),
            distance: TripDistance::Km(distance_km),
            passengers: 1,
        }
    }

    /// Flight whose distance is resolved from the endpoints
    pub fn flight_between(haul: Option<&str>, origin: &str, destination: &str) -> Self {
        Self {
            mode: FLIGHT_MODE.to_string(),
            fuel: haul.map(str::to_string),
            distance: TripDistance::Route {
                origin: origin.to_string(),
                destination: destination.to_string(),
            },
            passengers: 1,
        }
    }

    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }
}

/// Calculate transportation emissions
///
/// # Arguments
/// * `input` - Trip description
/// * `factors` - Injected factor tables
/// * `estimator` - Needed only for `TripDistance::Route`
///
/// # Errors
/// * `Validation` - negative or non-finite distance, zero passengers, or a
///   route given for a mode other than flight
/// * `Configuration` - (mode, fuel) not in the tables
/// * `DistanceUnavailable` - route could not be resolved
pub fn calculate_transportation(
    input: &TransportInput,
    factors: &FactorTables,
    estimator: Option<&dyn DistanceEstimator>,
) -> Result<EmissionEstimate, CalculationError> {
    let mode = normalize_key(&input.mode);
    let variant = input
        .fuel
        .as_deref()
        .map(normalize_key)
        .unwrap_or_else(|| DEFAULT_VARIANT.to_string());

    let reported_km = match &input.distance {
        TripDistance::Km(km) => Some(ensure_quantity(Category::Transportation, &mode, *km)?),
        TripDistance::Route { .. } if mode != FLIGHT_MODE => {
            return Err(CalculationError::validation(
                Category::Transportation,
                &mode,
                0.0,
                "distance can only be estimated from endpoints for flights",
            ));
        }
        TripDistance::Route { .. } => None,
    };

    if input.passengers == 0 {
        return Err(CalculationError::validation(
            Category::Transportation,
            &mode,
            reported_km.unwrap_or(0.0),
            "passengers must be at least 1",
        ));
    }

    // Resolve the factor before any network call
    let base_factor = factors.lookup(Category::Transportation, &mode, Some(&variant))?;

    let (distance_km, source) = match (&input.distance, reported_km) {
        (_, Some(km)) => (km, "reported"),
        (TripDistance::Route { origin, destination }, None) => {
            (resolve_route(&mode, origin, destination, estimator)?, "estimated")
        }
        (TripDistance::Km(_), None) => unreachable!("reported distance is always captured"),
    };

    let effective_factor = base_factor / f64::from(input.passengers);

    tracing::debug!(
        "transportation {}_{}: {} km x {} / {} passengers",
        mode,
        variant,
        distance_km,
        base_factor,
        input.passengers
    );

    EmissionEstimate::new(
        Category::Transportation,
        &mode,
        format!("{}_{}", mode, variant),
        distance_km,
        effective_factor,
    )
    .with_detail("distance_km", distance_km)
    .with_detail("distance_source", source)
    .with_detail("fuel_type", variant.as_str())
    .with_detail("passengers", input.passengers)
    .with_detail("base_factor", base_factor)
    .ensure_finite(distance_km)
}

fn resolve_route(
    mode: &str,
    origin: &str,
    destination: &str,
    estimator: Option<&dyn DistanceEstimator>,
) -> Result<f64, CalculationError> {
    let unavailable = |reason: String| CalculationError::DistanceUnavailable {
        category: Category::Transportation,
        origin: origin.to_string(),
        destination: destination.to_string(),
        reason,
    };

    let estimator =
        estimator.ok_or_else(|| unavailable("no distance estimator configured".to_string()))?;

    let km = estimator.distance_km(origin, destination).map_err(|e| {
        tracing::warn!("{} distance {} -> {} failed: {}", mode, origin, destination, e);
        unavailable(e.to_string())
    })?;

    if !(km.is_finite() && km >= 0.0) {
        return Err(unavailable(format!("estimator returned invalid distance {}", km)));
    }

    Ok(km + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{FixedDistance, GreatCircleEstimator, Unreachable};
    use approx::assert_relative_eq;

    #[test]
    fn test_car_petrol_100km() {
        let factors = FactorTables::builtin();
        let input = TransportInput::new("car", Some("petrol"), 100.0);
        let est = calculate_transportation(&input, &factors, None).unwrap();

        assert_relative_eq!(est.co2e_kg, 19.2, epsilon = 1e-9);
        assert_eq!(est.category, Category::Transportation);
        assert_eq!(est.subcategory, "car");
        assert_eq!(est.activity, "car_petrol");
        assert_eq!(est.details["distance_source"], "reported");
    }

    #[test]
    fn test_input_keys_are_normalized() {
        let factors = FactorTables::builtin();
        let input = TransportInput::new(" Car ", Some("PETROL"), 10.0);
        let est = calculate_transportation(&input, &factors, None).unwrap();
        assert_relative_eq!(est.co2e_kg, 1.92, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_fuel_uses_average() {
        let factors = FactorTables::builtin();
        let input = TransportInput::new("bus", None, 20.0);
        let est = calculate_transportation(&input, &factors, None).unwrap();
        assert_eq!(est.activity, "bus_average");
        assert_relative_eq!(est.co2e_kg, 20.0 * 0.089, epsilon = 1e-9);

        // Mode without an average entry
        let tables = FactorTables::empty("mock", 0.9)
            .with_factor(Category::Transportation, "car", Some("petrol"), 0.2)
            .unwrap();
        let err = calculate_transportation(&TransportInput::new("car", None, 1.0), &tables, None)
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_passengers_share_emissions() {
        let factors = FactorTables::builtin();
        let solo = TransportInput::new("car", Some("diesel"), 100.0);
        let shared = solo.clone().with_passengers(4);

        let solo_est = calculate_transportation(&solo, &factors, None).unwrap();
        let shared_est = calculate_transportation(&shared, &factors, None).unwrap();
        assert_relative_eq!(shared_est.co2e_kg * 4.0, solo_est.co2e_kg, epsilon = 1e-9);

        let err = calculate_transportation(&solo.with_passengers(0), &factors, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_unknown_fuel_is_configuration_error() {
        let factors = FactorTables::builtin();
        let input = TransportInput::new("car", Some("unicorn-fuel"), 10.0);
        let err = calculate_transportation(&input, &factors, None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("unicorn-fuel"));
    }

    #[test]
    fn test_negative_distance_is_validation_error() {
        let factors = FactorTables::builtin();
        let input = TransportInput::new("car", Some("petrol"), -5.0);
        let err = calculate_transportation(&input, &factors, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_negative_zero_distance_is_plain_zero() {
        let factors = FactorTables::builtin();
        let input = TransportInput::new("car", Some("petrol"), -0.0);
        let est = calculate_transportation(&input, &factors, None).unwrap();
        assert!(est.co2e_kg.is_sign_positive());
        assert_eq!(est.to_string(), "0.00 kg CO2e (transportation / car_petrol)");
    }

    #[test]
    fn test_flight_distance_from_estimator() {
        let factors = FactorTables::builtin();
        let input = TransportInput::flight_between(Some("international"), "Berlin", "Madrid");
        let est = calculate_transportation(&input, &factors, Some(&FixedDistance(1200.0))).unwrap();

        assert_relative_eq!(est.co2e_kg, 1200.0 * 0.150, epsilon = 1e-9);
        assert_relative_eq!(est.quantity, 1200.0);
        assert_eq!(est.details["distance_source"], "estimated");
    }

    #[test]
    fn test_flight_with_great_circle() {
        let factors = FactorTables::builtin();
        let estimator = GreatCircleEstimator::builtin();
        let input = TransportInput::flight_between(None, "LHR", "JFK");
        let est = calculate_transportation(&input, &factors, Some(&estimator)).unwrap();
        assert_relative_eq!(est.quantity, 5540.0, epsilon = 1.0);
        assert_eq!(est.activity, "flight_average");
    }

    #[test]
    fn test_flight_unreachable_estimator() {
        let factors = FactorTables::builtin();
        let input = TransportInput::flight_between(None, "Berlin", "Madrid");

        let err = calculate_transportation(&input, &factors, Some(&Unreachable)).unwrap_err();
        assert!(err.is_distance_unavailable());
        assert!(err.to_string().contains("Berlin"));

        let err = calculate_transportation(&input, &factors, None).unwrap_err();
        assert!(err.is_distance_unavailable());
    }

    #[test]
    fn test_route_rejected_for_ground_modes() {
        let factors = FactorTables::builtin();
        let mut input = TransportInput::flight_between(None, "Berlin", "Madrid");
        input.mode = "car".to_string();
        let err = calculate_transportation(&input, &factors, Some(&FixedDistance(10.0))).unwrap_err();
        assert!(err.is_validation());
    }
}
