//! Carbon Calculator - entry point tying the category calculators together
//!
//! Holds the shared factor tables and the optional distance estimator, and
//! routes each `ActivityInput` to its category calculator.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::calculators::{
    calculate_consumption, calculate_energy, calculate_food, calculate_transportation,
    calculate_waste, ConsumptionInput, EnergyInput, FoodInput, TransportInput, WasteInput,
};
use crate::config::Settings;
use crate::distance::{DistanceError, DistanceEstimator, GreatCircleEstimator, TimeoutEstimator};
use crate::error::CalculationError;
use crate::estimate::{Category, EmissionEstimate};
use crate::factors::{FactorEntry, FactorTables};

/// One activity to estimate, tagged by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ActivityInput {
    Transportation(TransportInput),
    Energy(EnergyInput),
    Food(FoodInput),
    Consumption(ConsumptionInput),
    Waste(WasteInput),
}

impl ActivityInput {
    pub fn category(&self) -> Category {
        match self {
            ActivityInput::Transportation(_) => Category::Transportation,
            ActivityInput::Energy(_) => Category::Energy,
            ActivityInput::Food(_) => Category::Food,
            ActivityInput::Consumption(_) => Category::Consumption,
            ActivityInput::Waste(_) => Category::Waste,
        }
    }
}

/// Main emission calculator
///
/// Cheap to clone; the tables and estimator are shared.
#[derive(Clone)]
pub struct CarbonCalculator {
    factors: Arc<FactorTables>,
    distance: Option<Arc<dyn DistanceEstimator>>,
}

impl CarbonCalculator {
    /// Calculator over the given tables, with no distance estimator
    pub fn new(factors: Arc<FactorTables>) -> Self {
        Self {
            factors,
            distance: None,
        }
    }

    /// Calculator over the built-in tables
    pub fn builtin() -> Self {
        Self::new(Arc::new(FactorTables::builtin()))
    }

    /// Build from resolved settings
    ///
    /// Loads (or creates) the factor file and wraps the great-circle estimator
    /// in the configured timeout.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let factors = FactorTables::load_or_create(&settings.emission_factors_path)?;

        let gazetteer = match &settings.locations_path {
            Some(path) => GreatCircleEstimator::load(path)?,
            None => GreatCircleEstimator::builtin(),
        };
        let estimator = TimeoutEstimator::new(gazetteer, settings.distance_timeout);

        if settings.distance_api_key.is_some() {
            tracing::warn!(
                "ORS_API_KEY is set but no hosted routing backend is built in; flights use great-circle distances"
            );
        }

        tracing::info!(
            "Carbon calculator ready (factors '{}', distance timeout {:?})",
            factors.version(),
            settings.distance_timeout
        );

        Ok(Self::new(Arc::new(factors)).with_distance_estimator(estimator))
    }

    pub fn with_distance_estimator<E: DistanceEstimator + 'static>(mut self, estimator: E) -> Self {
        self.distance = Some(Arc::new(estimator));
        self
    }

    pub fn factors(&self) -> &FactorTables {
        &self.factors
    }

    /// Estimate a single activity
    pub fn estimate(&self, input: &ActivityInput) -> Result<EmissionEstimate, CalculationError> {
        match input {
            ActivityInput::Transportation(t) => self.transportation(t),
            ActivityInput::Energy(e) => self.energy(e),
            ActivityInput::Food(f) => self.food(f),
            ActivityInput::Consumption(c) => self.consumption(c),
            ActivityInput::Waste(w) => self.waste(w),
        }
    }

    /// Estimate several activities, stopping at the first failure
    pub fn estimate_all(
        &self,
        inputs: &[ActivityInput],
    ) -> Result<Vec<EmissionEstimate>, CalculationError> {
        inputs.iter().map(|input| self.estimate(input)).collect()
    }

    pub fn transportation(&self, input: &TransportInput) -> Result<EmissionEstimate, CalculationError> {
        calculate_transportation(input, &self.factors, self.distance.as_deref())
    }

    pub fn energy(&self, input: &EnergyInput) -> Result<EmissionEstimate, CalculationError> {
        calculate_energy(input, &self.factors)
    }

    pub fn food(&self, input: &FoodInput) -> Result<EmissionEstimate, CalculationError> {
        calculate_food(input, &self.factors)
    }

    pub fn consumption(&self, input: &ConsumptionInput) -> Result<EmissionEstimate, CalculationError> {
        calculate_consumption(input, &self.factors)
    }

    pub fn waste(&self, input: &WasteInput) -> Result<EmissionEstimate, CalculationError> {
        calculate_waste(input, &self.factors)
    }

    /// Factors available for a category name, for populating choices in a UI
    pub fn category_factors(&self, category: &str) -> Result<Vec<FactorEntry>, CalculationError> {
        let category: Category = category.parse()?;
        Ok(self.factors.category_factors(category))
    }

    /// Direct distance lookup through the configured estimator
    pub fn estimate_flight_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<f64, DistanceError> {
        match &self.distance {
            Some(estimator) => estimator.distance_km(origin, destination),
            None => Err(DistanceError::Unavailable(
                "no distance estimator configured".to_string(),
            )),
        }
    }
}

impl Default for CarbonCalculator {
    fn default() -> Self {
        Self::builtin()
    }
}
