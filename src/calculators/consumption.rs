//! Consumption (purchases) emissions
//!
//! `co2e = quantity × factor(group, item)`, optionally amortized over the
//! item's expected lifetime in years.

use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::error::{ensure_quantity, CalculationError};
use crate::estimate::{Category, EmissionEstimate};
use crate::factors::FactorTables;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionInput {
    /// electronics, clothing, household
    pub group: String,
    pub item: String,
    /// Number of items
    pub quantity: f64,
    /// Spread the embodied emissions over this many years
    #[serde(default)]
    pub lifetime_years: Option<f64>,
}

impl ConsumptionInput {
    pub fn new(group: &str, item: &str, quantity: f64) -> Self {
        Self {
            group: group.to_string(),
            item: item.to_string(),
            quantity,
            lifetime_years: None,
        }
    }

    pub fn amortized_over(mut self, years: f64) -> Self {
        self.lifetime_years = Some(years);
        self
    }
}

/// Calculate consumption emissions
pub fn calculate_consumption(
    input: &ConsumptionInput,
    factors: &FactorTables,
) -> Result<EmissionEstimate, CalculationError> {
    let group = normalize_key(&input.group);
    let item = normalize_key(&input.item);

    let quantity = ensure_quantity(Category::Consumption, &item, input.quantity)?;

    if let Some(years) = input.lifetime_years {
        if !(years.is_finite() && years > 0.0) {
            return Err(CalculationError::validation(
                Category::Consumption,
                &item,
                quantity,
                format!("lifetime must be a positive number of years, got {}", years),
            ));
        }
    }

    let base_factor = factors.lookup(Category::Consumption, &group, Some(&item))?;
    let factor = match input.lifetime_years {
        Some(years) => base_factor / years,
        None => base_factor,
    };

    tracing::debug!("consumption {}: {} items x {}", item, quantity, factor);

    EmissionEstimate::new(Category::Consumption, &group, &item, quantity, factor)
        .with_detail("quantity", quantity)
        .with_detail("lifetime_years", input.lifetime_years)
        .with_detail("base_factor", base_factor)
        .ensure_finite(input.quantity)
}
