//! Waste emissions
//!
//! `co2e = mass_kg × factor(method)`. Each disposal method has its own entry;
//! there is no shared default.

use serde::{Deserialize, Serialize};

use super::normalize_key;
use crate::error::{ensure_quantity, CalculationError};
use crate::estimate::{Category, EmissionEstimate};
use crate::factors::FactorTables;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteInput {
    /// landfill, recycling, composting, incineration
    pub method: String,
    pub mass_kg: f64,
}

impl WasteInput {
    pub fn new(method: &str, mass_kg: f64) -> Self {
        Self {
            method: method.to_string(),
            mass_kg,
        }
    }
}

pub fn calculate_waste(
    input: &WasteInput,
    factors: &FactorTables,
) -> Result<EmissionEstimate, CalculationError> {
    let method = normalize_key(&input.method);

    let mass_kg = ensure_quantity(Category::Waste, &method, input.mass_kg)?;
    let factor = factors.lookup(Category::Waste, &method, None)?;

    tracing::debug!("waste {}: {} kg x {}", method, mass_kg, factor);

    EmissionEstimate::new(Category::Waste, &method, &method, mass_kg, factor)
        .with_detail("mass_kg", mass_kg)
        .with_detail("disposal_method", method.as_str())
        .ensure_finite(input.mass_kg)
}
