//! Food emissions
//!
//! `co2e = kg × factor(group, item) × local_adjustment`
//!
//! `local_adjustment` is the tables' local sourcing multiplier for locally
//! produced food and 1.0 otherwise, so the discount is versioned with the
//! factors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::normalize_key;
use crate::error::{ensure_quantity, CalculationError};
use crate::estimate::{Category, EmissionEstimate};
use crate::factors::FactorTables;

/// Typical serving weight in kg for items where it is known
static SERVING_WEIGHTS_KG: &[(&str, f64)] = &[
    ("beef", 0.15),
    ("chicken", 0.12),
    ("milk", 0.25),
];

/// Serving weight used for items without a specific entry
pub const DEFAULT_SERVING_KG: f64 = 0.1;

pub fn serving_weight_kg(item: &str) -> f64 {
    SERVING_WEIGHTS_KG
        .iter()
        .find(|(name, _)| *name == item)
        .map(|&(_, kg)| kg)
        .unwrap_or(DEFAULT_SERVING_KG)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodUnit {
    #[default]
    Kg,
    #[serde(rename = "g")]
    Grams,
    Servings,
}

impl FoodUnit {
    pub fn to_kg(self, amount: f64, item: &str) -> f64 {
        match self {
            FoodUnit::Kg => amount,
            FoodUnit::Grams => amount / 1000.0,
            FoodUnit::Servings => amount * serving_weight_kg(item),
        }
    }
}

impl fmt::Display for FoodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoodUnit::Kg => f.write_str("kg"),
            FoodUnit::Grams => f.write_str("g"),
            FoodUnit::Servings => f.write_str("servings"),
        }
    }
}

impl FromStr for FoodUnit {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "kg" => Ok(FoodUnit::Kg),
            "g" | "grams" => Ok(FoodUnit::Grams),
            "servings" | "serving" => Ok(FoodUnit::Servings),
            _ => Err(CalculationError::validation(
                Category::Food,
                s,
                0.0,
                format!("unsupported food unit '{}'", s),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodInput {
    /// meat, dairy, seafood, plant_based, processed
    pub group: String,
    pub item: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: FoodUnit,
    /// Locally sourced produce
    #[serde(default)]
    pub local: bool,
}

impl FoodInput {
    pub fn new(group: &str, item: &str, kg: f64) -> Self {
        Self {
            group: group.to_string(),
            item: item.to_string(),
            amount: kg,
            unit: FoodUnit::Kg,
            local: false,
        }
    }

    pub fn with_unit(mut self, unit: FoodUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }
}

/// Calculate food emissions
pub fn calculate_food(
    input: &FoodInput,
    factors: &FactorTables,
) -> Result<EmissionEstimate, CalculationError> {
    let group = normalize_key(&input.group);
    let item = normalize_key(&input.item);

    let amount = ensure_quantity(Category::Food, &item, input.amount)?;
    let base_factor = factors.lookup(Category::Food, &group, Some(&item))?;

    let kg = input.unit.to_kg(amount, &item);
    let adjustment = if input.local {
        factors.local_sourcing_multiplier()
    } else {
        1.0
    };
    let factor = base_factor * adjustment;

    tracing::debug!("food {}: {} kg x {} (local: {})", item, kg, factor, input.local);

    EmissionEstimate::new(Category::Food, &group, &item, kg, factor)
        .with_detail("amount", amount)
        .with_detail("unit", input.unit.to_string())
        .with_detail("local", input.local)
        .with_detail("base_factor", base_factor)
        .ensure_finite(input.amount)
}
