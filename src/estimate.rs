//! Emission categories and calculation results

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::error::{CalculationError, CategoryName};

/// The five activity categories a footprint is split into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Transportation,
    Energy,
    Food,
    Consumption,
    Waste,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Transportation,
        Category::Energy,
        Category::Food,
        Category::Consumption,
        Category::Waste,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Transportation => "transportation",
            Category::Energy => "energy",
            Category::Food => "food",
            Category::Consumption => "consumption",
            Category::Waste => "waste",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transportation" | "transport" => Ok(Category::Transportation),
            "energy" => Ok(Category::Energy),
            "food" => Ok(Category::Food),
            "consumption" => Ok(Category::Consumption),
            "waste" => Ok(Category::Waste),
            _ => Err(CalculationError::Validation {
                category: CategoryName::Unknown(s.to_string()),
                subtype: String::new(),
                quantity: 0.0,
                reason: "unrecognized category".to_string(),
            }),
        }
    }
}

/// Result of one emission calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionEstimate {
    /// kg CO2e, never negative
    pub co2e_kg: f64,
    pub category: Category,
    /// Subtype the factor was resolved under (transport mode, energy use, food group, ...)
    pub subcategory: String,
    /// Fully qualified activity, e.g. `car_petrol` or `beef`
    pub activity: String,
    /// Quantity in the category's canonical unit (km, kWh, kg, items)
    pub quantity: f64,
    /// Effective factor after modifiers, kg CO2e per canonical unit
    pub emission_factor: f64,
    /// Inputs that shaped the result (units, flags, passengers, ...)
    pub details: Map<String, Value>,
}

impl EmissionEstimate {
    pub(crate) fn new(
        category: Category,
        subcategory: impl Into<String>,
        activity: impl Into<String>,
        quantity: f64,
        emission_factor: f64,
    ) -> Self {
        Self {
            co2e_kg: quantity * emission_factor,
            category,
            subcategory: subcategory.into(),
            activity: activity.into(),
            quantity,
            emission_factor,
            details: Map::new(),
        }
    }

    /// Reject results that overflowed during unit conversion or scaling
    ///
    /// `reported` is the quantity as the caller gave it, before conversion.
    pub(crate) fn ensure_finite(self, reported: f64) -> Result<Self, CalculationError> {
        if self.quantity.is_finite() && self.co2e_kg.is_finite() {
            return Ok(self);
        }
        Err(CalculationError::validation(
            self.category,
            self.subcategory,
            reported,
            "quantity is too large to produce a finite estimate",
        ))
    }

    pub(crate) fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

impl fmt::Display for EmissionEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} kg CO2e ({} / {})", self.co2e_kg, self.category, self.activity)
    }
}
