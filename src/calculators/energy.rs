//! Energy emissions
//!
//! `co2e = kWh × factor(usage, source)`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::normalize_key;
use crate::error::{ensure_quantity, CalculationError};
use crate::estimate::{Category, EmissionEstimate};
use crate::factors::FactorTables;

/// Unit the consumption was metered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    #[default]
    #[serde(alias = "kWh")]
    Kwh,
    #[serde(alias = "MWh")]
    Mwh,
}

impl EnergyUnit {
    pub fn to_kwh(self, amount: f64) -> f64 {
        match self {
            EnergyUnit::Kwh => amount,
            EnergyUnit::Mwh => amount * 1000.0,
        }
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnergyUnit::Kwh => f.write_str("kWh"),
            EnergyUnit::Mwh => f.write_str("MWh"),
        }
    }
}

impl FromStr for EnergyUnit {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "kwh" | "kw" => Ok(EnergyUnit::Kwh),
            "mwh" => Ok(EnergyUnit::Mwh),
            _ => Err(CalculationError::validation(
                Category::Energy,
                s,
                0.0,
                format!("unsupported energy unit '{}'", s),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyInput {
    /// electricity, heating or cooling
    pub usage: String,
    /// grid, renewable, natural_gas, ...
    pub source: String,
    pub amount: f64,
    #[serde(default)]
    pub unit: EnergyUnit,
}

impl EnergyInput {
    pub fn new(usage: &str, source: &str, kwh: f64) -> Self {
        Self {
            usage: usage.to_string(),
            source: source.to_string(),
            amount: kwh,
            unit: EnergyUnit::Kwh,
        }
    }

    pub fn with_unit(mut self, unit: EnergyUnit) -> Self {
        self.unit = unit;
        self
    }
}

/// Calculate energy emissions
pub fn calculate_energy(
    input: &EnergyInput,
    factors: &FactorTables,
) -> Result<EmissionEstimate, CalculationError> {
    let usage = normalize_key(&input.usage);
    let source = normalize_key(&input.source);

    let amount = ensure_quantity(Category::Energy, &usage, input.amount)?;
    let factor = factors.lookup(Category::Energy, &usage, Some(&source))?;
    let kwh = input.unit.to_kwh(amount);

    tracing::debug!("energy {}_{}: {} kWh x {}", usage, source, kwh, factor);

    EmissionEstimate::new(Category::Energy, &usage, format!("{}_{}", usage, source), kwh, factor)
        .with_detail("amount", amount)
        .with_detail("unit", input.unit.to_string())
        .with_detail("source", source.as_str())
        .ensure_finite(input.amount)
}
