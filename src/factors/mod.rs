//! Emission Factor Tables
//!
//! Read-only mapping from (category, subtype, modifier) to a positive emission
//! factor in kg CO2e per unit. Tables are plain data: they are versioned, can be
//! loaded from JSON, and are injected into the calculators rather than living in
//! module-level state.
//!
//! Layout per category:
//! - transportation: mode → fuel / service variant
//! - energy: usage → source
//! - food: group → item
//! - consumption: group → item
//! - waste: disposal method (no modifier)

pub mod defaults;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::CalculationError;
use crate::estimate::Category;

type NestedFactors = BTreeMap<String, BTreeMap<String, f64>>;

/// Emission factors for all five categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorTables {
    version: String,

    /// Multiplier applied to food factors for locally sourced produce, in (0, 1)
    local_sourcing_multiplier: f64,

    #[serde(default)]
    transportation: NestedFactors,
    #[serde(default)]
    energy: NestedFactors,
    #[serde(default)]
    food: NestedFactors,
    #[serde(default)]
    consumption: NestedFactors,
    #[serde(default)]
    waste: BTreeMap<String, f64>,
}

/// One row of a category listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorEntry {
    pub subtype: String,
    pub modifier: Option<String>,
    pub factor: f64,
}

impl FactorTables {
    /// Built-in DEFRA/EPA table
    pub fn builtin() -> Self {
        let mut tables = Self::empty(defaults::BUILTIN_VERSION, defaults::LOCAL_SOURCING_MULTIPLIER);

        for &(mode, variant, factor) in defaults::TRANSPORTATION {
            insert_nested(&mut tables.transportation, mode, variant, factor);
        }
        for &(usage, source, factor) in defaults::ENERGY {
            insert_nested(&mut tables.energy, usage, source, factor);
        }
        for &(group, item, factor) in defaults::FOOD {
            insert_nested(&mut tables.food, group, item, factor);
        }
        for &(group, item, factor) in defaults::CONSUMPTION {
            insert_nested(&mut tables.consumption, group, item, factor);
        }
        for &(method, factor) in defaults::WASTE {
            tables.waste.insert(method.to_string(), factor);
        }

        tables
    }

    /// Table with no factors, for assembling mock or custom tables
    pub fn empty(version: &str, local_sourcing_multiplier: f64) -> Self {
        Self {
            version: version.to_string(),
            local_sourcing_multiplier,
            transportation: BTreeMap::new(),
            energy: BTreeMap::new(),
            food: BTreeMap::new(),
            consumption: BTreeMap::new(),
            waste: BTreeMap::new(),
        }
    }

    /// Add or replace one factor
    ///
    /// Waste takes no modifier; every other category requires one.
    /// Fails when the factor is not strictly positive.
    pub fn with_factor(
        mut self,
        category: Category,
        subtype: &str,
        modifier: Option<&str>,
        factor: f64,
    ) -> Result<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            anyhow::bail!(
                "Factor for {} '{}' must be positive, got {}",
                category,
                subtype,
                factor
            );
        }

        match (category, modifier) {
            (Category::Waste, None) => {
                self.waste.insert(subtype.to_string(), factor);
            }
            (Category::Waste, Some(m)) => {
                anyhow::bail!("Waste factors take no modifier (got '{}')", m)
            }
            (_, None) => anyhow::bail!("{} factors require a modifier", category),
            (_, Some(m)) => {
                let table = self.nested_mut(category);
                insert_nested(table, subtype, m, factor);
            }
        }

        Ok(self)
    }

    /// Load tables from a JSON file and validate them
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read emission factors file: {:?}", path))?;

        let tables = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid emission factors in {:?}", path))?;

        tracing::info!(
            "Loaded emission factors '{}' from {:?} ({} entries)",
            tables.version,
            path,
            tables.len()
        );

        Ok(tables)
    }

    /// Load tables from `path`, writing the built-in table there first if the file is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let tables = Self::builtin();
        tables.save(path)?;
        tracing::info!("Wrote built-in emission factors to {:?}", path);
        Ok(tables)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let tables: FactorTables =
            serde_json::from_str(json).with_context(|| "Failed to parse emission factors JSON")?;
        tables.validate()?;
        Ok(tables)
    }

    /// Write tables as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize emission factors")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write emission factors file: {:?}", path))
    }

    /// Every factor must be finite and strictly positive, and the local
    /// multiplier must lie strictly between 0 and 1
    pub fn validate(&self) -> Result<()> {
        let m = self.local_sourcing_multiplier;
        if !(m.is_finite() && m > 0.0 && m < 1.0) {
            anyhow::bail!("local_sourcing_multiplier must be in (0, 1), got {}", m);
        }

        for category in Category::ALL {
            for entry in self.category_factors(category) {
                if !(entry.factor.is_finite() && entry.factor > 0.0) {
                    anyhow::bail!(
                        "Factor for {} '{}'{} must be positive, got {}",
                        category,
                        entry.subtype,
                        entry.modifier.map(|m| format!(" / '{}'", m)).unwrap_or_default(),
                        entry.factor
                    );
                }
            }
        }

        Ok(())
    }

    /// Resolve a factor
    ///
    /// # Errors
    /// `CalculationError::Configuration` when the subtype or modifier is not in
    /// the table. There is no fallback value.
    pub fn lookup(
        &self,
        category: Category,
        subtype: &str,
        modifier: Option<&str>,
    ) -> Result<f64, CalculationError> {
        let missing = || CalculationError::configuration(category, subtype, modifier);

        if category == Category::Waste {
            if modifier.is_some() {
                return Err(missing());
            }
            return self.waste.get(subtype).copied().ok_or_else(missing);
        }

        let modifier_key = modifier.ok_or_else(missing)?;
        self.nested(category)
            .get(subtype)
            .and_then(|inner| inner.get(modifier_key))
            .copied()
            .ok_or_else(missing)
    }

    /// All factors of one category, sorted by subtype then modifier
    pub fn category_factors(&self, category: Category) -> Vec<FactorEntry> {
        if category == Category::Waste {
            return self
                .waste
                .iter()
                .map(|(method, &factor)| FactorEntry {
                    subtype: method.clone(),
                    modifier: None,
                    factor,
                })
                .collect();
        }

        self.nested(category)
            .iter()
            .flat_map(|(subtype, inner)| {
                inner.iter().map(move |(modifier, &factor)| FactorEntry {
                    subtype: subtype.clone(),
                    modifier: Some(modifier.clone()),
                    factor,
                })
            })
            .collect()
    }

    /// Modifiers available under one subtype (empty when the subtype is unknown)
    pub fn modifiers(&self, category: Category, subtype: &str) -> Vec<&str> {
        if category == Category::Waste {
            return Vec::new();
        }
        self.nested(category)
            .get(subtype)
            .map(|inner| inner.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn local_sourcing_multiplier(&self) -> f64 {
        self.local_sourcing_multiplier
    }

    /// Total number of factors across all categories
    pub fn len(&self) -> usize {
        Category::ALL
            .iter()
            .map(|&c| self.category_factors(c).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn nested(&self, category: Category) -> &NestedFactors {
        match category {
            Category::Transportation => &self.transportation,
            Category::Energy => &self.energy,
            Category::Food => &self.food,
            Category::Consumption => &self.consumption,
            Category::Waste => unreachable!("waste factors are not nested"),
        }
    }

    fn nested_mut(&mut self, category: Category) -> &mut NestedFactors {
        match category {
            Category::Transportation => &mut self.transportation,
            Category::Energy => &mut self.energy,
            Category::Food => &mut self.food,
            Category::Consumption => &mut self.consumption,
            Category::Waste => unreachable!("waste factors are not nested"),
        }
    }
}

impl Default for FactorTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn insert_nested(table: &mut NestedFactors, subtype: &str, modifier: &str, factor: f64) {
    table
        .entry(subtype.to_string())
        .or_default()
        .insert(modifier.to_string(), factor);
}
