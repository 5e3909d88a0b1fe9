//! Error types
//!
//! `CalculationError` is what every calculator returns. Each variant carries the
//! category, subtype and quantity that caused it, so callers can fix the input
//! instead of receiving an opaque zero.

use crate::estimate::Category;
use std::fmt;
use thiserror::Error;

/// Failure of a single emission calculation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalculationError {
    /// Input rejected before any factor lookup
    #[error("invalid {category} input (subtype '{subtype}', quantity {quantity}): {reason}")]
    Validation {
        category: CategoryName,
        subtype: String,
        quantity: f64,
        reason: String,
    },

    /// Subtype or modifier missing from the factor tables
    #[error("no emission factor for {category} subtype '{subtype}'{}", modifier_suffix(.modifier))]
    Configuration {
        category: Category,
        subtype: String,
        modifier: Option<String>,
    },

    /// Flight distance could not be resolved
    #[error("distance unavailable for {category} trip {origin} -> {destination}: {reason}")]
    DistanceUnavailable {
        category: Category,
        origin: String,
        destination: String,
        reason: String,
    },
}

fn modifier_suffix(modifier: &Option<String>) -> String {
    match modifier {
        Some(m) => format!(" / '{}'", m),
        None => String::new(),
    }
}

/// Category as reported in a validation error
///
/// Unrecognized category names are themselves a validation failure, so the
/// error has to be able to carry the raw name as typed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryName {
    Known(Category),
    Unknown(String),
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryName::Known(c) => write!(f, "{}", c),
            CategoryName::Unknown(name) => write!(f, "unknown category '{}'", name),
        }
    }
}

impl From<Category> for CategoryName {
    fn from(category: Category) -> Self {
        CategoryName::Known(category)
    }
}

impl CalculationError {
    pub(crate) fn validation(
        category: Category,
        subtype: impl Into<String>,
        quantity: f64,
        reason: impl Into<String>,
    ) -> Self {
        CalculationError::Validation {
            category: category.into(),
            subtype: subtype.into(),
            quantity,
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(
        category: Category,
        subtype: impl Into<String>,
        modifier: Option<&str>,
    ) -> Self {
        CalculationError::Configuration {
            category,
            subtype: subtype.into(),
            modifier: modifier.map(str::to_string),
        }
    }

    /// Category the failure belongs to, if it was recognized
    pub fn category(&self) -> Option<Category> {
        match self {
            CalculationError::Validation { category: CategoryName::Known(c), .. } => Some(*c),
            CalculationError::Validation { .. } => None,
            CalculationError::Configuration { category, .. } => Some(*category),
            CalculationError::DistanceUnavailable { category, .. } => Some(*category),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CalculationError::Validation { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, CalculationError::Configuration { .. })
    }

    pub fn is_distance_unavailable(&self) -> bool {
        matches!(self, CalculationError::DistanceUnavailable { .. })
    }
}

/// Reject negative, NaN and infinite quantities
///
/// Returns the quantity with `-0.0` folded into `0.0`.
pub(crate) fn ensure_quantity(
    category: Category,
    subtype: &str,
    quantity: f64,
) -> Result<f64, CalculationError> {
    if !quantity.is_finite() {
        return Err(CalculationError::validation(
            category,
            subtype,
            quantity,
            "quantity must be a finite number",
        ));
    }
    if quantity < 0.0 {
        return Err(CalculationError::validation(
            category,
            subtype,
            quantity,
            "quantity must not be negative",
        ));
    }
    Ok(quantity + 0.0)
}
