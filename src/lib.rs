//! Carbon Tracker
//!
//! Estimates personal CO2e emissions across five categories (transportation,
//! energy, food, consumption, waste) by multiplying reported activity
//! quantities with published emission factors.
//!
//! Layout:
//! - `factors/`: versioned emission factor tables (built-in DEFRA/EPA set, JSON load/save)
//! - `calculators/`: one pure calculator per category
//! - `distance/`: distance estimation for flights given as endpoints
//! - `calculator`: `CarbonCalculator`, dispatching inputs to the calculators
//! - `persistence`: record shape and stores for computed results
//! - `config`: environment settings

pub mod calculator;
pub mod calculators;
pub mod config;
pub mod distance;
pub mod error;
pub mod estimate;
pub mod factors;
pub mod persistence;

// Re-export commonly used types
pub use calculator::{ActivityInput, CarbonCalculator};
pub use calculators::*;
pub use config::Settings;
pub use distance::{DistanceError, DistanceEstimator, GreatCircleEstimator, TimeoutEstimator};
pub use error::CalculationError;
pub use estimate::{Category, EmissionEstimate};
pub use factors::{FactorEntry, FactorTables};
pub use persistence::{EmissionRecord, EmissionStore, JsonLinesStore, MemoryStore, StoreError};
