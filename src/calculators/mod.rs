//! Category calculators
//!
//! One module per category. Each exposes a pure `calculate_*` function that
//! takes a validated input and the injected factor tables and returns an
//! `EmissionEstimate`. None of them hold state.

pub mod consumption;
pub mod energy;
pub mod food;
pub mod transportation;
pub mod waste;

pub use consumption::{calculate_consumption, ConsumptionInput};
pub use energy::{calculate_energy, EnergyInput, EnergyUnit};
pub use food::{calculate_food, serving_weight_kg, FoodInput, FoodUnit};
pub use transportation::{calculate_transportation, TransportInput, TripDistance};
pub use waste::{calculate_waste, WasteInput};

/// Subtype keys are matched case-insensitively with surrounding whitespace ignored
pub(crate) fn normalize_key(s: &str) -> String {
    s.trim().to_lowercase()
}
