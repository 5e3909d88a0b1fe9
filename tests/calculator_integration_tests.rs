//! Calculator Integration Tests
//!
//! Exercises the public API end to end: every category through
//! `CarbonCalculator`, the shipped data files, settings-driven construction and
//! persistence of results.

use approx::assert_relative_eq;
use carbon_tracker::distance::{FixedDistance, Unreachable};
use carbon_tracker::{
    ActivityInput, CarbonCalculator, Category, ConsumptionInput, EmissionStore, EnergyInput,
    EnergyUnit, FactorTables, FoodInput, GreatCircleEstimator, JsonLinesStore, MemoryStore,
    Settings, TransportInput, WasteInput,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// One valid input per category, scaled by `q`
fn sample_inputs(q: f64) -> Vec<ActivityInput> {
    vec![
        ActivityInput::Transportation(TransportInput::new("car", Some("petrol"), q)),
        ActivityInput::Energy(EnergyInput::new("electricity", "grid", q)),
        ActivityInput::Food(FoodInput::new("dairy", "cheese", q)),
        ActivityInput::Consumption(ConsumptionInput::new("clothing", "shoes", q)),
        ActivityInput::Waste(WasteInput::new("recycling", q)),
    ]
}

/// Same inputs with an unknown subtype
fn unknown_subtype_inputs() -> Vec<ActivityInput> {
    vec![
        ActivityInput::Transportation(TransportInput::new("car", Some("unicorn-fuel"), 1.0)),
        ActivityInput::Energy(EnergyInput::new("electricity", "unicorn-fuel", 1.0)),
        ActivityInput::Food(FoodInput::new("meat", "unicorn-fuel", 1.0)),
        ActivityInput::Consumption(ConsumptionInput::new("electronics", "unicorn-fuel", 1.0)),
        ActivityInput::Waste(WasteInput::new("unicorn-fuel", 1.0)),
    ]
}

fn data_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

// =========================================================================
// Section 1: Formula properties across all categories
// =========================================================================

#[test]
fn test_estimate_is_quantity_times_factor() {
    let calc = CarbonCalculator::builtin();
    for q in [0.5, 1.0, 7.25, 100.0] {
        for input in sample_inputs(q) {
            let est = calc.estimate(&input).unwrap();
            assert_relative_eq!(est.co2e_kg, q * est.emission_factor, epsilon = 1e-9);
            assert!(est.emission_factor > 0.0);
        }
    }
}

#[test]
fn test_zero_in_zero_out() {
    let calc = CarbonCalculator::builtin();
    for input in sample_inputs(0.0) {
        let est = calc.estimate(&input).unwrap();
        assert_eq!(est.co2e_kg, 0.0, "{:?}", input.category());
    }
}

#[test]
fn test_monotonic_in_quantity() {
    let calc = CarbonCalculator::builtin();
    let small = calc.estimate_all(&sample_inputs(1.0)).unwrap();
    let large = calc.estimate_all(&sample_inputs(1.5)).unwrap();
    for (s, l) in small.iter().zip(&large) {
        assert!(s.co2e_kg < l.co2e_kg, "{} not monotonic", s.category);
    }
}

#[test]
fn test_negative_quantity_rejected_everywhere() {
    let calc = CarbonCalculator::builtin();
    for input in sample_inputs(-1.0) {
        let err = calc.estimate(&input).unwrap_err();
        assert!(err.is_validation(), "{}", err);
        assert_eq!(err.category(), Some(input.category()));
        assert!(err.to_string().contains("-1"));
    }
}

#[test]
fn test_unknown_subtype_rejected_everywhere() {
    let calc = CarbonCalculator::builtin();
    for input in unknown_subtype_inputs() {
        let err = calc.estimate(&input).unwrap_err();
        assert!(err.is_configuration(), "{}", err);
        assert!(err.to_string().contains("unicorn-fuel"));
    }
}

#[test]
fn test_negative_zero_gives_plain_zero_everywhere() {
    let calc = CarbonCalculator::builtin();
    for input in sample_inputs(-0.0) {
        let est = calc.estimate(&input).unwrap();
        assert!(est.co2e_kg.is_sign_positive(), "{}", est);
        assert!(!est.to_string().starts_with('-'));
    }
}

#[test]
fn test_overflowing_quantity_is_validation_error() {
    let calc = CarbonCalculator::builtin();
    let inputs = vec![
        ActivityInput::Energy(EnergyInput::new("electricity", "grid", 1e306).with_unit(EnergyUnit::Mwh)),
        ActivityInput::Food(FoodInput::new("meat", "beef", f64::MAX)),
        ActivityInput::Consumption(ConsumptionInput::new("electronics", "tv", f64::MAX)),
    ];
    for input in inputs {
        let err = calc.estimate(&input).unwrap_err();
        assert!(err.is_validation(), "{}", err);
        assert_eq!(err.category(), Some(input.category()));
    }
}

#[test]
fn test_unrecognized_category_name() {
    let err = "hobbies".parse::<Category>().unwrap_err();
    assert!(err.is_validation());
}

// =========================================================================
// Section 2: Reference scenarios
// =========================================================================

#[test]
fn test_reference_scenarios() {
    let calc = CarbonCalculator::builtin();

    let car = calc.transportation(&TransportInput::new("car", Some("petrol"), 100.0)).unwrap();
    assert_relative_eq!(car.co2e_kg, 19.2, epsilon = 1e-9);

    let grid = calc.energy(&EnergyInput::new("electricity", "grid", 50.0)).unwrap();
    assert_relative_eq!(grid.co2e_kg, 11.65, epsilon = 1e-9);

    let beef = calc.food(&FoodInput::new("meat", "beef", 2.0)).unwrap();
    let local_beef = calc.food(&FoodInput::new("meat", "beef", 2.0).local(true)).unwrap();
    assert_relative_eq!(beef.co2e_kg, 54.0, epsilon = 1e-9);
    assert_relative_eq!(local_beef.co2e_kg, 48.6, epsilon = 1e-9);

    let landfill = calc.waste(&WasteInput::new("landfill", 10.0)).unwrap();
    let compost = calc.waste(&WasteInput::new("composting", 10.0)).unwrap();
    assert_relative_eq!(landfill.co2e_kg, 5.8, epsilon = 1e-9);
    assert_relative_eq!(compost.co2e_kg, 0.5, epsilon = 1e-9);
}

#[test]
fn test_flight_with_unreachable_estimator() {
    let calc = CarbonCalculator::builtin().with_distance_estimator(Unreachable);
    let err = calc
        .transportation(&TransportInput::flight_between(None, "Berlin", "Madrid"))
        .unwrap_err();
    assert!(err.is_distance_unavailable());
}

#[test]
fn test_flight_to_same_airport_has_no_distance() {
    let calc = CarbonCalculator::builtin().with_distance_estimator(GreatCircleEstimator::builtin());
    let err = calc
        .transportation(&TransportInput::flight_between(None, "MAD", "mad"))
        .unwrap_err();
    assert!(err.is_distance_unavailable());
    assert!(err.to_string().contains("no route"));
}

#[test]
fn test_local_discount_always_reduces() {
    let calc = CarbonCalculator::builtin();
    for entry in calc.factors().category_factors(Category::Food) {
        let item = entry.modifier.as_deref().unwrap();
        let input = FoodInput::new(&entry.subtype, item, 1.0);
        let imported = calc.food(&input).unwrap();
        let local = calc.food(&input.clone().local(true)).unwrap();
        assert!(local.co2e_kg < imported.co2e_kg, "{}", item);
    }
}

// =========================================================================
// Section 3: Injected tables and estimators
// =========================================================================

#[test]
fn test_mock_tables_are_used() {
    let tables = FactorTables::empty("mock-v1", 0.5)
        .with_factor(Category::Transportation, "flight", Some("average"), 0.1)
        .unwrap();
    let calc = CarbonCalculator::new(Arc::new(tables)).with_distance_estimator(FixedDistance(1000.0));

    let est = calc
        .transportation(&TransportInput::flight_between(None, "anywhere", "elsewhere"))
        .unwrap();
    assert_relative_eq!(est.co2e_kg, 100.0, epsilon = 1e-9);

    // Builtin entries are absent from the mock
    assert!(calc
        .energy(&EnergyInput::new("electricity", "grid", 1.0))
        .unwrap_err()
        .is_configuration());
}

#[test]
fn test_shared_calculator_across_threads() {
    let calc = CarbonCalculator::builtin().with_distance_estimator(GreatCircleEstimator::builtin());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let calc = calc.clone();
            std::thread::spawn(move || {
                calc.transportation(&TransportInput::new("train", None, 10.0 * (i + 1) as f64))
                    .unwrap()
                    .co2e_kg
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let co2e = handle.join().unwrap();
        assert_relative_eq!(co2e, 10.0 * (i + 1) as f64 * 0.041, epsilon = 1e-9);
    }
}

// =========================================================================
// Section 4: Shipped data and settings
// =========================================================================

#[test]
fn test_shipped_factor_file_matches_builtin() {
    let loaded = FactorTables::load(&data_file("emission_factors.json")).unwrap();
    assert_eq!(loaded, FactorTables::builtin());
}

#[test]
fn test_shipped_locations_extend_builtin() {
    let estimator = GreatCircleEstimator::load(&data_file("locations.json")).unwrap();
    assert!(estimator.resolve("BCN").is_ok());
    assert!(estimator.resolve("london").is_ok());
}

#[test]
fn test_calculator_from_settings_creates_factor_file() {
    let dir = std::env::temp_dir().join(format!("carbon_tracker_settings_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);

    let settings = Settings {
        emission_factors_path: dir.join("factors.json"),
        distance_api_key: Some("not-used-offline".to_string()),
        locations_path: Some(data_file("locations.json")),
        distance_timeout: Duration::from_secs(5),
        ..Settings::default()
    };

    let calc = CarbonCalculator::from_settings(&settings).unwrap();
    assert!(settings.emission_factors_path.exists());
    assert_eq!(calc.factors(), &FactorTables::builtin());

    let est = calc
        .transportation(&TransportInput::flight_between(Some("domestic_short"), "LIS", "BCN"))
        .unwrap();
    assert!(est.quantity > 900.0 && est.quantity < 1100.0);

    let _ = std::fs::remove_dir_all(&dir);
}

// =========================================================================
// Section 5: Persistence
// =========================================================================

#[test]
fn test_estimates_persist_and_total() {
    let calc = CarbonCalculator::builtin();
    let mut memory = MemoryStore::new();

    let path = std::env::temp_dir()
        .join(format!("carbon_tracker_it_{}", std::process::id()))
        .join("records.jsonl");
    let _ = std::fs::remove_file(&path);
    let mut file = JsonLinesStore::open(&path).unwrap();

    for est in calc.estimate_all(&sample_inputs(2.0)).unwrap() {
        memory.save_estimate(&est).unwrap();
        file.save_estimate(&est).unwrap();
    }

    let from_memory = memory.totals_by_category().unwrap();
    let from_file = file.totals_by_category().unwrap();
    assert_eq!(from_memory.len(), 5);
    for ((cat_a, a), (cat_b, b)) in from_memory.iter().zip(&from_file) {
        assert_eq!(cat_a, cat_b);
        assert_relative_eq!(*a, *b, epsilon = 1e-9);
        assert!(*a > 0.0);
    }

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}
