//! Built-in emission factors
//!
//! kg CO2e per unit. Transportation is per passenger-km, energy per kWh, food
//! per kg, consumption per item and waste per kg disposed.
//!
//! Data sources:
//! - UK DEFRA 2019 conversion factors: car/petrol 0.192, grid electricity
//!   0.233, landfill 0.58, composting 0.05, recycling 0.021
//! - US EPA emission factor hub / DEFRA: every other transport, heating and
//!   waste row, as shipped by earlier releases of the tables
//! - Poore & Nemecek (2018) food lifecycle medians
//! - Consumption rows are per-item lifecycle estimates from the same releases
//!
//! Electric heating and cooling draw from the grid, so they carry the grid
//! electricity factor. An `average` variant repeats the mode's most common
//! variant (petrol for cars and motorcycles, domestic_long for flights).

/// Version tag carried by tables built from this module
pub const BUILTIN_VERSION: &str = "defra-epa-2019";

/// Fraction of the food factor kept when produce is sourced locally
pub const LOCAL_SOURCING_MULTIPLIER: f64 = 0.9;

/// (mode, variant, factor). `average` is used when no fuel is given.
pub static TRANSPORTATION: &[(&str, &str, f64)] = &[
    ("car", "petrol", 0.192),
    ("car", "diesel", 0.448),
    ("car", "hybrid", 0.253),
    ("car", "electric", 0.089),
    ("car", "average", 0.192),
    ("motorcycle", "petrol", 0.103),
    ("motorcycle", "average", 0.103),
    ("bus", "average", 0.089),
    ("train", "average", 0.041),
    ("subway", "average", 0.038),
    ("tram", "average", 0.029),
    ("scooter", "electric", 0.02),
    ("scooter", "average", 0.02),
    ("flight", "domestic_short", 0.255),
    ("flight", "domestic_long", 0.195),
    ("flight", "international", 0.150),
    ("flight", "average", 0.195),
];

/// (usage, source, factor) per kWh
pub static ENERGY: &[(&str, &str, f64)] = &[
    ("electricity", "grid", 0.233),
    ("electricity", "renewable", 0.024),
    ("electricity", "coal", 0.820),
    ("electricity", "natural_gas", 0.350),
    ("heating", "natural_gas", 0.185),
    ("heating", "heating_oil", 0.245),
    ("heating", "propane", 0.214),
    ("heating", "electric", 0.233),
    ("cooling", "electric", 0.233),
];

/// (group, item, factor) per kg
pub static FOOD: &[(&str, &str, f64)] = &[
    ("meat", "beef", 27.0),
    ("meat", "lamb", 24.5),
    ("meat", "pork", 7.6),
    ("meat", "chicken", 9.9),
    ("meat", "turkey", 12.1),
    ("dairy", "milk", 3.2),
    ("dairy", "cheese", 13.5),
    ("dairy", "yogurt", 2.2),
    ("dairy", "butter", 23.8),
    ("seafood", "fish_farmed", 13.6),
    ("seafood", "fish_wild", 5.4),
    ("seafood", "shellfish", 11.3),
    ("plant_based", "vegetables", 2.0),
    ("plant_based", "fruits", 1.1),
    ("plant_based", "grains", 2.5),
    ("plant_based", "legumes", 0.9),
    ("plant_based", "nuts", 2.3),
    ("processed", "bread", 0.9),
    ("processed", "pasta", 1.4),
    ("processed", "rice", 2.7),
    ("processed", "coffee", 28.5),
    ("processed", "tea", 6.3),
];

/// (group, item, factor) per item
pub static CONSUMPTION: &[(&str, &str, f64)] = &[
    ("clothing", "cotton_shirt", 8.0),
    ("clothing", "jeans", 33.4),
    ("clothing", "shoes", 12.5),
    ("clothing", "synthetic_garment", 5.5),
    ("electronics", "smartphone", 70.0),
    ("electronics", "laptop", 300.0),
    ("electronics", "tablet", 130.0),
    ("electronics", "tv", 500.0),
    ("household", "furniture_item", 150.0),
    ("household", "appliance_small", 45.0),
    ("household", "appliance_large", 200.0),
];

/// (method, factor) per kg disposed
pub static WASTE: &[(&str, f64)] = &[
    ("landfill", 0.58),
    ("recycling", 0.021),
    ("composting", 0.05),
    ("incineration", 0.35),
];
