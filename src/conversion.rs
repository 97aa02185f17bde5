// 🌳 Unit Conversion Model - CO2 tons → trees → oxygen, clean air, forest area
//
// Reference tree: a mature pine (about 20 years old, 10 m tall) absorbing
// roughly 22 kg of CO2 a year. Real trees vary a lot with age, size, soil
// and climate; these figures are illustrative constants, not measurements.
//
// Every count is truncated (floor). A reduction of 21 kg saves zero trees.

use serde::{Deserialize, Serialize};

// ============================================================================
// CONSTANTS
// ============================================================================

/// kg CO2 absorbed per tree per year
pub const TREE_CO2_ABSORPTION_PER_YEAR: f64 = 22.0;

/// kg O2 produced per tree per year
pub const OXYGEN_PRODUCTION_PER_TREE_PER_YEAR: f64 = 260.0;

/// kg of air pollutants removed per tree per year
pub const AIR_POLLUTION_REMOVAL_PER_TREE_PER_YEAR: f64 = 27.0;

/// Trees needed to call a stand a small forest
pub const TREES_PER_SMALL_FOREST: u64 = 100;

/// Soccer fields covered by 100 trees
pub const FOREST_AREA_PER_100_TREES: f64 = 0.5;

/// kg CO2 per km for an ordinary passenger car
pub const CAR_CO2_PER_KM: f64 = 4.6;

/// kWh a four-person household uses per month
pub const HOUSEHOLD_MONTHLY_ELECTRICITY: f64 = 350.0;

/// kg CO2 per kWh of grid electricity
pub const ELECTRICITY_CO2_PER_KWH: f64 = 0.4575;

const KG_PER_TON: f64 = 1000.0;

// ============================================================================
// CONVERSIONS
// ============================================================================

/// Trees whose yearly absorption covers `co2_tons`, truncated
pub fn tons_to_trees(co2_tons: f64) -> u64 {
    if !co2_tons.is_finite() || co2_tons <= 0.0 {
        return 0;
    }

    (co2_tons * KG_PER_TON / TREE_CO2_ABSORPTION_PER_YEAR).floor() as u64
}

/// Tons of CO2 absorbed per year by `trees`
pub fn trees_to_tons(trees: u64) -> f64 {
    trees as f64 * TREE_CO2_ABSORPTION_PER_YEAR / KG_PER_TON
}

/// Kilometres an ordinary car drives to emit `co2_tons`
pub fn car_km_equivalent(co2_tons: f64) -> f64 {
    if !co2_tons.is_finite() || co2_tons <= 0.0 {
        return 0.0;
    }

    co2_tons * KG_PER_TON / CAR_CO2_PER_KM
}

/// Months of household electricity that emit `co2_tons`
pub fn household_electricity_months(co2_tons: f64) -> f64 {
    if !co2_tons.is_finite() || co2_tons <= 0.0 {
        return 0.0;
    }

    co2_tons * KG_PER_TON / (HOUSEHOLD_MONTHLY_ELECTRICITY * ELECTRICITY_CO2_PER_KWH)
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ============================================================================
// ENVIRONMENTAL IMPACT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalImpact {
    pub saved_trees: u64,
    pub equivalent_forests: u64,

    /// kg per year
    pub oxygen_produced: u64,

    /// kg of pollutants per year
    pub air_purified: u64,

    /// The input reduction, in tons
    pub carbon_stored: f64,

    pub forest_area_in_soccer_fields: f64,
}

/// Express a CO2 reduction (tons) as tree-based equivalents
pub fn environmental_impact(reduction_tons: f64) -> EnvironmentalImpact {
    let saved_trees = tons_to_trees(reduction_tons);
    let trees = saved_trees as f64;

    EnvironmentalImpact {
        saved_trees,
        equivalent_forests: saved_trees / TREES_PER_SMALL_FOREST,
        oxygen_produced: (trees * OXYGEN_PRODUCTION_PER_TREE_PER_YEAR).floor() as u64,
        air_purified: (trees * AIR_POLLUTION_REMOVAL_PER_TREE_PER_YEAR).floor() as u64,
        carbon_stored: reduction_tons,
        forest_area_in_soccer_fields: round1(trees * FOREST_AREA_PER_100_TREES / 100.0),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tons_to_trees_truncates() {
        // 21 kg is not enough for one tree
        assert_eq!(tons_to_trees(0.021), 0);
        assert_eq!(tons_to_trees(0.022), 1);
        assert_eq!(tons_to_trees(0.043), 1);
        assert_eq!(tons_to_trees(1.0), 45); // 1000 / 22 = 45.45
        assert_eq!(tons_to_trees(100.0), 4545);
    }

    #[test]
    fn test_tons_to_trees_degenerate_inputs() {
        assert_eq!(tons_to_trees(0.0), 0);
        assert_eq!(tons_to_trees(-5.0), 0);
        assert_eq!(tons_to_trees(f64::NAN), 0);
        assert_eq!(tons_to_trees(f64::INFINITY), 0);
    }

    #[test]
    fn test_round_trip_never_overshoots() {
        for tons in [0.0, 0.021, 0.022, 0.5, 1.0, 3.3, 17.77, 95.0, 1234.5678] {
            let back = trees_to_tons(tons_to_trees(tons));
            assert!(back <= tons + 1e-9, "{} trees back to {} > {}", tons_to_trees(tons), back, tons);
        }
    }

    #[test]
    fn test_environmental_impact() {
        let impact = environmental_impact(10.0);

        // 10_000 / 22 = 454.5
        assert_eq!(impact.saved_trees, 454);
        assert_eq!(impact.equivalent_forests, 4);
        assert_eq!(impact.oxygen_produced, 454 * 260);
        assert_eq!(impact.air_purified, 454 * 27);
        assert_eq!(impact.carbon_stored, 10.0);
        // 454 * 0.5 / 100 = 2.27
        assert_eq!(impact.forest_area_in_soccer_fields, 2.3);
    }

    #[test]
    fn test_environmental_impact_below_one_forest() {
        let impact = environmental_impact(2.0);

        assert_eq!(impact.saved_trees, 90);
        assert_eq!(impact.equivalent_forests, 0);
        assert_eq!(impact.forest_area_in_soccer_fields, 0.5); // 0.45 → 0.5
    }

    #[test]
    fn test_everyday_equivalents() {
        assert!((car_km_equivalent(4.6) - 1000.0).abs() < 1e-9);
        // 350 kWh * 0.4575 = 160.125 kg per month
        assert!((household_electricity_months(0.160125) - 1.0).abs() < 1e-9);
        assert_eq!(car_km_equivalent(-1.0), 0.0);
        assert_eq!(household_electricity_months(0.0), 0.0);
    }
}
