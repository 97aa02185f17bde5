// 📈 Trend & Grading - Period-over-period trend, letter grade, health score
//
// Grade bands follow global benchmarks for low-carbon companies, expressed in
// average tons of CO2 per month. Upper bounds are inclusive: 50 is A+,
// 50.0001 is A.

use crate::conversion::{environmental_impact, EnvironmentalImpact};
use serde::{Deserialize, Serialize};

/// Percent change beyond which a movement stops being "stable"
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Monthly tons that map to a health score of 0 (the A+ ceiling)
pub const HEALTH_BENCHMARK_TONS: f64 = 50.0;

// ============================================================================
// TWO-POINT TREND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Up => "up",
            TrendDirection::Down => "down",
            TrendDirection::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub direction: TrendDirection,

    /// Absolute percent change
    pub value: f64,
}

impl TrendReading {
    pub fn stable() -> Self {
        TrendReading {
            direction: TrendDirection::Stable,
            value: 0.0,
        }
    }
}

/// Signed percent change from `previous` to `latest`; 0 when there is no base
pub fn percent_change(previous: f64, latest: f64) -> f64 {
    if previous == 0.0 || !previous.is_finite() || !latest.is_finite() {
        return 0.0;
    }

    (latest - previous) / previous * 100.0
}

/// Compare two consecutive periods: up above +5%, down below -5%
pub fn classify_trend(previous: f64, latest: f64) -> TrendReading {
    let change = percent_change(previous, latest);

    let direction = if change > TREND_THRESHOLD_PERCENT {
        TrendDirection::Up
    } else if change < -TREND_THRESHOLD_PERCENT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    TrendReading {
        direction,
        value: change.abs(),
    }
}

// ============================================================================
// ENVIRONMENTAL TREND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentalDirection {
    Improving,
    Worsening,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalTrend {
    /// Size of the last period-over-period move, always non-negative
    pub reduction: f64,
    pub impact: EnvironmentalImpact,
    pub trend: EnvironmentalDirection,
}

/// Last two periods decide the trend. `None` until there are two periods.
///
/// A flat series counts as worsening: only a strict drop improves.
pub fn environmental_trend(period_totals: &[f64]) -> Option<EnvironmentalTrend> {
    let [.., previous, last] = period_totals else {
        return None;
    };

    let reduction = previous - last;

    if reduction > 0.0 {
        Some(EnvironmentalTrend {
            reduction,
            impact: environmental_impact(reduction),
            trend: EnvironmentalDirection::Improving,
        })
    } else {
        let increase = reduction.abs();
        Some(EnvironmentalTrend {
            reduction: increase,
            impact: environmental_impact(increase),
            trend: EnvironmentalDirection::Worsening,
        })
    }
}

// ============================================================================
// LETTER GRADE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalGrade {
    pub grade: Grade,
    pub color: String,
    pub description: String,
    pub benchmark: String,
    pub global_percentile: String,
}

impl EnvironmentalGrade {
    fn new(grade: Grade, color: &str, description: &str, benchmark: &str, percentile: &str) -> Self {
        EnvironmentalGrade {
            grade,
            color: color.to_string(),
            description: description.to_string(),
            benchmark: benchmark.to_string(),
            global_percentile: percentile.to_string(),
        }
    }
}

/// Grade a company (or portfolio) by its average monthly CO2 tons
pub fn calculate_grade(co2_per_month: f64) -> EnvironmentalGrade {
    if co2_per_month <= 50.0 {
        EnvironmentalGrade::new(
            Grade::APlus,
            "#22c55e",
            "Excellent",
            "Global carbon-neutral leaders",
            "Top 5%",
        )
    } else if co2_per_month <= 100.0 {
        EnvironmentalGrade::new(
            Grade::A,
            "#16a34a",
            "Very good",
            "Certified eco-friendly company average",
            "Top 20%",
        )
    } else if co2_per_month <= 150.0 {
        EnvironmentalGrade::new(
            Grade::B,
            "#65a30d",
            "Good",
            "Industry leader average",
            "Top 40%",
        )
    } else if co2_per_month <= 200.0 {
        EnvironmentalGrade::new(
            Grade::C,
            "#ca8a04",
            "Average",
            "Typical company average",
            "Top 60%",
        )
    } else if co2_per_month <= 300.0 {
        EnvironmentalGrade::new(
            Grade::D,
            "#ea580c",
            "Caution",
            "Needs improvement",
            "Bottom 40%",
        )
    } else {
        EnvironmentalGrade::new(
            Grade::F,
            "#dc2626",
            "Critical",
            "Carbon-intensive industry",
            "Bottom 20%",
        )
    }
}

// ============================================================================
// HEALTH SCORE & TREE STAGE
// ============================================================================

/// 0 t/month scores 100, 50 t/month or more scores 0, linear in between
pub fn health_score(avg_monthly_tons: f64) -> f64 {
    if avg_monthly_tons.is_nan() {
        return 0.0;
    }

    (100.0 - (avg_monthly_tons / HEALTH_BENCHMARK_TONS) * 100.0).clamp(0.0, 100.0)
}

/// Growth stage shown next to a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeStage {
    LargeTree,
    MediumTree,
    Sapling,
    PottedPlant,
    Leaf,
}

impl TreeStage {
    pub fn glyph(&self) -> &'static str {
        match self {
            TreeStage::LargeTree => "🌳",
            TreeStage::MediumTree => "🌲",
            TreeStage::Sapling => "🌱",
            TreeStage::PottedPlant => "🪴",
            TreeStage::Leaf => "🌿",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TreeStage::LargeTree => "large tree",
            TreeStage::MediumTree => "medium tree",
            TreeStage::Sapling => "sapling",
            TreeStage::PottedPlant => "potted plant",
            TreeStage::Leaf => "leaf",
        }
    }
}

/// Thresholds are inclusive lower bounds: 80, 60, 40, 20
pub fn tree_stage(health_score: f64) -> TreeStage {
    if health_score >= 80.0 {
        TreeStage::LargeTree
    } else if health_score >= 60.0 {
        TreeStage::MediumTree
    } else if health_score >= 40.0 {
        TreeStage::Sapling
    } else if health_score >= 20.0 {
        TreeStage::PottedPlant
    } else {
        TreeStage::Leaf
    }
}

// ============================================================================
// TESTS
// ============================================================================
