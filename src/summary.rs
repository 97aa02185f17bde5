// 🧾 Dashboard Panels - Headline numbers and composite views
//
// Each panel is built from the filtered stream with the aggregation and
// derived-model stages. `DashboardView` bundles every panel for one filter
// state so callers can cache or serialize it in one piece.

use crate::aggregation::{
    company_comparison, company_month_matrix, company_rollups, company_shares, country_breakdown,
    cumulative_totals, default_visible_series, monthly_totals, source_shares, top_n,
    CompanyComparison, CompanyMonthRow, CompanyRollup, CompanyShare, CountryBreakdown,
    CumulativeTotal, MonthlyTotal, RollupKey, SourceShare, DEFAULT_TOP_COMPANIES,
    DEFAULT_TREEMAP_COMPANIES, DEFAULT_VISIBLE_SERIES,
};
use crate::conversion::{environmental_impact, tons_to_trees, EnvironmentalImpact};
use crate::filtering::{filter_companies, flatten_and_filter_emissions};
use crate::grading::{
    calculate_grade, environmental_trend, health_score, percent_change, tree_stage,
    EnvironmentalGrade, EnvironmentalTrend, TreeStage,
};
use crate::model::{AnnotatedEmission, Company, Country, DashboardFilters};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Share of current emissions the reduction scenario removes
pub const DEFAULT_REDUCTION_TARGET: f64 = 0.2;

// ============================================================================
// VIEW OPTIONS
// ============================================================================

/// Caller-supplied sizes and switches for a dashboard view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOptions {
    pub top_companies: usize,
    pub treemap_companies: usize,
    pub comparison_companies: usize,
    pub visible_series: usize,
    pub rollup_key: RollupKey,
    pub reduction_target: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            top_companies: DEFAULT_TOP_COMPANIES,
            treemap_companies: DEFAULT_TREEMAP_COMPANIES,
            comparison_companies: DEFAULT_TOP_COMPANIES,
            visible_series: DEFAULT_VISIBLE_SERIES,
            rollup_key: RollupKey::CompanyId,
            reduction_target: DEFAULT_REDUCTION_TARGET,
        }
    }
}

// ============================================================================
// HEADLINE SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_emissions: f64,

    /// Average per record
    pub average_emissions: f64,

    pub company_count: usize,
    pub source_count: usize,

    /// Total of the latest month
    pub current_monthly: f64,

    /// Latest month vs the one before, signed percent
    pub monthly_change: f64,

    pub top_company: Option<String>,
}

impl DashboardSummary {
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.1} t CO2e, {} companies, {} sources, latest month {:.1} t ({:+.1}%)",
            self.total_emissions,
            self.company_count,
            self.source_count,
            self.current_monthly,
            self.monthly_change
        )
    }
}

pub fn dashboard_summary(records: &[AnnotatedEmission]) -> DashboardSummary {
    if records.is_empty() {
        return DashboardSummary::default();
    }

    let total_emissions: f64 = records.iter().map(|r| r.emissions).sum();
    let company_count = records.iter().map(|r| r.company_id.as_str()).collect::<IndexSet<_>>().len();
    let source_count = records.iter().map(|r| r.source.as_str()).collect::<IndexSet<_>>().len();

    let months = monthly_totals(records);
    let current_monthly = months.last().map_or(0.0, |m| m.total);
    let previous_monthly = months.iter().rev().nth(1).map_or(0.0, |m| m.total);

    let top_company = company_rollups(records, RollupKey::CompanyName)
        .first()
        .map(|rollup| rollup.company.clone());

    DashboardSummary {
        total_emissions,
        average_emissions: total_emissions / records.len() as f64,
        company_count,
        source_count,
        current_monthly,
        monthly_change: percent_change(previous_monthly, current_monthly),
        top_company,
    }
}

// ============================================================================
// TREE SAVINGS SERIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSavingPoint {
    pub month: String,
    pub emissions: f64,

    /// Trees saved by this month's drop vs the previous month
    pub saved_trees: u64,

    pub cumulative_trees: u64,
}

/// Month-over-month drops expressed as trees. Increases save nothing.
pub fn tree_savings(records: &[AnnotatedEmission]) -> Vec<TreeSavingPoint> {
    let months = monthly_totals(records);
    let mut cumulative_trees = 0;
    let mut previous: Option<f64> = None;

    months
        .into_iter()
        .map(|month| {
            let saved_trees = match previous {
                Some(prev) if prev - month.total > 0.0 => tons_to_trees(prev - month.total),
                _ => 0,
            };
            cumulative_trees += saved_trees;
            previous = Some(month.total);

            TreeSavingPoint {
                month: month.month,
                emissions: month.total,
                saved_trees,
                cumulative_trees,
            }
        })
        .collect()
}

// ============================================================================
// ENVIRONMENTAL OVERVIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalOverview {
    pub total_emissions: f64,
    pub months: usize,
    pub average_monthly_emissions: f64,
    pub grade: EnvironmentalGrade,
    pub health_score: f64,
    pub tree_stage: TreeStage,

    /// Tons removed if the reduction target were met
    pub target_reduction: f64,
    pub impact: EnvironmentalImpact,
}

/// Grade and health of the stream, plus what cutting `reduction_target` of it would save
pub fn environmental_overview(
    records: &[AnnotatedEmission],
    reduction_target: f64,
) -> EnvironmentalOverview {
    let total_emissions: f64 = records.iter().map(|r| r.emissions).sum();
    let months = records.iter().map(|r| r.year_month.as_str()).collect::<IndexSet<_>>().len();
    let average_monthly_emissions = if months > 0 {
        total_emissions / months as f64
    } else {
        0.0
    };

    let score = health_score(average_monthly_emissions);
    let target_reduction = total_emissions * reduction_target;

    EnvironmentalOverview {
        total_emissions,
        months,
        average_monthly_emissions,
        grade: calculate_grade(average_monthly_emissions),
        health_score: score,
        tree_stage: tree_stage(score),
        target_reduction,
        impact: environmental_impact(target_reduction),
    }
}

// ============================================================================
// DASHBOARD VIEW
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub filters: DashboardFilters,
    pub record_count: usize,
    pub summary: DashboardSummary,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub cumulative_totals: Vec<CumulativeTotal>,
    pub company_rollups: Vec<CompanyRollup>,
    pub top_companies: Vec<CompanyRollup>,
    pub source_shares: Vec<SourceShare>,
    pub company_shares: Vec<CompanyShare>,
    pub country_breakdown: Vec<CountryBreakdown>,
    pub visible_series: Vec<String>,
    pub company_matrix: Vec<CompanyMonthRow>,
    pub company_comparison: Vec<CompanyComparison>,
    pub tree_savings: Vec<TreeSavingPoint>,
    pub environmental_trend: Option<EnvironmentalTrend>,
    pub overview: EnvironmentalOverview,
}

impl DashboardView {
    /// Run every stage from scratch for one filter state
    pub fn build(
        companies: &[Company],
        countries: &[Country],
        filters: &DashboardFilters,
        options: &ViewOptions,
    ) -> Self {
        let records = flatten_and_filter_emissions(companies, filters);
        let filtered_companies = filter_companies(companies, filters);

        let monthly = monthly_totals(&records);
        let period_totals: Vec<f64> = monthly.iter().map(|m| m.total).collect();
        let rollups = company_rollups(&records, options.rollup_key);
        let visible_series = default_visible_series(&records, options.visible_series);

        DashboardView {
            filters: filters.clone(),
            record_count: records.len(),
            summary: dashboard_summary(&records),
            cumulative_totals: cumulative_totals(&records),
            top_companies: top_n(&rollups, options.top_companies),
            company_rollups: rollups,
            source_shares: source_shares(&records),
            company_shares: company_shares(&records, options.treemap_companies),
            country_breakdown: country_breakdown(&records),
            company_matrix: company_month_matrix(&records, &visible_series),
            visible_series,
            company_comparison: company_comparison(
                &filtered_companies,
                countries,
                options.comparison_companies,
            ),
            tree_savings: tree_savings(&records),
            environmental_trend: environmental_trend(&period_totals),
            overview: environmental_overview(&records, options.reduction_target),
            monthly_totals: monthly,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
