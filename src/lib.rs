// Carbon Dashboard - Core Library
// Emissions analytics for the dashboard: filtering, aggregation, grading,
// tree-equivalent conversion, plus the state and data-loading around them.

pub mod model;
pub mod filtering;
pub mod aggregation;
pub mod grading;
pub mod conversion;
pub mod summary;
pub mod state;
pub mod store;
pub mod seed;
pub mod import;
pub mod config;

// Re-export commonly used types
pub use model::{
    AnnotatedEmission, Company, Country, DashboardFilters, DateRange, EmissionRecord, Post,
    PostDraft, ValidationError,
    is_valid_year_month, normalize_year_month,
};
pub use filtering::{filter_companies, flatten_and_filter_emissions, selected_company};
pub use aggregation::{
    Ranked, RollupKey, top_n,
    monthly_totals, cumulative_totals, company_rollups, source_shares, company_shares,
    country_breakdown, company_month_matrix, default_visible_series, company_comparison,
    MonthlyTotal, CumulativeTotal, CompanyRollup, SourceShare, CompanyShare, CountryBreakdown,
    CompanyMonthRow, CompanyComparison,
};
pub use grading::{
    classify_trend, environmental_trend, calculate_grade, health_score, tree_stage,
    TrendDirection, TrendReading, EnvironmentalTrend, EnvironmentalDirection,
    EnvironmentalGrade, Grade, TreeStage,
};
pub use conversion::{
    tons_to_trees, trees_to_tons, environmental_impact, EnvironmentalImpact,
};
pub use summary::{
    dashboard_summary, tree_savings, environmental_overview,
    DashboardSummary, TreeSavingPoint, EnvironmentalOverview, DashboardView, ViewOptions,
};
pub use state::AppState;
pub use store::{DataStore, StoreError, StoreSettings};
pub use import::{load_emissions_csv, read_emissions_csv};
pub use config::DashboardConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
