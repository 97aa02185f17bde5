// 📊 Aggregation Stage - Group, sum, rank, and share the annotated stream
//
// Every grouping goes through an insertion-ordered map and is then sorted
// explicitly before it is returned. Iteration order of the map is never
// what a caller sees.
//
// Empty input gives empty output. No function divides by a zero count or a
// zero total: those ratios are reported as 0.

use crate::grading::{classify_trend, TrendDirection, TrendReading};
use crate::model::{AnnotatedEmission, Company, Country};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Companies shown in ranking tables
pub const DEFAULT_TOP_COMPANIES: usize = 10;

/// Tiles in the treemap
pub const DEFAULT_TREEMAP_COMPANIES: usize = 15;

/// Series drawn in the multi-company time chart
pub const DEFAULT_VISIBLE_SERIES: usize = 5;

const UNKNOWN_COUNTRY: &str = "Unknown";

// ============================================================================
// RANKING
// ============================================================================

/// Anything that can be ranked by a single magnitude
pub trait Ranked {
    fn rank_value(&self) -> f64;
}

/// Descending by value. The sort is stable, so ties keep their input order.
pub fn sort_descending<T: Ranked>(items: &mut [T]) {
    items.sort_by(|a, b| {
        b.rank_value()
            .partial_cmp(&a.rank_value())
            .unwrap_or(Ordering::Equal)
    });
}

/// The `n` largest items, ties in input order
pub fn top_n<T: Ranked + Clone>(items: &[T], n: usize) -> Vec<T> {
    let mut ranked = items.to_vec();
    sort_descending(&mut ranked);
    ranked.truncate(n);
    ranked
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    ratio(part, whole) * 100.0
}

// ============================================================================
// MONTHLY TOTALS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

fn group_by_month(records: &[AnnotatedEmission]) -> IndexMap<&str, f64> {
    let mut months: IndexMap<&str, f64> = IndexMap::new();

    for record in records {
        *months.entry(record.year_month.as_str()).or_insert(0.0) += record.emissions;
    }

    months.sort_keys();
    months
}

/// Sum per month, ascending by month
pub fn monthly_totals(records: &[AnnotatedEmission]) -> Vec<MonthlyTotal> {
    group_by_month(records)
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month: month.to_string(),
            total,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CumulativeTotal {
    pub month: String,
    pub total: f64,
    pub cumulative: f64,

    /// Distinct companies reporting this month
    pub companies: usize,

    pub avg_per_company: f64,
}

/// Monthly totals with a running sum carried across the sorted months
pub fn cumulative_totals(records: &[AnnotatedEmission]) -> Vec<CumulativeTotal> {
    let mut companies_by_month: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for record in records {
        companies_by_month
            .entry(record.year_month.as_str())
            .or_default()
            .insert(record.company_id.as_str());
    }

    let mut running = 0.0;
    group_by_month(records)
        .into_iter()
        .map(|(month, total)| {
            running += total;
            let companies = companies_by_month.get(month).map_or(0, |ids| ids.len());

            CumulativeTotal {
                month: month.to_string(),
                total,
                cumulative: running,
                companies,
                avg_per_company: ratio(total, companies as f64),
            }
        })
        .collect()
}

// ============================================================================
// COMPANY ROLLUP
// ============================================================================

/// What makes two records belong to the same company row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupKey {
    /// Exact identity
    #[default]
    CompanyId,

    /// Display name: companies sharing a name are merged into one row
    CompanyName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRollup {
    /// First id seen for this row
    pub company_id: String,
    pub company: String,
    pub country: String,
    pub total_emissions: f64,
    pub avg_emissions: f64,
    pub data_points: usize,

    /// Latest month with data
    pub last_update: String,

    pub trend: TrendDirection,
    pub trend_value: f64,
}

impl Ranked for CompanyRollup {
    fn rank_value(&self) -> f64 {
        self.total_emissions
    }
}

struct RollupAccumulator<'a> {
    company_id: &'a str,
    company: &'a str,
    country: &'a str,
    total: f64,
    data_points: usize,
    by_month: IndexMap<&'a str, f64>,
}

/// One row per company, largest total first.
///
/// The trend compares the two most recent distinct months (each summed over
/// sources). With fewer than two months the trend is stable at 0.
pub fn company_rollups(records: &[AnnotatedEmission], key: RollupKey) -> Vec<CompanyRollup> {
    let mut groups: IndexMap<&str, RollupAccumulator> = IndexMap::new();

    for record in records {
        let group_key = match key {
            RollupKey::CompanyId => record.company_id.as_str(),
            RollupKey::CompanyName => record.company_name.as_str(),
        };

        let acc = groups.entry(group_key).or_insert_with(|| RollupAccumulator {
            company_id: record.company_id.as_str(),
            company: record.company_name.as_str(),
            country: if record.country.is_empty() {
                UNKNOWN_COUNTRY
            } else {
                record.country.as_str()
            },
            total: 0.0,
            data_points: 0,
            by_month: IndexMap::new(),
        });

        acc.total += record.emissions;
        acc.data_points += 1;
        *acc.by_month.entry(record.year_month.as_str()).or_insert(0.0) += record.emissions;
    }

    let mut rollups: Vec<CompanyRollup> = groups
        .into_values()
        .map(|mut acc| {
            acc.by_month.sort_keys();

            let reading = match acc.by_month.len() {
                0 | 1 => TrendReading::stable(),
                len => {
                    let previous = acc.by_month[len - 2];
                    let latest = acc.by_month[len - 1];
                    classify_trend(previous, latest)
                }
            };

            let last_update = acc
                .by_month
                .keys()
                .last()
                .map(|month| month.to_string())
                .unwrap_or_default();

            CompanyRollup {
                company_id: acc.company_id.to_string(),
                company: acc.company.to_string(),
                country: acc.country.to_string(),
                total_emissions: acc.total,
                avg_emissions: ratio(acc.total, acc.data_points as f64),
                data_points: acc.data_points,
                last_update,
                trend: reading.direction,
                trend_value: reading.value,
            }
        })
        .collect();

    sort_descending(&mut rollups);
    rollups
}

// ============================================================================
// SOURCE SHARES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceShare {
    pub source: String,
    pub emissions: f64,

    /// Records contributing to this source
    pub count: usize,

    /// Share of the grand total, 0..=100
    pub percentage: f64,
}

impl Ranked for SourceShare {
    fn rank_value(&self) -> f64 {
        self.emissions
    }
}

/// Per-source totals as a share of everything, largest first
pub fn source_shares(records: &[AnnotatedEmission]) -> Vec<SourceShare> {
    let mut sources: IndexMap<&str, (f64, usize)> = IndexMap::new();
    let mut grand_total = 0.0;

    for record in records {
        let entry = sources.entry(record.source.as_str()).or_insert((0.0, 0));
        entry.0 += record.emissions;
        entry.1 += 1;
        grand_total += record.emissions;
    }

    let mut shares: Vec<SourceShare> = sources
        .into_iter()
        .map(|(source, (emissions, count))| SourceShare {
            source: source.to_string(),
            emissions,
            count,
            percentage: percentage(emissions, grand_total),
        })
        .collect();

    sort_descending(&mut shares);
    shares
}

// ============================================================================
// COMPANY SHARES (treemap)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyShare {
    pub name: String,
    pub country: String,
    pub emissions: f64,
    pub percentage: f64,
}

impl Ranked for CompanyShare {
    fn rank_value(&self) -> f64 {
        self.emissions
    }
}

/// Top `limit` companies by name, each with its share of the whole stream.
///
/// Percentages are taken against every company, not only the ones kept.
pub fn company_shares(records: &[AnnotatedEmission], limit: usize) -> Vec<CompanyShare> {
    let mut companies: IndexMap<&str, (&str, f64)> = IndexMap::new();
    let mut grand_total = 0.0;

    for record in records {
        let country = if record.country.is_empty() {
            UNKNOWN_COUNTRY
        } else {
            record.country.as_str()
        };
        companies
            .entry(record.company_name.as_str())
            .or_insert((country, 0.0))
            .1 += record.emissions;
        grand_total += record.emissions;
    }

    let shares: Vec<CompanyShare> = companies
        .into_iter()
        .map(|(name, (country, emissions))| CompanyShare {
            name: name.to_string(),
            country: country.to_string(),
            emissions,
            percentage: percentage(emissions, grand_total),
        })
        .collect();

    top_n(&shares, limit)
}

// ============================================================================
// COUNTRY BREAKDOWN (heatmap)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryBreakdown {
    pub country: String,
    pub total_emissions: f64,

    /// Distinct companies reporting from this country
    pub companies: usize,

    /// Total relative to the largest country, 0..=100
    pub intensity: f64,
}

impl Ranked for CountryBreakdown {
    fn rank_value(&self) -> f64 {
        self.total_emissions
    }
}

pub fn country_breakdown(records: &[AnnotatedEmission]) -> Vec<CountryBreakdown> {
    let mut countries: IndexMap<&str, (f64, IndexSet<&str>)> = IndexMap::new();

    for record in records {
        let country = if record.country.is_empty() {
            UNKNOWN_COUNTRY
        } else {
            record.country.as_str()
        };
        let entry = countries.entry(country).or_default();
        entry.0 += record.emissions;
        entry.1.insert(record.company_id.as_str());
    }

    let max = countries
        .values()
        .map(|(total, _)| *total)
        .fold(0.0_f64, f64::max);

    let mut breakdown: Vec<CountryBreakdown> = countries
        .into_iter()
        .map(|(country, (total, companies))| CountryBreakdown {
            country: country.to_string(),
            total_emissions: total,
            companies: companies.len(),
            intensity: percentage(total, max),
        })
        .collect();

    sort_descending(&mut breakdown);
    breakdown
}

// ============================================================================
// COMPANY × MONTH MATRIX
// ============================================================================

/// One row of the multi-series time chart.
///
/// Serializes flat: `{"month": "2024-01", "total": 200.0, "Acme Corp": 120.0, ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyMonthRow {
    pub month: String,

    /// True monthly total over every company, visible or not
    pub total: f64,

    #[serde(flatten)]
    pub values: IndexMap<String, f64>,
}

impl CompanyMonthRow {
    pub fn value(&self, company: &str) -> f64 {
        self.values.get(company).copied().unwrap_or(0.0)
    }
}

/// First `limit` distinct company names, in the order they appear
pub fn default_visible_series(records: &[AnnotatedEmission], limit: usize) -> Vec<String> {
    let names: IndexSet<&str> = records.iter().map(|r| r.company_name.as_str()).collect();
    names.into_iter().take(limit).map(|name| name.to_string()).collect()
}

/// One row per month, one column per visible company (0 when absent)
pub fn company_month_matrix(
    records: &[AnnotatedEmission],
    visible: &[String],
) -> Vec<CompanyMonthRow> {
    let mut months: IndexMap<&str, (f64, IndexMap<&str, f64>)> = IndexMap::new();

    for record in records {
        let entry = months.entry(record.year_month.as_str()).or_default();
        entry.0 += record.emissions;
        *entry.1.entry(record.company_name.as_str()).or_insert(0.0) += record.emissions;
    }

    months.sort_keys();

    months
        .into_iter()
        .map(|(month, (total, by_company))| {
            let values = visible
                .iter()
                .map(|name| {
                    let value = by_company.get(name.as_str()).copied().unwrap_or(0.0);
                    (name.clone(), value)
                })
                .collect();

            CompanyMonthRow {
                month: month.to_string(),
                total,
                values,
            }
        })
        .collect()
}

// ============================================================================
// COMPANY COMPARISON
// ============================================================================

const DEFAULT_FLAG: &str = "🌍";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyComparison {
    pub name: String,
    pub emissions: f64,
    pub country: String,
    pub flag: String,
    pub data_points: usize,

    /// Average per record
    pub avg_monthly: f64,
}

impl Ranked for CompanyComparison {
    fn rank_value(&self) -> f64 {
        self.emissions
    }
}

/// Whole-history totals per company, biggest emitters first.
///
/// Reads the company tree directly: the comparison ignores the date range and
/// source filters and only respects which companies survived filtering.
pub fn company_comparison(
    companies: &[Company],
    countries: &[Country],
    limit: usize,
) -> Vec<CompanyComparison> {
    let rows: Vec<CompanyComparison> = companies
        .iter()
        .map(|company| {
            let emissions = company.total_emissions();
            let data_points = company.emissions.len();
            let flag = countries
                .iter()
                .find(|country| country.code == company.country)
                .and_then(|country| country.flag.clone())
                .unwrap_or_else(|| DEFAULT_FLAG.to_string());

            CompanyComparison {
                name: company.name.clone(),
                emissions,
                country: company.country.clone(),
                flag,
                data_points,
                avg_monthly: ratio(emissions, data_points as f64),
            }
        })
        .collect();

    top_n(&rows, limit)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::flatten_and_filter_emissions;
    use crate::model::{DashboardFilters, DateRange, EmissionRecord};

    fn record(
        company_id: &str,
        name: &str,
        country: &str,
        month: &str,
        source: &str,
        tons: f64,
    ) -> AnnotatedEmission {
        AnnotatedEmission {
            year_month: month.to_string(),
            source: source.to_string(),
            emissions: tons,
            company_id: company_id.to_string(),
            company_name: name.to_string(),
            country: country.to_string(),
        }
    }

    fn create_test_stream() -> Vec<AnnotatedEmission> {
        vec![
            record("c1", "Acme Corp", "US", "2024-02", "gasoline", 110.0),
            record("c1", "Acme Corp", "US", "2024-01", "gasoline", 120.0),
            record("c1", "Acme Corp", "US", "2024-01", "diesel", 80.0),
            record("c2", "Globex Industries", "DE", "2024-01", "gasoline", 80.0),
            record("c2", "Globex Industries", "DE", "2024-02", "lpg", 65.0),
            record("c2", "Globex Industries", "DE", "2024-03", "gasoline", 120.0),
            record("c3", "TechNova Solutions", "JP", "2024-03", "electricity", 180.0),
        ]
    }

    fn sum(records: &[AnnotatedEmission]) -> f64 {
        records.iter().map(|r| r.emissions).sum()
    }

    #[test]
    fn test_monthly_totals_sorted_and_conserving() {
        let stream = create_test_stream();
        let totals = monthly_totals(&stream);

        let months: Vec<&str> = totals.iter().map(|t| t.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(totals[0].total, 280.0);
        assert_eq!(totals[1].total, 175.0);
        assert_eq!(totals[2].total, 300.0);

        let grouped: f64 = totals.iter().map(|t| t.total).sum();
        assert!((grouped - sum(&stream)).abs() < 1e-9);
    }

    #[test]
    fn test_cumulative_totals() {
        let stream = create_test_stream();
        let cumulative = cumulative_totals(&stream);

        let running: Vec<f64> = cumulative.iter().map(|c| c.cumulative).collect();
        assert_eq!(running, vec![280.0, 455.0, 755.0]);

        assert_eq!(cumulative[0].companies, 2);
        assert_eq!(cumulative[0].avg_per_company, 140.0);
        assert_eq!(cumulative[2].companies, 2);

        let last = cumulative.last().unwrap().cumulative;
        let monthly: f64 = monthly_totals(&stream).iter().map(|t| t.total).sum();
        assert!((last - monthly).abs() < 1e-9);
    }

    #[test]
    fn test_company_rollups() {
        let stream = create_test_stream();
        let rollups = company_rollups(&stream, RollupKey::CompanyId);

        assert_eq!(rollups.len(), 3);

        // Sorted by total: Acme 310, Globex 265, TechNova 180
        assert_eq!(rollups[0].company, "Acme Corp");
        assert_eq!(rollups[0].total_emissions, 310.0);
        assert_eq!(rollups[0].data_points, 3);
        assert!((rollups[0].avg_emissions - 310.0 / 3.0).abs() < 1e-9);
        assert_eq!(rollups[0].last_update, "2024-02");
        // Jan = 200 (both sources), Feb = 110 → -45%
        assert_eq!(rollups[0].trend, TrendDirection::Down);
        assert!((rollups[0].trend_value - 45.0).abs() < 1e-9);

        assert_eq!(rollups[1].company_id, "c2");
        assert_eq!(rollups[1].last_update, "2024-03");
        // Feb 65 → Mar 120
        assert_eq!(rollups[1].trend, TrendDirection::Up);

        assert_eq!(rollups[2].company_id, "c3");
        assert_eq!(rollups[2].trend, TrendDirection::Stable);
        assert_eq!(rollups[2].trend_value, 0.0);
    }

    #[test]
    fn test_rollups_with_duplicate_names() {
        let stream = vec![
            record("c1", "Acme Corp", "US", "2024-01", "gasoline", 100.0),
            record("c7", "Acme Corp", "GB", "2024-01", "diesel", 40.0),
            record("c7", "Acme Corp", "GB", "2024-02", "diesel", 60.0),
        ];

        let by_id = company_rollups(&stream, RollupKey::CompanyId);
        assert_eq!(by_id.len(), 2);
        assert_eq!(by_id[0].company_id, "c1");
        assert_eq!(by_id[0].country, "US");
        assert_eq!(by_id[1].company_id, "c7");
        assert_eq!(by_id[1].country, "GB");
        assert_eq!(by_id[1].trend, TrendDirection::Up);

        let by_name = company_rollups(&stream, RollupKey::CompanyName);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].total_emissions, 200.0);
        assert_eq!(by_name[0].data_points, 3);
        // First seen wins for identity fields
        assert_eq!(by_name[0].company_id, "c1");
        assert_eq!(by_name[0].country, "US");
        // Jan 140 → Feb 60
        assert_eq!(by_name[0].trend, TrendDirection::Down);
    }

    #[test]
    fn test_rollups_with_unique_names_match_either_key() {
        let stream = create_test_stream();

        let by_id = company_rollups(&stream, RollupKey::CompanyId);
        let by_name = company_rollups(&stream, RollupKey::CompanyName);
        assert_eq!(by_id, by_name);
    }

    #[test]
    fn test_rollup_trend_with_zero_previous_month() {
        let stream = vec![
            record("c1", "Acme Corp", "US", "2024-01", "gasoline", 0.0),
            record("c1", "Acme Corp", "US", "2024-02", "gasoline", 50.0),
        ];

        let rollups = company_rollups(&stream, RollupKey::default());
        assert_eq!(rollups[0].trend, TrendDirection::Stable);
        assert_eq!(rollups[0].trend_value, 0.0);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, f64);

    impl Ranked for Item {
        fn rank_value(&self) -> f64 {
            self.1
        }
    }

    #[test]
    fn test_top_n_is_stable_for_ties() {
        let items = vec![
            Item("a", 10.0),
            Item("b", 30.0),
            Item("c", 10.0),
            Item("d", 30.0),
            Item("e", 5.0),
        ];

        let top = top_n(&items, 4);
        let keys: Vec<&str> = top.iter().map(|i| i.0).collect();
        assert_eq!(keys, vec!["b", "d", "a", "c"]);

        assert!(top_n(&items, 0).is_empty());
        assert_eq!(top_n(&items, 50).len(), 5);
    }

    #[test]
    fn test_source_shares() {
        let stream = create_test_stream();
        let shares = source_shares(&stream);

        let sources: Vec<&str> = shares.iter().map(|s| s.source.as_str()).collect();
        assert_eq!(sources, vec!["gasoline", "electricity", "diesel", "lpg"]);
        assert_eq!(shares[0].emissions, 430.0);
        assert_eq!(shares[0].count, 4);

        let total: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_source_shares_with_zero_total() {
        let stream = vec![
            record("c1", "Acme Corp", "US", "2024-01", "gasoline", 0.0),
            record("c1", "Acme Corp", "US", "2024-01", "diesel", 0.0),
        ];

        let shares = source_shares(&stream);
        assert_eq!(shares.len(), 2);
        assert!(shares.iter().all(|s| s.percentage == 0.0));
    }

    #[test]
    fn test_company_shares() {
        let stream = create_test_stream();
        let shares = company_shares(&stream, 2);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].name, "Acme Corp");
        assert!((shares[0].percentage - 310.0 / 755.0 * 100.0).abs() < 1e-9);
        assert_eq!(shares[1].country, "DE");
    }

    #[test]
    fn test_country_breakdown() {
        let stream = create_test_stream();
        let breakdown = country_breakdown(&stream);

        assert_eq!(breakdown[0].country, "US");
        assert_eq!(breakdown[0].intensity, 100.0);
        assert_eq!(breakdown[0].companies, 1);
        assert_eq!(breakdown[2].country, "JP");
        assert!((breakdown[2].intensity - 180.0 / 310.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_company_month_matrix() {
        let stream = create_test_stream();
        let visible = vec!["Acme Corp".to_string(), "Nobody Ltd".to_string()];
        let matrix = company_month_matrix(&stream, &visible);

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix[0].month, "2024-01");
        assert_eq!(matrix[0].value("Acme Corp"), 200.0);
        assert_eq!(matrix[0].value("Nobody Ltd"), 0.0);
        assert_eq!(matrix[2].value("Acme Corp"), 0.0);

        // Total ignores which series are visible
        let totals: Vec<f64> = matrix.iter().map(|row| row.total).collect();
        assert_eq!(totals, vec![280.0, 175.0, 300.0]);

        let json = serde_json::to_value(&matrix[0]).unwrap();
        assert_eq!(json["month"], "2024-01");
        assert_eq!(json["total"], 280.0);
        assert_eq!(json["Acme Corp"], 200.0);
    }

    #[test]
    fn test_default_visible_series() {
        let stream = create_test_stream();

        assert_eq!(
            default_visible_series(&stream, 2),
            vec!["Acme Corp".to_string(), "Globex Industries".to_string()]
        );
        assert_eq!(default_visible_series(&stream, DEFAULT_VISIBLE_SERIES).len(), 3);
    }

    #[test]
    fn test_company_comparison_uses_full_history() {
        let companies = vec![
            Company::new(
                "c1",
                "Acme Corp",
                "US",
                vec![
                    EmissionRecord::new("2023-12", "gasoline", 500.0),
                    EmissionRecord::new("2024-01", "gasoline", 100.0),
                ],
            ),
            Company::new("c2", "Nordic Wind", "NO", vec![]),
        ];
        let countries = vec![Country::new("US", "United States", Some("🇺🇸"))];

        let rows = company_comparison(&companies, &countries, DEFAULT_TOP_COMPANIES);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].emissions, 600.0);
        assert_eq!(rows[0].avg_monthly, 300.0);
        assert_eq!(rows[0].flag, "🇺🇸");
        assert_eq!(rows[1].flag, "🌍");
        assert_eq!(rows[1].avg_monthly, 0.0);
    }

    #[test]
    fn test_reference_scenario() {
        let companies = vec![Company::new(
            "c1",
            "Acme Corp",
            "US",
            vec![
                EmissionRecord::new("2024-01", "gasoline", 120.0),
                EmissionRecord::new("2024-02", "gasoline", 110.0),
            ],
        )];
        let filters = DashboardFilters::new(DateRange::new("2024-01", "2024-02"));
        let stream = flatten_and_filter_emissions(&companies, &filters);

        let totals = monthly_totals(&stream);
        assert_eq!(
            totals,
            vec![
                MonthlyTotal { month: "2024-01".to_string(), total: 120.0 },
                MonthlyTotal { month: "2024-02".to_string(), total: 110.0 },
            ]
        );

        let running: Vec<f64> = cumulative_totals(&stream).iter().map(|c| c.cumulative).collect();
        assert_eq!(running, vec![120.0, 230.0]);

        let rollup = &company_rollups(&stream, RollupKey::CompanyId)[0];
        assert_eq!(rollup.total_emissions, 230.0);
        assert_eq!(rollup.avg_emissions, 115.0);
        // -8.33% is past the -5% threshold
        assert_eq!(rollup.trend, TrendDirection::Down);
        assert!((rollup.trend_value - 8.333333333333334).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stream() {
        let empty: Vec<AnnotatedEmission> = Vec::new();

        assert!(monthly_totals(&empty).is_empty());
        assert!(cumulative_totals(&empty).is_empty());
        assert!(company_rollups(&empty, RollupKey::CompanyId).is_empty());
        assert!(source_shares(&empty).is_empty());
        assert!(company_shares(&empty, DEFAULT_TREEMAP_COMPANIES).is_empty());
        assert!(country_breakdown(&empty).is_empty());
        assert!(company_month_matrix(&empty, &["Acme Corp".to_string()]).is_empty());
        assert!(default_visible_series(&empty, 5).is_empty());
        assert!(company_comparison(&[], &[], 10).is_empty());
    }
}
