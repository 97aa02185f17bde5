// 🔎 Filtering Stage - Companies + filters → flat annotated emission stream
//
// Country narrows the company set. Date range and source narrow the records.
// Input order survives: company order first, then record order inside each
// company. Nothing is sorted here.

use crate::model::{AnnotatedEmission, Company, DashboardFilters, EmissionRecord};

/// Keep a company iff no country is selected or it matches.
///
/// `selected_company` is not applied at this layer; use [`selected_company`]
/// to resolve it for detail views.
pub fn filter_companies(companies: &[Company], filters: &DashboardFilters) -> Vec<Company> {
    companies
        .iter()
        .filter(|company| matches_country(company, filters))
        .cloned()
        .collect()
}

/// Flatten every surviving record into the annotated shape
pub fn flatten_and_filter_emissions(
    companies: &[Company],
    filters: &DashboardFilters,
) -> Vec<AnnotatedEmission> {
    let result: Vec<AnnotatedEmission> = companies
        .iter()
        .filter(|company| matches_country(company, filters))
        .flat_map(|company| {
            company
                .emissions
                .iter()
                .filter(move |record| matches_record(record, filters))
                .map(move |record| AnnotatedEmission::from_record(company, record))
        })
        .collect();

    tracing::debug!(
        companies = companies.len(),
        records = result.len(),
        "filtered emission stream"
    );

    result
}

/// The company the filters point at, if any
pub fn selected_company<'a>(
    companies: &'a [Company],
    filters: &DashboardFilters,
) -> Option<&'a Company> {
    let id = active(&filters.selected_company)?;
    companies.iter().find(|company| company.id == id)
}

/// An empty selection means "no filter", same as `None`
fn active(selection: &Option<String>) -> Option<&str> {
    selection.as_deref().filter(|value| !value.is_empty())
}

fn matches_country(company: &Company, filters: &DashboardFilters) -> bool {
    match active(&filters.selected_country) {
        Some(country) => company.country == country,
        None => true,
    }
}

fn matches_record(record: &EmissionRecord, filters: &DashboardFilters) -> bool {
    if !filters.date_range.contains(&record.year_month) {
        return false;
    }

    match active(&filters.selected_source) {
        Some(source) => record.source == source,
        None => true,
    }
}

// ============================================================================
// TESTS
// ============================================================================
