// 📥 CSV Import - Flat emission rows → companies
//
// Expected header:
//   company_id,company_name,country,year_month,source,emissions
//
// Rows are grouped into companies in first-seen order; records keep file
// order. This is the one place months get normalized ("2024-9" → "2024-09")
// and bad rows are rejected, so the analytics core can trust what it reads.

use crate::model::{normalize_year_month, Company, EmissionRecord};
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EmissionRow {
    company_id: String,
    company_name: String,
    country: String,
    year_month: String,
    source: String,
    emissions: f64,
}

pub fn load_emissions_csv(csv_path: &Path) -> Result<Vec<Company>> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;
    read_emissions_csv(file)
}

pub fn read_emissions_csv<R: Read>(reader: R) -> Result<Vec<Company>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut companies: IndexMap<String, Company> = IndexMap::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row: EmissionRow =
            result.with_context(|| format!("Failed to deserialize emission row on line {}", line))?;

        if row.company_id.is_empty() {
            bail!("Line {}: company_id is empty", line);
        }

        let year_month = normalize_year_month(&row.year_month).with_context(|| {
            format!("Line {}: '{}' is not a YYYY-MM month", line, row.year_month)
        })?;

        if !row.emissions.is_finite() || row.emissions < 0.0 {
            bail!("Line {}: emissions must be a non-negative number, got {}", line, row.emissions);
        }

        let company = companies
            .entry(row.company_id.clone())
            .or_insert_with(|| Company::new(&row.company_id, &row.company_name, &row.country, Vec::new()));

        if company.name != row.company_name || company.country != row.country {
            tracing::warn!(
                line,
                company_id = %row.company_id,
                "company name/country differs from its first row; keeping the first"
            );
        }

        company
            .emissions
            .push(EmissionRecord::new(&year_month, &row.source, row.emissions));
    }

    let companies: Vec<Company> = companies.into_values().collect();
    tracing::info!(companies = companies.len(), "imported emissions CSV");

    Ok(companies)
}
