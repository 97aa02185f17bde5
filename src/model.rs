// 🌍 Domain Model - Companies, emission records, countries, posts
//
// Plain data only. Every shape serializes with the camelCase names the
// dashboard dataset uses ("yearMonth", "resourceUid", ...).
//
// Months are "YYYY-MM" strings and are compared lexically everywhere, so
// zero padding matters: "2024-09" < "2024-10" but "2024-9" > "2024-10".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// REFERENCE DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    /// Unique key (ISO 3166-1 alpha-2)
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl Country {
    pub fn new(code: &str, name: &str, flag: Option<&str>) -> Self {
        Country {
            code: code.to_string(),
            name: name.to_string(),
            flag: flag.map(|f| f.to_string()),
        }
    }
}

// ============================================================================
// COMPANIES & EMISSIONS
// ============================================================================

/// One monthly emission figure for one source, owned by a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionRecord {
    /// "YYYY-MM", zero padded
    pub year_month: String,

    /// Free-form category tag: gasoline, diesel, lpg, electricity...
    pub source: String,

    /// Tons of CO2 equivalent
    pub emissions: f64,
}

impl EmissionRecord {
    pub fn new(year_month: &str, source: &str, emissions: f64) -> Self {
        EmissionRecord {
            year_month: year_month.to_string(),
            source: source.to_string(),
            emissions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,

    /// Foreign key into Country.code
    pub country: String,

    pub emissions: Vec<EmissionRecord>,
}

impl Company {
    pub fn new(id: &str, name: &str, country: &str, emissions: Vec<EmissionRecord>) -> Self {
        Company {
            id: id.to_string(),
            name: name.to_string(),
            country: country.to_string(),
            emissions,
        }
    }

    /// Sum of every record, ignoring filters
    pub fn total_emissions(&self) -> f64 {
        self.emissions.iter().map(|e| e.emissions).sum()
    }

    /// Structural checks used at load boundaries (the analytics core never calls this)
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.id.trim().is_empty() {
            errors.push(ValidationError::new("Company", "id", "Required field is empty"));
        }

        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("Company", "name", "Required field is empty"));
        }

        if self.country.trim().is_empty() {
            errors.push(ValidationError::new("Company", "country", "Required field is empty"));
        }

        for (index, record) in self.emissions.iter().enumerate() {
            let context = format!("Company {} record #{}", self.id, index);

            if !is_valid_year_month(&record.year_month) {
                errors.push(ValidationError::new(
                    &context,
                    "yearMonth",
                    &format!("'{}' is not a zero-padded YYYY-MM month", record.year_month),
                ));
            }

            if !record.emissions.is_finite() || record.emissions < 0.0 {
                errors.push(ValidationError::new(
                    &context,
                    "emissions",
                    &format!("{} is not a non-negative amount", record.emissions),
                ));
            }
        }

        errors
    }
}

// ============================================================================
// POSTS
// ============================================================================

/// Shares the identifier space with companies via `resource_uid`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,

    /// Company.id this post talks about
    pub resource_uid: String,

    pub date_time: String,
    pub content: String,
}

/// A post about to be stored. `id: None` creates, `Some` updates in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub resource_uid: String,
    pub date_time: String,
    pub content: String,
}

impl PostDraft {
    /// Title and content must carry something other than whitespace
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(ValidationError::new("Post", "title", "Required field is empty"));
        }

        if self.content.trim().is_empty() {
            errors.push(ValidationError::new("Post", "content", "Required field is empty"));
        }

        errors
    }

    pub fn into_post(self, id: String) -> Post {
        Post {
            id,
            title: self.title,
            resource_uid: self.resource_uid,
            date_time: self.date_time,
            content: self.content,
        }
    }
}

impl From<Post> for PostDraft {
    fn from(post: Post) -> Self {
        PostDraft {
            id: Some(post.id),
            title: post.title,
            resource_uid: post.resource_uid,
            date_time: post.date_time,
            content: post.content,
        }
    }
}

// ============================================================================
// FILTERS
// ============================================================================

/// Inclusive month window, compared lexically
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: &str, end: &str) -> Self {
        DateRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn contains(&self, year_month: &str) -> bool {
        year_month >= self.start.as_str() && year_month <= self.end.as_str()
    }
}

impl Default for DateRange {
    fn default() -> Self {
        DateRange::new("2024-01", "2024-06")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_country: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_source: Option<String>,

    #[serde(default)]
    pub date_range: DateRange,
}

impl DashboardFilters {
    pub fn new(date_range: DateRange) -> Self {
        DashboardFilters {
            date_range,
            ..Default::default()
        }
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.selected_country = Some(country.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.selected_source = Some(source.to_string());
        self
    }

    pub fn with_company(mut self, company_id: &str) -> Self {
        self.selected_company = Some(company_id.to_string());
        self
    }
}

// ============================================================================
// ANNOTATED EMISSION (derived, flat)
// ============================================================================

/// An emission record that knows which company it came from.
/// This is the only shape the aggregation stage reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedEmission {
    pub year_month: String,
    pub source: String,
    pub emissions: f64,
    pub company_id: String,
    pub company_name: String,
    pub country: String,
}

impl AnnotatedEmission {
    pub fn from_record(company: &Company, record: &EmissionRecord) -> Self {
        AnnotatedEmission {
            year_month: record.year_month.clone(),
            source: record.source.clone(),
            emissions: record.emissions,
            company_id: company.id.clone(),
            company_name: company.name.clone(),
            country: company.country.clone(),
        }
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub context: String,
}

impl ValidationError {
    pub fn new(context: &str, field: &str, message: &str) -> Self {
        ValidationError {
            field: field.to_string(),
            message: message.to_string(),
            context: context.to_string(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.context, self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// True only for "YYYY-MM" with a real month, zero padded
pub fn is_valid_year_month(value: &str) -> bool {
    value.len() == 7
        && value.as_bytes()[4] == b'-'
        && NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok()
}

/// Pad a loose month ("2024-9") into the canonical "2024-09" form
pub fn normalize_year_month(value: &str) -> Option<String> {
    let (year, month) = value.trim().split_once('-')?;

    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.format("%Y-%m").to_string())
}

// ============================================================================
// TESTS
// ============================================================================
