use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use carbon_dashboard::{
    load_emissions_csv, normalize_year_month, AppState, DashboardConfig, DashboardView, DataStore,
    DateRange,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Carbon emissions dashboard report", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    options: ReportOptions,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Report over the built-in dataset (default)
    Report,
    /// Replace the companies with a CSV file, then report
    Import {
        /// company_id,company_name,country,year_month,source,emissions
        #[arg(value_hint = ValueHint::FilePath)]
        csv: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ReportOptions {
    /// TOML configuration
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Only companies from this country
    #[arg(long, global = true)]
    country: Option<String>,

    /// Only this emission source
    #[arg(long, global = true)]
    source: Option<String>,

    /// Company to show in detail
    #[arg(long, global = true)]
    company: Option<String>,

    /// First month, inclusive (YYYY-MM)
    #[arg(long, global = true, value_parser = parse_month)]
    from: Option<String>,

    /// Last month, inclusive (YYYY-MM)
    #[arg(long, global = true, value_parser = parse_month)]
    to: Option<String>,

    /// Print the full dashboard view as JSON
    #[arg(long, global = true)]
    json: bool,
}

/// Months are compared as text, so "2024-3" must become "2024-03" here
fn parse_month(value: &str) -> Result<String, String> {
    normalize_year_month(value).ok_or_else(|| format!("'{}' is not a YYYY-MM month", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let Cli { command, options: cli } = cli;
    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => DashboardConfig::default(),
    };

    let store = DataStore::seeded(config.store.clone());
    let mut state = AppState::new(config.filters.clone(), config.view.clone());

    if !cli.json {
        println!("🌍 Carbon Emissions Dashboard");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("\n📡 Loading dashboard data...");
    }
    state.load_from(&store).await;

    if let Some(Command::Import { csv: path }) = &command {
        let companies = load_emissions_csv(path)?;
        if !cli.json {
            println!("✓ Imported {} companies from {}", companies.len(), path.display());
        }
        state.replace_companies(companies);
    }

    let mut filters = state.filters().clone();
    if let Some(country) = cli.country {
        filters.selected_country = Some(country);
    }
    if let Some(source) = cli.source {
        filters.selected_source = Some(source);
    }
    if let Some(company) = cli.company {
        filters.selected_company = Some(company);
    }
    if cli.from.is_some() || cli.to.is_some() {
        filters.date_range = DateRange {
            start: cli.from.unwrap_or(filters.date_range.start),
            end: cli.to.unwrap_or(filters.date_range.end),
        };
    }
    if filters.date_range.start > filters.date_range.end {
        eprintln!(
            "⚠️  Date range {} → {} is reversed; nothing will match",
            filters.date_range.start, filters.date_range.end
        );
    }
    state.set_filters(filters);

    let view = state.view();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&*view)?);
        return Ok(());
    }

    print_report(&state, &view);
    Ok(())
}

fn print_report(state: &AppState, view: &DashboardView) {
    let filters = &view.filters;
    println!(
        "✓ {} companies, {} records in {} → {}",
        state.companies().len(),
        view.record_count,
        filters.date_range.start,
        filters.date_range.end
    );

    println!("\n📊 Summary");
    println!("   {}", view.summary.summary());
    if let Some(top) = &view.summary.top_company {
        println!("   Top emitter: {}", top);
    }

    println!("\n📅 Monthly totals");
    for point in &view.cumulative_totals {
        println!(
            "   {}  {:>10.1} t   cumulative {:>10.1} t   {} companies",
            point.month, point.total, point.cumulative, point.companies
        );
    }

    println!("\n🏭 Top companies");
    for (rank, rollup) in view.top_companies.iter().enumerate() {
        println!(
            "   {:>2}. {:<24} {:<3} {:>10.1} t  avg {:>7.1}  {} {:.1}%  (last {})",
            rank + 1,
            rollup.company,
            rollup.country,
            rollup.total_emissions,
            rollup.avg_emissions,
            rollup.trend.as_str(),
            rollup.trend_value,
            rollup.last_update
        );
    }

    println!("\n⛽ Sources");
    for share in &view.source_shares {
        println!(
            "   {:<14} {:>10.1} t  {:>5.1}%",
            share.source, share.emissions, share.percentage
        );
    }

    println!("\n🗺️  Countries");
    for country in &view.country_breakdown {
        println!(
            "   {:<4} {:>10.1} t  {} companies  intensity {:.0}%",
            country.country, country.total_emissions, country.companies, country.intensity
        );
    }

    let overview = &view.overview;
    println!("\n{} Environmental health", overview.tree_stage.glyph());
    println!(
        "   Grade {} ({}, {}) - {:.1} t/month over {} months",
        overview.grade.grade,
        overview.grade.description,
        overview.grade.global_percentile,
        overview.average_monthly_emissions,
        overview.months
    );
    println!("   Health score {:.0}/100", overview.health_score);
    println!(
        "   Cutting {:.1} t would equal {} trees, {} kg of oxygen a year",
        overview.target_reduction, overview.impact.saved_trees, overview.impact.oxygen_produced
    );

    if let Some(trend) = &view.environmental_trend {
        println!(
            "   Latest month: {:?} by {:.1} t ({} trees)",
            trend.trend, trend.reduction, trend.impact.saved_trees
        );
    }

    if let Some(company) = state.selected_company() {
        println!("\n🔍 {} ({})", company.name, company.country);
        for post in state.posts_for_company(&company.id) {
            println!("   📝 {} [{}] {}", post.date_time, post.title, post.content);
        }
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

// ============================================================================
// TESTS
// ============================================================================
