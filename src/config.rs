// ⚙️ Configuration - Dashboard defaults loaded from TOML
//
// Every key is optional. A missing file section falls back to the built-in
// defaults, so an empty file is a valid configuration.
//
// ```toml
// [filters]
// dateRange = { start = "2024-01", end = "2024-06" }
//
// [view]
// top_companies = 10
// treemap_companies = 15
// rollup_key = "company_id"
//
// [store]
// min_delay_ms = 200
// max_delay_ms = 800
// failure_probability = 0.15
// ```

use crate::model::DashboardFilters;
use crate::store::StoreSettings;
use crate::summary::ViewOptions;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Filters applied when the dashboard first opens
    pub filters: DashboardFilters,

    pub view: ViewOptions,
    pub store: StoreSettings,
}

impl DashboardConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: DashboardConfig =
            toml::from_str(contents).context("Failed to parse dashboard configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Reject values that would make the store or the scenarios meaningless
    pub fn validate(&self) -> Result<()> {
        let store = &self.store;

        if !(0.0..=1.0).contains(&store.failure_probability) {
            bail!(
                "store.failure_probability must be within 0..=1, got {}",
                store.failure_probability
            );
        }

        if store.min_delay_ms > store.max_delay_ms {
            bail!(
                "store.min_delay_ms ({}) exceeds store.max_delay_ms ({})",
                store.min_delay_ms,
                store.max_delay_ms
            );
        }

        if !(0.0..=1.0).contains(&self.view.reduction_target) {
            bail!(
                "view.reduction_target must be within 0..=1, got {}",
                self.view.reduction_target
            );
        }

        Ok(())
    }
}
