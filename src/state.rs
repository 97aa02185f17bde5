// 🧭 Application State - Collections + active filters, passed explicitly
//
// Holds what the dashboard has loaded and which filters are active. The
// analytics functions stay pure: they receive slices from here, they never
// reach into a global.
//
// The full dashboard view is memoized per (filters, data generation). Any
// change to a collection bumps the generation, any change to the filters
// changes the key, and either one makes the next `view()` recompute.

use crate::filtering::{filter_companies, flatten_and_filter_emissions, selected_company};
use crate::model::{AnnotatedEmission, Company, Country, DashboardFilters, Post};
use crate::store::DataStore;
use crate::summary::{DashboardView, ViewOptions};
use std::sync::{Arc, PoisonError, RwLock};

struct CachedView {
    filters: DashboardFilters,
    generation: u64,
    view: Arc<DashboardView>,
}

pub struct AppState {
    countries: Vec<Country>,
    companies: Vec<Company>,
    posts: Vec<Post>,
    filters: DashboardFilters,
    options: ViewOptions,

    /// Bumped on every collection replacement
    generation: u64,

    cache: RwLock<Option<CachedView>>,
}

impl AppState {
    pub fn new(filters: DashboardFilters, options: ViewOptions) -> Self {
        AppState {
            countries: Vec::new(),
            companies: Vec::new(),
            posts: Vec::new(),
            filters,
            options,
            generation: 0,
            cache: RwLock::new(None),
        }
    }

    /// Fetch all three collections concurrently and replace what is held
    pub async fn load_from(&mut self, store: &DataStore) {
        let (countries, companies, posts) = tokio::join!(
            store.fetch_countries(),
            store.fetch_companies(),
            store.fetch_posts()
        );

        tracing::info!(
            countries = countries.len(),
            companies = companies.len(),
            posts = posts.len(),
            "dashboard data loaded"
        );

        self.countries = countries;
        self.companies = companies;
        self.posts = posts;
        self.bump_generation();
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn filters(&self) -> &DashboardFilters {
        &self.filters
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ------------------------------------------------------------------------
    // Whole-collection replacement
    // ------------------------------------------------------------------------

    pub fn replace_countries(&mut self, countries: Vec<Country>) {
        self.countries = countries;
        self.bump_generation();
    }

    pub fn replace_companies(&mut self, companies: Vec<Company>) {
        self.companies = companies;
        self.bump_generation();
    }

    pub fn replace_posts(&mut self, posts: Vec<Post>) {
        self.posts = posts;
        self.bump_generation();
    }

    /// Swap in a stored post (same id) or append a new one
    pub fn upsert_post(&mut self, post: Post) {
        let mut posts = self.posts.clone();
        match posts.iter_mut().find(|existing| existing.id == post.id) {
            Some(slot) => *slot = post,
            None => posts.push(post),
        }
        self.replace_posts(posts);
    }

    pub fn set_filters(&mut self, filters: DashboardFilters) {
        self.filters = filters;
    }

    pub fn set_options(&mut self, options: ViewOptions) {
        self.options = options;
        self.invalidate();
    }

    // ------------------------------------------------------------------------
    // Derived reads
    // ------------------------------------------------------------------------

    pub fn filtered_companies(&self) -> Vec<Company> {
        filter_companies(&self.companies, &self.filters)
    }

    pub fn filtered_emissions(&self) -> Vec<AnnotatedEmission> {
        flatten_and_filter_emissions(&self.companies, &self.filters)
    }

    pub fn selected_company(&self) -> Option<&Company> {
        selected_company(&self.companies, &self.filters)
    }

    pub fn posts_for_company(&self, company_id: &str) -> Vec<&Post> {
        self.posts
            .iter()
            .filter(|post| post.resource_uid == company_id)
            .collect()
    }

    /// The dashboard for the current filters, recomputed only when stale
    pub fn view(&self) -> Arc<DashboardView> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.as_ref() {
                if cached.generation == self.generation && cached.filters == self.filters {
                    tracing::trace!(generation = self.generation, "dashboard view cache hit");
                    return Arc::clone(&cached.view);
                }
            }
        }

        tracing::debug!(generation = self.generation, "recomputing dashboard view");
        let view = Arc::new(DashboardView::build(
            &self.companies,
            &self.countries,
            &self.filters,
            &self.options,
        ));

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedView {
            filters: self.filters.clone(),
            generation: self.generation,
            view: Arc::clone(&view),
        });

        view
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        let cache = self.cache.get_mut().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(DashboardFilters::default(), ViewOptions::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
