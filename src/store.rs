// 🗄️ Data Store - Async loader for countries, companies and posts
//
// Stands in for a remote API: every call waits a random delay, and saving a
// post fails with a generic server error some of the time. Delay range and
// failure probability are injectable so tests can pin them to 0 (or 1).
//
// Failures are reported, never retried here. The caller decides.

use crate::model::{Company, Country, Post, PostDraft};
use crate::seed;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,

    /// Chance (0..=1) that saving a post fails
    pub failure_probability: f64,
}

impl StoreSettings {
    /// No delay, no failures
    pub fn instant() -> Self {
        StoreSettings {
            min_delay_ms: 0,
            max_delay_ms: 0,
            failure_probability: 0.0,
        }
    }

    pub fn with_failure_probability(mut self, probability: f64) -> Self {
        self.failure_probability = probability;
        self
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            min_delay_ms: 200,
            max_delay_ms: 800,
            failure_probability: 0.15,
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Simulated server failure; safe to retry by hand
    Server,

    /// Update targeted an id the store has never seen
    PostNotFound(String),

    /// Draft rejected before reaching the store
    InvalidPost(Vec<String>),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Server => write!(f, "Server error: failed to save post"),
            StoreError::PostNotFound(id) => write!(f, "Post not found: {}", id),
            StoreError::InvalidPost(problems) => {
                write!(f, "Invalid post: {}", problems.join("; "))
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Server)
    }
}

// ============================================================================
// DATA STORE
// ============================================================================

/// In-memory collections behind simulated network latency.
///
/// Cloning shares the same underlying collections.
#[derive(Clone)]
pub struct DataStore {
    countries: Arc<Vec<Country>>,
    companies: Arc<Vec<Company>>,
    posts: Arc<RwLock<Vec<Post>>>,
    settings: StoreSettings,
}

impl DataStore {
    pub fn new(
        countries: Vec<Country>,
        companies: Vec<Company>,
        posts: Vec<Post>,
        settings: StoreSettings,
    ) -> Self {
        DataStore {
            countries: Arc::new(countries),
            companies: Arc::new(companies),
            posts: Arc::new(RwLock::new(posts)),
            settings,
        }
    }

    /// Store pre-loaded with the reference dataset
    pub fn seeded(settings: StoreSettings) -> Self {
        Self::new(seed::countries(), seed::companies(), seed::posts(), settings)
    }

    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    pub async fn fetch_countries(&self) -> Vec<Country> {
        self.simulate_latency().await;
        tracing::debug!(count = self.countries.len(), "fetched countries");
        self.countries.as_ref().clone()
    }

    pub async fn fetch_companies(&self) -> Vec<Company> {
        self.simulate_latency().await;
        tracing::debug!(count = self.companies.len(), "fetched companies");
        self.companies.as_ref().clone()
    }

    pub async fn fetch_posts(&self) -> Vec<Post> {
        self.simulate_latency().await;
        let posts = self.posts.read().await;
        tracing::debug!(count = posts.len(), "fetched posts");
        posts.clone()
    }

    /// Update in place when the draft carries a known id, otherwise append
    /// with a fresh UUID.
    pub async fn create_or_update_post(&self, draft: PostDraft) -> Result<Post, StoreError> {
        let problems: Vec<String> = draft.validate().iter().map(|e| e.to_string()).collect();
        if !problems.is_empty() {
            return Err(StoreError::InvalidPost(problems));
        }

        self.simulate_latency().await;

        if self.roll_failure() {
            tracing::warn!(title = %draft.title, "simulated server failure while saving post");
            return Err(StoreError::Server);
        }

        let mut posts = self.posts.write().await;

        match draft.id.clone() {
            Some(id) => {
                let slot = posts
                    .iter_mut()
                    .find(|post| post.id == id)
                    .ok_or_else(|| StoreError::PostNotFound(id.clone()))?;

                *slot = draft.into_post(id);
                tracing::info!(id = %slot.id, "updated post");
                Ok(slot.clone())
            }
            None => {
                let post = draft.into_post(uuid::Uuid::new_v4().to_string());
                tracing::info!(id = %post.id, "created post");
                posts.push(post.clone());
                Ok(post)
            }
        }
    }

    async fn simulate_latency(&self) {
        let delay = self.pick_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    fn pick_delay(&self) -> Duration {
        let StoreSettings {
            min_delay_ms,
            max_delay_ms,
            ..
        } = self.settings;

        if max_delay_ms <= min_delay_ms {
            return Duration::from_millis(min_delay_ms);
        }

        Duration::from_millis(rand::thread_rng().gen_range(min_delay_ms..=max_delay_ms))
    }

    fn roll_failure(&self) -> bool {
        let probability = self.settings.failure_probability;

        // NaN never fails
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }

        rand::thread_rng().gen_bool(probability)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_draft(id: Option<&str>, title: &str) -> PostDraft {
        PostDraft {
            id: id.map(|s| s.to_string()),
            title: title.to_string(),
            resource_uid: "c1".to_string(),
            date_time: "2024-01".to_string(),
            content: "Test content".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_collections() {
        let store = DataStore::seeded(StoreSettings::instant());

        let countries = store.fetch_countries().await;
        assert_eq!(countries.len(), 5);
        assert!(countries[0].flag.is_some());

        let companies = store.fetch_companies().await;
        assert_eq!(companies.len(), 3);
        assert!(!companies[0].emissions.is_empty());

        let posts = store.fetch_posts().await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].resource_uid, "c1");
    }

    #[tokio::test]
    async fn test_create_post_generates_id() {
        let store = DataStore::seeded(StoreSettings::instant());

        let created = store
            .create_or_update_post(create_test_draft(None, "Test Post"))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert!(uuid::Uuid::parse_str(&created.id).is_ok());
        assert_eq!(created.title, "Test Post");
        assert_eq!(created.resource_uid, "c1");

        let posts = store.fetch_posts().await;
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[2], created);
    }

    #[tokio::test]
    async fn test_update_post_in_place() {
        let store = DataStore::seeded(StoreSettings::instant());

        let updated = store
            .create_or_update_post(create_test_draft(Some("p1"), "Revised report"))
            .await
            .unwrap();
        assert_eq!(updated.id, "p1");

        let posts = store.fetch_posts().await;
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Revised report");
    }

    #[tokio::test]
    async fn test_update_unknown_post_fails() {
        let store = DataStore::seeded(StoreSettings::instant());

        let err = store
            .create_or_update_post(create_test_draft(Some("p404"), "Ghost"))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::PostNotFound("p404".to_string()));
        assert!(!err.is_retryable());
        assert_eq!(store.fetch_posts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_certain_failure_leaves_store_untouched() {
        let store = DataStore::seeded(StoreSettings::instant().with_failure_probability(1.0));

        let err = store
            .create_or_update_post(create_test_draft(None, "Never saved"))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::Server);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Server error: failed to save post");
        assert_eq!(store.fetch_posts().await.len(), 2);
    }

    #[tokio::test]
    async fn test_blank_draft_is_rejected() {
        let store = DataStore::seeded(StoreSettings::instant());

        let err = store
            .create_or_update_post(create_test_draft(None, "  "))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidPost(ref problems) if problems.len() == 1));
    }

    #[tokio::test]
    async fn test_clones_share_posts() {
        let store = DataStore::seeded(StoreSettings::instant());
        let other = store.clone();

        other
            .create_or_update_post(create_test_draft(None, "Shared"))
            .await
            .unwrap();

        assert_eq!(store.fetch_posts().await.len(), 3);
    }

    #[test]
    fn test_delay_stays_in_range() {
        let settings = StoreSettings {
            min_delay_ms: 5,
            max_delay_ms: 10,
            failure_probability: 0.0,
        };
        let store = DataStore::new(vec![], vec![], vec![], settings);

        for _ in 0..50 {
            let delay = store.pick_delay().as_millis();
            assert!((5..=10).contains(&delay));
        }

        let fixed = DataStore::new(vec![], vec![], vec![], StoreSettings::instant());
        assert!(fixed.pick_delay().is_zero());
        assert!(!fixed.roll_failure());
    }

    #[tokio::test]
    async fn test_nan_failure_probability_saves() {
        let store = DataStore::seeded(StoreSettings::instant().with_failure_probability(f64::NAN));
        assert!(!store.roll_failure());

        let created = store
            .create_or_update_post(create_test_draft(None, "Still saved"))
            .await
            .unwrap();

        assert_eq!(created.title, "Still saved");
        assert_eq!(store.fetch_posts().await.len(), 3);
    }
}
