//! The main entry point for finding aid resources near a point.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aidlocator::{ResourceSearcher, ResourceType};
//!
//! # async fn run() -> Result<(), aidlocator::error::AidLocatorError> {
//! let searcher = ResourceSearcher::from_env()?;
//! let results = searcher
//!     .search(37.9735, -122.5311, ResourceType::Food)
//!     .await;
//! for resource in results.iter().filter(|r| r.is_top_recommendation) {
//!     println!("{} ({:.1} km): {}", resource.name, resource.distance, resource.ai_suggestion);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A search never fails. When providers are down or find nothing the list
//! falls back to broader searches, then demonstration data, then a single
//! outage notice; see [`crate::search`].
use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use ahash::AHashSet as HashSet;
use aidlocator_providers::{GeoDataProvider, ProviderKind};

use crate::{
    cache::ResourceCache,
    clock::{Clock, SystemClock},
    config::SearchConfig,
    error::Result,
    rate_limit::RateLimiter,
    resource::RankedResource,
    search::{SearchCategory, SearchContext, search_inner},
    store::ResourceStore,
};

/// Finds, merges and ranks aid resources from a [`GeoDataProvider`].
///
/// One searcher owns the result cache, the rate limiter and the set of
/// providers disabled for missing credentials, so it should be created once
/// and shared (it is `Send + Sync`).
///
/// # Examples
///
/// With a custom configuration:
/// ```rust,no_run
/// use std::{sync::Arc, time::Duration};
///
/// use aidlocator::{ResourceSearcher, SearchCategory, SearchConfigBuilder, providers::HttpProviders};
///
/// # async fn run() -> Result<(), aidlocator::error::AidLocatorError> {
/// let config = SearchConfigBuilder::polite()
///     .cache_ttl(Duration::from_secs(600))
///     .reverse_geocode(true, 3)
///     .build()?;
/// let searcher = ResourceSearcher::new(Arc::new(HttpProviders::from_env()?), config);
/// let results = searcher.search(51.5072, -0.1276, SearchCategory::All).await;
/// println!("Found {} resources", results.len());
/// # Ok(())
/// # }
/// ```
pub struct ResourceSearcher {
    provider: Arc<dyn GeoDataProvider>,
    config: SearchConfig,
    cache: ResourceCache,
    limiter: RateLimiter,
    clock: Arc<dyn Clock>,
    disabled: Mutex<HashSet<ProviderKind>>,
}

impl fmt::Debug for ResourceSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceSearcher")
            .field("config", &self.config)
            .field("cache_entries", &self.cache.len())
            .field("disabled", &self.disabled_providers())
            .finish_non_exhaustive()
    }
}

impl ResourceSearcher {
    pub fn new(provider: Arc<dyn GeoDataProvider>, config: SearchConfig) -> Self {
        Self::with_clock(provider, config, Arc::new(SystemClock))
    }

    /// Create a searcher reading wall-clock time from `clock`.
    pub fn with_clock(
        provider: Arc<dyn GeoDataProvider>,
        config: SearchConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = ResourceCache::new(config.cache_ttl, config.cache_radius_m, clock.clone());
        Self {
            provider,
            config,
            cache,
            limiter: RateLimiter::new(),
            clock,
            disabled: Mutex::new(HashSet::new()),
        }
    }

    /// Live HTTP providers configured from `AIDLOCATOR_*` environment
    /// variables, with the default search configuration.
    #[cfg(feature = "http")]
    #[tracing::instrument(name = "Initialize ResourceSearcher", level = "info")]
    pub fn from_env() -> Result<Self> {
        let providers = aidlocator_providers::HttpProviders::from_env()?;
        tracing::info!(
            social_services = providers.config().social_services_api_key.is_some(),
            resource_directory = providers.config().resource_directory_api_key.is_some(),
            "HTTP providers ready"
        );
        Ok(Self::new(Arc::new(providers), SearchConfig::default()))
    }

    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub const fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Providers switched off after reporting a missing credential.
    pub fn disabled_providers(&self) -> Vec<ProviderKind> {
        let mut disabled: Vec<ProviderKind> = self
            .disabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect();
        disabled.sort();
        disabled
    }

    /// Ranked resources near a point, best first.
    pub async fn search(
        &self,
        latitude: f64,
        longitude: f64,
        category: impl Into<SearchCategory>,
    ) -> Vec<RankedResource> {
        let ctx = SearchContext {
            provider: self.provider.as_ref(),
            config: &self.config,
            cache: &self.cache,
            limiter: &self.limiter,
            clock: self.clock.as_ref(),
            disabled: &self.disabled,
        };
        search_inner(&ctx, latitude, longitude, category.into()).await
    }

    /// Like [`Self::search`] with the category given by name, e.g. `"food"`,
    /// `"healthcare"` or `"all"`.
    pub async fn search_named(
        &self,
        latitude: f64,
        longitude: f64,
        category: &str,
    ) -> Result<Vec<RankedResource>> {
        let category = SearchCategory::parse(category)?;
        Ok(self.search(latitude, longitude, category).await)
    }

    /// Run a search and publish it to `store`, unless a search started later
    /// has already published. Returns whether the store was updated.
    pub async fn search_into(
        &self,
        store: &ResourceStore,
        latitude: f64,
        longitude: f64,
        category: impl Into<SearchCategory>,
    ) -> bool {
        let ticket = store.begin_search();
        let results = self.search(latitude, longitude, category).await;
        store.apply_results(ticket, results)
    }
}

#[cfg(test)]
mod tests {
    use aidlocator_providers::{
        ProviderError,
        test_data::{ScriptedProvider, social_service},
    };

    use super::*;
    use crate::{
        config::SearchConfigBuilder,
        resource::{ResourceType, Source},
        search::SearchError,
    };

    fn searcher(provider: ScriptedProvider) -> (ResourceSearcher, Arc<ScriptedProvider>) {
        let provider = Arc::new(provider);
        let config = SearchConfigBuilder::fast().build().unwrap();
        (ResourceSearcher::new(provider.clone(), config), provider)
    }

    #[tokio::test]
    async fn test_search_named_rejects_unknown_category() {
        let (searcher, provider) = searcher(ScriptedProvider::empty());
        let err = searcher
            .search_named(37.9735, -122.5311, "jobs")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::AidLocatorError::SearchError(SearchError::UnknownCategory(_))
        ));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_search_named_accepts_alias() {
        let (searcher, provider) = searcher(ScriptedProvider::empty().with_social_services(Ok(
            aidlocator_providers::SocialServicesResponse {
                results: vec![social_service(3, "Marin Clinic", "healthcare", 37.974, -122.531)],
            },
        )));
        let results = searcher
            .search_named(37.9735, -122.5311, "healthcare")
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].resource_type, ResourceType::Medical);
        assert_eq!(results[0].source, Source::TwoOneOne);
        assert!(
            provider
                .calls()
                .iter()
                .any(|call| call.token == "community health center free clinic public health")
        );
    }

    #[tokio::test]
    async fn test_missing_credential_disables_provider() {
        let provider = ScriptedProvider::empty()
            .with_social_services(Err(ProviderError::MissingCredential {
                provider: ProviderKind::SocialServices,
            }));
        let (searcher, provider) = searcher(provider);

        searcher.search(37.9735, -122.5311, ResourceType::Food).await;
        assert_eq!(searcher.disabled_providers(), vec![ProviderKind::SocialServices]);
        assert_eq!(provider.call_count(ProviderKind::SocialServices), 1);

        // Different point, so the cache cannot answer
        searcher.search(40.7128, -74.0060, ResourceType::Shelter).await;
        assert_eq!(provider.call_count(ProviderKind::SocialServices), 1);
        assert!(provider.call_count(ProviderKind::ResourceDirectory) >= 2);
    }

    #[test]
    fn test_debug_lists_disabled() {
        let (searcher, _) = searcher(ScriptedProvider::empty());
        let rendered = format!("{searcher:?}");
        assert!(rendered.contains("ResourceSearcher"));
        assert!(rendered.contains("disabled: []"));
    }
}
