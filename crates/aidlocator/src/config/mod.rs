use std::time::Duration;

use crate::error::{AidLocatorError, Result};

/// Tuning for a [`crate::ResourceSearcher`].
///
/// The defaults are polite enough for the free OpenStreetMap endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// How long a cached result set stays valid
    pub cache_ttl: Duration,
    /// Radius component of the cache key, in metres
    pub cache_radius_m: u32,
    /// Minimum spacing between single provider calls
    pub min_call_delay: Duration,
    /// Spacing between calls within a category fan-out
    pub batch_call_delay: Duration,
    /// Pause after a provider answers HTTP 429
    pub rate_limit_backoff: Duration,
    /// Upper bound on a single provider call
    pub provider_timeout: Duration,
    /// Radius of Overpass amenity searches, in metres
    pub search_radius_m: u32,
    /// How many of the best-scored resources are flagged as top recommendations
    pub top_recommendations: usize,
    /// Scores above this are flagged as recommended
    pub recommendation_threshold: f64,
    /// Resolve missing addresses with reverse geocoding after a search
    pub reverse_geocode_missing: bool,
    /// Maximum reverse-geocoding lookups per search
    pub reverse_geocode_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(5 * 60),
            cache_radius_m: 5000,
            min_call_delay: Duration::from_millis(2000),
            batch_call_delay: Duration::from_millis(3000),
            rate_limit_backoff: Duration::from_secs(10),
            provider_timeout: Duration::from_secs(25),
            search_radius_m: 10_000,
            top_recommendations: 3,
            recommendation_threshold: 50.0,
            reverse_geocode_missing: false,
            reverse_geocode_limit: 5,
        }
    }
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    fn validate(&self) -> Result<()> {
        if self.provider_timeout.is_zero() {
            return Err(AidLocatorError::ConfigError(
                "Provider timeout must be greater than zero".to_string(),
            ));
        }
        if self.search_radius_m == 0 {
            return Err(AidLocatorError::ConfigError(
                "Search radius must be greater than zero".to_string(),
            ));
        }
        if !self.recommendation_threshold.is_finite() {
            return Err(AidLocatorError::ConfigError(format!(
                "Recommendation threshold must be finite, got {}",
                self.recommendation_threshold
            )));
        }
        if self.batch_call_delay < self.min_call_delay {
            return Err(AidLocatorError::ConfigError(format!(
                "Batch call delay ({:?}) must not be shorter than the minimum call delay ({:?})",
                self.batch_call_delay, self.min_call_delay
            )));
        }
        Ok(())
    }
}

/// Builder for creating search configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Longer spacing and back-off for heavily throttled public endpoints
    pub fn polite() -> Self {
        let mut builder = Self::new();
        builder.config.min_call_delay = Duration::from_secs(3);
        builder.config.batch_call_delay = Duration::from_secs(5);
        builder.config.rate_limit_backoff = Duration::from_secs(30);
        builder.config.cache_ttl = Duration::from_secs(15 * 60);
        builder
    }

    /// No spacing and short timeouts, for local mirrors and tests
    pub fn fast() -> Self {
        let mut builder = Self::new();
        builder.config.min_call_delay = Duration::ZERO;
        builder.config.batch_call_delay = Duration::ZERO;
        builder.config.rate_limit_backoff = Duration::ZERO;
        builder.config.provider_timeout = Duration::from_secs(5);
        builder
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    pub fn cache_radius(mut self, metres: u32) -> Self {
        self.config.cache_radius_m = metres;
        self
    }

    /// Set the minimum and batch spacing between provider calls
    pub fn call_delays(mut self, min: Duration, batch: Duration) -> Self {
        self.config.min_call_delay = min;
        self.config.batch_call_delay = batch;
        self
    }

    pub fn rate_limit_backoff(mut self, backoff: Duration) -> Self {
        self.config.rate_limit_backoff = backoff;
        self
    }

    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.config.provider_timeout = timeout;
        self
    }

    pub fn search_radius(mut self, metres: u32) -> Self {
        self.config.search_radius_m = metres;
        self
    }

    pub fn top_recommendations(mut self, count: usize) -> Self {
        self.config.top_recommendations = count;
        self
    }

    pub fn recommendation_threshold(mut self, score: f64) -> Self {
        self.config.recommendation_threshold = score;
        self
    }

    /// Reverse geocode up to `limit` resources without an address per search
    pub fn reverse_geocode(mut self, enabled: bool, limit: usize) -> Self {
        self.config.reverse_geocode_missing = enabled;
        self.config.reverse_geocode_limit = limit;
        self
    }

    /// Validate and build the final configuration
    pub fn build(self) -> Result<SearchConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_builder() {
        let config = SearchConfigBuilder::new().build().unwrap();
        assert_eq!(config, SearchConfig::default());
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.cache_radius_m, 5000);
        assert_eq!(config.min_call_delay, Duration::from_millis(2000));
        assert_eq!(config.batch_call_delay, Duration::from_millis(3000));
        assert_eq!(config.rate_limit_backoff, Duration::from_secs(10));
        assert_eq!(config.provider_timeout, Duration::from_secs(25));
        assert_eq!(config.top_recommendations, 3);
        assert!(!config.reverse_geocode_missing);
    }

    #[test]
    fn test_presets() {
        let fast = SearchConfigBuilder::fast().build().unwrap();
        assert!(fast.min_call_delay.is_zero());
        assert!(fast.batch_call_delay.is_zero());
        assert!(fast.rate_limit_backoff.is_zero());

        let polite = SearchConfigBuilder::polite().build().unwrap();
        assert!(polite.batch_call_delay > SearchConfig::default().batch_call_delay);
        assert_eq!(polite.rate_limit_backoff, Duration::from_secs(30));
    }

    #[test]
    fn test_method_chaining() {
        let config = SearchConfig::builder()
            .search_radius(5000)
            .top_recommendations(5)
            .recommendation_threshold(70.0)
            .reverse_geocode(true, 2)
            .build()
            .unwrap();

        assert_eq!(config.search_radius_m, 5000);
        assert_eq!(config.top_recommendations, 5);
        assert_eq!(config.recommendation_threshold, 70.0);
        assert!(config.reverse_geocode_missing);
        assert_eq!(config.reverse_geocode_limit, 2);
    }

    #[test]
    fn test_override_presets() {
        let config = SearchConfigBuilder::fast()
            .provider_timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        assert_eq!(config.provider_timeout, Duration::from_secs(1));
        assert!(config.batch_call_delay.is_zero());
    }

    #[test]
    fn test_validation() {
        let result = SearchConfig::builder()
            .provider_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(AidLocatorError::ConfigError(_))));

        assert!(SearchConfig::builder().search_radius(0).build().is_err());
        assert!(
            SearchConfig::builder()
                .recommendation_threshold(f64::NAN)
                .build()
                .is_err()
        );
        assert!(
            SearchConfig::builder()
                .call_delays(Duration::from_secs(3), Duration::from_secs(1))
                .build()
                .is_err()
        );
    }
}
