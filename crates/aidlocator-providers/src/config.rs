use std::time::Duration;

use tracing::debug;

pub const OVERPASS_URL_DEFAULT: &str = "https://overpass-api.de/api/interpreter";
pub const NOMINATIM_URL_DEFAULT: &str = "https://nominatim.openstreetmap.org";
pub const SOCIAL_SERVICES_URL_DEFAULT: &str = "https://api.211.org";
pub const RESOURCE_DIRECTORY_URL_DEFAULT: &str = "https://api.findhelp.com/v1";
pub const USER_AGENT_DEFAULT: &str = concat!("aidlocator/", env!("CARGO_PKG_VERSION"));

/// Endpoints, credentials and request shaping for every provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub overpass_url: String,
    pub nominatim_url: String,
    pub social_services_url: String,
    pub resource_directory_url: String,
    /// Sent on every request; Nominatim rejects anonymous clients.
    pub user_agent: String,
    /// Degrees added and subtracted around the point to form the Nominatim viewbox.
    pub bounding_box_offset: f64,
    /// Maximum places requested from Nominatim per search
    pub text_search_limit: u32,
    /// Search radius passed to the social-services directory, in miles
    pub social_services_radius_miles: u32,
    /// Maximum organisations requested from the resource directory
    pub directory_page_size: u32,
    pub social_services_api_key: Option<String>,
    pub resource_directory_api_key: Option<String>,
    /// Upper bound on a single request, also embedded in Overpass queries
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            overpass_url: OVERPASS_URL_DEFAULT.to_string(),
            nominatim_url: NOMINATIM_URL_DEFAULT.to_string(),
            social_services_url: SOCIAL_SERVICES_URL_DEFAULT.to_string(),
            resource_directory_url: RESOURCE_DIRECTORY_URL_DEFAULT.to_string(),
            user_agent: USER_AGENT_DEFAULT.to_string(),
            bounding_box_offset: 0.2,
            text_search_limit: 50,
            social_services_radius_miles: 5,
            directory_page_size: 50,
            social_services_api_key: None,
            resource_directory_api_key: None,
            request_timeout: Duration::from_secs(25),
        }
    }
}

impl ProviderConfig {
    /// Defaults overridden by `AIDLOCATOR_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_var("AIDLOCATOR_OVERPASS_URL") {
            config.overpass_url = url;
        }
        if let Some(url) = env_var("AIDLOCATOR_NOMINATIM_URL") {
            config.nominatim_url = url;
        }
        if let Some(url) = env_var("AIDLOCATOR_211_URL") {
            config.social_services_url = url;
        }
        if let Some(url) = env_var("AIDLOCATOR_FINDHELP_URL") {
            config.resource_directory_url = url;
        }
        if let Some(agent) = env_var("AIDLOCATOR_USER_AGENT") {
            config.user_agent = agent;
        }
        config.social_services_api_key = env_var("AIDLOCATOR_211_API_KEY");
        config.resource_directory_api_key = env_var("AIDLOCATOR_FINDHELP_API_KEY");
        debug!(
            social_services_key = config.social_services_api_key.is_some(),
            resource_directory_key = config.resource_directory_api_key.is_some(),
            "Loaded provider configuration from environment"
        );
        config
    }

    pub fn with_social_services_key(mut self, key: impl Into<String>) -> Self {
        self.social_services_api_key = Some(key.into());
        self
    }

    pub fn with_resource_directory_key(mut self, key: impl Into<String>) -> Self {
        self.resource_directory_api_key = Some(key.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Non-empty environment variable, trimmed.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.overpass_url, OVERPASS_URL_DEFAULT);
        assert_eq!(config.bounding_box_offset, 0.2);
        assert_eq!(config.request_timeout, Duration::from_secs(25));
        assert!(config.social_services_api_key.is_none());
        assert!(config.resource_directory_api_key.is_none());
    }

    #[test]
    fn test_builder_methods() {
        let config = ProviderConfig::default()
            .with_social_services_key("abc")
            .with_resource_directory_key("def")
            .with_user_agent("tests/1.0")
            .with_request_timeout(Duration::from_secs(3));

        assert_eq!(config.social_services_api_key.as_deref(), Some("abc"));
        assert_eq!(config.resource_directory_api_key.as_deref(), Some("def"));
        assert_eq!(config.user_agent, "tests/1.0");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
    }
}
