//! Provider clients for the AidLocator resource pipeline.
//!
//! Each external source of aid locations is reached through the
//! [`GeoDataProvider`] trait, which hands back the provider's raw payload
//! untouched. Mapping those payloads into the canonical resource shape is the
//! job of the `aidlocator` crate; this crate only knows how to ask and how to
//! parse.
//!
//! Four sources are supported:
//! - **Overpass** (OpenStreetMap amenity search, see [`AmenityQuery`])
//! - **Nominatim** (OpenStreetMap free-text search and reverse geocoding)
//! - a **social-services directory** (211-style, credentialed)
//! - a **resource directory** (findhelp-style, credentialed)
use std::fmt;

use async_trait::async_trait;

mod config;
#[cfg(feature = "http")]
mod http;
pub mod raw;
#[cfg(any(test, feature = "test_data"))]
pub mod test_data;

pub use config::ProviderConfig;
#[cfg(feature = "http")]
pub use http::HttpProviders;
pub use raw::{
    AmenityQuery, DirectoryOrganization, DirectoryResponse, LatLon, NominatimAddress,
    NominatimPlace, OverpassElement, OverpassResponse, RawId, ReversePlace, SocialServiceRecord,
    SocialServicesResponse,
};

mod error {
    use thiserror::Error;

    use super::ProviderKind;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum ProviderError {
        #[error("{provider} returned HTTP {status}")]
        Http { provider: ProviderKind, status: u16 },
        #[error("{provider} is rate limiting requests (HTTP 429)")]
        RateLimited { provider: ProviderKind },
        #[error("Network error: {0}")]
        Network(String),
        #[error("Request timed out")]
        Timeout,
        #[error("Parse error: {0}")]
        Parse(String),
        #[error("{provider} requires an API credential but none is configured")]
        MissingCredential { provider: ProviderKind },
    }

    impl ProviderError {
        /// Map a non-success HTTP status to an error, singling out throttling.
        pub const fn from_status(provider: ProviderKind, status: u16) -> Self {
            if status == 429 {
                Self::RateLimited { provider }
            } else {
                Self::Http { provider, status }
            }
        }

        /// HTTP status carried by the error, if any.
        pub const fn status(&self) -> Option<u16> {
            match self {
                Self::Http { status, .. } => Some(*status),
                Self::RateLimited { .. } => Some(429),
                _ => None,
            }
        }

        pub const fn is_rate_limited(&self) -> bool {
            matches!(self, Self::RateLimited { .. })
        }

        pub const fn is_missing_credential(&self) -> bool {
            matches!(self, Self::MissingCredential { .. })
        }
    }

    #[cfg(feature = "http")]
    impl From<reqwest::Error> for ProviderError {
        fn from(err: reqwest::Error) -> Self {
            if err.is_timeout() {
                Self::Timeout
            } else if err.is_decode() {
                Self::Parse(err.to_string())
            } else {
                Self::Network(err.to_string())
            }
        }
    }

    impl From<serde_json::Error> for ProviderError {
        fn from(err: serde_json::Error) -> Self {
            Self::Parse(err.to_string())
        }
    }

    pub type Result<T> = std::result::Result<T, ProviderError>;
}

pub use error::{ProviderError, Result};

/// Identifies one of the external data sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    Overpass,
    Nominatim,
    SocialServices,
    ResourceDirectory,
}

impl ProviderKind {
    pub const ALL: [Self; 4] = [
        Self::Overpass,
        Self::Nominatim,
        Self::SocialServices,
        Self::ResourceDirectory,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Overpass => "overpass",
            Self::Nominatim => "nominatim",
            Self::SocialServices => "social_services",
            Self::ResourceDirectory => "resource_directory",
        }
    }

    /// Whether calls to this provider need an API key.
    pub const fn requires_credential(self) -> bool {
        matches!(self, Self::SocialServices | Self::ResourceDirectory)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access to every external geodata source the pipeline can query.
///
/// Implementations must treat "no results" as a successful empty payload and
/// reserve errors for transport, status, parse and configuration failures.
/// Callers are expected to serialise calls and apply their own rate limiting.
#[async_trait]
pub trait GeoDataProvider: Send + Sync {
    /// Overpass amenity search within `radius_m` metres of the point.
    async fn amenity_search(
        &self,
        latitude: f64,
        longitude: f64,
        query: &AmenityQuery,
        radius_m: u32,
    ) -> Result<OverpassResponse>;

    /// Nominatim free-text search bounded to a box around the point.
    async fn text_search(
        &self,
        latitude: f64,
        longitude: f64,
        phrase: &str,
    ) -> Result<Vec<NominatimPlace>>;

    /// Nominatim coordinate-to-address lookup.
    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<ReversePlace>;

    /// Social-services directory search for a service type (`food`, `housing`, ...).
    async fn social_services(
        &self,
        latitude: f64,
        longitude: f64,
        service_type: &str,
    ) -> Result<SocialServicesResponse>;

    /// Resource directory search for a category.
    async fn resource_directory(
        &self,
        latitude: f64,
        longitude: f64,
        category: &str,
    ) -> Result<DirectoryResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ProviderError::from_status(ProviderKind::Overpass, 429);
        assert!(err.is_rate_limited());
        assert_eq!(err.status(), Some(429));

        let err = ProviderError::from_status(ProviderKind::Nominatim, 503);
        assert!(!err.is_rate_limited());
        assert_eq!(
            err,
            ProviderError::Http {
                provider: ProviderKind::Nominatim,
                status: 503
            }
        );
    }

    #[test]
    fn test_credential_requirements() {
        assert!(!ProviderKind::Overpass.requires_credential());
        assert!(!ProviderKind::Nominatim.requires_credential());
        assert!(ProviderKind::SocialServices.requires_credential());
        assert!(ProviderKind::ResourceDirectory.requires_credential());
    }

    #[test]
    fn test_error_display_names_provider() {
        let err = ProviderError::MissingCredential {
            provider: ProviderKind::ResourceDirectory,
        };
        assert!(err.to_string().contains("resource_directory"));
        assert!(err.is_missing_credential());
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err: ProviderError = serde_json::from_str::<OverpassResponse>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
