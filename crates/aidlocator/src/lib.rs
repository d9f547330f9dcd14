//! AidLocator - nearby aid resource discovery and ranking
//!
//! AidLocator finds food banks, shelters, clinics, clothing banks, drinking
//! water and emergency services around a point. It queries OpenStreetMap
//! (Overpass and Nominatim) and, when credentials are configured, 211 and
//! findhelp-style community directories, then merges everything into one
//! [`Resource`] schema, drops duplicates and ranks what is left.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aidlocator::{ResourceSearcher, ResourceType, init_logging};
//!
//! # async fn run() -> Result<(), aidlocator::error::AidLocatorError> {
//! init_logging(tracing::Level::INFO)?;
//!
//! let searcher = ResourceSearcher::from_env()?;
//! let results = searcher.search(37.9735, -122.5311, ResourceType::Shelter).await;
//! if let Some(best) = results.first() {
//!     println!("{}: {}", best.name, best.ai_suggestion);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Multi-source**: four providers normalised through one shared classifier
//! - **Polite**: provider calls are serialised, spaced and backed off on HTTP 429
//! - **Cached**: repeat searches from nearly the same spot are served from memory
//! - **Always answers**: broad search, demonstration data and an outage notice
//!   stand in when real data is missing
//! - **Ranked**: distance, availability, rating and opening hours feed one score
//!
//! # Offline testing
//!
//! With the `test_data` feature of the providers crate,
//! `providers::test_data::ScriptedProvider` answers every call from a script
//! so whole searches can run without a network.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod cache;
mod clock;
mod config;
mod core;
pub mod error;
mod geo;
mod locate;
pub mod normalize;
mod rate_limit;
mod resource;
pub mod search;
mod store;

pub use crate::core::ResourceSearcher;

pub use aidlocator_providers as providers;
pub use aidlocator_providers::{GeoDataProvider, ProviderConfig, ProviderError, ProviderKind};
#[cfg(feature = "http")]
pub use aidlocator_providers::HttpProviders;
pub use cache::ResourceCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use geo::{Coordinate, DEFAULT_COORDINATE, EARTH_RADIUS_KM, distance_km};
pub use locate::{
    DeviceOptions, LocateAttempt, LocateError, LocatePolicy, Located, LocationOrigin,
    PositionSource,
};
pub use rate_limit::RateLimiter;
pub use resource::{RankedResource, Resource, ResourcePatch, ResourceType, Source};
pub use search::{RelevanceRanker, SearchCategory, SearchError};
pub use store::{AppMode, NEARBY_RADIUS_KM, ResourceStore, SearchTicket};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for AidLocator.
///
/// Installs a `tracing` fmt subscriber once per process. `RUST_LOG` takes
/// precedence over `level` when set. HTTP client internals are capped at
/// `warn`.
///
/// # Examples
///
/// ```rust
/// use aidlocator::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// // Later calls are no-ops
/// init_logging(Level::DEBUG)?;
/// # Ok::<(), aidlocator::error::AidLocatorError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::AidLocatorError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|err| error::AidLocatorError::Other(anyhow::anyhow!(err)))?;
        Ok(())
    })
}
