//! The search pipeline behind [`crate::ResourceSearcher::search`].
//!
//! Provider calls run one at a time in plan order, each spaced by the rate
//! limiter and bounded by the provider timeout. A failed call contributes
//! nothing and the batch carries on. The pipeline always produces a list:
//! live results, broad results, demonstration data, or an outage notice.
use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use ahash::AHashSet as HashSet;
use aidlocator_providers::{GeoDataProvider, ProviderError, ProviderKind};
use tracing::{debug, error, info, instrument, warn};

use super::{
    SearchCategory, broad_plan, category_plan, demo_resources, merge::dedupe_and_sort,
    outage_notice, plan::ProviderCall, rank::RelevanceRanker,
};
use crate::{
    cache::ResourceCache,
    clock::Clock,
    config::SearchConfig,
    normalize::{self, text},
    rate_limit::RateLimiter,
    resource::{RankedResource, Resource},
};

/// Address given to resources whose reverse lookup failed.
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// Everything one search borrows from its [`crate::ResourceSearcher`].
pub struct SearchContext<'a> {
    pub provider: &'a dyn GeoDataProvider,
    pub config: &'a SearchConfig,
    pub cache: &'a ResourceCache,
    pub limiter: &'a RateLimiter,
    pub clock: &'a dyn Clock,
    /// Providers switched off after a credential error
    pub disabled: &'a Mutex<HashSet<ProviderKind>>,
}

impl SearchContext<'_> {
    fn is_disabled(&self, provider: ProviderKind) -> bool {
        self.disabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&provider)
    }

    /// Returns `true` the first time a provider is disabled.
    fn disable(&self, provider: ProviderKind) -> bool {
        self.disabled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(provider)
    }
}

/// Which rung of the fallback ladder produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchOutcome {
    Cached,
    Live,
    Broad,
    Demo,
    Outage,
}

/// Normalised output of a sequence of provider calls.
#[derive(Debug, Default)]
struct BatchResult {
    resources: Vec<Resource>,
    succeeded: usize,
    failed: usize,
}

#[instrument(
    name = "Resource Search",
    level = "info",
    skip_all,
    fields(latitude = latitude, longitude = longitude, category = %category)
)]
pub async fn search_inner(
    ctx: &SearchContext<'_>,
    latitude: f64,
    longitude: f64,
    category: SearchCategory,
) -> Vec<RankedResource> {
    let t0 = Instant::now();
    let ranker = RelevanceRanker::from_config(ctx.config);

    let (resources, outcome) = match ctx.cache.get(latitude, longitude, category.as_str()) {
        Some(cached) => (cached, SearchOutcome::Cached),
        None => gather(ctx, latitude, longitude, category).await,
    };

    let ranked = ranker.rank(resources, latitude, longitude, &ctx.clock.now());
    info!(
        count = ranked.len(),
        outcome = ?outcome,
        elapsed_seconds = ?t0.elapsed(),
        "Search complete"
    );
    ranked
}

/// Walk the fallback ladder until some rung produces resources.
async fn gather(
    ctx: &SearchContext<'_>,
    latitude: f64,
    longitude: f64,
    category: SearchCategory,
) -> (Vec<Resource>, SearchOutcome) {
    let plan = category_plan(category);
    let primary = run_batch(ctx, latitude, longitude, &plan, ctx.config.batch_call_delay).await;
    debug!(
        calls = plan.len(),
        succeeded = primary.succeeded,
        failed = primary.failed,
        found = primary.resources.len(),
        "Category fan-out finished"
    );
    if !primary.resources.is_empty() {
        let merged = merge(ctx, primary.resources, latitude, longitude).await;
        ctx.cache.set(latitude, longitude, category.as_str(), merged.clone());
        return (merged, SearchOutcome::Live);
    }

    info!("Category search found nothing, trying a broad search");
    let broad = run_batch(
        ctx,
        latitude,
        longitude,
        &broad_plan(),
        ctx.config.min_call_delay,
    )
    .await;
    if !broad.resources.is_empty() {
        let merged = merge(ctx, broad.resources, latitude, longitude).await;
        ctx.cache.set(latitude, longitude, category.as_str(), merged.clone());
        return (merged, SearchOutcome::Broad);
    }

    if primary.succeeded + broad.succeeded == 0 {
        warn!(
            failed = primary.failed + broad.failed,
            "Every provider call failed, returning outage notice"
        );
        return (vec![outage_notice(latitude, longitude)], SearchOutcome::Outage);
    }

    info!("Providers returned no resources, using demonstration data");
    (
        demo_resources(latitude, longitude, category),
        SearchOutcome::Demo,
    )
}

async fn merge(
    ctx: &SearchContext<'_>,
    resources: Vec<Resource>,
    latitude: f64,
    longitude: f64,
) -> Vec<Resource> {
    let mut merged = dedupe_and_sort(resources, latitude, longitude);
    if ctx.config.reverse_geocode_missing {
        fill_missing_addresses(ctx, &mut merged).await;
    }
    merged
}

/// Run `calls` in order, spacing them by `delay`.
async fn run_batch(
    ctx: &SearchContext<'_>,
    latitude: f64,
    longitude: f64,
    calls: &[ProviderCall],
    delay: Duration,
) -> BatchResult {
    let mut batch = BatchResult::default();
    for call in calls {
        let provider = call.provider();
        if ctx.is_disabled(provider) {
            debug!(%provider, label = call.label(), "Skipping disabled provider");
            continue;
        }

        ctx.limiter.wait(delay).await;
        let result = tokio::time::timeout(
            ctx.config.provider_timeout,
            execute(ctx, latitude, longitude, call),
        )
        .await
        .unwrap_or(Err(ProviderError::Timeout));

        match result {
            Ok(resources) => {
                batch.succeeded += 1;
                batch.resources.extend(resources);
            }
            Err(ProviderError::Parse(reason)) => {
                // A malformed payload is an empty answer, not an outage
                batch.succeeded += 1;
                warn!(
                    %provider,
                    label = call.label(),
                    %reason,
                    "Unreadable payload, treating as no results"
                );
            }
            Err(err) => {
                batch.failed += 1;
                handle_failure(ctx, provider, call.label(), &err);
            }
        }
    }
    batch
}

#[instrument(
    name = "Provider Call",
    level = "debug",
    skip_all,
    fields(provider = %call.provider(), label = call.label())
)]
async fn execute(
    ctx: &SearchContext<'_>,
    latitude: f64,
    longitude: f64,
    call: &ProviderCall,
) -> Result<Vec<Resource>, ProviderError> {
    let resources = match call {
        ProviderCall::Amenity(query) => {
            let response = ctx
                .provider
                .amenity_search(latitude, longitude, query, ctx.config.search_radius_m)
                .await?;
            normalize::overpass::normalize(&response, query)
        }
        ProviderCall::Text(phrase) => {
            let places = ctx.provider.text_search(latitude, longitude, phrase).await?;
            normalize::nominatim::normalize(&places, phrase)
        }
        ProviderCall::SocialServices(service_type) => {
            let response = ctx
                .provider
                .social_services(latitude, longitude, service_type)
                .await?;
            normalize::social_services::normalize(&response)
        }
        ProviderCall::Directory(category) => {
            let response = ctx
                .provider
                .resource_directory(latitude, longitude, category)
                .await?;
            normalize::directory::normalize(&response)
        }
    };
    debug!(count = resources.len(), "Provider call returned");
    Ok(resources)
}

/// Log a failed call and apply its side effects: credential errors switch the
/// provider off, throttling holds back the next call.
fn handle_failure(
    ctx: &SearchContext<'_>,
    provider: ProviderKind,
    label: &str,
    err: &ProviderError,
) {
    if err.is_missing_credential() {
        if ctx.disable(provider) {
            error!(%provider, error = %err, "Provider disabled for this searcher");
        }
    } else if err.is_rate_limited() {
        let backoff = ctx.config.rate_limit_backoff;
        warn!(
            %provider,
            label,
            backoff_ms = backoff.as_millis() as u64,
            "Rate limited, backing off"
        );
        ctx.limiter.hold_for(backoff);
    } else {
        warn!(%provider, label, error = %err, "Provider call failed");
    }
}

/// Reverse geocode resources without an address, closest first, up to the
/// configured limit.
async fn fill_missing_addresses(ctx: &SearchContext<'_>, resources: &mut [Resource]) {
    if ctx.is_disabled(ProviderKind::Nominatim) {
        return;
    }
    let limit = ctx.config.reverse_geocode_limit;
    for resource in resources
        .iter_mut()
        .filter(|resource| resource.address.is_none())
        .take(limit)
    {
        ctx.limiter.wait(ctx.config.min_call_delay).await;
        let lookup = tokio::time::timeout(
            ctx.config.provider_timeout,
            ctx.provider
                .reverse_geocode(resource.latitude, resource.longitude),
        )
        .await
        .unwrap_or(Err(ProviderError::Timeout));

        let address = match lookup {
            Ok(place) => text(place.display_name.as_deref()),
            Err(err) => {
                handle_failure(ctx, ProviderKind::Nominatim, "reverse", &err);
                None
            }
        };
        debug!(id = %resource.id, found = address.is_some(), "Reverse geocoded");
        resource.address = Some(address.unwrap_or_else(|| ADDRESS_NOT_AVAILABLE.to_string()));
    }
}
