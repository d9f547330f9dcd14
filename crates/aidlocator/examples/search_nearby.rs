//! Live search around a point
//!
//! This example queries the public OpenStreetMap endpoints (and the
//! credentialed directories when `AIDLOCATOR_*` keys are set):
//! - Resolving a starting position with a location policy
//! - Searching one category and then every category
//! - Publishing results to a store and filtering what a viewer sees
//!
//! Run with `cargo run --example search_nearby -- 37.9735 -122.5311 food`.

use std::env;

use aidlocator::{
    Coordinate, LocateError, LocatePolicy, PositionSource, RankedResource, ResourceSearcher,
    ResourceStore, SearchCategory, init_logging,
};
use async_trait::async_trait;

/// Position given on the command line; there is no device or IP lookup here.
struct CommandLinePosition(Option<Coordinate>);

#[async_trait]
impl PositionSource for CommandLinePosition {
    async fn device_position(
        &self,
        _options: &aidlocator::DeviceOptions,
    ) -> Result<Coordinate, LocateError> {
        self.0.ok_or(LocateError::PermissionDenied)
    }

    async fn ip_position(&self) -> Result<Coordinate, LocateError> {
        Err(LocateError::Unavailable("no IP lookup configured".into()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(tracing::Level::INFO)?;

    let args: Vec<String> = env::args().skip(1).collect();
    let given = match (args.first(), args.get(1)) {
        (Some(lat), Some(lon)) => Some(Coordinate::new(lat.parse()?, lon.parse()?)),
        _ => None,
    };
    let category = SearchCategory::parse(args.get(2).map_or("all", String::as_str))?;

    let located = LocatePolicy::default()
        .locate(&CommandLinePosition(given))
        .await;
    if located.is_default() {
        println!("No position given, using the default location");
    }
    let here = located.coordinate;

    let searcher = ResourceSearcher::from_env()?;
    let store = ResourceStore::new();

    println!(
        "Searching for '{category}' around ({:.4}, {:.4}):",
        here.latitude, here.longitude
    );
    searcher
        .search_into(&store, here.latitude, here.longitude, category)
        .await;
    print_results(&store.resources(), 5);

    // Same point again is answered from the cache
    let again = searcher
        .search(here.latitude, here.longitude, category)
        .await;
    println!("\nRepeat search returned {} results from cache", again.len());

    let visible = store.visible(here, None, given.is_some());
    println!("{} of them are shown on the map", visible.len());

    let disabled = searcher.disabled_providers();
    if !disabled.is_empty() {
        println!("Skipped providers without credentials: {disabled:?}");
    }

    Ok(())
}

fn print_results(results: &[RankedResource], limit: usize) {
    for (i, resource) in results.iter().take(limit).enumerate() {
        let marker = if resource.is_top_recommendation { "*" } else { " " };
        println!(
            " {marker}{}. {} [{}] {:.2} km, score {:.1} ({})",
            i + 1,
            resource.name,
            resource.resource_type,
            resource.distance,
            resource.relevance_score,
            resource.source,
        );
        println!("      {}", resource.ai_suggestion);
        if let Some(address) = &resource.address {
            println!("      {address}");
        }
    }

    if results.len() > limit {
        println!("  ... and {} more results", results.len() - limit);
    }
}
