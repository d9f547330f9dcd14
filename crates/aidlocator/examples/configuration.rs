//! Search configuration and customization
//!
//! This example compares the configuration presets and shows how spacing,
//! caching and ranking settings change a search. It runs against a scripted
//! provider, so no network access is needed.

use std::{sync::Arc, time::Duration};

use aidlocator::{
    ResourceSearcher, ResourceType, SearchConfig, SearchConfigBuilder,
    providers::test_data::{ScriptedProvider, osm_node},
};

const LAT: f64 = 37.9735;
const LON: f64 = -122.5311;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Preset configurations:");
    describe("Default", &SearchConfig::default());
    describe("Polite", &SearchConfigBuilder::polite().build()?);
    describe("Fast", &SearchConfigBuilder::fast().build()?);

    // Custom configuration for a kiosk that shows a single best answer
    let kiosk = SearchConfigBuilder::fast()
        .top_recommendations(1)
        .recommendation_threshold(100.0)
        .cache_ttl(Duration::from_secs(30 * 60))
        .build()?;
    describe("Kiosk", &kiosk);

    // Invalid settings are rejected when building
    match SearchConfigBuilder::new().search_radius(0).build() {
        Ok(_) => println!("\nUnexpectedly accepted a zero search radius"),
        Err(err) => println!("\nRejected configuration: {err}"),
    }

    let searcher = ResourceSearcher::new(Arc::new(scripted_pantries()), kiosk);
    let results = searcher.search(LAT, LON, ResourceType::Food).await;

    println!("\nKiosk search for food:");
    for resource in &results {
        println!(
            "  {} - {:.2} km, score {:.1}, top: {}, recommended: {}",
            resource.name,
            resource.distance,
            resource.relevance_score,
            resource.is_top_recommendation,
            resource.is_recommended,
        );
    }
    println!("Cache now holds {} entries", searcher.cache().len());

    Ok(())
}

fn describe(label: &str, config: &SearchConfig) {
    println!(
        "  {label:<8} ttl {:>4}s, call spacing {:?}/{:?}, back-off {:?}, top {}",
        config.cache_ttl.as_secs(),
        config.min_call_delay,
        config.batch_call_delay,
        config.rate_limit_backoff,
        config.top_recommendations,
    );
}

fn scripted_pantries() -> ScriptedProvider {
    ScriptedProvider::empty().with_amenity(
        "food_bank",
        vec![
            osm_node(
                1,
                37.9736,
                -122.5310,
                &[("name", "Community Food Bank"), ("amenity", "food_bank")],
            ),
            osm_node(
                2,
                38.0300,
                -122.5400,
                &[("name", "North Marin Pantry"), ("amenity", "food_bank")],
            ),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = aidlocator::init_logging(tracing::Level::WARN);
    }

    #[test]
    fn test_configuration_example() {
        setup_test_env();
        assert!(main().is_ok(), "Configuration example should run successfully");
    }
}
