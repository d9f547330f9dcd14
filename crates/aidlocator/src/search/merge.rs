//! Duplicate removal and distance ordering of merged provider results.
use tracing::debug;

use crate::resource::Resource;

/// Two records describe the same place when their names match exactly and
/// their latitudes differ by less than this many degrees.
pub const DUPLICATE_LATITUDE_DEGREES: f64 = 0.001;

fn is_duplicate(a: &Resource, b: &Resource) -> bool {
    a.name == b.name && (a.latitude - b.latitude).abs() < DUPLICATE_LATITUDE_DEGREES
}

/// Drop every record that duplicates one kept earlier; the first wins.
pub fn dedupe(resources: Vec<Resource>) -> Vec<Resource> {
    let before = resources.len();
    let mut kept: Vec<Resource> = Vec::with_capacity(before);
    for resource in resources {
        if !kept.iter().any(|existing| is_duplicate(existing, &resource)) {
            kept.push(resource);
        }
    }
    if kept.len() < before {
        debug!(before, after = kept.len(), "Removed duplicate resources");
    }
    kept
}

/// Stable ascending sort by distance from the origin.
pub fn sort_by_distance(mut resources: Vec<Resource>, latitude: f64, longitude: f64) -> Vec<Resource> {
    resources.sort_by(|a, b| {
        a.distance_from(latitude, longitude)
            .total_cmp(&b.distance_from(latitude, longitude))
    });
    resources
}

pub fn dedupe_and_sort(resources: Vec<Resource>, latitude: f64, longitude: f64) -> Vec<Resource> {
    sort_by_distance(dedupe(resources), latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ResourceType, Source};

    fn resource(id: &str, name: &str, latitude: f64, longitude: f64) -> Resource {
        Resource::new(id, name, ResourceType::Food, latitude, longitude, Source::OpenStreetMap)
    }

    #[test]
    fn test_close_duplicates_collapse_to_first() {
        let list = vec![
            resource("osm_node_1", "Food Bank", 37.9736, -122.5310),
            resource("nominatim_2", "Food Bank", 37.9740, -122.5300),
        ];
        let deduped = dedupe(list);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].id, "osm_node_1");
    }

    #[test]
    fn test_distant_or_differently_named_records_survive() {
        let list = vec![
            resource("a", "Food Bank", 37.9736, -122.5310),
            resource("b", "Food Bank", 37.9756, -122.5310),
            resource("c", "Food Bank ", 37.9736, -122.5310),
        ];
        assert_eq!(dedupe(list).len(), 3);
    }

    #[test]
    fn test_dedupe_is_idempotent() {
        let list = vec![
            resource("a", "Pantry", 1.0, 1.0),
            resource("b", "Pantry", 1.0005, 1.0),
            resource("c", "Pantry", 1.0009, 1.0),
            resource("d", "Kitchen", 1.0, 1.0),
            resource("e", "Pantry", 1.01, 1.0),
        ];
        let once = dedupe(list);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);

        // No surviving pair violates the duplicate rule
        for (i, a) in once.iter().enumerate() {
            for b in &once[i + 1..] {
                assert!(!is_duplicate(a, b), "{} and {} are duplicates", a.id, b.id);
            }
        }
    }

    #[test]
    fn test_sort_by_distance_is_stable_and_ascending() {
        let (lat, lon) = (37.9735, -122.5311);
        let list = vec![
            resource("far", "Far", 38.1, -122.5311),
            resource("tie_a", "Tie A", 37.98, -122.5311),
            resource("near", "Near", 37.9736, -122.5311),
            resource("tie_b", "Tie B", 37.98, -122.5311),
        ];
        let sorted = sort_by_distance(list, lat, lon);
        let ids: Vec<&str> = sorted.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["near", "tie_a", "tie_b", "far"]);

        let distances: Vec<f64> = sorted.iter().map(|r| r.distance_from(lat, lon)).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_dedupe_then_sort() {
        let list = vec![
            resource("b", "Shelter", 37.99, -122.5311),
            resource("a", "Pantry", 37.974, -122.5311),
            resource("b2", "Shelter", 37.9905, -122.5311),
        ];
        let merged = dedupe_and_sort(list, 37.9735, -122.5311);
        let ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
