//! Short-lived result cache keyed by rounded coordinates.
//!
//! Coordinates are rounded to three decimal places (roughly 111 m) so repeat
//! searches from nearly the same spot share an entry. Expired entries are
//! ignored on read rather than evicted.
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use ahash::AHashMap as HashMap;
use tracing::debug;

use crate::{clock::Clock, resource::Resource};

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<Resource>,
    /// Epoch milliseconds at insertion
    timestamp: i64,
}

#[derive(Debug)]
pub struct ResourceCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    radius_m: u32,
    clock: Arc<dyn Clock>,
}

impl ResourceCache {
    pub fn new(ttl: Duration, radius_m: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            radius_m,
            clock,
        }
    }

    /// `round(lat*1000)_round(lon*1000)_category_radius`
    pub fn key(latitude: f64, longitude: f64, category: &str, radius_m: u32) -> String {
        format!(
            "{}_{}_{}_{}",
            (latitude * 1000.0).round() as i64,
            (longitude * 1000.0).round() as i64,
            category,
            radius_m
        )
    }

    /// Cached resources, if an entry exists and is younger than the TTL.
    pub fn get(&self, latitude: f64, longitude: f64, category: &str) -> Option<Vec<Resource>> {
        let key = Self::key(latitude, longitude, category, self.radius_m);
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.get(&key)?;
        let age_ms = self.clock.now_millis() - entry.timestamp;
        if age_ms < self.ttl_millis() {
            debug!(key, age_ms, count = entry.data.len(), "Cache hit");
            Some(entry.data.clone())
        } else {
            debug!(key, age_ms, "Cache entry expired");
            None
        }
    }

    pub fn set(&self, latitude: f64, longitude: f64, category: &str, data: Vec<Resource>) {
        let key = Self::key(latitude, longitude, category, self.radius_m);
        let timestamp = self.clock.now_millis();
        debug!(key, count = data.len(), "Caching resources");
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, CacheEntry { data, timestamp });
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn ttl_millis(&self) -> i64 {
        i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeDelta, TimeZone};

    use super::*;
    use crate::{
        clock::ManualClock,
        resource::{ResourceType, Source},
    };

    fn setup() -> (Arc<ManualClock>, ResourceCache) {
        let clock = Arc::new(ManualClock::new(
            Local.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap(),
        ));
        let cache = ResourceCache::new(Duration::from_secs(300), 5000, clock.clone());
        (clock, cache)
    }

    fn sample() -> Vec<Resource> {
        vec![Resource::new(
            "osm_node_1",
            "Food Pantry",
            ResourceType::Food,
            37.9736,
            -122.5310,
            Source::OpenStreetMap,
        )]
    }

    #[test]
    fn test_key_rounds_coordinates() {
        assert_eq!(
            ResourceCache::key(37.9736, -122.5311, "food", 5000),
            "37974_-122531_food_5000"
        );
        assert_eq!(
            ResourceCache::key(37.97361, -122.53109, "food", 5000),
            ResourceCache::key(37.97359, -122.53111, "food", 5000)
        );
        assert_ne!(
            ResourceCache::key(37.9736, -122.5311, "food", 5000),
            ResourceCache::key(37.9736, -122.5311, "all", 5000)
        );
    }

    #[test]
    fn test_get_within_ttl() {
        let (clock, cache) = setup();
        cache.set(37.9736, -122.5311, "food", sample());

        clock.advance(TimeDelta::minutes(4));
        assert_eq!(cache.get(37.9736, -122.5311, "food"), Some(sample()));
        // Nearby point rounds to the same key
        assert!(cache.get(37.97362, -122.53112, "food").is_some());
        assert!(cache.get(37.9736, -122.5311, "shelter").is_none());
    }

    #[test]
    fn test_expired_entry_is_ignored() {
        let (clock, cache) = setup();
        cache.set(37.9736, -122.5311, "food", sample());

        clock.advance(TimeDelta::minutes(5));
        assert!(cache.get(37.9736, -122.5311, "food").is_none());
        // Not evicted, only ignored
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let (clock, cache) = setup();
        cache.set(37.9736, -122.5311, "food", sample());
        clock.advance(TimeDelta::minutes(4));
        cache.set(37.9736, -122.5311, "food", Vec::new());
        clock.advance(TimeDelta::minutes(4));

        assert_eq!(cache.get(37.9736, -122.5311, "food"), Some(Vec::new()));
        cache.clear();
        assert!(cache.is_empty());
    }
}
