//! Relevance scoring and recommendation tagging.
//!
//! The score is a sum of independent bonuses:
//!
//! | factor                     | points                      |
//! |----------------------------|-----------------------------|
//! | distance                   | `max(0, 100 - km * 10)`     |
//! | accepting people           | 20                          |
//! | rating                     | `rating * 5`                |
//! | open now                   | 25                          |
//! | shelter or medical         | 15                          |
//!
//! "Open now" is a coarse heuristic on the local wall-clock hour and ignores
//! the resource's timezone.
use chrono::{DateTime, Local, Timelike};
use tracing::debug;

use crate::{
    config::SearchConfig,
    resource::{RankedResource, Resource},
};

const OPEN_FROM_HOUR: u32 = 8;
const OPEN_UNTIL_HOUR: u32 = 20;
const ALWAYS_OPEN_MARKERS: [&str; 2] = ["24/7", "24 hours"];

const TOP_SCORE: f64 = 80.0;
const RECOMMENDED_SCORE: f64 = 60.0;
const HIGH_RATING: f64 = 4.5;

/// Ranks resources and marks the best of them as recommendations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceRanker {
    /// How many of the highest-scored entries become top recommendations
    pub top_recommendations: usize,
    /// Entries scoring strictly above this are recommended
    pub recommendation_threshold: f64,
}

impl Default for RelevanceRanker {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl RelevanceRanker {
    pub const fn from_config(config: &SearchConfig) -> Self {
        Self {
            top_recommendations: config.top_recommendations,
            recommendation_threshold: config.recommendation_threshold,
        }
    }

    /// Score every resource against the query point, sort by descending score
    /// (ties keep their input order) and tag recommendations.
    pub fn rank(
        &self,
        resources: Vec<Resource>,
        latitude: f64,
        longitude: f64,
        now: &DateTime<Local>,
    ) -> Vec<RankedResource> {
        let hour = now.hour();
        let mut ranked: Vec<RankedResource> = resources
            .into_iter()
            .map(|resource| {
                let distance = resource.distance_from(latitude, longitude);
                let open = is_currently_open(resource.hours.as_deref(), hour);
                let relevance_score = relevance_score(&resource, distance, open);
                let ai_suggestion = ai_suggestion(&resource, distance, open, relevance_score);
                RankedResource {
                    distance,
                    relevance_score,
                    is_recommended: relevance_score > self.recommendation_threshold,
                    is_top_recommendation: false,
                    ai_suggestion,
                    resource,
                }
            })
            .collect();

        ranked.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        for entry in ranked.iter_mut().take(self.top_recommendations) {
            entry.is_top_recommendation = true;
        }

        debug!(
            count = ranked.len(),
            recommended = ranked.iter().filter(|r| r.is_recommended).count(),
            hour,
            "Ranked resources"
        );
        ranked
    }
}

/// Composite score for one resource `distance_km` away.
pub fn relevance_score(resource: &Resource, distance_km: f64, open: bool) -> f64 {
    let mut score = (100.0 - distance_km * 10.0).max(0.0);
    if resource.is_available {
        score += 20.0;
    }
    if let Some(rating) = resource.rating {
        score += rating * 5.0;
    }
    if open {
        score += 25.0;
    }
    if resource.resource_type.is_priority() {
        score += 15.0;
    }
    score
}

/// Whether opening-hours text suggests the place is open at `hour` (0-23).
///
/// Missing hours count as closed. Text mentioning round-the-clock service is
/// always open; anything else is open from 08:00 until 20:00.
pub fn is_currently_open(hours: Option<&str>, hour: u32) -> bool {
    let Some(hours) = hours else {
        return false;
    };
    let lowered = hours.to_lowercase();
    if ALWAYS_OPEN_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        return true;
    }
    (OPEN_FROM_HOUR..OPEN_UNTIL_HOUR).contains(&hour)
}

/// Short human-readable reason to pick this resource, e.g.
/// `"Top recommendation • Very close to you • Currently open"`.
pub fn ai_suggestion(resource: &Resource, distance_km: f64, open: bool, score: f64) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(5);

    if score > TOP_SCORE {
        parts.push("Top recommendation");
    } else if score > RECOMMENDED_SCORE {
        parts.push("Recommended");
    }

    if distance_km < 1.0 {
        parts.push("Very close to you");
    } else if distance_km < 5.0 {
        parts.push("Nearby location");
    }
    if resource.is_available && open {
        parts.push("Currently open");
    }
    if resource.rating.is_some_and(|rating| rating >= HIGH_RATING) {
        parts.push("Highly rated");
    }
    if resource.is_donation_point {
        parts.push("Accepts donations");
    }

    if parts.is_empty() {
        "Available resource".to_string()
    } else {
        parts.join(" • ")
    }
}
