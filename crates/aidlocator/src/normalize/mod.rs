//! Mapping raw provider payloads into [`Resource`] records.
//!
//! Every provider goes through the same [`classify`] function so a keyword or
//! tag means the same category wherever it comes from. Structured tags are
//! trusted first; free text (names, descriptions) is only consulted when no
//! tag is conclusive.
//!
//! Normalisers never drop a record for missing optional fields. The only
//! records dropped are those without usable coordinates, since they cannot be
//! placed, measured or ranked.
use itertools::Itertools;

use crate::resource::ResourceType;

pub mod directory;
pub mod nominatim;
pub mod overpass;
pub mod social_services;

/// Keyword lists checked in order against lower-cased free text.
const KEYWORDS: [(ResourceType, &[&str]); 6] = [
    (ResourceType::Food, &["kitchen", "pantry", "meal", "food", "soup"]),
    (ResourceType::Shelter, &["shelter", "housing", "homeless"]),
    (
        ResourceType::Medical,
        &["clinic", "hospital", "dental", "medical", "health", "pharmacy"],
    ),
    (
        ResourceType::Clothing,
        &["thrift", "charity", "goodwill", "clothing", "closet"],
    ),
    (ResourceType::Water, &["fountain", "drinking", "water"]),
    (
        ResourceType::Emergency,
        &["crisis", "fire", "police", "disaster", "emergency"],
    ),
];

/// Classify a record from its structured tags, then its free text.
///
/// `tags` are `(key, value)` pairs in the order they should be trusted and
/// `texts` are names, descriptions and similar, again in priority order.
pub fn classify(tags: &[(&str, &str)], texts: &[&str]) -> ResourceType {
    tags.iter()
        .find_map(|(key, value)| type_from_tag(key, value))
        .or_else(|| texts.iter().find_map(|text| type_from_keywords(text)))
        .unwrap_or(ResourceType::Other)
}

/// Category implied by a single structured tag, if any.
pub fn type_from_tag(key: &str, value: &str) -> Option<ResourceType> {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() || value == "no" {
        return None;
    }
    match key {
        "amenity" => match value.as_str() {
            "food_bank" | "soup_kitchen" => Some(ResourceType::Food),
            "shelter" | "community_centre" | "social_facility" => Some(ResourceType::Shelter),
            "clinic" | "hospital" | "pharmacy" | "doctors" | "dentist" => {
                Some(ResourceType::Medical)
            }
            "drinking_water" | "water_point" | "fountain" | "toilets" | "public_bath" => {
                Some(ResourceType::Water)
            }
            "fire_station" | "police" => Some(ResourceType::Emergency),
            _ => None,
        },
        "social_facility" => match value.as_str() {
            "food_bank" | "soup_kitchen" => Some(ResourceType::Food),
            "clothing_bank" => Some(ResourceType::Clothing),
            _ => Some(ResourceType::Shelter),
        },
        "shop" => matches!(value.as_str(), "charity" | "second_hand" | "clothes")
            .then_some(ResourceType::Clothing),
        "healthcare" => Some(ResourceType::Medical),
        "emergency" => Some(ResourceType::Emergency),
        "cuisine" => (value == "soup_kitchen").then_some(ResourceType::Food),
        // Social-services directory service types
        "service_type" => match value.as_str() {
            "food" => Some(ResourceType::Food),
            "housing" | "shelter" => Some(ResourceType::Shelter),
            "healthcare" | "health" | "medical" => Some(ResourceType::Medical),
            "clothing" => Some(ResourceType::Clothing),
            "water" => Some(ResourceType::Water),
            "emergency" | "crisis" => Some(ResourceType::Emergency),
            _ => None,
        },
        // Resource directory categories are free-form labels
        "category" => {
            if value.contains("food") {
                Some(ResourceType::Food)
            } else if value.contains("housing") || value.contains("shelter") {
                Some(ResourceType::Shelter)
            } else if value.contains("health") || value.contains("medical") {
                Some(ResourceType::Medical)
            } else if value.contains("cloth") {
                Some(ResourceType::Clothing)
            } else if value.contains("water") {
                Some(ResourceType::Water)
            } else if value.contains("emergency") || value.contains("crisis") {
                Some(ResourceType::Emergency)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Category implied by keywords in free text, if any.
pub fn type_from_keywords(text: &str) -> Option<ResourceType> {
    let text = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|word| text.contains(word)))
        .map(|(resource_type, _)| *resource_type)
}

/// Label used when a provider gives a record no name.
pub fn generated_name(resource_type: ResourceType) -> String {
    let label = match resource_type {
        ResourceType::Food => "Food",
        ResourceType::Shelter => "Shelter",
        ResourceType::Medical => "Medical",
        ResourceType::Clothing => "Clothing",
        ResourceType::Water => "Water",
        ResourceType::Emergency => "Emergency",
        ResourceType::Other => "Community",
    };
    format!("{label} resource")
}

/// Join the present, non-blank parts with `", "`; `None` when nothing is left.
pub(crate) fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .join(", ");
    (!joined.is_empty()).then_some(joined)
}

/// Join the present, non-blank parts with a single space.
pub(crate) fn join_words<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .join(" ");
    (!joined.is_empty()).then_some(joined)
}

/// Trimmed owned copy of an optional field, `None` when blank.
pub(crate) fn text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
