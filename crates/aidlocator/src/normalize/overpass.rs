//! OpenStreetMap elements from an Overpass amenity search.
use aidlocator_providers::{AmenityQuery, OverpassElement, OverpassResponse};
use tracing::trace;

use super::{classify, generated_name, join_present, join_words, text};
use crate::resource::{Resource, Source};

/// Tag keys consulted by the classifier, most specific first.
const CLASSIFY_KEYS: [&str; 6] = [
    "social_facility",
    "amenity",
    "healthcare",
    "shop",
    "emergency",
    "cuisine",
];

pub fn normalize(response: &OverpassResponse, query: &AmenityQuery) -> Vec<Resource> {
    response
        .elements
        .iter()
        .filter_map(|element| normalize_element(element, query))
        .collect()
}

pub fn normalize_element(element: &OverpassElement, query: &AmenityQuery) -> Option<Resource> {
    let Some(position) = element.position() else {
        trace!(kind = %element.kind, id = element.id, "Skipping element without coordinates");
        return None;
    };
    let label = query.token().replace('_', " ");

    let tags: Vec<(&str, &str)> = CLASSIFY_KEYS
        .iter()
        .filter_map(|key| element.tag(key).map(|value| (*key, value)))
        .collect();
    let texts: Vec<&str> = [element.tag("name"), element.tag("description")]
        .into_iter()
        .flatten()
        .collect();
    let resource_type = classify(&tags, &texts);

    let name = element
        .first_tag(&["name", "operator", "brand"])
        .map_or_else(|| generated_name(resource_type), str::to_string);

    let mut resource = Resource::new(
        format!("osm_{}_{}", element.kind, element.id),
        name,
        resource_type,
        position.lat,
        position.lon,
        Source::OpenStreetMap,
    );
    resource.address = address(element);
    resource.is_available = element.tag("closed").is_none_or(|closed| closed == "no")
        && element.tag("opening_hours") != Some("closed");
    resource.is_donation_point = *query == AmenityQuery::SocialFacility
        || element.tag("social_facility") == Some("donation")
        || element.tag("shop") == Some("charity");
    resource.description = Some(
        element
            .first_tag(&["description", "social_facility", "amenity"])
            .map_or_else(|| format!("{label} services"), str::to_string),
    );
    resource.contact_info = text(element.first_tag(&["phone", "contact:phone", "phone:mobile"]));
    resource.requirements = text(element.tag("requirements"))
        .or_else(|| (element.tag("fee") == Some("no")).then(|| "Free service".to_string()));
    resource.hours = text(element.first_tag(&["opening_hours", "service_times"]));
    resource.website = text(element.first_tag(&["website", "contact:website"]));
    Some(resource)
}

/// Structured `addr:*` address, else a best-effort area description, else `None`.
fn address(element: &OverpassElement) -> Option<String> {
    let structured = join_present([
        join_words([element.tag("addr:housenumber"), element.tag("addr:street")]).as_deref(),
        element.tag("addr:city"),
        join_words([element.tag("addr:state"), element.tag("addr:postcode")]).as_deref(),
    ]);
    structured.or_else(|| {
        join_present([
            element.tag("address"),
            element.tag("addr:full"),
            element.tag("location"),
            element.first_tag(&["addr:suburb", "addr:neighbourhood"]),
            element.first_tag(&["addr:city", "addr:town", "addr:village"]),
            element.first_tag(&["addr:state", "addr:province"]),
            element.tag("addr:country"),
        ])
    })
}
