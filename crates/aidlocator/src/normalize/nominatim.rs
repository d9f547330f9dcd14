//! Nominatim free-text search candidates.
use aidlocator_providers::{NominatimAddress, NominatimPlace};

use super::{classify, generated_name, join_present, join_words, text};
use crate::resource::{Resource, Source};

/// Normalise the places returned for `phrase`.
///
/// The search phrase is the weakest classification hint: it is only used when
/// neither the place's tags nor its name say anything.
pub fn normalize(places: &[NominatimPlace], phrase: &str) -> Vec<Resource> {
    places
        .iter()
        .filter_map(|place| normalize_place(place, phrase))
        .collect()
}

pub fn normalize_place(place: &NominatimPlace, phrase: &str) -> Option<Resource> {
    let (latitude, longitude) = (place.lat?, place.lon?);

    let mut tags = Vec::with_capacity(2);
    if let Some(facility) = place.extratag("social_facility") {
        tags.push(("social_facility", facility));
    }
    if let (Some(class), Some(kind)) = (place.class.as_deref(), place.kind.as_deref()) {
        tags.push((class, kind));
    }
    let texts: Vec<&str> = [place.short_name(), Some(phrase)]
        .into_iter()
        .flatten()
        .collect();
    let resource_type = classify(&tags, &texts);

    let id = place.place_id.as_ref().map_or_else(
        || format!("nominatim_{latitude}_{longitude}"),
        |place_id| format!("nominatim_{place_id}"),
    );
    let name = place
        .short_name()
        .map_or_else(|| generated_name(resource_type), str::to_string);

    let phrase = phrase.to_lowercase();
    let mut resource = Resource::new(
        id,
        name,
        resource_type,
        latitude,
        longitude,
        Source::Nominatim,
    );
    resource.address = text(place.display_name.as_deref())
        .or_else(|| place.address.as_ref().and_then(structured_address));
    resource.is_available = place.extratag("opening_hours") != Some("closed");
    resource.is_donation_point = phrase.contains("donation") || phrase.contains("thrift");
    resource.description = match (place.kind.as_deref(), place.class.as_deref()) {
        (Some(kind), Some(class)) => Some(format!("{kind} - {class}")),
        _ => None,
    };
    resource.contact_info = text(
        place
            .extratag("phone")
            .or_else(|| place.extratag("contact:phone")),
    );
    resource.hours = text(place.extratag("opening_hours"));
    resource.website = text(
        place
            .extratag("website")
            .or_else(|| place.extratag("contact:website")),
    );
    Some(resource)
}

/// Address assembled from `addressdetails`, used when there is no display name.
pub(crate) fn structured_address(address: &NominatimAddress) -> Option<String> {
    join_present([
        join_words([address.house_number.as_deref(), address.road.as_deref()]).as_deref(),
        address
            .neighbourhood
            .as_deref()
            .or(address.suburb.as_deref()),
        address
            .city
            .as_deref()
            .or(address.town.as_deref())
            .or(address.village.as_deref()),
        join_words([address.state.as_deref(), address.postcode.as_deref()]).as_deref(),
        address.country.as_deref(),
    ])
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use aidlocator_providers::{RawId, test_data::nominatim_place};

    use super::*;
    use crate::resource::ResourceType;

    #[test]
    fn test_normalize_place() {
        let mut place = nominatim_place(
            283746,
            "San Rafael Community Food Bank, 123 Main St, San Rafael, CA",
            37.9736,
            -122.5310,
            "amenity",
            "food_bank",
        );
        place.extratags = Some(HashMap::from([
            ("opening_hours".to_string(), "Mo-Fr 09:00-17:00".to_string()),
            ("phone".to_string(), "+1 415 555 0100".to_string()),
        ]));

        let resource = normalize_place(&place, "food bank pantry soup kitchen").unwrap();
        assert_eq!(resource.id, "nominatim_283746");
        assert_eq!(resource.name, "San Rafael Community Food Bank");
        assert_eq!(resource.resource_type, ResourceType::Food);
        assert_eq!(
            resource.address.as_deref(),
            Some("San Rafael Community Food Bank, 123 Main St, San Rafael, CA")
        );
        assert_eq!(resource.description.as_deref(), Some("food_bank - amenity"));
        assert_eq!(resource.hours.as_deref(), Some("Mo-Fr 09:00-17:00"));
        assert_eq!(resource.contact_info.as_deref(), Some("+1 415 555 0100"));
        assert!(resource.website.is_none());
        assert!(resource.is_available);
        assert!(!resource.is_donation_point);
        assert_eq!(resource.source, Source::Nominatim);
    }

    #[test]
    fn test_tags_and_name_beat_phrase() {
        let place = nominatim_place(
            1,
            "Marin General Hospital, Kentfield",
            37.95,
            -122.55,
            "amenity",
            "hospital",
        );
        let resource = normalize_place(&place, "food bank pantry").unwrap();
        assert_eq!(resource.resource_type, ResourceType::Medical);

        let place = nominatim_place(
            2,
            "Ritter Center Homeless Services",
            37.97,
            -122.52,
            "office",
            "ngo",
        );
        let resource = normalize_place(&place, "food bank pantry").unwrap();
        assert_eq!(resource.resource_type, ResourceType::Shelter);
    }

    #[test]
    fn test_phrase_is_last_resort() {
        let place = nominatim_place(
            3,
            "St. Vincent de Paul Society",
            37.97,
            -122.52,
            "office",
            "ngo",
        );
        let resource =
            normalize_place(&place, "salvation army goodwill clothing donation").unwrap();
        assert_eq!(resource.resource_type, ResourceType::Clothing);
        assert!(resource.is_donation_point);
    }

    #[test]
    fn test_missing_coordinates_are_dropped() {
        let mut place = nominatim_place(4, "Nowhere", 0.0, 0.0, "place", "locality");
        place.lat = None;
        assert!(normalize(&[place], "community services").is_empty());
    }

    #[test]
    fn test_address_from_details_when_display_name_blank() {
        let place = NominatimPlace {
            place_id: Some(RawId::Text("abc".into())),
            name: Some("Canal Alliance".into()),
            lat: Some(37.96),
            lon: Some(-122.50),
            address: Some(NominatimAddress {
                house_number: Some("91".into()),
                road: Some("Larkspur St".into()),
                town: Some("San Rafael".into()),
                state: Some("CA".into()),
                postcode: Some("94901".into()),
                ..NominatimAddress::default()
            }),
            ..NominatimPlace::default()
        };
        let resource = normalize_place(&place, "community services").unwrap();
        assert_eq!(resource.id, "nominatim_abc");
        assert_eq!(
            resource.address.as_deref(),
            Some("91 Larkspur St, San Rafael, CA 94901")
        );
        assert!(resource.description.is_none());
    }
}
