//! 211-style social-services directory records.
use aidlocator_providers::{SocialServiceRecord, SocialServicesResponse};

use super::{classify, generated_name, join_present, join_words, text};
use crate::resource::{Resource, Source};

pub fn normalize(response: &SocialServicesResponse) -> Vec<Resource> {
    response.results.iter().filter_map(normalize_record).collect()
}

pub fn normalize_record(record: &SocialServiceRecord) -> Option<Resource> {
    let (latitude, longitude) = (record.latitude?, record.longitude?);

    let tags: Vec<(&str, &str)> = record
        .service_type
        .as_deref()
        .map(|service_type| ("service_type", service_type))
        .into_iter()
        .collect();
    let texts: Vec<&str> = [record.name.as_deref(), record.description.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let resource_type = classify(&tags, &texts);

    let id = record.id.as_ref().map_or_else(
        || format!("211_{latitude}_{longitude}"),
        |id| format!("211_{id}"),
    );
    let name = text(record.name.as_deref()).unwrap_or_else(|| generated_name(resource_type));

    let mut resource = Resource::new(
        id,
        name,
        resource_type,
        latitude,
        longitude,
        Source::TwoOneOne,
    );
    resource.address = join_present([
        record.address.as_deref(),
        record.city.as_deref(),
        join_words([record.state.as_deref(), record.zip.as_deref()]).as_deref(),
    ]);
    resource.is_available = !record.is_closed.unwrap_or(false);
    resource.description = text(record.description.as_deref());
    resource.contact_info = text(record.phone.as_deref());
    resource.requirements = text(record.eligibility.as_deref());
    resource.hours = text(record.hours.as_deref());
    resource.website = text(record.website.as_deref());
    Some(resource)
}

#[cfg(test)]
mod tests {
    use aidlocator_providers::test_data::social_service;

    use super::*;
    use crate::resource::ResourceType;

    #[test]
    fn test_normalize_record() {
        let mut record = social_service(17, "Ritter Center", "housing", 37.97, -122.52);
        record.address = Some("16 Ritter St".into());
        record.city = Some("San Rafael".into());
        record.state = Some("CA".into());
        record.zip = Some("94901".into());
        record.phone = Some("415-555-0100".into());
        record.eligibility = Some("Marin County residents".into());

        let resource = normalize_record(&record).unwrap();
        assert_eq!(resource.id, "211_17");
        assert_eq!(resource.resource_type, ResourceType::Shelter);
        assert_eq!(
            resource.address.as_deref(),
            Some("16 Ritter St, San Rafael, CA 94901")
        );
        assert_eq!(resource.contact_info.as_deref(), Some("415-555-0100"));
        assert_eq!(resource.requirements.as_deref(), Some("Marin County residents"));
        assert!(resource.is_available);
        assert!(!resource.is_donation_point);
        assert!(resource.hours.is_none());
        assert_eq!(resource.source, Source::TwoOneOne);
    }

    #[test]
    fn test_unknown_service_type_uses_name() {
        let record = social_service(18, "Marin Community Food Pantry", "legal", 37.97, -122.52);
        let resource = normalize_record(&record).unwrap();
        assert_eq!(resource.resource_type, ResourceType::Food);
    }

    #[test]
    fn test_closed_and_nameless_records() {
        let mut record = social_service(19, "", "food", 37.97, -122.52);
        record.name = None;
        record.is_closed = Some(true);

        let resource = normalize_record(&record).unwrap();
        assert_eq!(resource.name, "Food resource");
        assert!(!resource.is_available);
        assert!(resource.address.is_none());
    }

    #[test]
    fn test_records_without_coordinates_are_dropped() {
        let mut record = social_service(20, "Somewhere", "food", 0.0, 0.0);
        record.longitude = None;
        let response = SocialServicesResponse {
            results: vec![record, social_service(21, "Here", "food", 1.0, 1.0)],
        };
        let resources = normalize(&response);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id, "211_21");
    }
}
