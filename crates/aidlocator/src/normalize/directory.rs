//! findhelp-style resource directory organisations.
use aidlocator_providers::{DirectoryOrganization, DirectoryResponse};

use super::{classify, generated_name, text};
use crate::resource::{Resource, Source};

pub fn normalize(response: &DirectoryResponse) -> Vec<Resource> {
    response
        .organizations
        .iter()
        .filter_map(normalize_organization)
        .collect()
}

pub fn normalize_organization(org: &DirectoryOrganization) -> Option<Resource> {
    let (latitude, longitude) = (org.latitude?, org.longitude?);

    let tags: Vec<(&str, &str)> = org
        .category
        .as_deref()
        .map(|category| ("category", category))
        .into_iter()
        .collect();
    let texts: Vec<&str> = [org.name.as_deref(), org.description.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let resource_type = classify(&tags, &texts);

    let id = org.id.as_ref().map_or_else(
        || format!("findhelp_{latitude}_{longitude}"),
        |id| format!("findhelp_{id}"),
    );
    let name = text(org.name.as_deref()).unwrap_or_else(|| generated_name(resource_type));

    let mut resource = Resource::new(
        id,
        name,
        resource_type,
        latitude,
        longitude,
        Source::FindHelp,
    );
    resource.address = text(org.address.as_deref());
    resource.is_available = org.is_accepting_new_clients.unwrap_or(true);
    resource.is_donation_point = org.accepts_donations.unwrap_or(false);
    resource.description = text(org.description.as_deref());
    resource.contact_info = text(org.phone.as_deref());
    resource.requirements = text(org.eligibility_requirements.as_deref());
    resource.hours = text(org.hours_of_operation.as_deref());
    resource.website = text(org.website.as_deref());
    resource.rating = org.rating.filter(|rating| *rating > 0.0);
    Some(resource)
}

#[cfg(test)]
mod tests {
    use aidlocator_providers::test_data::directory_organization;

    use super::*;
    use crate::resource::ResourceType;

    #[test]
    fn test_normalize_organization() {
        let mut org = directory_organization(
            88,
            "St. Vincent de Paul Dining Room",
            "Food Pantry",
            37.9721,
            -122.5262,
        );
        org.address = Some("820 B St, San Rafael, CA 94901".into());
        org.accepts_donations = Some(true);
        org.rating = Some(4.6);
        org.hours_of_operation = Some("Daily 11:30-13:00".into());

        let resource = normalize_organization(&org).unwrap();
        assert_eq!(resource.id, "findhelp_88");
        assert_eq!(resource.resource_type, ResourceType::Food);
        assert_eq!(
            resource.address.as_deref(),
            Some("820 B St, San Rafael, CA 94901")
        );
        assert!(resource.is_available);
        assert!(resource.is_donation_point);
        assert_eq!(resource.rating, Some(4.6));
        assert_eq!(resource.hours.as_deref(), Some("Daily 11:30-13:00"));
        assert_eq!(resource.source, Source::FindHelp);
    }

    #[test]
    fn test_not_accepting_clients_is_unavailable() {
        let mut org = directory_organization(89, "Whistlestop", "Seniors", 37.97, -122.52);
        org.is_accepting_new_clients = Some(false);

        let resource = normalize_organization(&org).unwrap();
        assert!(!resource.is_available);
        assert_eq!(resource.resource_type, ResourceType::Other);
        assert!(resource.address.is_none());
        assert!(resource.rating.is_none());
    }

    #[test]
    fn test_records_without_coordinates_are_dropped() {
        let mut org = directory_organization(90, "Nowhere", "Food", 0.0, 0.0);
        org.latitude = None;
        assert!(
            normalize(&DirectoryResponse {
                organizations: vec![org]
            })
            .is_empty()
        );
    }
}
