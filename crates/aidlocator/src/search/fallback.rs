//! Last-resort results shown when no provider returns anything usable.
use super::SearchCategory;
use crate::resource::{Resource, ResourceType, Source};

struct DemoEntry {
    id: &'static str,
    name: &'static str,
    resource_type: ResourceType,
    address: &'static str,
    /// Degrees added to the query latitude and longitude
    offset: (f64, f64),
    description: &'static str,
    contact_info: &'static str,
    hours: &'static str,
    requirements: &'static str,
    is_donation_point: bool,
    rating: f64,
}

const DEMO_ENTRIES: [DemoEntry; 5] = [
    DemoEntry {
        id: "demo-1",
        name: "Community Food Bank",
        resource_type: ResourceType::Food,
        address: "123 Main Street, Your City",
        offset: (0.002, 0.003),
        description: "Provides fresh and non-perishable food items. Serves hot meals daily from 11am-2pm.",
        contact_info: "Phone: (555) 123-4567\nEmail: help@communityfoodbank.org",
        hours: "Mon-Fri: 9am-5pm, Sat: 10am-2pm",
        requirements: "Photo ID required. Open to all residents in need.",
        is_donation_point: false,
        rating: 4.5,
    },
    DemoEntry {
        id: "demo-2",
        name: "Emergency Shelter Services",
        resource_type: ResourceType::Shelter,
        address: "456 Oak Avenue, Your City",
        offset: (-0.003, 0.001),
        description: "Temporary emergency housing for individuals and families. Case management services available.",
        contact_info: "Phone: (555) 987-6543\n24/7 Hotline: (555) SHELTER",
        hours: "24/7 - Call ahead for availability",
        requirements: "No requirements for emergency shelter. Longer-term housing requires intake appointment.",
        is_donation_point: true,
        rating: 4.2,
    },
    DemoEntry {
        id: "demo-3",
        name: "Community Health Clinic",
        resource_type: ResourceType::Medical,
        address: "789 Elm Street, Your City",
        offset: (0.004, -0.002),
        description: "Free and low-cost medical care. Services include primary care, dental, and mental health.",
        contact_info: "Phone: (555) 456-7890\nAppointments: (555) 456-7891",
        hours: "Mon-Thu: 8am-6pm, Fri: 8am-5pm, Sat: 9am-1pm",
        requirements: "Sliding scale fees based on income. No insurance required.",
        is_donation_point: false,
        rating: 4.7,
    },
    DemoEntry {
        id: "demo-4",
        name: "Job Training Center",
        resource_type: ResourceType::Other,
        address: "321 Pine Street, Your City",
        offset: (-0.001, -0.004),
        description: "Free job training programs, resume help, and employment placement services.",
        contact_info: "Phone: (555) 234-5678\nEmail: careers@jobcenter.org",
        hours: "Mon-Fri: 8am-5pm",
        requirements: "Must be 18+ and eligible to work. Some programs have additional requirements.",
        is_donation_point: false,
        rating: 4.3,
    },
    DemoEntry {
        id: "demo-5",
        name: "Clothing Closet",
        resource_type: ResourceType::Clothing,
        address: "654 Maple Drive, Your City",
        offset: (0.001, 0.004),
        description: "Free clothing for all ages. Special focus on work attire and school uniforms.",
        contact_info: "Phone: (555) 345-6789",
        hours: "Tue, Thu: 10am-4pm, Sat: 9am-1pm",
        requirements: "Limit 10 items per person per month.",
        is_donation_point: true,
        rating: 4.1,
    },
];

impl DemoEntry {
    fn to_resource(&self, latitude: f64, longitude: f64) -> Resource {
        let mut resource = Resource::new(
            self.id,
            self.name,
            self.resource_type,
            latitude + self.offset.0,
            longitude + self.offset.1,
            Source::Mock,
        );
        resource.address = Some(self.address.to_string());
        resource.description = Some(self.description.to_string());
        resource.contact_info = Some(self.contact_info.to_string());
        resource.hours = Some(self.hours.to_string());
        resource.requirements = Some(self.requirements.to_string());
        resource.is_donation_point = self.is_donation_point;
        resource.rating = Some(self.rating);
        resource
    }
}

/// Demonstration resources placed a few hundred metres around the query
/// point, narrowed to `category`. Never empty: a category with no demo entry
/// gets the whole set.
pub fn demo_resources(latitude: f64, longitude: f64, category: SearchCategory) -> Vec<Resource> {
    let matching: Vec<Resource> = DEMO_ENTRIES
        .iter()
        .filter(|entry| category.matches(entry.resource_type))
        .map(|entry| entry.to_resource(latitude, longitude))
        .collect();
    if matching.is_empty() {
        DEMO_ENTRIES
            .iter()
            .map(|entry| entry.to_resource(latitude, longitude))
            .collect()
    } else {
        matching
    }
}

/// The single record returned when every provider call failed. It sits at the
/// query point and points the user at phone services instead.
pub fn outage_notice(latitude: f64, longitude: f64) -> Resource {
    let mut notice = Resource::new(
        "error_msg",
        "Emergency: Call 211 or 911",
        ResourceType::Emergency,
        latitude,
        longitude,
        Source::System,
    );
    notice.address = Some("Service temporarily unavailable".to_string());
    notice.description = Some(
        "Our mapping service is experiencing issues. For immediate help, call 211 \
         (community resources) or 911 (emergencies)."
            .to_string(),
    );
    notice.contact_info = Some("211 or 911".to_string());
    notice.requirements = Some("None - free service".to_string());
    notice.hours = Some("24/7 available by phone".to_string());
    notice
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAT: f64 = 37.9735;
    const LON: f64 = -122.5311;

    #[test]
    fn test_full_demo_set() {
        let demo = demo_resources(LAT, LON, SearchCategory::All);
        assert_eq!(demo.len(), 5);
        assert!(demo.iter().all(|r| r.source == Source::Mock));
        assert!(demo.iter().all(|r| r.is_available));
        assert!(demo.iter().all(|r| r.distance_from(LAT, LON) < 1.0));
        assert_eq!(
            demo.iter().filter(|r| r.is_donation_point).count(),
            2,
            "shelter and clothing closet take donations"
        );
    }

    #[test]
    fn test_demo_set_is_deterministic() {
        assert_eq!(
            demo_resources(LAT, LON, SearchCategory::All),
            demo_resources(LAT, LON, SearchCategory::All)
        );
    }

    #[test]
    fn test_category_filter() {
        let shelters = demo_resources(LAT, LON, ResourceType::Shelter.into());
        assert_eq!(shelters.len(), 1);
        assert_eq!(shelters[0].id, "demo-2");
        assert_eq!(
            shelters[0].hours.as_deref(),
            Some("24/7 - Call ahead for availability")
        );
    }

    #[test]
    fn test_category_without_demo_entry_gets_everything() {
        let water = demo_resources(LAT, LON, ResourceType::Water.into());
        assert_eq!(water.len(), 5);
    }

    #[test]
    fn test_outage_notice() {
        let notice = outage_notice(LAT, LON);
        assert_eq!(notice.id, "error_msg");
        assert_eq!(notice.source, Source::System);
        assert_eq!(notice.resource_type, ResourceType::Emergency);
        assert!(notice.is_available);
        assert!(!notice.is_donation_point);
        assert!((notice.latitude - LAT).abs() < f64::EPSILON);
        assert_eq!(notice.contact_info.as_deref(), Some("211 or 911"));
        assert!(notice.description.unwrap().contains("call 211"));
    }
}
