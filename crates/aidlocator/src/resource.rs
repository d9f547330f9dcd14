//! The canonical resource record every provider is normalised into.
use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, distance_km};

/// Category of an aid resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Food,
    Shelter,
    Medical,
    Clothing,
    Water,
    Emergency,
    Other,
}

impl ResourceType {
    pub const ALL: [Self; 7] = [
        Self::Food,
        Self::Shelter,
        Self::Medical,
        Self::Clothing,
        Self::Water,
        Self::Emergency,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Shelter => "shelter",
            Self::Medical => "medical",
            Self::Clothing => "clothing",
            Self::Water => "water",
            Self::Emergency => "emergency",
            Self::Other => "other",
        }
    }

    /// Shelters and medical care get a ranking boost.
    pub const fn is_priority(self) -> bool {
        matches!(self, Self::Shelter | Self::Medical)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "food" => Ok(Self::Food),
            "shelter" => Ok(Self::Shelter),
            "medical" | "healthcare" => Ok(Self::Medical),
            "clothing" => Ok(Self::Clothing),
            "water" => Ok(Self::Water),
            "emergency" => Ok(Self::Emergency),
            "other" => Ok(Self::Other),
            other => Err(other.to_string()),
        }
    }
}

/// Where a resource came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "openstreetmap")]
    OpenStreetMap,
    #[serde(rename = "nominatim")]
    Nominatim,
    #[serde(rename = "findhelp")]
    FindHelp,
    #[serde(rename = "211")]
    TwoOneOne,
    /// Demonstration data shown when providers find nothing
    #[serde(rename = "mock")]
    Mock,
    /// Synthetic records describing the state of the service itself
    #[serde(rename = "system")]
    System,
}

impl Source {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenStreetMap => "openstreetmap",
            Self::Nominatim => "nominatim",
            Self::FindHelp => "findhelp",
            Self::TwoOneOne => "211",
            Self::Mock => "mock",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An aid location or donation point.
///
/// Optional text fields stay `None` when a provider does not supply them;
/// they are never replaced by empty strings. A `None` address means the
/// location has not been reverse geocoded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Provider-prefixed, unique within one result set
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_available: bool,
    pub is_donation_point: bool,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub requirements: Option<String>,
    pub hours: Option<String>,
    pub website: Option<String>,
    /// Average review score out of 5, when the provider has one
    pub rating: Option<f64>,
    pub source: Source,
}

impl Resource {
    /// A resource with only the required fields set; it accepts seekers and
    /// takes no donations until told otherwise.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_type: ResourceType,
        latitude: f64,
        longitude: f64,
        source: Source,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type,
            address: None,
            latitude,
            longitude,
            is_available: true,
            is_donation_point: false,
            description: None,
            contact_info: None,
            requirements: None,
            hours: None,
            website: None,
            rating: None,
            source,
        }
    }

    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    pub fn distance_from(&self, latitude: f64, longitude: f64) -> f64 {
        distance_km(latitude, longitude, self.latitude, self.longitude)
    }

    /// Apply the fields set in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: ResourcePatch) {
        let ResourcePatch {
            name,
            resource_type,
            address,
            is_available,
            is_donation_point,
            description,
            contact_info,
            requirements,
            hours,
            website,
        } = patch;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(resource_type) = resource_type {
            self.resource_type = resource_type;
        }
        if let Some(is_available) = is_available {
            self.is_available = is_available;
        }
        if let Some(is_donation_point) = is_donation_point {
            self.is_donation_point = is_donation_point;
        }
        for (slot, value) in [
            (&mut self.address, address),
            (&mut self.description, description),
            (&mut self.contact_info, contact_info),
            (&mut self.requirements, requirements),
            (&mut self.hours, hours),
            (&mut self.website, website),
        ] {
            if value.is_some() {
                *slot = value;
            }
        }
    }
}

/// Partial update for a stored resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
    pub address: Option<String>,
    pub is_available: Option<bool>,
    pub is_donation_point: Option<bool>,
    pub description: Option<String>,
    pub contact_info: Option<String>,
    pub requirements: Option<String>,
    pub hours: Option<String>,
    pub website: Option<String>,
}

/// A resource annotated by the relevance ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResource {
    #[serde(flatten)]
    pub resource: Resource,
    /// Kilometres from the query point
    pub distance: f64,
    pub relevance_score: f64,
    pub is_recommended: bool,
    pub is_top_recommendation: bool,
    pub ai_suggestion: String,
}

impl RankedResource {
    /// Wrap a resource that has not been through the ranker, such as one a
    /// user just submitted. It carries no score and no recommendation.
    pub fn unranked(resource: Resource) -> Self {
        Self {
            resource,
            distance: 0.0,
            relevance_score: 0.0,
            is_recommended: false,
            is_top_recommendation: false,
            ai_suggestion: String::new(),
        }
    }

    pub fn into_resource(self) -> Resource {
        self.resource
    }
}

impl Deref for RankedResource {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}
