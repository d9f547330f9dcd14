//! OpenStreetMap Overpass queries and response elements.
use std::collections::HashMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::non_empty;

/// Which family of OpenStreetMap tags an amenity search should match.
///
/// Most variants combine several tag alternatives into one union query so a
/// single round trip covers every way the same kind of place is mapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AmenityQuery {
    /// Social facilities, community centres and food banks
    SocialFacility,
    /// Clinics, doctors and community health centres
    Healthcare,
    /// Charity and second-hand shops
    Thrift,
    /// Drinking water, water points, fountains and public toilets
    PublicWater,
    /// Emergency features, fire stations and police
    Emergency,
    /// Soup kitchens and community dining mapped as restaurants
    SoupKitchen,
    /// A single `amenity=<value>` tag
    Tag(String),
}

impl AmenityQuery {
    pub fn tag(value: impl Into<String>) -> Self {
        Self::Tag(value.into())
    }

    /// Short token naming the query, used in ids, logs and labels.
    pub fn token(&self) -> &str {
        match self {
            Self::SocialFacility => "social_facility",
            Self::Healthcare => "clinic",
            Self::Thrift => "shop",
            Self::PublicWater => "amenity",
            Self::Emergency => "emergency",
            Self::SoupKitchen => "restaurant",
            Self::Tag(value) => value,
        }
    }

    fn selectors(&self) -> Vec<String> {
        let fixed: &[&str] = match self {
            Self::SocialFacility => &[
                r#"node["amenity"="social_facility"]"#,
                r#"node["amenity"="community_centre"]"#,
                r#"node["social_facility"]"#,
                r#"node["amenity"="food_bank"]"#,
                r#"node["social_facility:for"~"homeless|poor|unemployed|senior|child"]"#,
                r#"way["amenity"="social_facility"]"#,
                r#"way["social_facility"]"#,
                r#"way["amenity"="food_bank"]"#,
                r#"way["amenity"="community_centre"]"#,
                r#"relation["amenity"="social_facility"]"#,
            ],
            Self::Healthcare => &[
                r#"node["amenity"="clinic"]"#,
                r#"node["amenity"="hospital"]"#,
                r#"node["amenity"="pharmacy"]"#,
                r#"node["amenity"="doctors"]"#,
                r#"node["healthcare"="clinic"]"#,
                r#"node["healthcare"="community_health_centre"]"#,
                r#"node["healthcare"="centre"]"#,
                r#"way["amenity"="clinic"]"#,
                r#"way["healthcare"="clinic"]"#,
                r#"way["amenity"="hospital"]"#,
                r#"relation["amenity"="clinic"]"#,
            ],
            Self::Thrift => &[
                r#"node["shop"="charity"]"#,
                r#"node["shop"="second_hand"]"#,
                r#"node["shop"="clothes"]["second_hand"="yes"]"#,
                r#"node["operator"~"salvation|goodwill|thrift",i]"#,
                r#"way["shop"="charity"]"#,
                r#"way["shop"="second_hand"]"#,
                r#"relation["shop"="charity"]"#,
            ],
            Self::PublicWater => &[
                r#"node["amenity"="drinking_water"]"#,
                r#"node["amenity"="water_point"]"#,
                r#"node["amenity"="fountain"]"#,
                r#"node["amenity"="toilets"]"#,
                r#"node["amenity"="public_bath"]"#,
                r#"way["amenity"="drinking_water"]"#,
                r#"way["amenity"="water_point"]"#,
                r#"relation["amenity"="drinking_water"]"#,
            ],
            Self::Emergency => &[
                r#"node["emergency"]"#,
                r#"node["amenity"="fire_station"]"#,
                r#"node["amenity"="police"]"#,
                r#"node["emergency"="emergency_ward_entrance"]"#,
                r#"way["emergency"]"#,
                r#"way["amenity"="fire_station"]"#,
                r#"relation["emergency"]"#,
            ],
            Self::SoupKitchen => &[
                r#"node["amenity"="restaurant"]["cuisine"="soup_kitchen"]"#,
                r#"node["amenity"="restaurant"]["name"~"soup|kitchen|community|free",i]"#,
                r#"node["amenity"="fast_food"]["name"~"soup|kitchen|community|free",i]"#,
                r#"way["amenity"="restaurant"]["cuisine"="soup_kitchen"]"#,
                r#"relation["amenity"="restaurant"]["cuisine"="soup_kitchen"]"#,
            ],
            Self::Tag(value) => {
                let value = escape_ql(value);
                return ["node", "way", "relation"]
                    .iter()
                    .map(|kind| format!(r#"{kind}["amenity"="{value}"]"#))
                    .collect();
            }
        };
        fixed.iter().map(|s| (*s).to_string()).collect()
    }

    /// Overpass QL union of every selector around the point.
    pub fn to_overpass_ql(
        &self,
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        timeout_secs: u64,
    ) -> String {
        let around = format!("(around:{radius_m},{latitude},{longitude});");
        let body = self
            .selectors()
            .iter()
            .map(|selector| format!("  {selector}{around}"))
            .join("\n");
        format!("[out:json][timeout:{timeout_secs}];\n(\n{body}\n);\nout geom;")
    }
}

/// Escape a value for use inside a double-quoted Overpass string.
fn escape_ql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverpassElement {
    /// `node`, `way` or `relation`
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<LatLon>,
    #[serde(default)]
    pub geometry: Vec<LatLon>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassElement {
    /// Node coordinates, else the way/relation centre, else its first vertex.
    pub fn position(&self) -> Option<LatLon> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(LatLon { lat, lon }),
            _ => self.center.or_else(|| self.geometry.first().copied()),
        }
    }

    /// Tag value, ignoring blank values.
    pub fn tag(&self, key: &str) -> Option<&str> {
        non_empty(self.tags.get(key))
    }

    /// First present tag out of `keys`.
    pub fn first_tag(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.tag(key))
    }
}
