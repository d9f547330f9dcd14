//! OpenStreetMap Nominatim search and reverse-geocoding payloads.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{RawId, lenient, non_empty};

/// One candidate from `/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NominatimPlace {
    #[serde(default)]
    pub place_id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub lon: Option<f64>,
    /// OSM key of the main tag, e.g. `amenity`
    #[serde(default, rename = "class")]
    pub class: Option<String>,
    /// OSM value of the main tag, e.g. `food_bank`
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub importance: Option<f64>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    #[serde(default)]
    pub extratags: Option<HashMap<String, String>>,
}

impl NominatimPlace {
    /// Explicit name, else the first segment of the display name.
    pub fn short_name(&self) -> Option<&str> {
        non_empty(self.name.as_ref()).or_else(|| {
            self.display_name
                .as_deref()
                .and_then(|display| display.split(',').next())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
    }

    pub fn extratag(&self, key: &str) -> Option<&str> {
        self.extratags
            .as_ref()
            .and_then(|tags| non_empty(tags.get(key)))
    }
}

/// Structured address returned with `addressdetails=1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NominatimAddress {
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub house_number: Option<String>,
    #[serde(default)]
    pub road: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub suburb: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub town: Option<String>,
    #[serde(default)]
    pub village: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub postcode: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Response of `/reverse`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReversePlace {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
    /// Set by Nominatim when nothing is found at the point
    #[serde(default)]
    pub error: Option<String>,
}

/// `viewbox` parameter (`left,top,right,bottom`) around a point.
pub fn view_box(latitude: f64, longitude: f64, offset: f64) -> String {
    format!(
        "{},{},{},{}",
        longitude - offset,
        latitude + offset,
        longitude + offset,
        latitude - offset
    )
}
