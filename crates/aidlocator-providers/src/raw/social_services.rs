//! 211-style social-services directory payloads.
use serde::{Deserialize, Serialize};

use super::{RawId, lenient};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialServicesResponse {
    #[serde(default)]
    pub results: Vec<SocialServiceRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialServiceRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    /// `food`, `housing`, `healthcare`, `clothing`, `emergency`, ...
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub zip: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub phone: Option<String>,
    #[serde(default)]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub hours: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    /// Explicit closure flag, when the directory reports one
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub is_closed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_records() {
        let json = r#"{"results": [
            {"id": 17, "name": "Ritter Center", "service_type": "housing",
             "address": "16 Ritter St", "city": "San Rafael", "state": "CA", "zip": 94901,
             "latitude": "37.9700", "longitude": "-122.5200", "phone": "415-555-0100"},
            {"id": "a-2"}
        ]}"#;
        let response: SocialServicesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 2);

        let first = &response.results[0];
        assert_eq!(first.zip.as_deref(), Some("94901"));
        assert_eq!(first.latitude, Some(37.97));
        assert_eq!(first.service_type.as_deref(), Some("housing"));

        let second = &response.results[1];
        assert_eq!(second.id, Some(RawId::Text("a-2".into())));
        assert!(second.name.is_none());
        assert!(second.latitude.is_none());
    }

    #[test]
    fn test_missing_results_is_empty() {
        let response: SocialServicesResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results.is_empty());
    }
}
