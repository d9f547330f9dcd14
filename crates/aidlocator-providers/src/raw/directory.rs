//! findhelp-style resource directory payloads.
use serde::{Deserialize, Serialize};

use super::{RawId, lenient};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryResponse {
    #[serde(default)]
    pub organizations: Vec<DirectoryOrganization>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryOrganization {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form category label, e.g. `Food Pantry` or `Housing`
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub is_accepting_new_clients: Option<bool>,
    #[serde(default, deserialize_with = "lenient::bool_opt")]
    pub accepts_donations: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    pub phone: Option<String>,
    #[serde(default)]
    pub eligibility_requirements: Option<String>,
    #[serde(default)]
    pub hours_of_operation: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub rating: Option<f64>,
}
