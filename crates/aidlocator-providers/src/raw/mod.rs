//! Raw provider payloads.
//!
//! These types mirror the JSON each provider returns closely enough to read
//! the fields the pipeline needs. Every field that a provider may omit is
//! optional, and numeric fields accept both JSON numbers and numeric strings,
//! so a record that merely lacks data never fails the whole payload.
use std::fmt;

use serde::{Deserialize, Serialize};

mod directory;
mod nominatim;
mod overpass;
mod social_services;

pub use directory::{DirectoryOrganization, DirectoryResponse};
pub use nominatim::{NominatimAddress, NominatimPlace, ReversePlace, view_box};
pub use overpass::{AmenityQuery, LatLon, OverpassElement, OverpassResponse};
pub use social_services::{SocialServiceRecord, SocialServicesResponse};

/// Identifier as sent by a provider: some use integers, some strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Trimmed, non-empty view of an optional string field.
pub(crate) fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Deserializers that tolerate the loosely typed fields providers send.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Number or numeric string; anything else becomes `None`.
    pub(crate) fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .and_then(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
            .filter(|f| f.is_finite()))
    }

    /// Boolean, `"true"`/`"yes"`/`"1"` style strings, or 0/1.
    pub(crate) fn bool_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::Bool(b) => Some(b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }))
    }

    /// String, or a number rendered as a string (phone numbers, postcodes).
    pub(crate) fn string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }))
    }
}
