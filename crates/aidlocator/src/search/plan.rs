//! Which provider calls to make for each category, in priority order.
//!
//! Order matters: when two providers return the same place, the one queried
//! first is kept. Amenity searches come first since OpenStreetMap tags are
//! the most reliable, then free-text searches, then the credentialed
//! directories.
use aidlocator_providers::{AmenityQuery, ProviderKind};

use super::SearchCategory;
use crate::resource::ResourceType;

/// Generic community-services phrases tried when a category search finds nothing.
const BROAD_PHRASES: [&str; 3] = [
    "community services social services",
    "nonprofit charity organization",
    "public services government assistance",
];

/// One call in a search plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    /// Overpass amenity search
    Amenity(AmenityQuery),
    /// Nominatim free-text search
    Text(&'static str),
    /// Social-services directory lookup by service type
    SocialServices(&'static str),
    /// Resource directory lookup by category
    Directory(&'static str),
}

impl ProviderCall {
    pub const fn provider(&self) -> ProviderKind {
        match self {
            Self::Amenity(_) => ProviderKind::Overpass,
            Self::Text(_) => ProviderKind::Nominatim,
            Self::SocialServices(_) => ProviderKind::SocialServices,
            Self::Directory(_) => ProviderKind::ResourceDirectory,
        }
    }

    /// Token or phrase identifying the call in logs.
    pub fn label(&self) -> &str {
        match self {
            Self::Amenity(query) => query.token(),
            Self::Text(phrase) => phrase,
            Self::SocialServices(token) | Self::Directory(token) => token,
        }
    }
}

/// The fixed, ordered calls for a category.
pub fn category_plan(category: SearchCategory) -> Vec<ProviderCall> {
    use ProviderCall::{Amenity, Directory, SocialServices, Text};

    match category {
        SearchCategory::Type(ResourceType::Food) => vec![
            Amenity(AmenityQuery::tag("food_bank")),
            Amenity(AmenityQuery::SocialFacility),
            Amenity(AmenityQuery::SoupKitchen),
            Text("food bank pantry soup kitchen community kitchen"),
            Text("salvation army food distribution"),
            Text("church food program community meals"),
            SocialServices("food"),
            Directory("food"),
        ],
        SearchCategory::Type(ResourceType::Shelter) => vec![
            Amenity(AmenityQuery::SocialFacility),
            Text("homeless shelter emergency housing salvation army ymca"),
            SocialServices("housing"),
            Directory("housing"),
        ],
        SearchCategory::Type(ResourceType::Medical) => vec![
            Amenity(AmenityQuery::Healthcare),
            Amenity(AmenityQuery::tag("hospital")),
            Amenity(AmenityQuery::tag("pharmacy")),
            Text("community health center free clinic public health"),
            Text("medical clinic urgent care family health"),
            Text("dental clinic mental health counseling"),
            SocialServices("healthcare"),
            Directory("health"),
        ],
        SearchCategory::Type(ResourceType::Clothing) => vec![
            Amenity(AmenityQuery::SocialFacility),
            Amenity(AmenityQuery::Thrift),
            Text("clothing bank thrift store charity shop"),
            Text("salvation army goodwill clothing donation"),
            Text("clothing closet community closet"),
            SocialServices("clothing"),
            Directory("clothing"),
        ],
        SearchCategory::Type(ResourceType::Water) => vec![
            Amenity(AmenityQuery::PublicWater),
            Text("water fountain drinking water public water"),
            Text("water distribution emergency water"),
            Text("community center water access"),
        ],
        SearchCategory::Type(ResourceType::Emergency) => vec![
            Amenity(AmenityQuery::tag("hospital")),
            Amenity(AmenityQuery::Emergency),
            Text("emergency room hospital urgent care emergency department"),
            SocialServices("emergency"),
            Directory("emergency"),
        ],
        SearchCategory::All | SearchCategory::Type(ResourceType::Other) => vec![
            Amenity(AmenityQuery::SocialFacility),
            Text("community services emergency hospital food shelter"),
        ],
    }
}

/// Uncategorised free-text searches for the broad fallback.
pub fn broad_plan() -> Vec<ProviderCall> {
    BROAD_PHRASES.into_iter().map(ProviderCall::Text).collect()
}
