//! Resource discovery: provider fan-out, merging, ranking and fallbacks.
//!
//! The pipeline for one search is
//! cache check, category fan-out, normalise, merge, broad fallback,
//! static fallback or outage notice, rank. Only merged real data is cached.

use std::{fmt, str::FromStr};

pub use error::SearchError;
mod fallback;
mod merge;
mod plan;
mod rank;
mod search_orchestration;

use error::Result;
pub use fallback::{demo_resources, outage_notice};
pub use merge::{dedupe, dedupe_and_sort, sort_by_distance};
pub use plan::{ProviderCall, broad_plan, category_plan};
pub use rank::{RelevanceRanker, ai_suggestion, is_currently_open, relevance_score};
pub(crate) use search_orchestration::{SearchContext, search_inner};

use crate::resource::ResourceType;

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum SearchError {
        #[error("Unknown resource category: {0:?}")]
        UnknownCategory(String),
    }
    pub type Result<T> = std::result::Result<T, SearchError>;
}

/// What a search is looking for: one resource type or everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchCategory {
    #[default]
    All,
    Type(ResourceType),
}

impl SearchCategory {
    /// Parse a category name; `all` is the wildcard and `healthcare` means medical.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<ResourceType>()
            .map(Self::Type)
            .map_err(|_| SearchError::UnknownCategory(value.to_string()))
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Type(resource_type) => resource_type.as_str(),
        }
    }

    /// Whether a resource of `resource_type` belongs in this category.
    pub fn matches(self, resource_type: ResourceType) -> bool {
        match self {
            Self::All => true,
            Self::Type(wanted) => wanted == resource_type,
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchCategory {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<ResourceType> for SearchCategory {
    fn from(resource_type: ResourceType) -> Self {
        Self::Type(resource_type)
    }
}
