//! Shared result state for a running application.
//!
//! The store holds the list the user is looking at, which mode they are in
//! and the last error to show. Searches may overlap; each one takes a
//! [`SearchTicket`] before it starts, and only results carrying a ticket newer
//! than the last applied one replace the list.
use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    geo::Coordinate,
    resource::{RankedResource, Resource, ResourcePatch, ResourceType},
};

/// Resources further than this from the viewer are hidden unless the
/// position came from an explicit search.
pub const NEARBY_RADIUS_KM: f64 = 10.0;

/// Whether the user is looking for help or for somewhere to give it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    #[default]
    Need,
    Donate,
}

/// Issued by [`ResourceStore::begin_search`]; later tickets compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
struct StoreState {
    resources: Vec<RankedResource>,
    mode: AppMode,
    error: Option<String>,
    /// Sequence of the newest ticket whose results were applied
    last_applied: u64,
}

#[derive(Debug, Default)]
pub struct ResourceStore {
    state: Mutex<StoreState>,
    next_ticket: AtomicU64,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a ticket for a search that is about to start.
    pub fn begin_search(&self) -> SearchTicket {
        SearchTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Replace the current list with `results` unless a newer search has
    /// already been applied. Returns whether the results were used.
    pub fn apply_results(&self, ticket: SearchTicket, results: Vec<RankedResource>) -> bool {
        let mut state = self.state();
        if ticket.0 <= state.last_applied {
            debug!(
                ticket = ticket.0,
                last_applied = state.last_applied,
                "Discarding results from a superseded search"
            );
            return false;
        }
        debug!(ticket = ticket.0, count = results.len(), "Applying search results");
        state.resources = results;
        state.last_applied = ticket.0;
        true
    }

    pub fn resources(&self) -> Vec<RankedResource> {
        self.state().resources.clone()
    }

    pub fn get(&self, id: &str) -> Option<RankedResource> {
        self.state().resources.iter().find(|r| r.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a user-submitted resource. It skips the search pipeline and so
    /// carries no ranking. Clears any pending error.
    pub fn add_resource(&self, resource: Resource) {
        info!(id = %resource.id, name = %resource.name, "Adding resource");
        let mut state = self.state();
        state.resources.push(RankedResource::unranked(resource));
        state.error = None;
    }

    /// Apply a partial update to the resource with `id`. Returns `false` if
    /// there is no such resource.
    pub fn edit_resource(&self, id: &str, patch: ResourcePatch) -> bool {
        let mut state = self.state();
        match state.resources.iter_mut().find(|r| r.id == id) {
            Some(entry) => {
                entry.resource.apply(patch);
                true
            }
            None => {
                debug!(id, "No resource to edit");
                false
            }
        }
    }

    /// Remove the resource with `id`. Returns whether anything was removed.
    pub fn delete_resource(&self, id: &str) -> bool {
        let mut state = self.state();
        let before = state.resources.len();
        state.resources.retain(|r| r.id != id);
        state.resources.len() < before
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.state().error = Some(message.into());
    }

    pub fn clear_error(&self) {
        self.state().error = None;
    }

    pub fn error(&self) -> Option<String> {
        self.state().error.clone()
    }

    pub fn set_mode(&self, mode: AppMode) {
        self.state().mode = mode;
    }

    pub fn mode(&self) -> AppMode {
        self.state().mode
    }

    /// Resources to show to a viewer at `viewer`.
    ///
    /// In [`AppMode::Need`] only available resources are shown, in
    /// [`AppMode::Donate`] only donation points. `type_filter` narrows to one
    /// type. Unless `searched` is set (the position came from an explicit
    /// search rather than the device) anything further than
    /// [`NEARBY_RADIUS_KM`] is hidden.
    pub fn visible(
        &self,
        viewer: Coordinate,
        type_filter: Option<ResourceType>,
        searched: bool,
    ) -> Vec<RankedResource> {
        let state = self.state();
        state
            .resources
            .iter()
            .filter(|r| match state.mode {
                AppMode::Need => r.is_available,
                AppMode::Donate => r.is_donation_point,
            })
            .filter(|r| type_filter.is_none_or(|wanted| r.resource_type == wanted))
            .filter(|r| searched || viewer.distance_km(&r.coordinate()) < NEARBY_RADIUS_KM)
            .cloned()
            .collect()
    }
}
