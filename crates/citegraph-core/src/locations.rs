//! Location store
//!
//! Owns location records keyed by id and keeps two cached orderings of them:
//! by name, and by distance from the origin. Every mutation that can change
//! an ordering marks the matching view stale; reads rebuild on demand.
//!
//! Cross-references to documents are stored here but maintained by
//! [`crate::Store`], which updates both sides together.

use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::{Coord, DocumentId, Location, LocationId};
use crate::views::{CachedView, SortedView, ViewState};

/// Location records and their sorted views
#[derive(Debug, Default)]
pub struct LocationStore {
    locations: BTreeMap<LocationId, Location>,
    by_name: CachedView<LocationId>,
    by_distance: CachedView<LocationId>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Location> {
        self.locations.get(id)
    }

    /// Add a location; fails if the id is taken
    pub fn insert(
        &mut self,
        id: impl Into<LocationId>,
        name: impl Into<String>,
        coord: Coord,
    ) -> StoreResult<()> {
        let location = Location::new(id, name, coord);
        if self.locations.contains_key(&location.id) {
            return Err(StoreError::DuplicateLocation(location.id));
        }

        debug!("Inserted location {} at {}", location.id, location.coord);
        self.locations.insert(location.id.clone(), location);
        self.invalidate(&SortedView::ALL);
        Ok(())
    }

    /// Remove a location, returning its record
    ///
    /// Documents that reference it are not touched here.
    pub fn remove(&mut self, id: &str) -> StoreResult<Location> {
        let location = self
            .locations
            .remove(id)
            .ok_or_else(|| StoreError::UnknownLocation(id.into()))?;

        debug!("Removed location {}", id);
        self.invalidate(&SortedView::ALL);
        Ok(location)
    }

    pub fn clear(&mut self) {
        self.locations.clear();
        self.invalidate(&SortedView::ALL);
    }

    pub fn name(&self, id: &str) -> Option<&str> {
        self.locations.get(id).map(|l| l.name.as_str())
    }

    pub fn coord(&self, id: &str) -> Option<Coord> {
        self.locations.get(id).map(|l| l.coord)
    }

    /// Move a location
    pub fn set_coord(&mut self, id: &str, coord: Coord) -> StoreResult<()> {
        let location = self
            .locations
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownLocation(id.into()))?;
        location.coord = coord;

        debug!("Moved location {} to {}", id, coord);
        self.invalidate(&[SortedView::ByDistance]);
        Ok(())
    }

    /// Change a location's display name
    pub fn rename(&mut self, id: &str, name: impl Into<String>) -> StoreResult<()> {
        let location = self
            .locations
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownLocation(id.into()))?;
        location.name = name.into();

        debug!("Renamed location {} to {:?}", id, location.name);
        self.invalidate(&[SortedView::ByName]);
        Ok(())
    }

    /// Every location id, in key order
    pub fn ids(&self) -> Vec<LocationId> {
        self.locations.keys().cloned().collect()
    }

    /// First location (in key order) placed exactly at `coord`
    pub fn find_by_coord(&self, coord: Coord) -> Option<LocationId> {
        self.locations
            .values()
            .find(|l| l.coord == coord)
            .map(|l| l.id.clone())
    }

    /// Ids ordered by name; equal names keep key order
    pub fn sorted_by_name(&self) -> Vec<LocationId> {
        self.by_name.get_or_rebuild(|| {
            debug!("Rebuilding name view over {} locations", self.locations.len());
            let mut entries: Vec<&Location> = self.locations.values().collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            entries.into_iter().map(|l| l.id.clone()).collect()
        })
    }

    /// Ids ordered by distance from (0,0), ties broken by ascending y
    pub fn sorted_by_distance(&self) -> Vec<LocationId> {
        self.by_distance.get_or_rebuild(|| {
            debug!(
                "Rebuilding distance view over {} locations",
                self.locations.len()
            );
            self.ordered_from(Coord::default())
                .map(|l| l.id.clone())
                .collect()
        })
    }

    /// Up to `k` ids ordered by distance from `point`, ties broken by ascending y
    ///
    /// When the store holds fewer than `k` locations, all of them are returned.
    pub fn nearest(&self, point: Coord, k: usize) -> Vec<LocationId> {
        self.ordered_from(point)
            .take(k)
            .map(|l| l.id.clone())
            .collect()
    }

    pub fn view_state(&self, view: SortedView) -> ViewState {
        match view {
            SortedView::ByName => self.by_name.state(),
            SortedView::ByDistance => self.by_distance.state(),
        }
    }

    pub(crate) fn attach_document(&mut self, id: &str, document: DocumentId) -> bool {
        match self.locations.get_mut(id) {
            Some(location) => {
                location.documents.push(document);
                true
            }
            None => false,
        }
    }

    /// Drop `document` from every location's list
    pub(crate) fn purge_document(&mut self, document: DocumentId) -> usize {
        self.locations
            .values_mut()
            .map(|l| l.forget_document(document))
            .sum()
    }

    fn ordered_from(&self, point: Coord) -> impl Iterator<Item = &Location> {
        let mut entries: Vec<&Location> = self.locations.values().collect();
        entries.sort_by_key(|l| (l.coord.distance_squared(&point), l.coord.y));
        entries.into_iter()
    }

    fn invalidate(&mut self, views: &[SortedView]) {
        for view in views {
            match view {
                SortedView::ByName => self.by_name.invalidate(),
                SortedView::ByDistance => self.by_distance.invalidate(),
            }
        }
    }
}
