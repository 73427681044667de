//! Unified store interface
//!
//! The `Store` owns both record stores and keeps the cross-references
//! between them consistent:
//! - [`LocationStore`]: locations and their cached sorted views
//! - [`DocumentGraph`]: documents and the citation forest
//!
//! ## Cross-references
//!
//! A location lists the documents associated with it and a document lists
//! its locations. Every operation that changes one side changes the other in
//! the same call, so a location appears in a document's list exactly when
//! the document appears in the location's list.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Applies config file and env overrides
//!
//! store.insert_location("tuni", "Tampere University", Coord::new(3, 4))?;
//! store.insert_document(DocumentId(1), "Paper", 2020, vec!["tuni".into()])?;
//!
//! let ids = store.locations_by_name();
//! ```

use anyhow::{Context, Result};
use tracing::debug;

use crate::citations::DocumentGraph;
use crate::config::Config;
use crate::error::{StoreError, StoreResult};
use crate::locations::LocationStore;
use crate::models::{Coord, DocumentId, LocationId, Year};

/// Locations, documents and the links between them
#[derive(Debug, Default)]
pub struct Store {
    locations: LocationStore,
    documents: DocumentGraph,
    config: Config,
}

impl Store {
    /// Create an empty store with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store using the configuration file and environment
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::with_config(config))
    }

    /// Create an empty store with a specific configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            locations: LocationStore::new(),
            documents: DocumentGraph::with_cycle_guard(config.cycle_guard),
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read access to the location records
    pub fn locations(&self) -> &LocationStore {
        &self.locations
    }

    /// Read access to the document records
    pub fn documents(&self) -> &DocumentGraph {
        &self.documents
    }

    /// Remove every location and document
    pub fn clear_all(&mut self) {
        self.locations.clear();
        self.documents.clear();
        debug!("Cleared store");
    }

    // ==================== Location Operations ====================

    /// Add a location
    pub fn insert_location(
        &mut self,
        id: impl Into<LocationId>,
        name: impl Into<String>,
        coord: Coord,
    ) -> StoreResult<()> {
        self.locations.insert(id, name, coord)
    }

    /// Remove a location and every document's association with it
    pub fn remove_location(&mut self, id: &str) -> StoreResult<()> {
        self.locations.remove(id)?;
        let purged = self.documents.purge_location(id);
        debug!("Purged location {} from {} document entries", id, purged);
        Ok(())
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn all_locations(&self) -> Vec<LocationId> {
        self.locations.ids()
    }

    pub fn location_name(&self, id: &str) -> Option<&str> {
        self.locations.name(id)
    }

    pub fn location_coord(&self, id: &str) -> Option<Coord> {
        self.locations.coord(id)
    }

    pub fn set_location_coord(&mut self, id: &str, coord: Coord) -> StoreResult<()> {
        self.locations.set_coord(id, coord)
    }

    pub fn rename_location(&mut self, id: &str, name: impl Into<String>) -> StoreResult<()> {
        self.locations.rename(id, name)
    }

    pub fn find_location_at(&self, coord: Coord) -> Option<LocationId> {
        self.locations.find_by_coord(coord)
    }

    /// Location ids in name order (cached)
    pub fn locations_by_name(&self) -> Vec<LocationId> {
        self.locations.sorted_by_name()
    }

    /// Location ids in order of distance from the origin (cached)
    pub fn locations_by_distance(&self) -> Vec<LocationId> {
        self.locations.sorted_by_distance()
    }

    /// Up to `k` location ids closest to `point`
    pub fn nearest_locations(&self, point: Coord, k: usize) -> Vec<LocationId> {
        self.locations.nearest(point, k)
    }

    /// The configured number of location ids closest to `point`
    pub fn closest_locations(&self, point: Coord) -> Vec<LocationId> {
        self.nearest_locations(point, self.config.nearest_count)
    }

    // ==================== Document Operations ====================

    /// Add a document associated with the given locations
    ///
    /// Each listed location also records the document. Fails without
    /// changing anything if the id is taken or a location is unknown.
    pub fn insert_document(
        &mut self,
        id: DocumentId,
        name: impl Into<String>,
        year: Year,
        locations: Vec<LocationId>,
    ) -> StoreResult<()> {
        if self.documents.contains(id) {
            return Err(StoreError::DuplicateDocument(id));
        }
        if let Some(missing) = locations.iter().find(|l| !self.locations.contains(l.as_str())) {
            return Err(StoreError::UnknownLocation(missing.clone()));
        }

        for location in &locations {
            self.locations.attach_document(location.as_str(), id);
        }
        self.documents.insert(id, name, year, locations)
    }

    /// Remove a document, its citation links and its location associations
    pub fn remove_document(&mut self, id: DocumentId) -> StoreResult<()> {
        self.documents.remove(id)?;
        let purged = self.locations.purge_document(id);
        debug!("Purged document {} from {} location entries", id, purged);
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn all_documents(&self) -> Vec<DocumentId> {
        self.documents.ids()
    }

    pub fn document_name(&self, id: DocumentId) -> Option<&str> {
        self.documents.name(id)
    }

    pub fn document_year(&self, id: DocumentId) -> Option<Year> {
        self.documents.year(id)
    }

    // ==================== Citation Operations ====================

    /// Record that `parent` cites `child`
    pub fn link(&mut self, child: DocumentId, parent: DocumentId) -> StoreResult<()> {
        self.documents.link(child, parent)
    }

    pub fn direct_children(&self, id: DocumentId) -> Option<Vec<DocumentId>> {
        self.documents.children(id)
    }

    pub fn parent_of(&self, id: DocumentId) -> Option<DocumentId> {
        self.documents.parent(id)
    }

    pub fn ancestor_chain(&self, id: DocumentId) -> Option<Vec<DocumentId>> {
        self.documents.ancestors(id)
    }

    pub fn nearest_common_ancestor(&self, a: DocumentId, b: DocumentId) -> Option<DocumentId> {
        self.documents.nearest_common_ancestor(a, b)
    }

    pub fn all_references(&self, id: DocumentId) -> Option<Vec<DocumentId>> {
        self.documents.all_references(id)
    }

    // ==================== Cross-References ====================

    /// Associate a location with a document, on both sides
    pub fn associate(&mut self, location: &str, document: DocumentId) -> StoreResult<()> {
        if !self.locations.contains(location) {
            return Err(StoreError::UnknownLocation(location.into()));
        }
        if !self.documents.contains(document) {
            return Err(StoreError::UnknownDocument(document));
        }

        self.locations.attach_document(location, document);
        self.documents
            .attach_location(document, LocationId::from(location));
        debug!("Associated location {} with document {}", location, document);
        Ok(())
    }

    pub fn locations_of(&self, document: DocumentId) -> Option<Vec<LocationId>> {
        self.documents.locations(document).map(<[LocationId]>::to_vec)
    }

    pub fn documents_of(&self, location: &str) -> Option<Vec<DocumentId>> {
        self.locations.get(location).map(|l| l.documents.clone())
    }

    /// Documents of a location published in or after `year`
    ///
    /// Returned as `(year, id)` pairs ordered by year, then id. A document
    /// associated more than once is listed once.
    pub fn documents_after(&self, location: &str, year: Year) -> Option<Vec<(Year, DocumentId)>> {
        let location = self.locations.get(location)?;
        let mut found: Vec<(Year, DocumentId)> = location
            .documents
            .iter()
            .filter_map(|&id| self.documents.year(id).map(|y| (y, id)))
            .filter(|&(y, _)| y >= year)
            .collect();
        found.sort_unstable();
        found.dedup();
        Some(found)
    }
}
