//! Data models for citegraph
//!
//! Defines the core records: Location, Document and the identifier and
//! coordinate types they are keyed and positioned by.
//! Cross-references between records are stored as identifiers only and are
//! resolved through the owning store.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// Publication year of a document
pub type Year = u16;

/// Identifier of a location (opaque string key)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationId(pub String);

impl LocationId {
    /// Create a new location id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LocationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LocationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for LocationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for LocationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for LocationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Identifier of a document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(pub u64);

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for DocumentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A point on the integer plane
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Create a coordinate
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point
    ///
    /// Computed in `i64` so that ordering by it is exact and matches
    /// ordering by the real distance for every pair of `i32` coordinates.
    pub fn distance_squared(&self, other: &Coord) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Coord) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A named, positioned location (affiliation)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    /// Unique identifier
    pub id: LocationId,
    /// Display name
    pub name: String,
    /// Position on the plane
    pub coord: Coord,
    /// Associated documents, in association order (may repeat)
    pub documents: Vec<DocumentId>,
}

impl Location {
    /// Create a location with no associated documents
    pub fn new(id: impl Into<LocationId>, name: impl Into<String>, coord: Coord) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coord,
            documents: Vec::new(),
        }
    }

    /// Remove every association with a document, returning how many were dropped
    pub fn forget_document(&mut self, id: DocumentId) -> usize {
        let before = self.documents.len();
        self.documents.retain(|d| *d != id);
        before - self.documents.len()
    }
}

/// A named, dated document (publication)
///
/// `parent` is the document citing this one; `children` are the documents
/// this one cites, in the order the citations were added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier
    pub id: DocumentId,
    /// Display name
    pub name: String,
    /// Publication year
    pub year: Year,
    /// Associated locations, in association order (may repeat)
    pub locations: Vec<LocationId>,
    /// Documents cited by this one
    pub children: Vec<DocumentId>,
    /// Document citing this one
    pub parent: Option<DocumentId>,
}

impl Document {
    /// Create an unlinked document
    pub fn new(
        id: impl Into<DocumentId>,
        name: impl Into<String>,
        year: Year,
        locations: Vec<LocationId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            year,
            locations,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Remove every association with a location, returning how many were dropped
    pub fn forget_location(&mut self, id: &str) -> usize {
        let before = self.locations.len();
        self.locations.retain(|l| l.as_str() != id);
        before - self.locations.len()
    }

    /// Drop a child from the citation list
    pub fn forget_child(&mut self, id: DocumentId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != id);
        before != self.children.len()
    }
}
