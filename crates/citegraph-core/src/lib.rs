//! citegraph Core Library
//!
//! This crate provides an in-memory store for locations (affiliations) and
//! documents (publications), the associations between them, and the citation
//! forest linking documents to the documents they cite.
//!
//! # Architecture
//!
//! - **Location store**: records keyed by string id, with lazily rebuilt
//!   name and distance orderings
//! - **Document graph**: records keyed by numeric id, single-parent citation
//!   links stored as ids in both directions
//! - **Store**: owns both and keeps location/document cross-references
//!   consistent
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::new();
//!
//! store.insert_location("tuni", "Tampere University", Coord::new(3, 4))?;
//! store.insert_document(DocumentId(1), "Survey", 2000, vec!["tuni".into()])?;
//! store.insert_document(DocumentId(2), "Follow-up", 2010, Vec::new())?;
//! store.link(DocumentId(2), DocumentId(1))?;
//!
//! let chain = store.ancestor_chain(DocumentId(2));
//! ```
//!
//! # Modules
//!
//! - `store`: Unified store interface (main entry point)
//! - `models`: Records, ids and coordinates
//! - `locations`: Location records and sorted views
//! - `citations`: Document records and the citation forest
//! - `views`: Cached orderings and their freshness
//! - `sentinel`: Reserved values for reporting misses
//! - `config`: Store configuration

pub mod citations;
pub mod config;
pub mod error;
pub mod locations;
pub mod models;
pub mod sentinel;
pub mod store;
pub mod views;

pub use citations::DocumentGraph;
pub use config::Config;
pub use error::{StoreError, StoreResult};
pub use locations::LocationStore;
pub use models::{Coord, Document, DocumentId, Location, LocationId, Year};
pub use sentinel::OrSentinel;
pub use store::Store;
pub use views::{SortedView, ViewState};
