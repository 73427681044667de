//! Store error handling
//!
//! Misses on reads are reported as `None`; these errors cover the mutating
//! operations, which either apply completely or leave the store unchanged.

use thiserror::Error;

use crate::models::{DocumentId, LocationId};

/// Errors that can occur during store mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A location with this id already exists
    #[error("Location '{0}' already exists")]
    DuplicateLocation(LocationId),

    /// A document with this id already exists
    #[error("Document {0} already exists")]
    DuplicateDocument(DocumentId),

    /// No location with this id
    #[error("Location not found: '{0}'")]
    UnknownLocation(LocationId),

    /// No document with this id
    #[error("Document not found: {0}")]
    UnknownDocument(DocumentId),

    /// Linking would make a document its own ancestor
    #[error("Citing {child} from {parent} would create a citation cycle")]
    CitationCycle { child: DocumentId, parent: DocumentId },
}

impl StoreError {
    /// Check if this error reports a missing key
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::UnknownLocation(_) | StoreError::UnknownDocument(_)
        )
    }

    /// Check if this error reports an insert over an existing key
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateLocation(_) | StoreError::DuplicateDocument(_)
        )
    }
}

/// Result type for store mutations
pub type StoreResult<T> = Result<T, StoreError>;
