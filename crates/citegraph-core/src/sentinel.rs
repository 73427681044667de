//! Reserved "not found" values
//!
//! Store queries report a miss as `None`. A command layer that prints results
//! needs a concrete value it can tell apart from real data; these constants
//! lie outside the domain of ids, names, years and coordinates the store
//! hands out, and [`OrSentinel`] maps a query result onto them.

use crate::models::{Coord, DocumentId, LocationId, Year};

/// Location id reported when no location matches
pub const NO_LOCATION: &str = "---";

/// Document id reported when no document matches (or there is no parent)
pub const NO_DOCUMENT: DocumentId = DocumentId(u64::MAX);

/// Name reported for a missing record
pub const NO_NAME: &str = "!NO_NAME!";

/// Year reported for a missing document
pub const NO_YEAR: Year = Year::MAX;

/// Coordinate reported for a missing location
pub const NO_COORD: Coord = Coord::new(i32::MIN, i32::MIN);

/// Collapse an optional query result into its displayable form
pub trait OrSentinel {
    type Output;

    /// The value itself, or the reserved sentinel when absent
    fn or_sentinel(self) -> Self::Output;
}

impl OrSentinel for Option<DocumentId> {
    type Output = DocumentId;

    fn or_sentinel(self) -> DocumentId {
        self.unwrap_or(NO_DOCUMENT)
    }
}

impl OrSentinel for Option<LocationId> {
    type Output = LocationId;

    fn or_sentinel(self) -> LocationId {
        self.unwrap_or_else(|| LocationId::from(NO_LOCATION))
    }
}

impl OrSentinel for Option<Year> {
    type Output = Year;

    fn or_sentinel(self) -> Year {
        self.unwrap_or(NO_YEAR)
    }
}

impl OrSentinel for Option<Coord> {
    type Output = Coord;

    fn or_sentinel(self) -> Coord {
        self.unwrap_or(NO_COORD)
    }
}

impl<'a> OrSentinel for Option<&'a str> {
    type Output = &'a str;

    fn or_sentinel(self) -> &'a str {
        self.unwrap_or(NO_NAME)
    }
}

/// Id lists become a one-element list holding the sentinel
impl OrSentinel for Option<Vec<DocumentId>> {
    type Output = Vec<DocumentId>;

    fn or_sentinel(self) -> Vec<DocumentId> {
        self.unwrap_or_else(|| vec![NO_DOCUMENT])
    }
}

impl OrSentinel for Option<Vec<LocationId>> {
    type Output = Vec<LocationId>;

    fn or_sentinel(self) -> Vec<LocationId> {
        self.unwrap_or_else(|| vec![LocationId::from(NO_LOCATION)])
    }
}

impl OrSentinel for Option<Vec<(Year, DocumentId)>> {
    type Output = Vec<(Year, DocumentId)>;

    fn or_sentinel(self) -> Vec<(Year, DocumentId)> {
        self.unwrap_or_else(|| vec![(NO_YEAR, NO_DOCUMENT)])
    }
}
