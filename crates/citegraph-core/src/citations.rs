//! Document graph
//!
//! Owns document records and the citation forest between them. A document
//! has at most one parent (the document citing it) and any number of
//! children (the documents it cites). Both directions hold ids only and are
//! resolved through the document map, so a removal can never leave a
//! dangling reference behind.
//!
//! Links are not checked for cycles unless the cycle guard is enabled.
//! Traversals stop on a revisited id either way, so a caller-introduced
//! cycle truncates a walk instead of hanging it.

use std::collections::{BTreeMap, HashSet, VecDeque};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{Document, DocumentId, LocationId, Year};

/// Document records and the citation forest
#[derive(Debug, Default)]
pub struct DocumentGraph {
    documents: BTreeMap<DocumentId, Document>,
    cycle_guard: bool,
}

impl DocumentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph that rejects links closing a citation cycle
    pub fn with_cycle_guard(cycle_guard: bool) -> Self {
        Self {
            documents: BTreeMap::new(),
            cycle_guard,
        }
    }

    pub fn cycle_guard(&self) -> bool {
        self.cycle_guard
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Add an unlinked document; fails if the id is taken
    pub fn insert(
        &mut self,
        id: DocumentId,
        name: impl Into<String>,
        year: Year,
        locations: Vec<LocationId>,
    ) -> StoreResult<()> {
        if self.documents.contains_key(&id) {
            return Err(StoreError::DuplicateDocument(id));
        }

        debug!("Inserted document {} ({})", id, year);
        self.documents
            .insert(id, Document::new(id, name, year, locations));
        Ok(())
    }

    /// Remove a document and every citation link touching it
    ///
    /// Documents it cited lose their parent; its own parent stops listing it.
    /// Location lists are not touched here.
    pub fn remove(&mut self, id: DocumentId) -> StoreResult<Document> {
        let document = self
            .documents
            .remove(&id)
            .ok_or(StoreError::UnknownDocument(id))?;

        for other in self.documents.values_mut() {
            if other.parent == Some(id) {
                other.parent = None;
            }
            other.forget_child(id);
        }

        debug!(
            "Removed document {} ({} orphaned children)",
            id,
            document.children.len()
        );
        Ok(document)
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Every document id, in key order
    pub fn ids(&self) -> Vec<DocumentId> {
        self.documents.keys().copied().collect()
    }

    pub fn name(&self, id: DocumentId) -> Option<&str> {
        self.documents.get(&id).map(|d| d.name.as_str())
    }

    pub fn year(&self, id: DocumentId) -> Option<Year> {
        self.documents.get(&id).map(|d| d.year)
    }

    pub fn locations(&self, id: DocumentId) -> Option<&[LocationId]> {
        self.documents.get(&id).map(|d| d.locations.as_slice())
    }

    /// Record that `parent` cites `child`
    ///
    /// A child that already has a parent is moved: the old parent stops
    /// listing it. With the cycle guard on, linking a document under itself
    /// or under one of its own descendants fails.
    pub fn link(&mut self, child: DocumentId, parent: DocumentId) -> StoreResult<()> {
        if !self.documents.contains_key(&child) {
            return Err(StoreError::UnknownDocument(child));
        }
        if !self.documents.contains_key(&parent) {
            return Err(StoreError::UnknownDocument(parent));
        }
        if self.cycle_guard && self.closes_cycle(child, parent) {
            warn!("Rejected citation of {} from {}: cycle", child, parent);
            return Err(StoreError::CitationCycle { child, parent });
        }

        let previous = self
            .documents
            .get_mut(&child)
            .and_then(|d| d.parent.replace(parent));
        if let Some(old) = previous.and_then(|p| self.documents.get_mut(&p)) {
            old.forget_child(child);
        }
        if let Some(doc) = self.documents.get_mut(&parent) {
            doc.children.push(child);
        }

        debug!("Linked {} as cited by {}", child, parent);
        Ok(())
    }

    /// Ids of the documents `id` cites, in link order
    pub fn children(&self, id: DocumentId) -> Option<Vec<DocumentId>> {
        self.documents.get(&id).map(|d| d.children.clone())
    }

    /// The document citing `id`; `None` if there is none or `id` is unknown
    pub fn parent(&self, id: DocumentId) -> Option<DocumentId> {
        self.documents.get(&id).and_then(|d| d.parent)
    }

    /// Parents of `id` from the immediate one up to the root
    ///
    /// Empty when `id` has no parent, `None` when `id` is unknown.
    pub fn ancestors(&self, id: DocumentId) -> Option<Vec<DocumentId>> {
        let start = self.documents.get(&id)?;
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut next = start.parent;

        while let Some(current) = next {
            if !seen.insert(current) {
                warn!("Ancestor walk from {} hit a cycle at {}", id, current);
                break;
            }
            chain.push(current);
            next = self.documents.get(&current).and_then(|d| d.parent);
        }
        Some(chain)
    }

    /// Closest document appearing in the ancestor chains of both `a` and `b`
    ///
    /// Neither document counts as its own ancestor, so for a direct
    /// parent/child pair the answer is the parent's parent.
    pub fn nearest_common_ancestor(&self, a: DocumentId, b: DocumentId) -> Option<DocumentId> {
        let first = self.ancestors(a)?;
        let second: HashSet<DocumentId> = self.ancestors(b)?.into_iter().collect();
        first.into_iter().find(|id| second.contains(id))
    }

    /// Every document cited by `id`, directly or transitively
    ///
    /// Breadth-first from the direct citations, each id once.
    pub fn all_references(&self, id: DocumentId) -> Option<Vec<DocumentId>> {
        let start = self.documents.get(&id)?;
        let mut seen = HashSet::from([id]);
        let mut queue: VecDeque<DocumentId> = start.children.iter().copied().collect();
        let mut found = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            found.push(current);
            if let Some(doc) = self.documents.get(&current) {
                queue.extend(doc.children.iter().copied());
            }
        }
        Some(found)
    }

    pub(crate) fn attach_location(&mut self, id: DocumentId, location: LocationId) -> bool {
        match self.documents.get_mut(&id) {
            Some(document) => {
                document.locations.push(location);
                true
            }
            None => false,
        }
    }

    /// Drop `location` from every document's list
    pub(crate) fn purge_location(&mut self, location: &str) -> usize {
        self.documents
            .values_mut()
            .map(|d| d.forget_location(location))
            .sum()
    }

    fn closes_cycle(&self, child: DocumentId, parent: DocumentId) -> bool {
        child == parent
            || self
                .ancestors(parent)
                .is_some_and(|chain| chain.contains(&child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: u64) -> DocumentId {
        DocumentId(id)
    }

    fn docs(list: &[u64]) -> Vec<DocumentId> {
        list.iter().copied().map(DocumentId).collect()
    }

    /// 1 cites 2, 2 cites 3
    fn chain() -> DocumentGraph {
        let mut graph = DocumentGraph::new();
        graph.insert(doc(1), "A", 2000, Vec::new()).unwrap();
        graph.insert(doc(2), "B", 2010, Vec::new()).unwrap();
        graph.insert(doc(3), "C", 2020, Vec::new()).unwrap();
        graph.link(doc(2), doc(1)).unwrap();
        graph.link(doc(3), doc(2)).unwrap();
        graph
    }

    #[test]
    fn test_insert_duplicate_fails() {
        let mut graph = chain();
        let err = graph.insert(doc(2), "Other", 1990, Vec::new()).unwrap_err();
        assert_eq!(err, StoreError::DuplicateDocument(doc(2)));
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.name(doc(2)), Some("B"));
        assert_eq!(graph.year(doc(2)), Some(2010));
        assert_eq!(graph.children(doc(2)), Some(docs(&[3])));
    }

    #[test]
    fn test_lookups() {
        let graph = chain();
        assert_eq!(graph.ids(), docs(&[1, 2, 3]));
        assert_eq!(graph.name(doc(3)), Some("C"));
        assert_eq!(graph.year(doc(1)), Some(2000));
        assert!(graph.name(doc(9)).is_none());
        assert!(graph.year(doc(9)).is_none());
        assert!(graph.locations(doc(9)).is_none());
    }

    #[test]
    fn test_ancestor_chain() {
        let graph = chain();
        assert_eq!(graph.ancestors(doc(3)), Some(docs(&[2, 1])));
        assert_eq!(graph.ancestors(doc(1)), Some(Vec::new()));
        assert_eq!(graph.ancestors(doc(9)), None);
        assert_eq!(graph.parent(doc(1)), None);
        assert_eq!(graph.parent(doc(3)), Some(doc(2)));
    }

    #[test]
    fn test_link_unknown_fails() {
        let mut graph = chain();
        assert_eq!(
            graph.link(doc(9), doc(1)),
            Err(StoreError::UnknownDocument(doc(9)))
        );
        assert_eq!(
            graph.link(doc(1), doc(9)),
            Err(StoreError::UnknownDocument(doc(9)))
        );
        assert_eq!(graph.children(doc(1)), Some(docs(&[2])));
    }

    #[test]
    fn test_children_in_link_order() {
        let mut graph = chain();
        graph.insert(doc(4), "D", 2021, Vec::new()).unwrap();
        graph.insert(doc(5), "E", 2022, Vec::new()).unwrap();
        graph.link(doc(5), doc(1)).unwrap();
        graph.link(doc(4), doc(1)).unwrap();
        assert_eq!(graph.children(doc(1)), Some(docs(&[2, 5, 4])));
        assert_eq!(graph.children(doc(3)), Some(Vec::new()));
        assert_eq!(graph.children(doc(9)), None);
    }

    #[test]
    fn test_relink_moves_child() {
        let mut graph = chain();
        graph.link(doc(3), doc(1)).unwrap();
        assert_eq!(graph.parent(doc(3)), Some(doc(1)));
        assert_eq!(graph.children(doc(2)), Some(Vec::new()));
        assert_eq!(graph.children(doc(1)), Some(docs(&[2, 3])));

        // Linking to the same parent again does not duplicate the entry
        graph.link(doc(3), doc(1)).unwrap();
        assert_eq!(graph.children(doc(1)), Some(docs(&[2, 3])));
    }

    #[test]
    fn test_nearest_common_ancestor() {
        let mut graph = chain();
        graph.insert(doc(4), "D", 2021, Vec::new()).unwrap();
        graph.insert(doc(5), "E", 2022, Vec::new()).unwrap();
        graph.insert(doc(6), "F", 2023, Vec::new()).unwrap();
        graph.link(doc(4), doc(2)).unwrap();
        graph.link(doc(5), doc(1)).unwrap();

        assert_eq!(graph.nearest_common_ancestor(doc(3), doc(4)), Some(doc(2)));
        assert_eq!(graph.nearest_common_ancestor(doc(3), doc(5)), Some(doc(1)));
        assert_eq!(graph.nearest_common_ancestor(doc(5), doc(3)), Some(doc(1)));

        // Parent/child pair: the parent is not its own ancestor
        assert_eq!(graph.nearest_common_ancestor(doc(3), doc(2)), Some(doc(1)));
        assert_eq!(graph.nearest_common_ancestor(doc(2), doc(3)), Some(doc(1)));

        assert_eq!(graph.nearest_common_ancestor(doc(1), doc(3)), None);
        assert_eq!(graph.nearest_common_ancestor(doc(6), doc(3)), None);
        assert_eq!(graph.nearest_common_ancestor(doc(9), doc(3)), None);
        assert_eq!(graph.nearest_common_ancestor(doc(3), doc(9)), None);
    }

    #[test]
    fn test_remove_severs_both_directions() {
        let mut graph = chain();
        let removed = graph.remove(doc(2)).unwrap();
        assert_eq!(removed.children, docs(&[3]));

        assert_eq!(graph.parent(doc(3)), None);
        assert_eq!(graph.children(doc(1)), Some(Vec::new()));
        assert_eq!(graph.ancestors(doc(3)), Some(Vec::new()));
        assert!(!graph.contains(doc(2)));
        assert_eq!(graph.remove(doc(2)), Err(StoreError::UnknownDocument(doc(2))));
    }

    #[test]
    fn test_all_references() {
        let mut graph = chain();
        graph.insert(doc(4), "D", 2021, Vec::new()).unwrap();
        graph.link(doc(4), doc(1)).unwrap();

        assert_eq!(graph.all_references(doc(1)), Some(docs(&[2, 4, 3])));
        assert_eq!(graph.all_references(doc(3)), Some(Vec::new()));
        assert_eq!(graph.all_references(doc(9)), None);
    }

    #[test]
    fn test_cycle_guard_rejects_cycles() {
        let mut graph = DocumentGraph::with_cycle_guard(true);
        for id in 1..=3 {
            graph.insert(doc(id), "X", 2000, Vec::new()).unwrap();
        }
        graph.link(doc(2), doc(1)).unwrap();
        graph.link(doc(3), doc(2)).unwrap();

        assert_eq!(
            graph.link(doc(1), doc(3)),
            Err(StoreError::CitationCycle {
                child: doc(1),
                parent: doc(3)
            })
        );
        assert!(graph.link(doc(1), doc(1)).is_err());
        assert_eq!(graph.parent(doc(1)), None);
        assert_eq!(graph.children(doc(3)), Some(Vec::new()));
    }

    #[test]
    fn test_walks_terminate_on_unguarded_cycle() {
        let mut graph = chain();
        assert!(!graph.cycle_guard());
        graph.link(doc(1), doc(3)).unwrap();

        assert_eq!(graph.ancestors(doc(3)), Some(docs(&[2, 1])));
        assert_eq!(graph.all_references(doc(1)), Some(docs(&[2, 3])));
    }
}
