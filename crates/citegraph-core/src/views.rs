//! Lazily rebuilt sorted views
//!
//! A view holds a computed id ordering until a mutation marks it stale; the
//! next read rebuilds it. Reads take `&self`, invalidation takes `&mut self`,
//! so a view cannot be rebuilt and invalidated at the same time.

use std::cell::OnceCell;

/// Freshness of a cached view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Holds the ordering for the current contents
    Fresh,
    /// Must be rebuilt before its next read
    Stale,
}

/// The sorted views kept by the location store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortedView {
    /// Ascending by name
    ByName,
    /// Ascending by distance from the origin, then by y
    ByDistance,
}

impl SortedView {
    pub const ALL: [SortedView; 2] = [SortedView::ByName, SortedView::ByDistance];
}

/// One cached ordering
#[derive(Debug, Clone)]
pub struct CachedView<T> {
    cell: OnceCell<Vec<T>>,
}

impl<T> Default for CachedView<T> {
    fn default() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }
}

impl<T: Clone> CachedView<T> {
    pub fn state(&self) -> ViewState {
        if self.cell.get().is_some() {
            ViewState::Fresh
        } else {
            ViewState::Stale
        }
    }

    /// Return the cached ordering, building it first if stale
    pub fn get_or_rebuild(&self, rebuild: impl FnOnce() -> Vec<T>) -> Vec<T> {
        self.cell.get_or_init(rebuild).clone()
    }

    pub fn invalidate(&mut self) {
        self.cell.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_rebuilds_only_when_stale() {
        let builds = Cell::new(0);
        let mut view = CachedView::<i32>::default();
        assert_eq!(view.state(), ViewState::Stale);

        let build = || {
            builds.set(builds.get() + 1);
            vec![1, 2, 3]
        };
        assert_eq!(view.get_or_rebuild(build), vec![1, 2, 3]);
        assert_eq!(view.get_or_rebuild(build), vec![1, 2, 3]);
        assert_eq!(builds.get(), 1);
        assert_eq!(view.state(), ViewState::Fresh);

        view.invalidate();
        assert_eq!(view.state(), ViewState::Stale);
        assert_eq!(view.get_or_rebuild(|| vec![4]), vec![4]);
    }
}
