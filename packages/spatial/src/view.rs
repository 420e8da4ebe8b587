//! Explicit state container for the area-scoped complaint view.
//!
//! Holds the complaint collection and the selected area, and derives the
//! filtered collection on demand. The derived value is memoized on the
//! identity of its two inputs: replacing either `Arc` invalidates it,
//! anything else reuses the cached result.

use std::sync::Arc;

use crate::{AreaFeature, Geolocated, filter_complaints_by_area};

struct Memo<T> {
    complaints: Arc<[T]>,
    area: Option<Arc<AreaFeature>>,
    filtered: Arc<[T]>,
}

impl<T> Memo<T> {
    fn matches(&self, complaints: &Arc<[T]>, area: Option<&Arc<AreaFeature>>) -> bool {
        Arc::ptr_eq(&self.complaints, complaints)
            && match (&self.area, area) {
                (None, None) => true,
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                _ => false,
            }
    }
}

/// Complaint collection plus the user's selected area.
///
/// Consumers hold this by reference and read [`ComplaintView::filtered`];
/// there is no ambient shared state.
pub struct ComplaintView<T> {
    complaints: Arc<[T]>,
    area: Option<Arc<AreaFeature>>,
    memo: Option<Memo<T>>,
    evaluations: u64,
}

impl<T: Geolocated + Clone> ComplaintView<T> {
    /// Creates a view over `complaints` with no area selected.
    #[must_use]
    pub fn new(complaints: impl Into<Arc<[T]>>) -> Self {
        Self {
            complaints: complaints.into(),
            area: None,
            memo: None,
            evaluations: 0,
        }
    }

    /// Replaces the complaint collection.
    pub fn set_complaints(&mut self, complaints: impl Into<Arc<[T]>>) {
        self.complaints = complaints.into();
    }

    /// Selects an area, or clears the selection with `None`.
    pub fn select_area(&mut self, area: Option<Arc<AreaFeature>>) {
        self.area = area;
    }

    /// Clears the selected area.
    pub fn clear_area(&mut self) {
        self.area = None;
    }

    /// The full, unfiltered collection.
    #[must_use]
    pub fn complaints(&self) -> &Arc<[T]> {
        &self.complaints
    }

    /// The selected area, if any.
    #[must_use]
    pub fn selected_area(&self) -> Option<&Arc<AreaFeature>> {
        self.area.as_ref()
    }

    /// How many times the filter has actually run.
    #[must_use]
    pub const fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Complaints inside the selected area, or all of them when no area is
    /// selected.
    ///
    /// Recomputed only if the collection or area was replaced since the last
    /// call. With no area selected the returned `Arc` is the collection
    /// itself.
    pub fn filtered(&mut self) -> Arc<[T]> {
        if let Some(memo) = &self.memo
            && memo.matches(&self.complaints, self.area.as_ref())
        {
            return Arc::clone(&memo.filtered);
        }

        let filtered: Arc<[T]> = match &self.area {
            None => Arc::clone(&self.complaints),
            Some(area) => {
                filter_complaints_by_area(&self.complaints, Some(area.as_ref())).into()
            }
        };
        self.evaluations += 1;

        self.memo = Some(Memo {
            complaints: Arc::clone(&self.complaints),
            area: self.area.clone(),
            filtered: Arc::clone(&filtered),
        });

        filtered
    }
}
