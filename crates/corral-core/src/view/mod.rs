//! The derived-view pipeline: filter, then stable sort, then group.
//!
//! Everything in this module is a pure function of
//! `(records, filter state, sort state, context)`. Callers recompute the
//! view whenever any input changes; identical inputs always yield identical
//! output, so any memoization layered on top is safe.

pub mod filter;
pub mod group;
pub mod sort;

pub use filter::{filter, CountFilter, FilterContext, FilterState};
pub use group::{compute_analytics, group_by_status, Analytics, StatusColumn};
pub use sort::{sort_records, SortKey, SortOrder, SortState};

use crate::model::record::Record;

/// One-shot projection: filter the snapshot, then stable-sort the survivors.
///
/// The input slice is never mutated or reordered; the result is a fresh,
/// owned view.
#[must_use]
pub fn derive_view(
    records: &[Record],
    filter_state: &FilterState,
    sort_state: &SortState,
    ctx: &FilterContext,
) -> Vec<Record> {
    let mut view = filter(records, filter_state, ctx);
    sort_records(&mut view, sort_state.key, sort_state.order);
    view
}
