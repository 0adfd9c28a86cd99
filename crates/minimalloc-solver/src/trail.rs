// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::{section::SectionState, subproblem::SubItem};
use minimalloc_core::math::interval::Interval;
use minimalloc_model::Offset;

/// A compact record of a single placement applied to the sectional state.
///
/// The item index and offset are sufficient to undo the placement: the
/// item's active sections and size determine exactly which ranges were
/// reserved.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) struct PlacementEntry {
    pub item: usize,
    pub offset: Offset,
}

impl std::fmt::Display for PlacementEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlacementEntry(item: {}, offset: {})", self.item, self.offset)
    }
}

/// A linear undo log of placements for chronological backtracking.
///
/// One entry corresponds to one decision level, so the trail depth always
/// equals the number of currently placed items. The testable contract:
/// after `apply` followed by `retract`, the sectional state equals its
/// state before the `apply` — interval lists included, not just
/// semantically.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlacementTrail {
    entries: Vec<PlacementEntry>,
}

impl PlacementTrail {
    /// Creates a new, empty trail.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a trail preallocated for the given number of items.
    #[inline]
    pub fn preallocated(num_items: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_items),
        }
    }

    /// Returns the number of placements currently recorded.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no placements are recorded.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all recorded placements in application order.
    #[inline]
    pub fn entries(&self) -> &[PlacementEntry] {
        &self.entries
    }

    /// Applies a placement: reserves `[offset, offset + size)` in every
    /// section the item is active in and records the entry.
    pub fn apply(
        &mut self,
        state: &mut SectionState,
        items: &[SubItem],
        item: usize,
        offset: Offset,
    ) {
        debug_assert!(
            item < items.len(),
            "called `PlacementTrail::apply` with item index out of bounds: the len is {} but the index is {}",
            items.len(),
            item
        );

        let placed = &items[item];
        let range = Interval::new_unchecked(offset, offset + placed.size);
        for run in &placed.active {
            for section in run.lower()..run.upper() {
                state.reserve(section, range);
            }
        }

        self.entries.push(PlacementEntry { item, offset });
    }

    /// Undoes the most recent placement and returns its entry, or `None`
    /// if the trail is empty.
    pub fn retract(&mut self, state: &mut SectionState, items: &[SubItem]) -> Option<PlacementEntry> {
        let entry = self.entries.pop()?;

        let placed = &items[entry.item];
        let range = Interval::new_unchecked(entry.offset, entry.offset + placed.size);
        for run in &placed.active {
            for section in run.lower()..run.upper() {
                state.release(section, range);
            }
        }

        Some(entry)
    }

    /// Undoes every recorded placement, oldest last.
    pub fn unwind(&mut self, state: &mut SectionState, items: &[SubItem]) {
        while self.retract(state, items).is_some() {}
    }

    /// Forgets all entries without touching the sectional state.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Display for PlacementTrail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlacementTrail(depth: {})", self.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimalloc_model::index::BufferIndex;

    fn item(size: i64, active: &[(usize, usize)]) -> SubItem {
        SubItem {
            buffer: BufferIndex::new(0),
            size,
            alignment: 1,
            fixed: None,
            area: 0,
            active: active
                .iter()
                .map(|&(lo, hi)| Interval::new(lo, hi))
                .collect(),
            conflicts: Vec::new(),
        }
    }

    #[test]
    fn test_apply_reserves_all_active_sections() {
        let items = vec![item(4, &[(0, 2), (3, 4)])];
        let mut state = SectionState::new(4, 16);
        let mut trail = PlacementTrail::new();

        trail.apply(&mut state, &items, 0, 8);

        let reserved = Interval::new(8, 12);
        for section in [0, 1, 3] {
            assert!(
                !state
                    .free_intervals(section)
                    .iter()
                    .any(|iv| iv.overlaps(reserved)),
                "section {} still offers the reserved range",
                section
            );
        }
        // Section 2 is untouched.
        assert_eq!(state.free_intervals(2), &[Interval::new(0, 16)]);
    }

    #[test]
    fn test_retract_restores_state_exactly() {
        let items = vec![item(4, &[(0, 3)]), item(2, &[(1, 2)])];
        let mut state = SectionState::new(3, 16);
        let pristine = state.clone();
        let mut trail = PlacementTrail::new();

        trail.apply(&mut state, &items, 0, 0);
        let after_first = state.clone();

        trail.apply(&mut state, &items, 1, 4);
        assert_eq!(trail.depth(), 2);

        let entry = trail.retract(&mut state, &items).unwrap();
        assert_eq!(entry, PlacementEntry { item: 1, offset: 4 });
        assert_eq!(state, after_first);

        trail.retract(&mut state, &items).unwrap();
        assert_eq!(state, pristine);
        assert!(trail.is_empty());
        assert!(trail.retract(&mut state, &items).is_none());
    }

    #[test]
    fn test_unwind_clears_everything() {
        let items = vec![item(1, &[(0, 1)]), item(2, &[(0, 1)]), item(3, &[(0, 1)])];
        let mut state = SectionState::new(1, 16);
        let pristine = state.clone();
        let mut trail = PlacementTrail::new();

        trail.apply(&mut state, &items, 0, 0);
        trail.apply(&mut state, &items, 1, 4);
        trail.apply(&mut state, &items, 2, 8);

        trail.unwind(&mut state, &items);
        assert_eq!(state, pristine);
        assert!(trail.is_empty());
    }
}
