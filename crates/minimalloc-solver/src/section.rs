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

//! The sectional free-space state.
//!
//! For every compressed time section the state tracks the still-unassigned
//! address ranges as a sorted, disjoint, non-adjacent list of half-open
//! intervals over `[0, capacity)`. Placing a buffer carves its address
//! range out of every section it is active in; retracting a placement
//! re-inserts the range with coalescing, which restores the previous list
//! exactly. The state therefore shrinks monotonically along a search path
//! and is restored interval-for-interval on backtracking.

use minimalloc_core::math::interval::Interval;
use minimalloc_model::{Capacity, Offset};

/// A free-space interval on the memory axis.
pub(crate) type FreeRange = Interval<Offset>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SectionState {
    free: Vec<Vec<FreeRange>>,
    capacity: Capacity,
}

impl SectionState {
    /// Creates the initial state: every section is entirely free.
    pub fn new(num_sections: usize, capacity: Capacity) -> Self {
        let whole = FreeRange::new_unchecked(0, capacity.max(0));
        Self {
            free: vec![vec![whole]; num_sections],
            capacity,
        }
    }

    /// Returns the number of sections.
    #[inline]
    pub fn num_sections(&self) -> usize {
        self.free.len()
    }

    /// Returns the free intervals of one section, ascending and disjoint.
    #[inline]
    pub fn free_intervals(&self, section: usize) -> &[FreeRange] {
        debug_assert!(
            section < self.num_sections(),
            "called `SectionState::free_intervals` with section index out of bounds: the len is {} but the index is {}",
            self.num_sections(),
            section
        );

        &self.free[section]
    }

    /// Removes `range` from one section's free list.
    ///
    /// # Panics
    ///
    /// In debug builds, panics unless `range` lies entirely inside a
    /// single free interval (which holds for every candidate offset the
    /// search tries).
    pub fn reserve(&mut self, section: usize, range: FreeRange) {
        let list = &mut self.free[section];
        let position = list.partition_point(|iv| iv.upper() <= range.lower());

        debug_assert!(
            position < list.len() && list[position].contains_interval(range),
            "called `SectionState::reserve` with range {} not contained in a free interval",
            range
        );

        let parts = list[position].difference(range);
        match parts.len() {
            0 => {
                list.remove(position);
            }
            1 => {
                list[position] = parts[0];
            }
            _ => {
                list[position] = parts[0];
                list.insert(position + 1, parts[1]);
            }
        }
    }

    /// Re-inserts a range previously removed with `reserve`, merging with
    /// touching neighbors so the list stays non-adjacent.
    pub fn release(&mut self, section: usize, range: FreeRange) {
        let list = &mut self.free[section];
        let position = list.partition_point(|iv| iv.upper() < range.lower());

        let mut lower = range.lower();
        let mut upper = range.upper();

        if position < list.len() && list[position].upper() == range.lower() {
            lower = list[position].lower();
            list.remove(position);
        }
        if position < list.len() && list[position].lower() == range.upper() {
            upper = list[position].upper();
            list.remove(position);
        }

        debug_assert!(
            position >= list.len() || range.upper() <= list[position].lower(),
            "called `SectionState::release` with range {} overlapping free space",
            range
        );

        list.insert(position, FreeRange::new_unchecked(lower, upper));
    }

    /// Computes the feasible start offsets for a buffer of `size` active
    /// in the given section runs: the intersection, across all touched
    /// sections, of the per-section windows `[f.lower, f.upper - size]`
    /// contributed by each free interval `f` large enough to hold the
    /// buffer.
    ///
    /// The result is a sorted, disjoint list of half-open windows; every
    /// offset inside any window (alignment aside) is a valid placement.
    /// Returns an empty list as soon as any touched section rules all
    /// offsets out.
    pub fn feasible_windows(&self, active: &[Interval<usize>], size: i64) -> Vec<FreeRange> {
        let mut result: Option<Vec<FreeRange>> = None;
        let mut scratch = Vec::new();

        for run in active {
            for section in run.lower()..run.upper() {
                scratch.clear();
                start_windows(&self.free[section], size, &mut scratch);

                result = Some(match result.take() {
                    None => scratch.clone(),
                    Some(current) => intersect_sorted(&current, &scratch),
                });

                if result.as_ref().is_some_and(Vec::is_empty) {
                    return Vec::new();
                }
            }
        }

        result.unwrap_or_default()
    }
}

impl std::fmt::Display for SectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SectionState(num_sections: {}, capacity: {})",
            self.num_sections(),
            self.capacity
        )
    }
}

/// Converts one section's free list into start-offset windows for a
/// buffer of `size`.
fn start_windows(free: &[FreeRange], size: i64, out: &mut Vec<FreeRange>) {
    for interval in free {
        if interval.len() >= size {
            out.push(FreeRange::new_unchecked(
                interval.lower(),
                interval.upper() - size + 1,
            ));
        }
    }
}

/// Intersects two sorted disjoint interval lists with a two-pointer
/// sweep.
fn intersect_sorted(a: &[FreeRange], b: &[FreeRange]) -> Vec<FreeRange> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if let Some(piece) = a[i].intersection(b[j]) {
            result.push(piece);
        }
        if a[i].upper() <= b[j].upper() {
            i += 1;
        } else {
            j += 1;
        }
    }

    result
}
