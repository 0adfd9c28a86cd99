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

//! The depth-first search engine.
//!
//! The engine places the items of one sub-problem in their precomputed
//! order, one depth per item. At each depth it enumerates the candidate
//! offsets — the intersection of the per-section start windows, walked in
//! ascending order under the alignment lattice (bottom-left rule) — and
//! backtracks chronologically when a depth runs dry. Placements are
//! recorded on a trail so the sectional state is restored exactly on
//! every retreat; on return from the engine the state has been fully
//! unwound regardless of the verdict.

use crate::{
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    section::{FreeRange, SectionState},
    stats::SolverStatistics,
    subproblem::{SubItem, SubProblem},
    trail::PlacementTrail,
};
use fixedbitset::FixedBitSet;
use minimalloc_core::math::interval::Interval;
use minimalloc_model::Offset;

/// The verdict for one sub-problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SubOutcome {
    /// Offsets for each item, in the sub-problem's item order.
    Solved(Vec<Offset>),
    /// No assignment of this component fits the capacity.
    Infeasible,
    /// A monitor stopped the search; the string describes why.
    Aborted(String),
}

/// One decision level: the candidate windows computed when the level was
/// entered, plus the enumeration cursor.
///
/// The windows stay valid while deeper levels come and go because the
/// sectional state is restored to the level's entry state before the next
/// candidate is tried.
#[derive(Debug, Clone)]
struct DepthFrame {
    windows: Vec<FreeRange>,
    cursor: usize,
    next_offset: Offset,
}

impl DepthFrame {
    /// Yields the next aligned candidate offset, smallest first.
    fn next_candidate(&mut self, alignment: i64) -> Option<Offset> {
        while self.cursor < self.windows.len() {
            let window = self.windows[self.cursor];
            let candidate = round_up(window.lower().max(self.next_offset), alignment);
            if candidate < window.upper() {
                self.next_offset = candidate + alignment;
                return Some(candidate);
            }
            self.cursor += 1;
        }
        None
    }
}

#[inline]
fn round_up(offset: Offset, alignment: i64) -> Offset {
    ((offset + alignment - 1) / alignment) * alignment
}

/// The backtracking engine. Owns the trail and the frame stack so their
/// allocations are reused across sub-problems.
#[derive(Debug, Clone, Default)]
pub(crate) struct DfsSolver {
    trail: PlacementTrail,
    frames: Vec<DepthFrame>,
}

impl DfsSolver {
    /// Creates a new engine.
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: PlacementTrail::new(),
            frames: Vec::new(),
        }
    }

    /// Searches one sub-problem to a verdict or until a monitor calls
    /// the search off.
    pub fn solve(
        &mut self,
        sub: &SubProblem,
        monitor: &mut dyn SearchMonitor,
        stats: &mut SolverStatistics,
    ) -> SubOutcome {
        stats.on_subproblem();

        if sub.items.iter().any(|item| item.size > sub.capacity) {
            return SubOutcome::Infeasible;
        }
        if has_fixed_conflict(sub) {
            return SubOutcome::Infeasible;
        }

        let mut state = SectionState::new(sub.num_sections, sub.capacity);
        let mut assigned = FixedBitSet::with_capacity(sub.num_items());
        self.trail.reset();
        self.frames.clear();
        self.frames.push(make_frame(&state, &sub.items[0]));

        loop {
            monitor.on_step(stats);
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                self.trail.unwind(&mut state, &sub.items);
                self.frames.clear();
                return SubOutcome::Aborted(reason);
            }

            let depth = self.frames.len() - 1;
            let alignment = sub.items[depth].alignment;
            match self.frames[depth].next_candidate(alignment) {
                Some(offset) => {
                    stats.on_node_explored();
                    self.trail.apply(&mut state, &sub.items, depth, offset);
                    assigned.set(depth, true);
                    stats.on_depth_update((depth + 1) as u64);

                    if self.starves_a_neighbor(&state, sub, &assigned, depth) {
                        stats.on_pruning_dominated();
                        self.trail.retract(&mut state, &sub.items);
                        assigned.set(depth, false);
                        continue;
                    }

                    if depth + 1 == sub.num_items() {
                        let offsets = self.collect_offsets(sub);
                        self.trail.unwind(&mut state, &sub.items);
                        self.frames.clear();
                        return SubOutcome::Solved(offsets);
                    }

                    let frame = make_frame(&state, &sub.items[depth + 1]);
                    self.frames.push(frame);
                }
                None => {
                    self.frames.pop();
                    if self.frames.is_empty() {
                        debug_assert!(
                            self.trail.is_empty(),
                            "exhausted the root level with placements still on the trail"
                        );
                        return SubOutcome::Infeasible;
                    }

                    stats.on_backtrack();
                    if let Some(entry) = self.trail.retract(&mut state, &sub.items) {
                        assigned.set(entry.item, false);
                    }
                }
            }
        }
    }

    /// Returns `true` if the placement just made at `depth` leaves some
    /// unassigned conflicting item without any candidate offset.
    ///
    /// Checking only the placed item's conflict set is complete: a
    /// placement can only shrink the windows of items it shares a
    /// section with, and every item starts out with a non-empty window
    /// set (sizes above the capacity are rejected before the search).
    fn starves_a_neighbor(
        &self,
        state: &SectionState,
        sub: &SubProblem,
        assigned: &FixedBitSet,
        depth: usize,
    ) -> bool {
        for &neighbor in &sub.items[depth].conflicts {
            if assigned.contains(neighbor) {
                continue;
            }
            let item = &sub.items[neighbor];
            let windows = state.feasible_windows(&item.active, item.size);
            if !has_candidate(&windows, item) {
                return true;
            }
        }
        false
    }

    /// Reads the finished assignment off the trail.
    fn collect_offsets(&self, sub: &SubProblem) -> Vec<Offset> {
        let mut offsets = vec![0; sub.num_items()];
        for entry in self.trail.entries() {
            offsets[entry.item] = entry.offset;
        }
        offsets
    }
}

/// Computes the candidate windows for one item against the current
/// sectional state. A pinned item keeps at most the single offset it is
/// pinned to.
fn make_frame(state: &SectionState, item: &SubItem) -> DepthFrame {
    let mut windows = state.feasible_windows(&item.active, item.size);

    if let Some(fixed) = item.fixed {
        windows = if windows.iter().any(|w| w.contains_point(fixed)) {
            vec![FreeRange::new_unchecked(fixed, fixed + 1)]
        } else {
            Vec::new()
        };
    }

    DepthFrame {
        windows,
        cursor: 0,
        next_offset: 0,
    }
}

/// Returns `true` if the windows admit at least one offset satisfying
/// the item's alignment and pin.
fn has_candidate(windows: &[FreeRange], item: &SubItem) -> bool {
    match item.fixed {
        Some(fixed) => windows.iter().any(|w| w.contains_point(fixed)),
        None => windows
            .iter()
            .any(|w| round_up(w.lower(), item.alignment) < w.upper()),
    }
}

/// Detects two pinned items that overlap in both time and address space.
fn has_fixed_conflict(sub: &SubProblem) -> bool {
    let pinned: Vec<(&SubItem, Offset)> = sub
        .items
        .iter()
        .filter_map(|item| item.fixed.map(|offset| (item, offset)))
        .collect();

    for (i, &(item_a, offset_a)) in pinned.iter().enumerate() {
        let range_a = Interval::new_unchecked(offset_a, offset_a + item_a.size);
        for &(item_b, offset_b) in pinned.iter().skip(i + 1) {
            let range_b = Interval::new_unchecked(offset_b, offset_b + item_b.size);
            if range_a.overlaps(range_b) && active_runs_intersect(&item_a.active, &item_b.active) {
                return true;
            }
        }
    }
    false
}

fn active_runs_intersect(a: &[Interval<usize>], b: &[Interval<usize>]) -> bool {
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i].overlaps(b[j]) {
            return true;
        }
        if a[i].upper() <= b[j].upper() {
            i += 1;
        } else {
            j += 1;
        }
    }
    false
}
