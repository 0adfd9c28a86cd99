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

//! Sub-problem construction: time compression and the solver-local view
//! of one connected component.
//!
//! The overlap predicate depends only on the ordering of time points, so
//! each component's active-interval endpoints are mapped onto compact
//! section indices `0..T`. Section `t` stands for the elementary time
//! slice between the `t`-th and `t+1`-th distinct endpoint; a buffer's
//! active intervals become half-open runs of section indices. All solver
//! data is rephrased in local item indices (`0..items.len()`, in
//! placement order) so the search loop never touches the original
//! problem.

use crate::{conflict::ConflictGraph, ordering};
use minimalloc_core::math::interval::Interval;
use minimalloc_model::{index::BufferIndex, problem::Problem, Area, Capacity, Offset, TimeValue};
use std::collections::HashMap;

/// One buffer of a sub-problem, rephrased for the search engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubItem {
    /// The buffer's index in the original problem.
    pub buffer: BufferIndex,
    pub size: i64,
    pub alignment: i64,
    pub fixed: Option<Offset>,
    pub area: Area,
    /// Active time as half-open runs of section indices, ascending.
    pub active: Vec<Interval<usize>>,
    /// Conflicting items, as local indices into `SubProblem::items`.
    pub conflicts: Vec<usize>,
}

/// A connected component of the conflict graph, ready to be solved
/// independently of all other components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubProblem {
    /// The items in placement order.
    pub items: Vec<SubItem>,
    /// The number of compressed time sections.
    pub num_sections: usize,
    /// The capacity inherited from the original problem.
    pub capacity: Capacity,
}

impl SubProblem {
    /// Builds the solver-local view of one component.
    ///
    /// The problem must be canonical: gap lists sorted, merged, and
    /// strictly interior.
    pub fn build(problem: &Problem, graph: &ConflictGraph, members: &[BufferIndex]) -> Self {
        debug_assert!(!members.is_empty(), "called `SubProblem::build` with an empty component");

        // Distinct active-interval endpoints of this component only.
        let mut points: Vec<TimeValue> = Vec::new();
        for &member in members {
            for piece in problem.buffer(member).active_intervals() {
                points.push(piece.lower());
                points.push(piece.upper());
            }
        }
        points.sort_unstable();
        points.dedup();

        let order = ordering::placement_order(problem, graph, members);

        let mut local_of: HashMap<usize, usize> = HashMap::with_capacity(order.len());
        for (local, member) in order.iter().enumerate() {
            local_of.insert(member.get(), local);
        }

        let items = order
            .iter()
            .map(|&member| {
                let buffer = problem.buffer(member);
                let active = buffer
                    .active_intervals()
                    .map(|piece| {
                        Interval::new_unchecked(
                            point_index(&points, piece.lower()),
                            point_index(&points, piece.upper()),
                        )
                    })
                    .collect();

                let mut conflicts: Vec<usize> = graph
                    .conflicts(member)
                    .iter()
                    .map(|neighbor| local_of[&neighbor.get()])
                    .collect();
                conflicts.sort_unstable();

                SubItem {
                    buffer: member,
                    size: buffer.size,
                    alignment: buffer.alignment,
                    fixed: buffer.offset,
                    area: buffer.area(),
                    active,
                    conflicts,
                }
            })
            .collect();

        Self {
            items,
            num_sections: points.len().saturating_sub(1),
            capacity: problem.capacity,
        }
    }

    /// Returns the number of items.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.items.len()
    }
}

/// Locates `value` in the sorted endpoint list.
#[inline]
fn point_index(points: &[TimeValue], value: TimeValue) -> usize {
    let index = points.partition_point(|&p| p < value);
    debug_assert!(
        index < points.len() && points[index] == value,
        "called `point_index` with a value that is not a recorded endpoint: {}",
        value
    );
    index
}
