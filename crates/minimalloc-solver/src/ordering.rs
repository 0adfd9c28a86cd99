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

//! The placement ordering heuristic.
//!
//! Buffers are placed most-constrained first: pinned buffers before free
//! ones, then by decreasing area (size times active length), decreasing
//! size, and decreasing conflict-set size. The final tie-breakers (id,
//! then index) carry no heuristic value; they exist solely to make the
//! order, and with it the whole search, deterministic.

use crate::conflict::ConflictGraph;
use minimalloc_model::{index::BufferIndex, problem::Problem};
use std::cmp::Ordering;

/// Sorts the given buffers into the order the search engine places them
/// in. The ordering is total, so identical inputs always produce the
/// identical order.
pub(crate) fn placement_order(
    problem: &Problem,
    graph: &ConflictGraph,
    members: &[BufferIndex],
) -> Vec<BufferIndex> {
    let mut order = members.to_vec();
    order.sort_by(|&a, &b| compare(problem, graph, a, b));
    order
}

fn compare(problem: &Problem, graph: &ConflictGraph, a: BufferIndex, b: BufferIndex) -> Ordering {
    let buffer_a = problem.buffer(a);
    let buffer_b = problem.buffer(b);

    // Pinned buffers first, then descending area, size, and conflict
    // count; ascending id and index settle the rest.
    buffer_b
        .offset
        .is_some()
        .cmp(&buffer_a.offset.is_some())
        .then_with(|| buffer_b.area().cmp(&buffer_a.area()))
        .then_with(|| buffer_b.size.cmp(&buffer_a.size))
        .then_with(|| graph.num_conflicts(b).cmp(&graph.num_conflicts(a)))
        .then_with(|| buffer_a.id.cmp(&buffer_b.id))
        .then_with(|| a.get().cmp(&b.get()))
}
