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

//! The conflict graph over a problem's buffers.
//!
//! Nodes are buffers, edges are `overlaps` pairs. The adjacency lists are
//! built once by preprocessing and then read-only: they drive the
//! placement ordering heuristic, the domination pruning in the search,
//! and the partitioning of the problem into independently solvable
//! connected components.

use fixedbitset::FixedBitSet;
use minimalloc_model::{index::BufferIndex, overlap::overlaps, problem::Problem};

/// An undirected graph whose edges connect buffers that are
/// simultaneously active at some point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGraph {
    adjacency: Vec<Vec<BufferIndex>>,
}

impl ConflictGraph {
    /// Builds the conflict graph by testing all buffer pairs with the
    /// overlap engine (`O(n^2 * g)`).
    pub fn build(problem: &Problem) -> Self {
        let n = problem.num_buffers();
        let mut adjacency = vec![Vec::new(); n];

        for i in 0..n {
            for j in (i + 1)..n {
                if overlaps(&problem.buffers[i], &problem.buffers[j]) {
                    adjacency[i].push(BufferIndex::new(j));
                    adjacency[j].push(BufferIndex::new(i));
                }
            }
        }

        Self { adjacency }
    }

    /// Returns the number of buffers (nodes).
    #[inline]
    pub fn num_buffers(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the conflict set of the given buffer: every other buffer
    /// it is simultaneously active with, in ascending index order.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_buffers()`.
    #[inline]
    pub fn conflicts(&self, index: BufferIndex) -> &[BufferIndex] {
        debug_assert!(
            index.get() < self.num_buffers(),
            "called `ConflictGraph::conflicts` with buffer index out of bounds: the len is {} but the index is {}",
            self.num_buffers(),
            index.get()
        );

        &self.adjacency[index.get()]
    }

    /// Returns the size of the conflict set of the given buffer.
    #[inline]
    pub fn num_conflicts(&self, index: BufferIndex) -> usize {
        self.conflicts(index).len()
    }

    /// Partitions the buffers into connected components.
    ///
    /// Components are returned in ascending order of their smallest
    /// member, and each member list is sorted ascending, which makes the
    /// partitioning (and therefore the whole solve) deterministic.
    pub fn components(&self) -> Vec<Vec<BufferIndex>> {
        let n = self.num_buffers();
        let mut visited = FixedBitSet::with_capacity(n);
        let mut components = Vec::new();
        let mut queue = Vec::new();

        for start in 0..n {
            if visited.contains(start) {
                continue;
            }

            let mut members = Vec::new();
            visited.set(start, true);
            queue.push(start);

            while let Some(node) = queue.pop() {
                members.push(BufferIndex::new(node));
                for neighbor in &self.adjacency[node] {
                    if !visited.contains(neighbor.get()) {
                        visited.set(neighbor.get(), true);
                        queue.push(neighbor.get());
                    }
                }
            }

            members.sort_unstable();
            components.push(members);
        }

        components
    }
}

impl std::fmt::Display for ConflictGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let num_edges: usize = self.adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        write!(
            f,
            "ConflictGraph(num_buffers: {}, num_edges: {})",
            self.num_buffers(),
            num_edges
        )
    }
}
