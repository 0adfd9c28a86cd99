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

/// Lightweight counters and timing collected during one solve.
///
/// The counters aggregate over all sub-problems of the solve; monitors
/// receive a reference on every step and may read them at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolverStatistics {
    nodes_explored: u64,
    backtracks: u64,
    prunings_dominated: u64,
    max_depth: u64,
    subproblems: u64,
    total_time: std::time::Duration,
}

impl SolverStatistics {
    /// Creates a fresh statistics record with all counters at zero.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Called for every attempted placement (node expansion).
    #[inline]
    pub(crate) fn on_node_explored(&mut self) {
        self.nodes_explored += 1;
    }

    /// Called when a depth exhausts its candidates and the search
    /// retreats one level.
    #[inline]
    pub(crate) fn on_backtrack(&mut self) {
        self.backtracks += 1;
    }

    /// Called when a placement is rejected because it starves some
    /// unassigned buffer of all its candidates.
    #[inline]
    pub(crate) fn on_pruning_dominated(&mut self) {
        self.prunings_dominated += 1;
    }

    /// Tracks the deepest placement level reached.
    #[inline]
    pub(crate) fn on_depth_update(&mut self, depth: u64) {
        if depth > self.max_depth {
            self.max_depth = depth;
        }
    }

    /// Called once per sub-problem handed to the search engine.
    #[inline]
    pub(crate) fn on_subproblem(&mut self) {
        self.subproblems += 1;
    }

    /// Records the total wall-clock time of the solve.
    #[inline]
    pub(crate) fn set_total_time(&mut self, total_time: std::time::Duration) {
        self.total_time = total_time;
    }

    /// Returns the number of attempted placements.
    #[inline]
    pub fn nodes_explored(&self) -> u64 {
        self.nodes_explored
    }

    /// Returns the number of backtracks.
    #[inline]
    pub fn backtracks(&self) -> u64 {
        self.backtracks
    }

    /// Returns the number of domination prunes.
    #[inline]
    pub fn prunings_dominated(&self) -> u64 {
        self.prunings_dominated
    }

    /// Returns the deepest placement level reached.
    #[inline]
    pub fn max_depth(&self) -> u64 {
        self.max_depth
    }

    /// Returns the number of sub-problems solved.
    #[inline]
    pub fn subproblems(&self) -> u64 {
        self.subproblems
    }

    /// Returns the total wall-clock time of the solve.
    #[inline]
    pub fn total_time(&self) -> std::time::Duration {
        self.total_time
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolverStatistics(nodes: {}, backtracks: {}, dominated: {}, max_depth: {}, subproblems: {}, time: {:.3}s)",
            self.nodes_explored,
            self.backtracks,
            self.prunings_dominated,
            self.max_depth,
            self.subproblems,
            self.total_time.as_secs_f64()
        )
    }
}
