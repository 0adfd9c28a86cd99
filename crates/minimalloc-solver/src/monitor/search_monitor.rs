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

use crate::stats::SolverStatistics;
use minimalloc_model::solution::Solution;

/// A command returned by a monitor to steer the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Keep searching.
    Continue,
    /// Stop the search; the string describes why.
    Terminate(String),
}

impl std::fmt::Display for SearchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchCommand::Continue => write!(f, "Continue"),
            SearchCommand::Terminate(reason) => write!(f, "Terminate({})", reason),
        }
    }
}

/// An observer of, and cooperative brake on, the search.
///
/// All hooks have empty defaults; implement only what a monitor needs.
/// `on_step` is called once per node expansion, so implementations must
/// be cheap on that path.
pub trait SearchMonitor {
    /// A human-readable name for diagnostics.
    fn name(&self) -> &str;

    /// Called once before the first sub-problem is searched.
    fn on_enter_search(&mut self) {}

    /// Called once after the last sub-problem finished or the search was
    /// terminated.
    fn on_exit_search(&mut self) {}

    /// Called between node expansions.
    fn on_step(&mut self, _stats: &SolverStatistics) {}

    /// Called when a complete solution has been assembled.
    fn on_solution_found(&mut self, _solution: &Solution) {}

    /// Polled between node expansions; returning `Terminate` aborts the
    /// search after the sectional state has been unwound.
    fn search_command(&self) -> SearchCommand {
        SearchCommand::Continue
    }
}
