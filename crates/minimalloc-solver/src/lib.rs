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

//! MiniMalloc-Solver: constraint search for static buffer allocation
//!
//! Given a set of buffers with known lifespans, sizes, alignments, gaps,
//! and optional pins, the solver assigns every buffer a byte offset into
//! one contiguous region of fixed capacity so that no two simultaneously
//! live buffers overlap in address space. The objective is feasibility
//! under a tight capacity; the engine is built to stay fast on workloads
//! with thousands of buffers where plain strip-packing heuristics fail.
//!
//! Core flow
//! - `canonicalize` validates the problem and normalizes its gaps.
//! - The conflict graph partitions the buffers into connected components,
//!   each solved independently against the full capacity.
//! - Per component, time is compressed to sections and a depth-first
//!   search with a placement trail walks candidate offsets bottom-left
//!   first, pruning branches that starve any neighbor of candidates.
//! - Component solutions are merged back by original buffer index.
//!
//! Design highlights
//! - Sectional state is mutated in place and restored exactly via the
//!   trail; on return from any level the state equals its entry state.
//! - Deterministic: a total placement order and the bottom-left rule
//!   leave no implementation-defined choices.
//! - Cooperative cancellation: monitors are polled between node
//!   expansions; a timeout surfaces as a distinct outcome, not an error.
//!
//! Module map
//! - `canonical`: validation + gap normalization (exposed for testing).
//! - `monitor`: search monitors (time limit, log, composite, no-op).
//! - `result`: outcomes, termination reasons, and `SolverError`.
//! - `solver`: options, the `Solver` facade, and the `solve` function.
//! - `stats`: lightweight counters/timing.
//! - internal: `conflict`, `ordering`, `subproblem`, `section`, `trail`,
//!   and `dfs`, the engine itself.

mod conflict;
mod dfs;
mod ordering;
mod section;
mod subproblem;
mod trail;

pub mod canonical;
pub mod monitor;
pub mod result;
pub mod solver;
pub mod stats;

pub use canonical::canonicalize;
pub use result::{SolveOutcome, SolverError, TerminationReason};
pub use solver::{solve, Solver, SolverOptions};
pub use stats::SolverStatistics;
