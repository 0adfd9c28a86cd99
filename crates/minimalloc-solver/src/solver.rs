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

//! The solver facade: canonicalization, partitioning, per-component
//! search, and solution assembly behind a single `solve` call.

use crate::{
    canonical::canonicalize,
    conflict::ConflictGraph,
    dfs::{DfsSolver, SubOutcome},
    monitor::{
        composite::CompositeMonitor, search_monitor::SearchMonitor, time_limit::TimeLimitMonitor,
    },
    result::{SolveOutcome, SolverError},
    stats::SolverStatistics,
    subproblem::SubProblem,
};
use minimalloc_model::{
    problem::{Problem, ProblemError},
    solution::Solution,
    validate::{validate, ValidationCode},
    Offset,
};

/// Configuration for one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverOptions {
    /// Wall-clock budget; `None` searches to a verdict.
    pub timeout: Option<std::time::Duration>,
    /// Run the validator on the solver's own output as a post-condition
    /// assertion. A failure indicates a solver bug and panics.
    pub validate_result: bool,
    /// Canonicalize (and thereby structurally validate) the problem
    /// before solving. Disable only for inputs that are already
    /// canonical.
    pub canonicalize: bool,
}

impl Default for SolverOptions {
    #[inline]
    fn default() -> Self {
        Self {
            timeout: None,
            validate_result: false,
            canonicalize: true,
        }
    }
}

impl SolverOptions {
    /// Creates the default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wall-clock budget.
    #[inline]
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables the output post-condition assertion.
    #[inline]
    pub fn with_validate_result(mut self, validate_result: bool) -> Self {
        self.validate_result = validate_result;
        self
    }

    /// Enables or disables the canonicalization pass.
    #[inline]
    pub fn with_canonicalize(mut self, canonicalize: bool) -> Self {
        self.canonicalize = canonicalize;
        self
    }
}

/// The static allocation solver.
///
/// A `Solver` is a pure function of the problem plus its options and the
/// timeout clock: solving the same problem twice without hitting the
/// budget yields identical solutions.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::buffer::Buffer;
/// # use minimalloc_model::problem::Problem;
/// # use minimalloc_model::Lifespan;
/// # use minimalloc_solver::{Solver, SolverOptions};
///
/// let mut problem = Problem::new(2);
/// problem.add_buffer(Buffer::new("a", Lifespan::new(0, 2), 1));
/// problem.add_buffer(Buffer::new("b", Lifespan::new(1, 3), 1));
///
/// let outcome = Solver::new(SolverOptions::new()).solve(&problem).unwrap();
/// assert!(outcome.is_solved());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solver {
    options: SolverOptions,
}

impl Solver {
    /// Creates a solver with the given options.
    #[inline]
    pub fn new(options: SolverOptions) -> Self {
        Self { options }
    }

    /// Returns the solver's options.
    #[inline]
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Solves the problem to an outcome.
    ///
    /// Structural invalidity is reported out of band; infeasibility and
    /// timeouts are first-class outcomes carrying the collected
    /// statistics.
    pub fn solve(&self, problem: &Problem) -> Result<SolveOutcome, ProblemError> {
        let start_time = std::time::Instant::now();
        let mut stats = SolverStatistics::new();

        let canonical;
        let problem = if self.options.canonicalize {
            canonical = canonicalize(problem)?;
            &canonical
        } else {
            problem
        };

        let graph = ConflictGraph::build(problem);
        let components = graph.components();

        let mut monitor = CompositeMonitor::new();
        if let Some(timeout) = self.options.timeout {
            monitor.add_monitor(TimeLimitMonitor::new(timeout));
        }
        monitor.on_enter_search();

        let mut engine = DfsSolver::new();
        let mut offsets: Vec<Offset> = vec![0; problem.num_buffers()];
        let mut infeasible = false;
        let mut aborted: Option<String> = None;

        for members in &components {
            let sub = SubProblem::build(problem, &graph, members);
            match engine.solve(&sub, &mut monitor, &mut stats) {
                SubOutcome::Solved(local) => merge_offsets(&mut offsets, &sub, &local),
                SubOutcome::Infeasible => {
                    infeasible = true;
                    break;
                }
                SubOutcome::Aborted(reason) => {
                    aborted = Some(reason);
                    break;
                }
            }
        }

        monitor.on_exit_search();
        stats.set_total_time(start_time.elapsed());

        if let Some(reason) = aborted {
            return Ok(SolveOutcome::aborted(reason, stats));
        }
        if infeasible {
            return Ok(SolveOutcome::infeasible(stats));
        }

        let solution = Solution::new(offsets);
        monitor.on_solution_found(&solution);

        if self.options.validate_result {
            let code = validate(problem, &solution);
            assert!(
                code == ValidationCode::Good,
                "solver produced a solution that fails validation: {}",
                code
            );
        }

        Ok(SolveOutcome::solved(solution, stats))
    }
}

/// Writes one component's offsets back into the full solution vector.
///
/// Sub-problems partition the buffer set and all share the address window
/// starting at 0, so no shifting is needed.
fn merge_offsets(offsets: &mut [Offset], sub: &SubProblem, local: &[Offset]) {
    debug_assert_eq!(
        sub.num_items(),
        local.len(),
        "called `merge_offsets` with mismatched item and offset counts"
    );

    for (item, &offset) in sub.items.iter().zip(local) {
        offsets[item.buffer.get()] = offset;
    }
}

/// Solves a problem and returns the solution, collapsing the outcome into
/// the plain result form: infeasibility and timeouts become errors.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::buffer::Buffer;
/// # use minimalloc_model::problem::Problem;
/// # use minimalloc_model::validate::{validate, ValidationCode};
/// # use minimalloc_model::Lifespan;
/// # use minimalloc_solver::{solve, SolverOptions};
///
/// let mut problem = Problem::new(2);
/// problem.add_buffer(Buffer::new("a", Lifespan::new(0, 2), 1));
/// problem.add_buffer(Buffer::new("b", Lifespan::new(1, 3), 1));
///
/// let solution = solve(&problem, &SolverOptions::new()).unwrap();
/// assert_eq!(validate(&problem, &solution), ValidationCode::Good);
/// ```
pub fn solve(problem: &Problem, options: &SolverOptions) -> Result<Solution, SolverError> {
    match Solver::new(*options).solve(problem) {
        Ok(outcome) => outcome.into_result(),
        Err(error) => Err(SolverError::InvalidProblem(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minimalloc_model::{buffer::Buffer, Lifespan};

    fn iv(lower: i64, upper: i64) -> Lifespan {
        Lifespan::new(lower, upper)
    }

    #[test]
    fn test_solves_across_components_and_merges_by_original_index() {
        let problem = Problem {
            buffers: vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 3), 1),
                Buffer::new("2", iv(2, 4), 1),
                Buffer::new("3", iv(3, 5), 1),
            ],
            capacity: 2,
        };
        let outcome = Solver::new(SolverOptions::new().with_validate_result(true))
            .solve(&problem)
            .unwrap();

        assert!(outcome.is_solved());
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.num_buffers(), 4);
        assert_eq!(validate(&problem, solution), ValidationCode::Good);
        assert_eq!(outcome.statistics().subproblems(), 2);
    }

    #[test]
    fn test_empty_problem_yields_empty_solution() {
        let problem = Problem::new(8);
        let outcome = Solver::default().solve(&problem).unwrap();
        assert!(outcome.is_solved());
        assert_eq!(outcome.solution().unwrap().num_buffers(), 0);
    }

    #[test]
    fn test_invalid_problem_is_rejected_before_search() {
        let mut problem = Problem::new(8);
        problem.add_buffer(Buffer::new("a", iv(0, 1), -3));

        let error = Solver::default().solve(&problem).unwrap_err();
        assert!(matches!(error, ProblemError::NonPositiveSize { .. }));

        let error = solve(&problem, &SolverOptions::new()).unwrap_err();
        assert!(matches!(error, SolverError::InvalidProblem(_)));
    }

    #[test]
    fn test_infeasible_problem_reports_infeasible() {
        let problem = Problem {
            buffers: vec![
                Buffer::new("a", iv(0, 2), 2),
                Buffer::new("b", iv(1, 3), 1),
            ],
            capacity: 2,
        };
        let outcome = Solver::default().solve(&problem).unwrap();
        assert!(outcome.is_infeasible());

        let error = solve(&problem, &SolverOptions::new()).unwrap_err();
        assert_eq!(error, SolverError::Infeasible);
    }

    #[test]
    fn test_offsets_are_written_back_in_original_order() {
        // Ordering places "b" before "a" (larger area), but the solution
        // must still be indexed by original buffer position.
        let problem = Problem {
            buffers: vec![
                Buffer::new("a", iv(0, 2), 1),
                Buffer::new("b", iv(0, 4), 2),
            ],
            capacity: 4,
        };
        let solution = solve(&problem, &SolverOptions::new()).unwrap();
        assert_eq!(solution.offsets(), &[2, 0]);
    }

    #[test]
    fn test_solution_respects_boundary_shrunk_gaps() {
        // The boundary-touching gap shrinks b's lifespan so that a and b
        // never coexist and may share offset 0.
        let problem = Problem {
            buffers: vec![
                Buffer::new("a", iv(0, 4), 2),
                Buffer::new("b", iv(0, 8), 2).with_gap(iv(0, 4)),
            ],
            capacity: 2,
        };
        let solution = solve(&problem, &SolverOptions::new()).unwrap();
        assert_eq!(solution.offsets(), &[0, 0]);
    }
}
