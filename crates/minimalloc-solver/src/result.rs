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
use minimalloc_model::{problem::ProblemError, solution::Solution};

/// Why the search ended.
///
/// Infeasibility and abortion are first-class results, not errors; they
/// are the caller's cue to retry with more capacity or a longer budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// A complete, valid assignment was found.
    Solved,
    /// The search space was exhausted without a solution; no assignment
    /// exists within this capacity.
    InfeasibilityProven,
    /// A monitor terminated the search (e.g. the time limit). The string
    /// describes the cause.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Solved => write!(f, "Solved"),
            TerminationReason::InfeasibilityProven => write!(f, "Infeasibility Proven"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// The complete outcome of one solve: the solution (if any), the
/// termination reason, and the collected statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    solution: Option<Solution>,
    reason: TerminationReason,
    statistics: SolverStatistics,
}

impl SolveOutcome {
    /// Creates an outcome for a successful solve.
    #[inline]
    pub(crate) fn solved(solution: Solution, statistics: SolverStatistics) -> Self {
        Self {
            solution: Some(solution),
            reason: TerminationReason::Solved,
            statistics,
        }
    }

    /// Creates an outcome for a proven-infeasible problem.
    #[inline]
    pub(crate) fn infeasible(statistics: SolverStatistics) -> Self {
        Self {
            solution: None,
            reason: TerminationReason::InfeasibilityProven,
            statistics,
        }
    }

    /// Creates an outcome for an aborted search.
    #[inline]
    pub(crate) fn aborted<R>(reason: R, statistics: SolverStatistics) -> Self
    where
        R: Into<String>,
    {
        Self {
            solution: None,
            reason: TerminationReason::Aborted(reason.into()),
            statistics,
        }
    }

    /// Returns the solution, if one was found.
    #[inline]
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Returns the termination reason.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// Returns the solver statistics.
    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Returns `true` if a solution was found.
    #[inline]
    pub fn is_solved(&self) -> bool {
        matches!(self.reason, TerminationReason::Solved)
    }

    /// Returns `true` if infeasibility was proven.
    #[inline]
    pub fn is_infeasible(&self) -> bool {
        matches!(self.reason, TerminationReason::InfeasibilityProven)
    }

    /// Returns `true` if the search was aborted before a verdict.
    #[inline]
    pub fn is_aborted(&self) -> bool {
        matches!(self.reason, TerminationReason::Aborted(_))
    }

    /// Converts the outcome into the plain result form of the library
    /// surface.
    pub fn into_result(self) -> Result<Solution, SolverError> {
        match self.reason {
            TerminationReason::Solved => match self.solution {
                Some(solution) => Ok(solution),
                None => Err(SolverError::Infeasible),
            },
            TerminationReason::InfeasibilityProven => Err(SolverError::Infeasible),
            TerminationReason::Aborted(_) => Err(SolverError::Timeout),
        }
    }
}

impl std::fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SolveOutcome(reason: {}, stats: {})",
            self.reason, self.statistics
        )
    }
}

/// The error side of `solve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// No assignment exists within the given capacity.
    Infeasible,
    /// The time budget expired before the search reached a verdict.
    Timeout,
    /// The problem is structurally invalid and was rejected before any
    /// search took place.
    InvalidProblem(ProblemError),
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::Infeasible => write!(f, "the problem is infeasible at this capacity"),
            SolverError::Timeout => write!(f, "the solver timed out before reaching a verdict"),
            SolverError::InvalidProblem(e) => write!(f, "invalid problem: {}", e),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::InvalidProblem(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProblemError> for SolverError {
    fn from(e: ProblemError) -> Self {
        SolverError::InvalidProblem(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solved_outcome_converts_to_ok() {
        let outcome = SolveOutcome::solved(Solution::new(vec![0, 4]), SolverStatistics::new());
        assert!(outcome.is_solved());
        assert_eq!(outcome.into_result().unwrap().offsets(), &[0, 4]);
    }

    #[test]
    fn test_infeasible_outcome_converts_to_error() {
        let outcome = SolveOutcome::infeasible(SolverStatistics::new());
        assert!(outcome.is_infeasible());
        assert_eq!(outcome.into_result().unwrap_err(), SolverError::Infeasible);
    }

    #[test]
    fn test_aborted_outcome_converts_to_timeout() {
        let outcome = SolveOutcome::aborted("time limit reached", SolverStatistics::new());
        assert!(outcome.is_aborted());
        assert_eq!(outcome.into_result().unwrap_err(), SolverError::Timeout);
    }
}
