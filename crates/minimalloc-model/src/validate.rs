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

//! The solution certifier.
//!
//! `validate` classifies a `(Problem, Solution)` pair into a closed set of
//! verdicts without performing any search. It is used as the test oracle
//! for the solver and is available to callers as a cheap sanity check on
//! externally produced assignments.

use crate::{overlap::overlaps, problem::Problem, solution::Solution};

/// The verdict of checking a solution against a problem.
///
/// Checks run in the order of the variants below; the first failing check
/// determines the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// All checks pass.
    Good,
    /// The number of offsets differs from the number of buffers.
    BadSolution,
    /// Some offset is negative or `offset + size` exceeds the capacity.
    BadOffset,
    /// Some offset is not a multiple of its buffer's alignment.
    BadAlignment,
    /// A pinned buffer was assigned an offset other than its pin.
    BadFixed,
    /// Two buffers overlap in time and in address space.
    BadOverlap,
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Good => "good",
            Self::BadSolution => "bad-solution",
            Self::BadOffset => "bad-offset",
            Self::BadAlignment => "bad-alignment",
            Self::BadFixed => "bad-fixed",
            Self::BadOverlap => "bad-overlap",
        };
        write!(f, "{}", name)
    }
}

/// Checks a solution against a problem and returns the verdict.
///
/// The pairwise overlap pass costs `O(n^2 * g)`, which is adequate for a
/// certifier that runs once per solve.
///
/// # Examples
///
/// ```rust
/// # use minimalloc_model::buffer::Buffer;
/// # use minimalloc_model::problem::Problem;
/// # use minimalloc_model::solution::Solution;
/// # use minimalloc_model::validate::{validate, ValidationCode};
/// # use minimalloc_model::Lifespan;
///
/// let mut problem = Problem::new(2);
/// problem.add_buffer(Buffer::new("a", Lifespan::new(0, 2), 1));
/// problem.add_buffer(Buffer::new("b", Lifespan::new(1, 3), 1));
///
/// let solution = Solution::new(vec![0, 1]);
/// assert_eq!(validate(&problem, &solution), ValidationCode::Good);
/// ```
pub fn validate(problem: &Problem, solution: &Solution) -> ValidationCode {
    if solution.num_buffers() != problem.num_buffers() {
        return ValidationCode::BadSolution;
    }

    let offsets = solution.offsets();

    for (buffer, &offset) in problem.buffers.iter().zip(offsets) {
        if offset < 0 || offset + buffer.size > problem.capacity {
            return ValidationCode::BadOffset;
        }
    }

    for (buffer, &offset) in problem.buffers.iter().zip(offsets) {
        if buffer.alignment > 0 && offset % buffer.alignment != 0 {
            return ValidationCode::BadAlignment;
        }
    }

    for (buffer, &offset) in problem.buffers.iter().zip(offsets) {
        if let Some(fixed) = buffer.offset {
            if fixed != offset {
                return ValidationCode::BadFixed;
            }
        }
    }

    for (i, a) in problem.buffers.iter().enumerate() {
        for (j, b) in problem.buffers.iter().enumerate().skip(i + 1) {
            let addresses_intersect =
                offsets[i] < offsets[j] + b.size && offsets[j] < offsets[i] + a.size;
            if addresses_intersect && overlaps(a, b) {
                return ValidationCode::BadOverlap;
            }
        }
    }

    ValidationCode::Good
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffer::Buffer, Lifespan};

    fn iv(lower: i64, upper: i64) -> Lifespan {
        Lifespan::new(lower, upper)
    }

    fn problem(capacity: i64, buffers: Vec<Buffer>) -> Problem {
        Problem { buffers, capacity }
    }

    #[test]
    fn test_validates_good_solution() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 3), 1),
                Buffer::new("2", iv(2, 4), 1),
                Buffer::new("3", iv(3, 5), 1),
            ],
        );
        let solution = Solution::new(vec![0, 0, 1, 0]);
        assert_eq!(validate(&problem, &solution), ValidationCode::Good);
    }

    #[test]
    fn test_validates_good_solution_with_gaps() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 10), 2).with_gap(iv(1, 9)),
                Buffer::new("1", iv(5, 15), 2).with_gap(iv(6, 14)),
            ],
        );
        let solution = Solution::new(vec![0, 0]);
        assert_eq!(validate(&problem, &solution), ValidationCode::Good);
    }

    #[test]
    fn test_validates_good_solution_with_touching_gaps() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 10), 2).with_gap(iv(1, 8)),
                Buffer::new("1", iv(5, 15), 2).with_gap(iv(8, 14)),
            ],
        );
        let solution = Solution::new(vec![0, 0]);
        assert_eq!(validate(&problem, &solution), ValidationCode::Good);
    }

    #[test]
    fn test_invalidates_wrong_offset_count() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 2), 1),
                Buffer::new("2", iv(1, 2), 1),
            ],
        );
        let solution = Solution::new(vec![0, 0]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadSolution);
    }

    #[test]
    fn test_invalidates_unmatched_fixed_buffer() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 2), 1),
                Buffer::new("2", iv(1, 2), 1).with_offset(0),
            ],
        );
        let solution = Solution::new(vec![0, 0, 1]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadFixed);
    }

    #[test]
    fn test_invalidates_negative_offset() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 2), 1),
                Buffer::new("2", iv(1, 2), 1),
            ],
        );
        let solution = Solution::new(vec![0, 0, -1]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadOffset);
    }

    #[test]
    fn test_invalidates_out_of_range_offset() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 2), 1),
                Buffer::new("2", iv(1, 2), 1),
            ],
        );
        let solution = Solution::new(vec![0, 0, 2]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadOffset);
    }

    #[test]
    fn test_invalidates_overlap() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 2), 1),
                Buffer::new("2", iv(1, 2), 1),
            ],
        );
        let solution = Solution::new(vec![0, 0, 0]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadOverlap);
    }

    #[test]
    fn test_invalidates_misalignment() {
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 1), 2),
                Buffer::new("1", iv(1, 2), 1).with_alignment(2),
            ],
        );
        let solution = Solution::new(vec![0, 1]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadAlignment);
    }

    #[test]
    fn test_invalidates_overlap_through_gap_misalignment() {
        // The gaps leave a shared active window [7, 8) where both buffers
        // hold offset 0.
        let problem = problem(
            2,
            vec![
                Buffer::new("0", iv(0, 10), 2).with_gap(iv(1, 7)),
                Buffer::new("1", iv(5, 15), 2).with_gap(iv(8, 14)),
            ],
        );
        let solution = Solution::new(vec![0, 0]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadOverlap);
    }

    #[test]
    fn test_range_check_precedes_alignment_and_fixed_checks() {
        let problem = problem(
            4,
            vec![Buffer::new("0", iv(0, 1), 2).with_alignment(3).with_offset(0)],
        );
        // Offset 5 is out of range, misaligned, and violates the pin; the
        // range verdict wins.
        let solution = Solution::new(vec![5]);
        assert_eq!(validate(&problem, &solution), ValidationCode::BadOffset);
    }
}
