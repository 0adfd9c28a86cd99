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

//! End-to-end tests for the full solve pipeline: canonicalization,
//! partitioning, search, assembly, and validation.

use minimalloc_model::{
    buffer::Buffer,
    loading::ProblemLoader,
    problem::Problem,
    validate::{validate, ValidationCode},
    Lifespan,
};
use minimalloc_solver::{canonicalize, solve, Solver, SolverError, SolverOptions};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::Duration;

fn iv(lower: i64, upper: i64) -> Lifespan {
    Lifespan::new(lower, upper)
}

#[test]
fn test_chain_of_reusable_buffers() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("0", iv(0, 1), 2),
            Buffer::new("1", iv(1, 3), 1),
            Buffer::new("2", iv(2, 4), 1),
            Buffer::new("3", iv(3, 5), 1),
        ],
        capacity: 2,
    };
    let solution = solve(&problem, &SolverOptions::new()).unwrap();
    assert_eq!(validate(&problem, &solution), ValidationCode::Good);
}

#[test]
fn test_gapped_buffers_share_tight_capacity() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("0", iv(0, 10), 2).with_gap(iv(1, 9)),
            Buffer::new("1", iv(5, 15), 2).with_gap(iv(6, 14)),
        ],
        capacity: 2,
    };
    let solution = solve(&problem, &SolverOptions::new()).unwrap();
    assert_eq!(solution.offsets(), &[0, 0]);
    assert_eq!(validate(&problem, &solution), ValidationCode::Good);
}

#[test]
fn test_fixed_pins_survive_into_the_solution() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("pinned", iv(0, 4), 2).with_offset(2),
            Buffer::new("free-a", iv(1, 3), 2),
            Buffer::new("free-b", iv(2, 5), 2),
        ],
        capacity: 6,
    };
    let solution = solve(&problem, &SolverOptions::new()).unwrap();
    assert_eq!(solution.offsets()[0], 2);
    assert_eq!(validate(&problem, &solution), ValidationCode::Good);
}

#[test]
fn test_conflicting_pins_are_infeasible() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("a", iv(0, 2), 2).with_offset(0),
            Buffer::new("b", iv(1, 3), 2).with_offset(1),
        ],
        capacity: 8,
    };
    assert_eq!(
        solve(&problem, &SolverOptions::new()).unwrap_err(),
        SolverError::Infeasible
    );
}

#[test]
fn test_buffer_larger_than_capacity_is_infeasible() {
    let problem = Problem {
        buffers: vec![Buffer::new("a", iv(0, 1), 9)],
        capacity: 8,
    };
    assert_eq!(
        solve(&problem, &SolverOptions::new()).unwrap_err(),
        SolverError::Infeasible
    );
}

#[test]
fn test_zero_timeout_reports_timeout() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("a", iv(0, 2), 1),
            Buffer::new("b", iv(1, 3), 1),
        ],
        capacity: 2,
    };
    let options = SolverOptions::new().with_timeout(Duration::ZERO);
    assert_eq!(
        solve(&problem, &options).unwrap_err(),
        SolverError::Timeout
    );
}

#[test]
fn test_outcome_statistics_are_populated() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("a", iv(0, 2), 1),
            Buffer::new("b", iv(1, 3), 1),
            Buffer::new("c", iv(2, 4), 1),
        ],
        capacity: 2,
    };
    let outcome = Solver::new(SolverOptions::new().with_validate_result(true))
        .solve(&problem)
        .unwrap();
    assert!(outcome.is_solved());
    assert!(outcome.statistics().nodes_explored() >= 3);
    assert!(outcome.statistics().subproblems() >= 1);
}

#[test]
fn test_determinism_byte_identical_solutions() {
    let problem = random_problem(7, 60, 48);
    let options = SolverOptions::new();

    let first = solve(&problem, &options).unwrap();
    let second = solve(&problem, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.offsets(), second.offsets());
}

#[test]
fn test_canonicalization_is_transparent_to_the_solver() {
    let problem = Problem {
        buffers: vec![
            Buffer::new("a", iv(0, 12), 2).with_gaps([iv(0, 2), iv(4, 6), iv(6, 8)]),
            Buffer::new("b", iv(3, 9), 2),
        ],
        capacity: 4,
    };
    let canonical = canonicalize(&problem).unwrap();
    assert_eq!(canonicalize(&canonical).unwrap(), canonical);

    let from_raw = solve(&problem, &SolverOptions::new()).unwrap();
    let from_canonical = solve(&canonical, &SolverOptions::new()).unwrap();
    assert_eq!(from_raw, from_canonical);
    assert_eq!(validate(&problem, &from_raw), ValidationCode::Good);
    assert_eq!(validate(&canonical, &from_raw), ValidationCode::Good);
}

#[test]
fn test_csv_instances_solve_end_to_end() {
    let csv = "id,lower,upper,size,alignment,gaps,offset\n\
               w0,0,6,2,1,,\n\
               w1,2,10,2,2,4-5,\n\
               w2,5,12,2,1,,0\n\
               w3,8,16,4,1,,\n";
    let problem = ProblemLoader::new(8).from_csv(csv).unwrap();
    let solution = solve(&problem, &SolverOptions::new()).unwrap();
    assert_eq!(validate(&problem, &solution), ValidationCode::Good);
    assert_eq!(solution.offsets()[2], 0);
}

/// Builds a random but feasible-leaning instance: short lifespans over a
/// long horizon keep the peak cross-section well below the capacity.
fn random_problem(seed: u64, num_buffers: usize, capacity: i64) -> Problem {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut problem = Problem::new(capacity);

    for i in 0..num_buffers {
        let start = rng.gen_range(0..180);
        let length = rng.gen_range(2..20);
        let size = rng.gen_range(1..=6);
        let alignment = [1, 1, 2, 4][rng.gen_range(0..4)];

        let mut buffer = Buffer::new(
            format!("b{:03}", i),
            iv(start, start + length),
            size,
        )
        .with_alignment(alignment);

        if length > 6 && rng.gen_bool(0.3) {
            let gap_start = start + rng.gen_range(1..length / 2);
            let gap_length = rng.gen_range(1..=length / 3);
            buffer = buffer.with_gap(iv(gap_start, gap_start + gap_length));
        }

        problem.add_buffer(buffer);
    }

    problem
}

#[test]
fn test_random_stress_decides_within_budget() {
    for seed in 0..6 {
        let problem = random_problem(seed, 100, 64);
        let options = SolverOptions::new().with_timeout(Duration::from_secs(10));

        match solve(&problem, &options) {
            Ok(solution) => {
                assert_eq!(
                    validate(&problem, &solution),
                    ValidationCode::Good,
                    "seed {} produced an invalid solution",
                    seed
                );
            }
            Err(SolverError::Infeasible) | Err(SolverError::Timeout) => {}
            Err(other) => panic!("seed {} failed structurally: {}", seed, other),
        }
    }
}

#[test]
fn test_dense_overlap_stress_validates_when_solved() {
    // Everything alive at once: a pure 1-D packing instance. The
    // capacity equals the largest possible total, so the instance is
    // feasible by construction.
    let mut problem = Problem::new(768);
    let mut rng = StdRng::seed_from_u64(99);
    for i in 0..64 {
        let size = rng.gen_range(1..=12);
        problem.add_buffer(Buffer::new(format!("d{:02}", i), iv(0, 4), size));
    }

    let solution = solve(&problem, &SolverOptions::new()).unwrap();
    assert_eq!(validate(&problem, &solution), ValidationCode::Good);
}
