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

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use minimalloc_model::{buffer::Buffer, problem::Problem, Lifespan};
use minimalloc_solver::{solve, SolverOptions};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_problem(seed: u64, num_buffers: usize, capacity: i64) -> Problem {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut problem = Problem::new(capacity);

    for i in 0..num_buffers {
        let start = rng.gen_range(0..900);
        let length = rng.gen_range(2..40);
        let size = rng.gen_range(1..=16);

        let mut buffer = Buffer::new(
            format!("b{:04}", i),
            Lifespan::new(start, start + length),
            size,
        );
        if length > 9 && rng.gen_bool(0.25) {
            let gap_start = start + rng.gen_range(1..length / 3);
            let gap_length = rng.gen_range(1..=length / 3);
            buffer = buffer.with_gap(Lifespan::new(gap_start, gap_start + gap_length));
        }

        problem.add_buffer(buffer);
    }

    problem
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve");

    for &num_buffers in &[100usize, 400, 1000] {
        let problem = random_problem(42, num_buffers, 1024);
        group.bench_function(format!("random_{num_buffers}"), |b| {
            b.iter_batched(
                || problem.clone(),
                |problem| solve(&problem, &SolverOptions::new()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_solve);
criterion_main!(benches);
