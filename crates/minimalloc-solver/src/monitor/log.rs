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

use crate::{
    monitor::search_monitor::SearchMonitor,
    stats::SolverStatistics,
};
use minimalloc_model::solution::Solution;
use std::time::{Duration, Instant};

/// Prints a periodic progress table to stdout.
///
/// The clock is only consulted on steps where the bitmask filter fires,
/// keeping the hot path cheap.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    steps: u64,
}

impl LogMonitor {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            steps: 0,
        }
    }

    fn print_header(&self) {
        println!(
            "{:<9} | {:<14} | {:<9} | {:<12} | {:<12}",
            "Elapsed", "Nodes", "Depth", "Backtracks", "Dominated"
        );
        println!("{}", "-".repeat(66));
    }

    fn log_line(&mut self, stats: &SolverStatistics) {
        let now = Instant::now();
        let elapsed_field = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());

        println!(
            "{:<9} | {:<14} | {:<9} | {:<12} | {:<12}",
            elapsed_field,
            stats.nodes_explored(),
            stats.max_depth(),
            stats.backtracks(),
            stats.prunings_dominated()
        );

        self.last_log_time = now;
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl SearchMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(&mut self) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.steps = 0;
        self.print_header();
    }

    fn on_step(&mut self, stats: &SolverStatistics) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(stats);
        }
    }

    fn on_solution_found(&mut self, solution: &Solution) {
        println!("Solution found covering {} buffers.", solution.num_buffers());
    }

    fn on_exit_search(&mut self) {
        println!("{}", "-".repeat(66));
        println!("Search finished.");
    }
}
