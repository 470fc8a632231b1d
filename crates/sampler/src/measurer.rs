// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The adaptive timed measurement loop.
//!
//! One [`Measurer::sample`] call produces one point on the curve:
//! rebuild the cycle for the working set, warm it, calibrate the run
//! length so a timed run spans the target wall-clock, then keep the best
//! of several repeats. The minimum is the robust statistic here:
//! preemption and interrupt noise can only inflate a run, never make the
//! memory system look faster than it is.

use crate::{Sample, SamplerError};
use chase_core::{build_order, chase, ChaseArena, Pattern, Rng64, Timer};
use std::sync::atomic::{compiler_fence, Ordering};

/// Ceiling on the adaptive step count.
const MAX_STEPS: u64 = 1 << 62;

/// Floor on the initial step count, so tiny cycles still amortise the
/// call and clock overhead.
const MIN_INITIAL_STEPS: u64 = 1000;

/// Passes over the cycle per working set before calibration starts.
const INITIAL_PASSES: u64 = 16;

/// Knobs for one measurement sweep.
#[derive(Debug, Clone, Copy)]
pub struct MeasureParams {
    /// Node traversal order.
    pub pattern: Pattern,
    /// Pattern argument (step for `stride`).
    pub pattern_arg: usize,
    /// Wall-clock target per timed run, in milliseconds.
    pub target_ms: u64,
    /// Timed runs per working set; the minimum is reported.
    pub repeats: u32,
    /// Untimed full laps before calibration, to prime TLB and caches.
    pub warmup_iters: u32,
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            pattern: Pattern::Random,
            pattern_arg: 1,
            target_ms: 80,
            repeats: 3,
            warmup_iters: 3,
        }
    }
}

/// Produces [`Sample`]s over a driver-owned arena.
///
/// The measurer borrows everything it touches from the driver, so one
/// arena allocation and one scratch allocation serve the entire sweep.
pub struct Measurer<'a> {
    arena: &'a mut ChaseArena,
    scratch: &'a mut [usize],
    timer: &'a Timer,
    rng: &'a mut Rng64,
    params: MeasureParams,
}

impl<'a> Measurer<'a> {
    /// Binds a measurer to its resources.
    ///
    /// # Panics
    /// Panics when the scratch slice cannot hold a permutation over the
    /// whole arena.
    pub fn new(
        arena: &'a mut ChaseArena,
        scratch: &'a mut [usize],
        timer: &'a Timer,
        rng: &'a mut Rng64,
        params: MeasureParams,
    ) -> Self {
        assert!(
            scratch.len() >= arena.max_nodes(),
            "permutation scratch smaller than the arena's node count"
        );
        Self {
            arena,
            scratch,
            timer,
            rng,
            params,
        }
    }

    /// Measures the per-access latency for one working-set size.
    pub fn sample(&mut self, working_set_bytes: usize) -> Result<Sample, SamplerError> {
        if working_set_bytes > self.arena.capacity() {
            return Err(SamplerError::WorkingSetTooLarge {
                requested: working_set_bytes,
                capacity: self.arena.capacity(),
            });
        }

        let num_nodes = (working_set_bytes / self.arena.node_stride()).max(2);
        let order = &mut self.scratch[..num_nodes];
        build_order(order, self.params.pattern, self.params.pattern_arg, self.rng);
        self.arena.link_cycle(order);
        let head = self.arena.head();

        // Prime the TLB, and the caches for any size that fits.
        for _ in 0..self.params.warmup_iters {
            unsafe { chase(head, num_nodes as u64) };
        }

        // Grow the run length until one timed run spans at least half
        // the target, so per-run clock overhead is negligible and the
        // clock's own resolution stops mattering.
        let target_ns = self.params.target_ms.saturating_mul(1_000_000);
        let mut steps = (num_nodes as u64)
            .saturating_mul(INITIAL_PASSES)
            .max(MIN_INITIAL_STEPS);
        loop {
            let elapsed = self.timed_run(head, steps);
            if elapsed >= target_ns / 2 || steps >= MAX_STEPS {
                break;
            }
            steps = steps.saturating_mul(2).min(MAX_STEPS);
        }

        let mut best = f64::INFINITY;
        for _ in 0..self.params.repeats.max(1) {
            let elapsed = self.timed_run(head, steps);
            best = best.min(elapsed as f64 / steps as f64);
        }

        tracing::debug!(
            working_set_bytes,
            num_nodes,
            steps,
            ns_per_access = best,
            "sample complete"
        );
        Ok(Sample {
            working_set_bytes,
            ns_per_access: best,
        })
    }

    /// One fenced, timed kernel run. The fences keep the clock reads on
    /// their side of the chase call.
    fn timed_run(&self, head: *const u8, steps: u64) -> u64 {
        compiler_fence(Ordering::SeqCst);
        let t0 = self.timer.now_ns();
        unsafe { chase(head, steps) };
        let t1 = self.timer.now_ns();
        compiler_fence(Ordering::SeqCst);
        t1 - t0
    }
}
