// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The plateau/step heuristic.
//!
//! Latency over a growing working set is a staircase: flat plateaus
//! while the set fits a cache level, an upward step when it spills into
//! the next one. Each candidate sample is compared against the running
//! mean of the current plateau rather than its predecessor, so gradual
//! drift within a level does not accumulate into a false step, and a
//! one-point lookahead requires the jump to be sustained before it
//! counts.

use sampler::Sample;

/// Most boundaries ever emitted for one curve.
pub const MAX_BOUNDARIES: usize = 8;

/// Ratio over the plateau mean that counts as a jump.
const JUMP_THRESHOLD: f64 = 1.25;

/// Slack factor applied to the lookahead confirmation.
const LOOKAHEAD_SLACK: f64 = 0.95;

/// Samples that must accumulate in a plateau before a boundary may fire.
const MIN_PLATEAU_POINTS: usize = 2;

/// One sustained latency step on the curve.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Boundary {
    /// The largest working set that still fit inside the level — the
    /// sample *before* the step, not the first one past it.
    pub approx_size_bytes: usize,
    /// Latency of the first sample past the level, relative to the
    /// plateau mean.
    pub ratio: f64,
}

/// Scans an ascending-size sample curve and emits the sustained steps,
/// capped at [`MAX_BOUNDARIES`].
pub fn detect_boundaries(samples: &[Sample]) -> Vec<Boundary> {
    let mut found = Vec::new();
    if samples.is_empty() {
        return found;
    }

    let mut plateau_sum = samples[0].ns_per_access;
    let mut plateau_count = 1usize;
    let mut last_boundary = 0usize;

    for i in 1..samples.len() {
        let plateau_avg = plateau_sum / plateau_count as f64;
        let ratio = samples[i].ns_per_access / plateau_avg;

        let mut sustained = false;
        if ratio > JUMP_THRESHOLD && i - last_boundary >= MIN_PLATEAU_POINTS {
            sustained = match samples.get(i + 1) {
                Some(next) => next.ns_per_access / plateau_avg > JUMP_THRESHOLD * LOOKAHEAD_SLACK,
                // Last sample: nothing left to confirm with, accept.
                None => true,
            };
        }

        if sustained {
            if found.len() < MAX_BOUNDARIES {
                tracing::debug!(
                    size_bytes = samples[i - 1].working_set_bytes,
                    ratio,
                    "boundary detected"
                );
                found.push(Boundary {
                    approx_size_bytes: samples[i - 1].working_set_bytes,
                    ratio,
                });
            }
            last_boundary = i;
            plateau_sum = samples[i].ns_per_access;
            plateau_count = 1;
        } else {
            plateau_sum += samples[i].ns_per_access;
            plateau_count += 1;
        }
    }

    found
}

/// Cosmetic label for the i-th emitted boundary.
///
/// Labels are positional: the first boundary is called "L1" even when
/// `min_bytes` started above the true L1 capacity, in which case every
/// label is shifted. They carry no architectural meaning.
pub fn level_label(index: usize) -> &'static str {
    match index {
        0 => "L1",
        1 => "L2",
        2 => "L3",
        3 => "L4",
        _ => "L?",
    }
}
