// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The probe driver.
//!
//! A [`ProbeSession`] owns every resource a run needs (the node arena,
//! the permutation scratch, the clock and the RNG) and walks the size
//! schedule through the measurer. Allocation is optimistic: the arena is
//! sized for the largest scheduled working set, and on failure the tail
//! of the schedule is dropped one size at a time until an allocation
//! succeeds. Only failure at the smallest size is fatal.

use crate::{ProbeConfig, RunnerError};
use boundary::{detect_boundaries, Boundary};
use chase_core::{ChaseArena, ChaseError, Pattern, Rng64, Timer};
use sampler::{generate_sizes, MeasureParams, Measurer, Sample};

/// Outcome of one full detection run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProbeReport {
    /// The traversal pattern the sweep actually used.
    pub pattern: Pattern,
    /// The latency curve, in ascending size order.
    pub samples: Vec<Sample>,
    /// Detected cache-level boundaries, in ascending size order.
    pub boundaries: Vec<Boundary>,
    /// Bytes actually allocated after any fallback shrinking.
    pub allocated_bytes: usize,
}

/// A configured, validated detection run.
pub struct ProbeSession {
    config: ProbeConfig,
    pattern: Pattern,
}

impl ProbeSession {
    /// Normalises the configuration and prepares a session.
    pub fn new(mut config: ProbeConfig) -> Result<Self, RunnerError> {
        config.normalise()?;
        let pattern = config.resolve_pattern();
        Ok(Self { config, pattern })
    }

    /// The effective (normalised) configuration.
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// The resolved traversal pattern.
    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Runs the full sweep.
    ///
    /// `on_sample` observes each sample as it lands, in ascending size
    /// order — the caller streams the table from it.
    pub fn run(&self, mut on_sample: impl FnMut(&Sample)) -> Result<ProbeReport, RunnerError> {
        let timer = Timer::new()?;
        tracing::debug!("clock tick <= {} ns", timer.tick_ns());

        let mut sizes = generate_sizes(self.config.min_bytes, self.config.max_bytes);
        if sizes.is_empty() {
            return Err(RunnerError::Config(format!(
                "no working-set sizes inside {}..{} bytes",
                self.config.min_bytes, self.config.max_bytes
            )));
        }

        let mut arena = self.allocate_shrinking(&mut sizes)?;
        tracing::info!(
            "arena ready: {} bytes, stride {}, {} sizes to sweep",
            arena.capacity(),
            arena.node_stride(),
            sizes.len()
        );

        let mut rng = match self.config.seed {
            Some(seed) => Rng64::new(seed),
            None => Rng64::from_entropy(&timer),
        };
        let mut scratch = vec![0usize; arena.max_nodes()];
        let params = MeasureParams {
            pattern: self.pattern,
            pattern_arg: self.config.pattern_arg,
            target_ms: self.config.target_ms,
            repeats: self.config.repeats,
            warmup_iters: self.config.warmup_iters,
        };
        let mut measurer = Measurer::new(&mut arena, &mut scratch, &timer, &mut rng, params);

        let mut samples = Vec::with_capacity(sizes.len());
        for &working_set in &sizes {
            let sample = measurer.sample(working_set)?;
            on_sample(&sample);
            samples.push(sample);
        }
        drop(measurer);

        let boundaries = detect_boundaries(&samples);
        Ok(ProbeReport {
            pattern: self.pattern,
            samples,
            boundaries,
            allocated_bytes: arena.capacity(),
        })
    }

    /// Allocates the arena for the largest scheduled size, shrinking the
    /// schedule's tail while the allocator refuses. The schedule is
    /// truncated to what was actually allocated.
    fn allocate_shrinking(&self, sizes: &mut Vec<usize>) -> Result<ChaseArena, RunnerError> {
        let mut idx = sizes.len() - 1;
        loop {
            match ChaseArena::allocate(sizes[idx], self.config.node_stride) {
                Ok(arena) => {
                    sizes.truncate(idx + 1);
                    return Ok(arena);
                }
                Err(e @ ChaseError::AllocationFailed { .. }) if idx > 0 => {
                    tracing::warn!("{e}; retrying with {} bytes", sizes[idx - 1]);
                    idx -= 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_config() -> ProbeConfig {
        ProbeConfig {
            min_bytes: 4096,
            max_bytes: 32 * 1024,
            target_ms: 1,
            repeats: 1,
            warmup_iters: 1,
            pattern: "seq".into(),
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_session_reports_effective_config() {
        let session = ProbeSession::new(ProbeConfig {
            min_bytes: 16,
            pattern: "gray".into(),
            ..quick_config()
        })
        .unwrap();
        assert_eq!(session.config().min_bytes, 512);
        assert_eq!(session.pattern(), Pattern::Gray);
    }

    #[test]
    fn test_run_streams_every_sample() {
        let session = ProbeSession::new(quick_config()).unwrap();
        let mut streamed = Vec::new();
        let report = session.run(|s| streamed.push(*s)).unwrap();
        assert_eq!(streamed, report.samples);
        assert!(!report.samples.is_empty());
    }

    #[test]
    fn test_run_samples_ascending_and_in_range() {
        let session = ProbeSession::new(quick_config()).unwrap();
        let report = session.run(|_| {}).unwrap();
        assert!(report
            .samples
            .windows(2)
            .all(|w| w[0].working_set_bytes < w[1].working_set_bytes));
        for s in &report.samples {
            assert!(s.working_set_bytes >= 4096);
            assert!(s.working_set_bytes <= report.allocated_bytes);
            assert!(s.ns_per_access > 0.0);
        }
    }

    #[test]
    fn test_rejects_unusable_stride() {
        let config = ProbeConfig {
            node_stride: 8,
            ..quick_config()
        };
        assert!(matches!(
            ProbeSession::new(config),
            Err(RunnerError::Config(_))
        ));
    }
}
