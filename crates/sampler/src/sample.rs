// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One point on the latency/size curve.

/// A single measurement: the latency of one dependent load at a given
/// working-set size.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Sample {
    /// Total byte footprint of the chase structure for this measurement.
    pub working_set_bytes: usize,
    /// Best-of-repeats latency per access, in nanoseconds.
    pub ns_per_access: f64,
}
