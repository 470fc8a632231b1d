// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Stable rendering of the latency table.
//!
//! The table goes to stdout line by line as samples land, so a run can
//! be watched live or piped into the plotting tooling; the format is an
//! interface and must not drift.

use chase_core::Pattern;
use sampler::Sample;

/// The two comment lines that precede the table.
pub fn table_header(node_stride: usize, pattern: Pattern, pattern_arg: usize) -> String {
    let mut header = format!(
        "# Cache size detection via pointer-chasing (node_stride={node_stride}b, pattern={pattern}"
    );
    if pattern == Pattern::Stride {
        header.push_str(&format!(", step={}", pattern_arg.max(1)));
    }
    header.push_str(")\n# size_bytes\tlatency_ns_per_access");
    header
}

/// One table line: size in bytes, a tab, latency with three fractional
/// digits.
pub fn table_row(sample: &Sample) -> String {
    format!("{}\t{:.3}", sample.working_set_bytes, sample.ns_per_access)
}
