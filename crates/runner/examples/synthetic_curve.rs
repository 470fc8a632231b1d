// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: boundary detection on a synthetic latency curve.
//!
//! Feeds a hand-written three-plateau staircase through the detector,
//! bypassing measurement entirely. Handy for seeing how the plateau
//! mean, the jump threshold and the lookahead interact without waiting
//! for a real sweep.
//!
//! ```bash
//! cargo run -p runner --example synthetic_curve
//! ```

use boundary::{detect_boundaries, render_summary};
use runner::table_row;
use sampler::Sample;

fn main() {
    // A machine with ~32 KiB L1, ~256 KiB L2, DRAM beyond.
    let curve = [
        (4 * 1024, 1.0),
        (8 * 1024, 1.0),
        (16 * 1024, 1.0),
        (32 * 1024, 1.0),
        (64 * 1024, 2.5),
        (128 * 1024, 2.6),
        (256 * 1024, 2.7),
        (1024 * 1024, 8.0),
        (4 * 1024 * 1024, 8.2),
    ];
    let samples: Vec<Sample> = curve
        .into_iter()
        .map(|(working_set_bytes, ns_per_access)| Sample {
            working_set_bytes,
            ns_per_access,
        })
        .collect();

    println!("# size_bytes\tlatency_ns_per_access");
    for sample in &samples {
        println!("{}", table_row(sample));
    }

    let boundaries = detect_boundaries(&samples);
    println!();
    print!("{}", render_summary(&boundaries));
}
