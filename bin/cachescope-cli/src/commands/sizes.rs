// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cachescope sizes` command: print the working-set schedule.
//!
//! A dry inspection aid: shows exactly which sizes `detect` would
//! sweep for a range, without measuring anything.

use boundary::human_size;
use runner::parse_size;
use sampler::generate_sizes;

pub fn execute(min_bytes: &str, max_bytes: &str) -> anyhow::Result<()> {
    let min = parse_size(min_bytes)?;
    let max = parse_size(max_bytes)?;

    let sizes = generate_sizes(min, max);
    anyhow::ensure!(
        !sizes.is_empty(),
        "no working-set sizes inside {min}..{max} bytes"
    );

    println!(
        "# {} working-set sizes in {} .. {}",
        sizes.len(),
        human_size(min),
        human_size(max)
    );
    for size in sizes {
        println!("{size}\t{}", human_size(size));
    }
    Ok(())
}
