// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cachescope order` command: print a pattern's node order.
//!
//! Useful for eyeballing what a traversal actually does before running
//! a long sweep with it, e.g. how many orbits a stride step produces
//! for a given node count.

use chase_core::{build_order, Pattern, Rng64, Timer};

pub fn execute(
    pattern: &str,
    nodes: usize,
    pattern_arg: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    anyhow::ensure!(nodes >= 2, "a chase cycle needs at least two nodes");
    anyhow::ensure!(nodes <= 1 << 20, "node count too large to print sensibly");

    let pattern = Pattern::parse(pattern);
    let mut rng = match seed {
        Some(seed) => Rng64::new(seed),
        None => Rng64::from_entropy(&Timer::new()?),
    };

    let mut order = vec![0usize; nodes];
    build_order(&mut order, pattern, pattern_arg, &mut rng);

    println!("# pattern={pattern} nodes={nodes} pattern_arg={pattern_arg}");
    let rendered: Vec<String> = order.iter().map(|i| i.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(())
}
