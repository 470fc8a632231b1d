// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cachescope
//!
//! Command-line interface for the cachescope memory-hierarchy probe.
//!
//! ## Usage
//! ```bash
//! # Detect cache capacities with the defaults (random order, 4K..256M)
//! cachescope detect
//!
//! # Study the prefetcher: stride order with step 7, no table
//! cachescope detect --pattern stride --pattern-arg 7 --no-table
//!
//! # Inspect the size schedule for a range
//! cachescope sizes --min-bytes 4K --max-bytes 1M
//!
//! # Show the node order a pattern produces
//! cachescope order --pattern gray --nodes 16
//! ```
//!
//! The latency table and summary go to stdout; every diagnostic goes to
//! stderr, so the two streams can be redirected independently.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cachescope",
    about = "CPU cache capacity detection via pointer-chasing",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (CLI flags override its values).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging on stderr (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the latency curve and report cache-level estimates.
    Detect(commands::detect::DetectArgs),

    /// Print the working-set size schedule for a byte range.
    Sizes {
        /// Smallest working set (e.g. 4096 or "4K").
        #[arg(long, default_value = "4K")]
        min_bytes: String,

        /// Largest working set (e.g. "256M").
        #[arg(long, default_value = "256M")]
        max_bytes: String,
    },

    /// Print the node order a traversal pattern produces.
    Order {
        /// Pattern name: random, seq, reverse, stride, interleave, gray, bitrev.
        #[arg(short, long, default_value = "random")]
        pattern: String,

        /// Number of nodes to order.
        #[arg(short, long, default_value_t = 16)]
        nodes: usize,

        /// Pattern argument (step for stride).
        #[arg(long, default_value_t = 1)]
        pattern_arg: usize,

        /// Fixed PRNG seed for the random pattern.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);

    match cli.command {
        Commands::Detect(args) => commands::detect::execute(cli.config, args),
        Commands::Sizes {
            min_bytes,
            max_bytes,
        } => commands::sizes::execute(&min_bytes, &max_bytes),
        Commands::Order {
            pattern,
            nodes,
            pattern_arg,
            seed,
        } => commands::order::execute(&pattern, nodes, pattern_arg, seed),
    }
}
