// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `cachescope detect` command: the full measurement run.
//!
//! Builds the effective configuration (defaults ← config file ← CLI
//! flags), streams the latency table to stdout as samples land, then
//! prints the cache-level summary.

use boundary::render_summary;
use runner::{parse_size, table_header, table_row, ProbeConfig, ProbeSession};
use std::io::Write;
use std::path::PathBuf;

/// Flags for the detect run. Every flag is optional so a config file's
/// values survive unless explicitly overridden.
#[derive(clap::Args)]
pub struct DetectArgs {
    /// Smallest working set (e.g. 4096 or "4K").
    #[arg(long)]
    min_bytes: Option<String>,

    /// Largest working set (e.g. "256M"; clamped to 4G).
    #[arg(long)]
    max_bytes: Option<String>,

    /// Byte distance between consecutive nodes.
    #[arg(long)]
    node_stride: Option<usize>,

    /// Wall-clock target per timed run, in milliseconds.
    #[arg(long)]
    target_ms: Option<u64>,

    /// Timed runs per working set; the minimum is reported.
    #[arg(long)]
    repeats: Option<u32>,

    /// Untimed warmup laps per working set.
    #[arg(long)]
    warmup_iters: Option<u32>,

    /// Pattern: random, seq, reverse, stride, interleave, gray, bitrev.
    #[arg(short, long)]
    pattern: Option<String>,

    /// Pattern argument (step for stride).
    #[arg(long)]
    pattern_arg: Option<usize>,

    /// Suppress the per-size latency table.
    #[arg(long)]
    no_table: bool,

    /// Fixed PRNG seed for reproducible orders.
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the full report as JSON instead of the text table.
    #[arg(long)]
    json: bool,
}

pub fn execute(config_path: Option<PathBuf>, args: DetectArgs) -> anyhow::Result<()> {
    let mut config = match config_path {
        Some(path) => ProbeConfig::from_file(&path)?,
        None => ProbeConfig::default(),
    };

    if let Some(s) = &args.min_bytes {
        config.min_bytes = parse_size(s)?;
    }
    if let Some(s) = &args.max_bytes {
        config.max_bytes = parse_size(s)?;
    }
    if let Some(stride) = args.node_stride {
        config.node_stride = stride;
    }
    if let Some(target_ms) = args.target_ms {
        config.target_ms = target_ms;
    }
    if let Some(repeats) = args.repeats {
        config.repeats = repeats;
    }
    if let Some(warmup_iters) = args.warmup_iters {
        config.warmup_iters = warmup_iters;
    }
    if let Some(pattern) = args.pattern {
        config.pattern = pattern;
    }
    if let Some(pattern_arg) = args.pattern_arg {
        config.pattern_arg = pattern_arg;
    }
    if args.no_table {
        config.print_table = false;
    }
    config.seed = args.seed.or(config.seed);

    let session = ProbeSession::new(config)?;
    let cfg = session.config();
    let print_table = cfg.print_table && !args.json;

    if print_table {
        println!(
            "{}",
            table_header(cfg.node_stride, session.pattern(), cfg.pattern_arg)
        );
    }

    let report = session.run(|sample| {
        if print_table {
            println!("{}", table_row(sample));
            // Flush per row so a long sweep can be watched live.
            std::io::stdout().flush().ok();
        }
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    print!("{}", render_summary(&report.boundaries));
    Ok(())
}
