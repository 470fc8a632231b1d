// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations for the `cachescope` binary.

pub mod detect;
pub mod order;
pub mod sizes;

/// Initialises the tracing subscriber on stderr, mapping `-v` repetition
/// onto a filter level. `RUST_LOG` takes precedence when set.
///
/// Diagnostics must stay off stdout: the data table is the program's
/// machine-readable output.
pub fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
