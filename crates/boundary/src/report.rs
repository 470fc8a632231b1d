// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Human-readable rendering of the detected levels.
//!
//! The summary wording and the size units are a stable interface:
//! downstream log scrapers parse these lines.

use crate::{level_label, Boundary};
use std::fmt::Write;

/// Formats a byte count with binary units and one fractional digit,
/// using the largest unit for which the value is at least 1.
pub fn human_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

/// Renders the cache-level summary block.
///
/// One bullet per boundary in emission order, or a single explanatory
/// line when the curve showed no sustained step.
pub fn render_summary(boundaries: &[Boundary]) -> String {
    let mut out = String::from("Detected cache levels (approx):\n");
    if boundaries.is_empty() {
        out.push_str(
            "- No clear cache boundaries detected; try increasing --max-bytes or adjusting --node-stride.\n",
        );
        return out;
    }
    for (i, b) in boundaries.iter().enumerate() {
        let _ = writeln!(
            out,
            "- {} capacity ~ {} (jump x{:.2})",
            level_label(i),
            human_size(b.approx_size_bytes),
            b.ratio,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size_units() {
        assert_eq!(human_size(1023), "1023.0 B");
        assert_eq!(human_size(1024), "1.0 KiB");
        assert_eq!(human_size(1536), "1.5 KiB");
        assert_eq!(human_size(1 << 20), "1.0 MiB");
        assert_eq!(human_size(3 << 30), "3.0 GiB");
    }

    #[test]
    fn test_human_size_zero() {
        assert_eq!(human_size(0), "0.0 B");
    }

    #[test]
    fn test_human_size_caps_at_gib() {
        // Terabyte-scale values still render in GiB.
        assert_eq!(human_size(2048usize << 30), "2048.0 GiB");
    }

    #[test]
    fn test_summary_with_boundaries() {
        let bounds = [
            Boundary {
                approx_size_bytes: 32 * 1024,
                ratio: 2.5,
            },
            Boundary {
                approx_size_bytes: 256 * 1024,
                ratio: 3.077,
            },
        ];
        let summary = render_summary(&bounds);
        assert_eq!(
            summary,
            "Detected cache levels (approx):\n\
             - L1 capacity ~ 32.0 KiB (jump x2.50)\n\
             - L2 capacity ~ 256.0 KiB (jump x3.08)\n"
        );
    }

    #[test]
    fn test_summary_without_boundaries() {
        let summary = render_summary(&[]);
        assert!(summary.starts_with("Detected cache levels (approx):\n"));
        assert!(summary.contains("No clear cache boundaries detected"));
    }
}
