// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Probe configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! min_bytes = 4096
//! max_bytes = 268435456
//! node_stride = 256
//! target_ms = 80
//! repeats = 3
//! warmup_iters = 3
//! pattern = "random"
//! pattern_arg = 1
//! print_table = true
//! seed = 42        # optional; omit for per-run entropy
//! ```

use crate::RunnerError;
use chase_core::Pattern;
use std::path::Path;

/// Ceiling on `max_bytes`: 4 GiB, or the platform address limit if that
/// is smaller.
const MAX_BYTES_CEILING: u64 = 4 << 30;

/// Configuration for one detection run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProbeConfig {
    /// Smallest working set in bytes.
    #[serde(default = "default_min_bytes")]
    pub min_bytes: usize,
    /// Largest working set in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Byte distance between consecutive nodes. Kept above any plausible
    /// cache line so successive chase loads never share one.
    #[serde(default = "default_node_stride")]
    pub node_stride: usize,
    /// Wall-clock target per timed run, in milliseconds.
    #[serde(default = "default_target_ms")]
    pub target_ms: u64,
    /// Timed runs per working set; the minimum is reported.
    #[serde(default = "default_repeats")]
    pub repeats: u32,
    /// Untimed warmup laps per working set.
    #[serde(default = "default_warmup_iters")]
    pub warmup_iters: u32,
    /// Traversal pattern name: `"random"`, `"seq"`, `"reverse"`,
    /// `"stride"`, `"interleave"`, `"gray"`, `"bitrev"`.
    #[serde(default = "default_pattern")]
    pub pattern: String,
    /// Pattern argument (step for `stride`).
    #[serde(default = "default_pattern_arg")]
    pub pattern_arg: usize,
    /// Whether to stream the per-size latency table.
    #[serde(default = "default_true")]
    pub print_table: bool,
    /// Fixed PRNG seed for reproducible orders; `None` mixes entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_min_bytes() -> usize {
    4096
}
fn default_max_bytes() -> usize {
    256 << 20
}
fn default_node_stride() -> usize {
    256
}
fn default_target_ms() -> u64 {
    80
}
fn default_repeats() -> u32 {
    3
}
fn default_warmup_iters() -> u32 {
    3
}
fn default_pattern() -> String {
    "random".to_string()
}
fn default_pattern_arg() -> usize {
    1
}
fn default_true() -> bool {
    true
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            min_bytes: default_min_bytes(),
            max_bytes: default_max_bytes(),
            node_stride: default_node_stride(),
            target_ms: default_target_ms(),
            repeats: default_repeats(),
            warmup_iters: default_warmup_iters(),
            pattern: default_pattern(),
            pattern_arg: default_pattern_arg(),
            print_table: true,
            seed: None,
        }
    }
}

impl ProbeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, RunnerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RunnerError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, RunnerError> {
        toml::from_str(toml_str)
            .map_err(|e| RunnerError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, RunnerError> {
        toml::to_string_pretty(self)
            .map_err(|e| RunnerError::Config(format!("TOML serialise error: {e}")))
    }

    /// Resolves the pattern name. Unknown names fall back to random.
    pub fn resolve_pattern(&self) -> Pattern {
        Pattern::parse(&self.pattern)
    }

    /// Validates the stride and applies the size clamps:
    /// `min_bytes` is raised so at least two nodes fit, `max_bytes` is
    /// kept within `min_bytes..=4 GiB` (or the address limit).
    pub fn normalise(&mut self) -> Result<(), RunnerError> {
        chase_core::validate_node_stride(self.node_stride)
            .map_err(|e| RunnerError::Config(e.to_string()))?;

        let ceiling = MAX_BYTES_CEILING.min(usize::MAX as u64) as usize;
        self.min_bytes = clamp_size(self.min_bytes, self.node_stride * 2, self.max_bytes);
        self.max_bytes = clamp_size(self.max_bytes, self.min_bytes, ceiling);
        Ok(())
    }
}

/// Clamp with lower-bound precedence: an empty range resolves to `lo`.
fn clamp_size(value: usize, lo: usize, hi: usize) -> usize {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// Parses a human-readable byte count: a plain integer, or an integer
/// with a `K`, `M` or `G` suffix (optionally followed by `B`),
/// case-insensitive. Suffixes are binary: `"4K"` is 4096.
pub fn parse_size(s: &str) -> Result<usize, RunnerError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(RunnerError::Config("empty size value".to_string()));
    }

    let upper = s.to_uppercase();
    let (num_str, multiplier) = if upper.ends_with("GB") {
        (&s[..s.len() - 2], 1usize << 30)
    } else if upper.ends_with('G') {
        (&s[..s.len() - 1], 1 << 30)
    } else if upper.ends_with("MB") {
        (&s[..s.len() - 2], 1 << 20)
    } else if upper.ends_with('M') {
        (&s[..s.len() - 1], 1 << 20)
    } else if upper.ends_with("KB") {
        (&s[..s.len() - 2], 1 << 10)
    } else if upper.ends_with('K') {
        (&s[..s.len() - 1], 1 << 10)
    } else if upper.ends_with('B') {
        (&s[..s.len() - 1], 1)
    } else {
        (s, 1)
    };

    let value: usize = num_str.trim().parse().map_err(|_| {
        RunnerError::Config(format!(
            "invalid size '{s}': expected a number with an optional K/M/G suffix"
        ))
    })?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| RunnerError::Config(format!("size '{s}' overflows")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = ProbeConfig::default();
        assert_eq!(c.min_bytes, 4096);
        assert_eq!(c.max_bytes, 256 << 20);
        assert_eq!(c.node_stride, 256);
        assert_eq!(c.target_ms, 80);
        assert_eq!(c.repeats, 3);
        assert_eq!(c.pattern, "random");
        assert!(c.print_table);
        assert!(c.seed.is_none());
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
min_bytes = 8192
max_bytes = 1048576
pattern = "gray"
seed = 7
"#;
        let c = ProbeConfig::from_toml(toml).unwrap();
        assert_eq!(c.min_bytes, 8192);
        assert_eq!(c.max_bytes, 1 << 20);
        assert_eq!(c.pattern, "gray");
        assert_eq!(c.seed, Some(7));
        // Unspecified fields keep their defaults.
        assert_eq!(c.node_stride, 256);
        assert_eq!(c.repeats, 3);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = ProbeConfig {
            pattern: "stride".into(),
            pattern_arg: 7,
            seed: Some(99),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = ProbeConfig::from_toml(&toml).unwrap();
        assert_eq!(back.pattern, c.pattern);
        assert_eq!(back.pattern_arg, c.pattern_arg);
        assert_eq!(back.seed, c.seed);
    }

    #[test]
    fn test_resolve_pattern() {
        let c = ProbeConfig {
            pattern: "bitreverse".into(),
            ..Default::default()
        };
        assert_eq!(c.resolve_pattern(), Pattern::Bitrev);
    }

    #[test]
    fn test_normalise_raises_min_to_two_nodes() {
        let mut c = ProbeConfig {
            min_bytes: 16,
            ..Default::default()
        };
        c.normalise().unwrap();
        assert_eq!(c.min_bytes, 512);
    }

    #[test]
    fn test_normalise_caps_max_at_4gib() {
        let mut c = ProbeConfig {
            max_bytes: usize::MAX,
            ..Default::default()
        };
        c.normalise().unwrap();
        assert_eq!(c.max_bytes as u64, (4u64 << 30).min(usize::MAX as u64));
    }

    #[test]
    fn test_normalise_raises_max_to_min() {
        let mut c = ProbeConfig {
            min_bytes: 1 << 20,
            max_bytes: 4096,
            ..Default::default()
        };
        c.normalise().unwrap();
        assert!(c.max_bytes >= c.min_bytes);
    }

    #[test]
    fn test_normalise_rejects_bad_stride() {
        let mut c = ProbeConfig {
            node_stride: 8,
            ..Default::default()
        };
        assert!(matches!(c.normalise(), Err(RunnerError::Config(_))));
    }

    #[test]
    fn test_parse_size_plain_and_suffixed() {
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("4K").unwrap(), 4096);
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("4KB").unwrap(), 4096);
        assert_eq!(parse_size("256M").unwrap(), 256 << 20);
        assert_eq!(parse_size("1G").unwrap(), 1 << 30);
        assert_eq!(parse_size("100B").unwrap(), 100);
        assert_eq!(parse_size("  64K  ").unwrap(), 64 << 10);
    }

    #[test]
    fn test_parse_size_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("12Q").is_err());
    }
}
