// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Traversal orders over the node arena.
//!
//! Every builder fills a caller-provided slice with a permutation of
//! `[0, n)`. The random order is the measurement default: it defeats
//! stride and stream prefetchers, so the latency floor tracks the cache
//! level the working set lands in. The deterministic orders exist to
//! study how effective the prefetchers are under orderings ranging from
//! adversarial (bitrev) to friendly (sequential).

use crate::Rng64;
use std::fmt;

/// Node traversal order for the chase cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pattern {
    /// Fisher–Yates shuffle of the identity permutation.
    Random,
    /// Identity: node i follows node i−1.
    Sequential,
    /// Descending: `n−1, n−2, …, 0`.
    Reverse,
    /// Repeated advance by a fixed step modulo n; orbits concatenated.
    Stride,
    /// First and second halves interleaved: `0, n/2, 1, n/2+1, …`.
    Interleave,
    /// Gray-code sequence over the largest power-of-two prefix.
    Gray,
    /// Bit-reversed indices.
    Bitrev,
}

impl Pattern {
    /// Parses a pattern name, accepting the short and long spellings.
    ///
    /// Unknown names fall back to [`Pattern::Random`] with a warning,
    /// never an error: a misspelled pattern should still produce a
    /// valid (if not the intended) measurement.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "random" => Self::Random,
            "seq" | "sequential" => Self::Sequential,
            "reverse" => Self::Reverse,
            "stride" => Self::Stride,
            "interleave" => Self::Interleave,
            "gray" | "graycode" => Self::Gray,
            "bitrev" | "bitreverse" => Self::Bitrev,
            other => {
                tracing::warn!("unknown pattern '{other}'; falling back to random");
                Self::Random
            }
        }
    }

    /// Canonical short name, as printed in the table header.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Sequential => "seq",
            Self::Reverse => "reverse",
            Self::Stride => "stride",
            Self::Interleave => "interleave",
            Self::Gray => "gray",
            Self::Bitrev => "bitrev",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fills `order` with a permutation of `[0, order.len())` under the
/// given pattern.
///
/// `pattern_arg` is the step for [`Pattern::Stride`] (clamped to ≥ 1)
/// and ignored by every other pattern. The RNG is only consumed by
/// [`Pattern::Random`].
pub fn build_order(order: &mut [usize], pattern: Pattern, pattern_arg: usize, rng: &mut Rng64) {
    match pattern {
        Pattern::Random => build_random(order, rng),
        Pattern::Sequential => build_sequential(order),
        Pattern::Reverse => build_reverse(order),
        Pattern::Stride => build_stride(order, pattern_arg.max(1)),
        Pattern::Interleave => build_interleave(order),
        Pattern::Gray => build_gray(order),
        Pattern::Bitrev => build_bitrev(order),
    }
}

fn build_random(order: &mut [usize], rng: &mut Rng64) {
    build_sequential(order);
    for i in (1..order.len()).rev() {
        let j = rng.uniform(i as u64 + 1) as usize;
        order.swap(i, j);
    }
}

fn build_sequential(order: &mut [usize]) {
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = i;
    }
}

fn build_reverse(order: &mut [usize]) {
    let n = order.len();
    for (i, slot) in order.iter_mut().enumerate() {
        *slot = n - 1 - i;
    }
}

/// Walks `i → (i + k) mod n` until the orbit closes, then restarts from
/// the next unvisited index. When gcd(k, n) = 1 this is a single orbit.
fn build_stride(order: &mut [usize], k: usize) {
    let n = order.len();
    if n == 0 {
        return;
    }
    let mut visited = vec![false; n];
    let mut count = 0;
    let mut start = 0;
    while count < n {
        let mut i = start;
        while !visited[i] {
            order[count] = i;
            count += 1;
            visited[i] = true;
            i = (i + k) % n;
        }
        if count < n {
            while start < n && visited[start] {
                start += 1;
            }
            if start >= n {
                break;
            }
        }
    }
}

fn build_interleave(order: &mut [usize]) {
    let n = order.len();
    let half = n / 2;
    let mut out = 0;
    for i in 0..half {
        order[out] = i;
        out += 1;
        order[out] = i + half;
        out += 1;
    }
    if n % 2 == 1 {
        order[out] = n - 1;
    }
}

/// Gray code over the largest power-of-two prefix m ≤ n; indices in
/// `[m, n)` are appended in order.
fn build_gray(order: &mut [usize]) {
    let n = order.len();
    if n == 0 {
        return;
    }
    let mut m = 1usize;
    while (m << 1) > m && (m << 1) <= n {
        m <<= 1;
    }
    for i in 0..m {
        order[i] = i ^ (i >> 1);
    }
    for i in m..n {
        order[i] = i;
    }
}

fn build_bitrev(order: &mut [usize]) {
    let n = order.len();
    if n == 0 {
        return;
    }
    let bits = usize::BITS - (n - 1).leading_zeros();
    let mut out = 0;
    for i in 0..(1usize << bits) {
        let rev = reverse_bits(i, bits);
        if rev < n {
            order[out] = rev;
            out += 1;
        }
        if out == n {
            break;
        }
    }
}

fn reverse_bits(x: usize, bits: u32) -> usize {
    let mut r = 0;
    for b in 0..bits {
        r = (r << 1) | ((x >> b) & 1);
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_PATTERNS: [Pattern; 7] = [
        Pattern::Random,
        Pattern::Sequential,
        Pattern::Reverse,
        Pattern::Stride,
        Pattern::Interleave,
        Pattern::Gray,
        Pattern::Bitrev,
    ];

    fn build(pattern: Pattern, n: usize, arg: usize) -> Vec<usize> {
        let mut order = vec![0usize; n];
        let mut rng = Rng64::new(99);
        build_order(&mut order, pattern, arg, &mut rng);
        order
    }

    fn assert_permutation(order: &[usize]) {
        let mut sorted = order.to_vec();
        sorted.sort_unstable();
        let identity: Vec<usize> = (0..order.len()).collect();
        assert_eq!(sorted, identity, "not a permutation: {order:?}");
    }

    #[test]
    fn test_every_pattern_is_a_permutation() {
        for pattern in ALL_PATTERNS {
            for n in [2usize, 3, 5, 7, 8, 16, 63, 64, 100, 1000] {
                for arg in [1usize, 2, 3, 7] {
                    assert_permutation(&build(pattern, n, arg));
                }
            }
        }
    }

    #[test]
    fn test_sequential_is_identity() {
        assert_eq!(build(Pattern::Sequential, 5, 1), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_reverse() {
        assert_eq!(build(Pattern::Reverse, 5, 1), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_stride_single_orbit() {
        // gcd(3, 8) = 1: one orbit covers everything.
        assert_eq!(build(Pattern::Stride, 8, 3), vec![0, 3, 6, 1, 4, 7, 2, 5]);
    }

    #[test]
    fn test_stride_multiple_orbits() {
        // gcd(2, 8) = 2: the even orbit closes, then the odd one runs.
        assert_eq!(build(Pattern::Stride, 8, 2), vec![0, 2, 4, 6, 1, 3, 5, 7]);
    }

    #[test]
    fn test_stride_step_zero_treated_as_one() {
        assert_eq!(build(Pattern::Stride, 4, 0), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_interleave_even() {
        assert_eq!(build(Pattern::Interleave, 8, 1), vec![0, 4, 1, 5, 2, 6, 3, 7]);
    }

    #[test]
    fn test_interleave_odd_appends_last() {
        assert_eq!(build(Pattern::Interleave, 5, 1), vec![0, 2, 1, 3, 4]);
    }

    #[test]
    fn test_gray_power_of_two() {
        assert_eq!(build(Pattern::Gray, 8, 1), vec![0, 1, 3, 2, 6, 7, 5, 4]);
    }

    #[test]
    fn test_gray_with_tail() {
        // m = 4, then 4 and 5 appended in order.
        assert_eq!(build(Pattern::Gray, 6, 1), vec![0, 1, 3, 2, 4, 5]);
    }

    #[test]
    fn test_bitrev_power_of_two() {
        assert_eq!(build(Pattern::Bitrev, 8, 1), vec![0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn test_random_deterministic_for_seed() {
        let mut a = vec![0usize; 64];
        let mut b = vec![0usize; 64];
        build_order(&mut a, Pattern::Random, 1, &mut Rng64::new(5));
        build_order(&mut b, Pattern::Random, 1, &mut Rng64::new(5));
        assert_eq!(a, b);
        assert_permutation(&a);
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Pattern::parse("random"), Pattern::Random);
        assert_eq!(Pattern::parse("seq"), Pattern::Sequential);
        assert_eq!(Pattern::parse("sequential"), Pattern::Sequential);
        assert_eq!(Pattern::parse("gray"), Pattern::Gray);
        assert_eq!(Pattern::parse("graycode"), Pattern::Gray);
        assert_eq!(Pattern::parse("bitrev"), Pattern::Bitrev);
        assert_eq!(Pattern::parse("bitreverse"), Pattern::Bitrev);
        assert_eq!(Pattern::parse("  Stride "), Pattern::Stride);
    }

    #[test]
    fn test_parse_unknown_falls_back_to_random() {
        assert_eq!(Pattern::parse("zigzag"), Pattern::Random);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Pattern::Sequential.to_string(), "seq");
        assert_eq!(Pattern::Bitrev.to_string(), "bitrev");
    }
}
