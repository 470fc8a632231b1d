// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The pointer-chase kernel.
//!
//! This is the loop the whole benchmark exists to time: `steps`
//! dependent pointer-width loads, where each load's result is the next
//! load's address. The data dependency defeats out-of-order overlap, so
//! the elapsed time divided by `steps` is the true access latency of
//! whatever cache tier the working set occupies.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-global sink for the final chase pointer.
///
/// Written once per [`chase`] call and never read; it exists solely so
/// the optimizer cannot prove the loop result dead. Not a logging or
/// debugging hook.
static CHASE_SINK: AtomicUsize = AtomicUsize::new(0);

/// Follows the next-pointer chain `steps` times starting at `head` and
/// returns the final pointer.
///
/// Each iteration is a volatile load, so the compiler must issue a real
/// memory access per step even when the target looks loop-invariant.
/// The function is never inlined, so a caller with a statically known
/// head cannot constant-fold the walk, and the final pointer escapes
/// into the process-global sink. No prefetch hints are issued; the
/// hardware prefetchers are the subject under test.
///
/// # Safety
///
/// `head` must point at a node of an arena whose cycle has been written
/// by [`ChaseArena::link_cycle`](crate::ChaseArena::link_cycle), and the
/// arena must stay alive for the duration of the call.
#[inline(never)]
pub unsafe fn chase(head: *const u8, steps: u64) -> *const u8 {
    let mut p = head;
    for _ in 0..steps {
        p = std::ptr::read_volatile(p.cast::<*const u8>());
    }
    CHASE_SINK.store(p as usize, Ordering::Relaxed);
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_order, ChaseArena, Pattern, Rng64};

    #[test]
    fn test_full_lap_returns_to_head() {
        let n = 16;
        let mut arena = ChaseArena::allocate(n * 256, 256).unwrap();
        let mut order = vec![0usize; n];
        build_order(&mut order, Pattern::Random, 1, &mut Rng64::new(21));
        arena.link_cycle(&order);

        let head = arena.head();
        let p = unsafe { chase(head, n as u64) };
        assert_eq!(p, head);
    }

    #[test]
    fn test_partial_walk_lands_inside_arena() {
        let n = 16;
        let mut arena = ChaseArena::allocate(n * 256, 256).unwrap();
        let mut order = vec![0usize; n];
        build_order(&mut order, Pattern::Gray, 1, &mut Rng64::new(2));
        arena.link_cycle(&order);

        let p = unsafe { chase(arena.head(), 5) };
        let offset = p as usize - arena.head() as usize;
        assert!(offset < arena.capacity());
        assert_eq!(offset % 256, 0);
    }

    #[test]
    fn test_zero_steps_is_identity() {
        let mut arena = ChaseArena::allocate(512, 256).unwrap();
        arena.link_cycle(&[0, 1]);
        let p = unsafe { chase(arena.node_ptr(1), 0) };
        assert_eq!(p, arena.node_ptr(1));
    }

    #[test]
    fn test_two_node_cycle_alternates() {
        let mut arena = ChaseArena::allocate(512, 256).unwrap();
        arena.link_cycle(&[0, 1]);
        unsafe {
            assert_eq!(chase(arena.head(), 1), arena.node_ptr(1));
            assert_eq!(chase(arena.head(), 2), arena.node_ptr(0));
            assert_eq!(chase(arena.head(), 7), arena.node_ptr(1));
        }
    }
}
