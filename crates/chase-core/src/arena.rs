// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The node arena: a stride-aligned raw allocation holding the chase
//! cycle.
//!
//! The arena is a contiguous byte region carved into fixed-size cells of
//! `node_stride` bytes. The first pointer-width word of each cell holds
//! the address of the next cell in the cycle; the remaining bytes are
//! padding that keeps consecutive chase loads on different cache lines
//! (the stride is chosen larger than any plausible line).
//!
//! The arena owns its allocation RAII-style: [`ChaseArena::allocate`]
//! obtains zeroed memory with an explicit [`Layout`] (a `Vec<u8>` cannot
//! guarantee stride alignment), and `Drop` returns it.

use crate::ChaseError;
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::ptr::NonNull;

/// A stride-aligned allocation of chase nodes.
#[derive(Debug)]
pub struct ChaseArena {
    base: NonNull<u8>,
    layout: Layout,
    node_stride: usize,
}

impl ChaseArena {
    /// Allocates a zeroed arena of `capacity_bytes` aligned to the node
    /// stride (rounded up to a power of two, so the base address is
    /// aligned to *at least* the stride).
    ///
    /// Fails with [`ChaseError::AllocationFailed`] when the allocator
    /// returns null — the caller decides whether to retry smaller.
    pub fn allocate(capacity_bytes: usize, node_stride: usize) -> Result<Self, ChaseError> {
        validate_node_stride(node_stride)?;
        if capacity_bytes < node_stride * 2 {
            return Err(ChaseError::ArenaTooSmall {
                capacity: capacity_bytes,
                node_stride,
            });
        }

        let align = node_stride.next_power_of_two();
        let layout = Layout::from_size_align(capacity_bytes, align).map_err(|_| {
            ChaseError::AllocationFailed {
                size: capacity_bytes,
                align,
            }
        })?;
        let raw = unsafe { alloc_zeroed(layout) };
        let base = NonNull::new(raw).ok_or(ChaseError::AllocationFailed {
            size: capacity_bytes,
            align,
        })?;

        Ok(Self {
            base,
            layout,
            node_stride,
        })
    }

    /// Total bytes in the arena.
    pub fn capacity(&self) -> usize {
        self.layout.size()
    }

    /// Byte distance between consecutive nodes.
    pub fn node_stride(&self) -> usize {
        self.node_stride
    }

    /// Number of whole nodes the arena can hold.
    pub fn max_nodes(&self) -> usize {
        self.layout.size() / self.node_stride
    }

    /// Address of node 0, where every chase starts.
    pub fn head(&self) -> *const u8 {
        self.base.as_ptr()
    }

    /// Address of the node at `index`.
    pub fn node_ptr(&self, index: usize) -> *const u8 {
        assert!(index < self.max_nodes(), "node index out of bounds");
        unsafe { self.base.as_ptr().add(index * self.node_stride) }
    }

    /// Writes the Hamiltonian cycle induced by `order` into the arena:
    /// the node at `order[i]` points to the node at `order[(i+1) mod n]`.
    ///
    /// Only the first pointer-sized word of each node is written. The
    /// previous cycle, if any, is simply overwritten — every node gets
    /// exactly one incoming and one outgoing edge per call.
    ///
    /// # Panics
    /// Panics when `order` holds fewer than two indices or more than
    /// [`max_nodes`](Self::max_nodes); indices must be a permutation of
    /// `[0, order.len())` for the result to be a single cycle.
    pub fn link_cycle(&mut self, order: &[usize]) {
        let n = order.len();
        assert!(n >= 2, "a chase cycle needs at least two nodes");
        assert!(n <= self.max_nodes(), "order exceeds arena capacity");
        let base = self.base.as_ptr();
        for i in 0..n {
            let from = order[i];
            let to = order[(i + 1) % n];
            assert!(from < n && to < n, "order index out of range");
            unsafe {
                let slot = base.add(from * self.node_stride) as *mut *const u8;
                slot.write(base.add(to * self.node_stride) as *const u8);
            }
        }
    }
}

impl Drop for ChaseArena {
    fn drop(&mut self) {
        unsafe { dealloc(self.base.as_ptr(), self.layout) };
    }
}

/// Checks that a node stride can hold an aligned pointer in every node:
/// at least twice the pointer size, and a multiple of pointer alignment.
pub fn validate_node_stride(stride: usize) -> Result<(), ChaseError> {
    let ptr_size = std::mem::size_of::<*const u8>();
    let ptr_align = std::mem::align_of::<*const u8>();
    if stride < ptr_size * 2 {
        return Err(ChaseError::InvalidStride {
            stride,
            reason: format!("must be at least twice the pointer size ({} bytes)", ptr_size * 2),
        });
    }
    if stride % ptr_align != 0 {
        return Err(ChaseError::InvalidStride {
            stride,
            reason: format!("must be a multiple of the pointer alignment ({ptr_align} bytes)"),
        });
    }
    Ok(())
}
