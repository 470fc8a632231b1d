// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the measurement loop.

/// Errors that can occur while measuring a working set.
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    /// The requested working set does not fit in the arena.
    #[error("working set of {requested} bytes exceeds arena capacity of {capacity} bytes")]
    WorkingSetTooLarge { requested: usize, capacity: usize },
}
