// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the driver tier.

/// Errors that can occur while configuring or running a probe.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The effective configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// A chase primitive failed (clock or allocation).
    #[error("chase error: {0}")]
    Chase(#[from] chase_core::ChaseError),

    /// The measurement loop rejected a request.
    #[error("sampler error: {0}")]
    Sampler(#[from] sampler::SamplerError),
}
