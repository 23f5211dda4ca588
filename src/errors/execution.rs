// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while a graph is scheduled and executed.

use thiserror::Error;

use super::ResolveError;

/// Errors that can occur during [`crate::engine::execute`].
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// Building the graph for the requested target failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A node body returned an error. Propagates unchanged: no wrapping
    /// beyond this variant, no retry, no partial result.
    #[error("node body failed: {0}")]
    BodyFailure(#[from] anyhow::Error),

    /// The scheduler exceeded its iteration cap without completing.
    ///
    /// On a valid DAG with finite fan-out this is never reached; it
    /// indicates an internal invariant violation (a cycle that slipped
    /// past resolution, or a broken identity/equality implementation).
    #[error("scheduler exceeded {0} iterations without completing")]
    Overflow(u64),
}
