// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while building an execution graph for a target.

use thiserror::Error;

use crate::engine::NodeId;

/// Errors that can occur while the resolver walks declared dependencies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A dependency reference names a descriptor that was never registered.
    #[error("no descriptor is registered for {0:?}")]
    UnknownDescriptor(NodeId),

    /// A symbolic `"a.b.c"` reference could not be walked to a bound method.
    #[error("symbolic reference '{0}' could not be resolved to a bound method")]
    UnresolvableReference(String),

    /// An input marker was depended on but not supplied to `execute`.
    #[error("input '{0}' was depended on but not supplied to execute")]
    MissingInput(String),

    /// Resolving a dependency re-entered a node that is still being built.
    ///
    /// Caught here so a cyclic registration fails fast instead of
    /// livelocking the scheduler's step-bump requeue until the iteration
    /// cap trips.
    #[error("cyclic dependency detected while resolving {0:?}")]
    CyclicDependency(NodeId),
}
