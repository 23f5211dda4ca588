// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for registry, resolver and scheduler events.

use std::fmt::{self, Display, Formatter};

use crate::engine::{NodeId, Priority};

/// A computation was registered against the registry.
pub struct NodeRegistered {
    pub id: NodeId,
    pub priority: Priority,
    pub dep_count: usize,
}

impl Display for NodeRegistered {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registered {:?} with {} dependencies at priority {}",
            self.id, self.dep_count, self.priority
        )
    }
}

/// Resolving the execution graph for a target failed.
pub struct ResolutionFailed<'a> {
    pub reason: &'a str,
}

impl Display for ResolutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "graph resolution failed: {}", self.reason)
    }
}

/// A node was not ready and was requeued behind fresher work.
pub struct NodeRequeued {
    pub step: u64,
}

impl Display for NodeRequeued {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "requeued not-ready node at step {}", self.step)
    }
}

/// A node's body ran to completion.
pub struct NodeExecuted {
    pub priority: Priority,
}

impl Display for NodeExecuted {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "executed node at priority {}", self.priority)
    }
}
