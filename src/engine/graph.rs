// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The concrete execution graph built by the resolver.

use std::collections::HashMap;
use std::sync::Arc;

use super::registry::{Body, NodeId, Priority};
use super::value::{Receiver, ReceiverToken, Value};

/// Identity of an invocation node within one execution graph.
///
/// Two invocation nodes compare equal iff their `InvocationId`s are equal:
/// an input node by name, everything else by `(descriptor, receiver)`.
/// This is the identity the resolver memoizes against and the scheduler
/// deduplicates by — the same descriptor reached twice through the same
/// receiver collapses to one node; reached through two distinct receivers
/// it is two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InvocationId {
    Input(&'static str),
    Bound(NodeId, Option<ReceiverToken>),
}

/// What an invocation node does when its children are ready.
pub enum NodeKind {
    /// Return the supplied value, unconditionally.
    Input(Value),
    /// Invoke `body` with the bound receiver (if any) prepended to the
    /// children's results, in declared order.
    Computed {
        body: Body,
        receiver: Option<Arc<dyn Receiver>>,
    },
}

/// A concrete instance of a descriptor within one execution graph.
pub struct InvocationNode {
    pub id: InvocationId,
    pub kind: NodeKind,
    pub children: Vec<InvocationId>,
    pub priority: Priority,
}

/// A fresh, execution-local DAG: every distinct invocation reachable from
/// `root`, keyed by identity so shared dependencies are stored once.
pub struct Graph {
    pub nodes: HashMap<InvocationId, InvocationNode>,
    pub root: InvocationId,
}
