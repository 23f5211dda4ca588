// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A priority queue scheduler that executes an execution graph exactly
//! once and returns the root's result.
//!
//! Ordering is `(step, priority, insertion_seq)` ascending: dependencies
//! always win over priority (an unready node is requeued with its step
//! bumped, drifting it behind fresher work instead of spinning); among
//! ready nodes, lower priority runs first, ties broken by insertion
//! order.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::errors::ExecutionError;
use crate::observability::messages::{NodeExecuted, NodeRequeued};

use super::graph::{Graph, InvocationId, NodeKind};
use super::value::Value;

/// Diagnostic-only hard cap. On a valid DAG with finite fan-out this is
/// never reached; exceeding it indicates an internal invariant violation
/// (a cycle that slipped past resolution, or a broken identity/equality
/// implementation), not "the graph is legitimately huge".
const MAX_ITERATIONS: u64 = 100_000;

#[derive(Clone)]
struct ScheduledInvocation {
    id: InvocationId,
    step: u64,
    priority: i64,
    seq: u64,
}

impl PartialEq for ScheduledInvocation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScheduledInvocation {}

impl PartialOrd for ScheduledInvocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledInvocation {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; invert every comparison so the entry
        // with the lowest (step, priority, seq) is the one popped first.
        other
            .step
            .cmp(&self.step)
            .then_with(|| other.priority.cmp(&self.priority))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Run `graph` to completion and return the root invocation's result.
pub fn execute(graph: Graph) -> Result<Value, ExecutionError> {
    let mut heap = BinaryHeap::with_capacity(graph.nodes.len());
    let mut seq: u64 = 0;

    for node in graph.nodes.values() {
        heap.push(ScheduledInvocation {
            id: node.id.clone(),
            step: 0,
            priority: node.priority,
            seq,
        });
        seq += 1;
    }

    let mut results: HashMap<InvocationId, Value> = HashMap::with_capacity(graph.nodes.len());
    let mut iterations: u64 = 0;

    while let Some(entry) = heap.pop() {
        iterations += 1;
        if iterations > MAX_ITERATIONS {
            return Err(ExecutionError::Overflow(MAX_ITERATIONS));
        }

        let node = graph
            .nodes
            .get(&entry.id)
            .expect("every scheduled id was seeded from this graph's own nodes");

        let mut dep_results = Vec::with_capacity(node.children.len());
        let mut ready = true;
        for child in &node.children {
            match results.get(child) {
                Some(value) => dep_results.push(value.clone()),
                None => {
                    ready = false;
                    break;
                }
            }
        }

        if !ready {
            tracing::trace!("{}", NodeRequeued { step: entry.step + 1 });
            heap.push(ScheduledInvocation {
                id: entry.id.clone(),
                step: entry.step + 1,
                priority: entry.priority,
                seq,
            });
            seq += 1;
            continue;
        }

        let value = match &node.kind {
            NodeKind::Input(value) => value.clone(),
            NodeKind::Computed { body, receiver } => {
                let mut call_args = Vec::with_capacity(dep_results.len() + 1);
                if let Some(receiver) = receiver {
                    call_args.push(receiver.clone().to_value());
                }
                call_args.extend(dep_results);
                body(&call_args)?
            }
        };

        tracing::trace!("{}", NodeExecuted { priority: entry.priority });

        if entry.id == graph.root {
            return Ok(value);
        }

        results.insert(entry.id, value);
    }

    Err(ExecutionError::Overflow(MAX_ITERATIONS))
}
