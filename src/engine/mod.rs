// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The declarative dependency-injection executor: named computations
//! declare their dependencies, and the runtime resolves the transitive
//! graph rooted at a requested target, executes each node exactly once in
//! a priority-respecting, dependency-satisfied order, and returns the
//! target's value.

mod graph;
mod input;
mod registry;
mod resolver;
mod scheduler;
mod value;

#[cfg(test)]
mod scenario_tests;

pub use graph::{Graph, InvocationId, InvocationNode, NodeKind};
pub use input::Input;
pub use registry::{Body, DepRef, Descriptor, NodeId, Priority, Registry, DEFAULT_PRIORITY, INPUT_PRIORITY};
pub use resolver::{resolve, Target};
pub use value::{Receiver, ReceiverToken, Value};

use crate::errors::ExecutionError;

/// Resolve `target` against `registry` using `inputs`, then run the graph
/// to completion and return the target's value.
///
/// This is the library's single external entry point for running a
/// computation: registration happens ahead of time against a `Registry`,
/// then `execute` is called once per invocation of the surrounding tool.
pub fn execute(registry: &Registry, target: impl Into<Target>, inputs: &[Input]) -> Result<Value, ExecutionError> {
    let graph = resolve(registry, target.into(), inputs)?;
    scheduler::execute(graph)
}
