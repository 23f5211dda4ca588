// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Builds an execution graph for a target computation and a set of
//! inputs, resolving symbolic references against receivers along the
//! way.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::errors::ResolveError;
use crate::observability::messages::ResolutionFailed;

use super::graph::{Graph, InvocationId, InvocationNode, NodeKind};
use super::input::Input;
use super::registry::{DepRef, NodeId, Registry, INPUT_PRIORITY};
use super::value::{Receiver, ReceiverToken, Value};

/// What `execute` resolves: either a plain computation, or a method
/// already bound to a receiver (the caller already holds the concrete
/// receiver, so no symbolic string is needed at the top level — symbolic
/// references only arise *inside* declared dependency lists).
pub enum Target {
    Plain(NodeId),
    Bound(NodeId, Arc<dyn Receiver>),
}

impl From<NodeId> for Target {
    fn from(id: NodeId) -> Self {
        Target::Plain(id)
    }
}

/// Build the execution graph rooted at `target`, using `inputs` to
/// satisfy any `Input` dependency references reached along the way.
pub fn resolve(registry: &Registry, target: Target, inputs: &[Input]) -> Result<Graph, ResolveError> {
    let inputs_by_name: HashMap<&str, &Value> = inputs
        .iter()
        .filter_map(|input| input.value.as_ref().map(|value| (input.name, value)))
        .collect();

    let mut nodes = HashMap::new();
    let mut in_progress = HashSet::new();

    let root = match target {
        Target::Plain(id) => resolve_bound(registry, id, None, &inputs_by_name, &mut nodes, &mut in_progress),
        Target::Bound(id, receiver) => {
            resolve_bound(registry, id, Some(receiver), &inputs_by_name, &mut nodes, &mut in_progress)
        }
    };

    let root = root.map_err(|err| {
        tracing::debug!("{}", ResolutionFailed { reason: &err.to_string() });
        err
    })?;

    Ok(Graph { nodes, root })
}

/// Resolve (and memoize) the invocation for `node_id` bound to `receiver`.
///
/// A direct descriptor reference always passes `receiver = None`, which
/// resets the in-scope receiver for its own sub-resolution — a bare
/// function has no receiver, even when reached from inside a
/// symbolic-resolution subtree.
fn resolve_bound(
    registry: &Registry,
    node_id: NodeId,
    receiver: Option<Arc<dyn Receiver>>,
    inputs_by_name: &HashMap<&str, &Value>,
    nodes: &mut HashMap<InvocationId, InvocationNode>,
    in_progress: &mut HashSet<InvocationId>,
) -> Result<InvocationId, ResolveError> {
    let token = receiver.as_ref().map(ReceiverToken::of);
    let id = InvocationId::Bound(node_id, token);

    if nodes.contains_key(&id) {
        return Ok(id);
    }
    if !in_progress.insert(id.clone()) {
        return Err(ResolveError::CyclicDependency(node_id));
    }

    let descriptor = registry
        .get(node_id)
        .ok_or(ResolveError::UnknownDescriptor(node_id))?;

    let mut children = Vec::with_capacity(descriptor.deps.len());
    for dep in &descriptor.deps {
        children.push(resolve_dep(
            registry,
            dep,
            receiver.as_ref(),
            inputs_by_name,
            nodes,
            in_progress,
        )?);
    }

    in_progress.remove(&id);

    nodes.insert(
        id.clone(),
        InvocationNode {
            id: id.clone(),
            kind: NodeKind::Computed {
                body: descriptor.body.clone(),
                receiver,
            },
            children,
            priority: descriptor.priority,
        },
    );

    Ok(id)
}

fn resolve_dep(
    registry: &Registry,
    dep: &DepRef,
    current_receiver: Option<&Arc<dyn Receiver>>,
    inputs_by_name: &HashMap<&str, &Value>,
    nodes: &mut HashMap<InvocationId, InvocationNode>,
    in_progress: &mut HashSet<InvocationId>,
) -> Result<InvocationId, ResolveError> {
    match dep {
        DepRef::Input(name) => resolve_input(name, inputs_by_name, nodes),
        DepRef::Node(node_id) => resolve_bound(registry, *node_id, None, inputs_by_name, nodes, in_progress),
        DepRef::Symbolic(path) => {
            let receiver = current_receiver
                .ok_or_else(|| ResolveError::UnresolvableReference((*path).to_string()))?;
            let (node_id, bound_receiver) = walk_symbolic(receiver, path)
                .ok_or_else(|| ResolveError::UnresolvableReference((*path).to_string()))?;
            resolve_bound(registry, node_id, Some(bound_receiver), inputs_by_name, nodes, in_progress)
        }
    }
}

fn resolve_input(
    name: &'static str,
    inputs_by_name: &HashMap<&str, &Value>,
    nodes: &mut HashMap<InvocationId, InvocationNode>,
) -> Result<InvocationId, ResolveError> {
    let id = InvocationId::Input(name);
    if nodes.contains_key(&id) {
        return Ok(id);
    }

    let value = inputs_by_name
        .get(name)
        .ok_or_else(|| ResolveError::MissingInput(name.to_string()))?;

    nodes.insert(
        id.clone(),
        InvocationNode {
            id: id.clone(),
            kind: NodeKind::Input((*value).clone()),
            children: Vec::new(),
            priority: INPUT_PRIORITY,
        },
    );

    Ok(id)
}

/// Walk a dotted path against `receiver`: every token but the last is a
/// `child()` hop, the last token must resolve to a `method()` terminal.
/// A single-token path (no dots) resolves the method directly on
/// `receiver`.
fn walk_symbolic(receiver: &Arc<dyn Receiver>, path: &str) -> Option<(NodeId, Arc<dyn Receiver>)> {
    let tokens: Vec<&str> = path.split('.').collect();
    let (last, rest) = tokens.split_last()?;

    let mut current = receiver.clone();
    for token in rest {
        current = current.child(token)?;
    }

    current.method(last)
}
