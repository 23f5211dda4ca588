// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The process-wide mapping from a registered computation to its
//! descriptor.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistrationError;
use crate::observability::messages::NodeRegistered;

use super::value::Value;

/// Priority ordering preference among ready nodes; lower runs earlier.
/// Input markers are fixed at [`INPUT_PRIORITY`]; everything else
/// defaults to [`DEFAULT_PRIORITY`] unless overridden at registration.
pub type Priority = i64;

pub const DEFAULT_PRIORITY: Priority = 100;
pub const INPUT_PRIORITY: Priority = -1;

/// A stable opaque handle issued at registration, used as the registry's
/// map key instead of a body's address or hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

/// A computation's body: consumes its dependencies' results (plus a bound
/// receiver, implicitly prepended) as positional arguments, and returns a
/// value or fails.
pub type Body = Arc<dyn Fn(&[Value]) -> anyhow::Result<Value>>;

/// A textual, input-marker, or descriptor reference declared by a
/// descriptor as a prerequisite.
#[derive(Clone)]
pub enum DepRef {
    /// Another registered descriptor, resolved with no receiver.
    Node(NodeId),
    /// A dotted path resolved at execute time against the enclosing
    /// receiver, e.g. `"test_instance.test"` or a bare `"internal_dep"`.
    Symbolic(&'static str),
    /// A named, externally supplied input.
    Input(&'static str),
}

/// A registered computation: its body, declared dependencies and
/// priority.
pub struct Descriptor {
    pub id: NodeId,
    pub deps: Vec<DepRef>,
    pub priority: Priority,
    pub body: Body,
}

/// Owns `{descriptor identity -> descriptor}`. Written only during
/// registration and read-only thereafter once handed to the resolver.
#[derive(Default)]
pub struct Registry {
    descriptors: HashMap<NodeId, Descriptor>,
    next_id: u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a body with its declared dependencies and configuration.
    ///
    /// Registration is idempotent on re-registration of the same `NodeId`
    /// in the sense that the registry only ever hands out fresh ids — in
    /// practice callers register once at startup and keep the returned
    /// `NodeId` as the stable reference to depend on elsewhere.
    ///
    /// `options` mirrors a free-form config bag: only `"priority"` is
    /// recognized; anything else is a [`RegistrationError::UnknownOption`].
    pub fn register<F>(
        &mut self,
        body: F,
        deps: Vec<DepRef>,
        options: &[(&str, Priority)],
    ) -> Result<NodeId, RegistrationError>
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + 'static,
    {
        let mut priority = DEFAULT_PRIORITY;
        for (key, value) in options {
            match *key {
                "priority" => priority = *value,
                other => return Err(RegistrationError::UnknownOption(other.to_string())),
            }
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;

        tracing::trace!("{}", NodeRegistered { id, priority, dep_count: deps.len() });

        self.descriptors.insert(
            id,
            Descriptor {
                id,
                deps,
                priority,
                body: Arc::new(body),
            },
        );

        Ok(id)
    }

    /// Convenience for the common case of no non-default options.
    pub fn register_default<F>(&mut self, body: F, deps: Vec<DepRef>) -> NodeId
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + 'static,
    {
        self.register(body, deps, &[])
            .expect("no options supplied, UnknownOption cannot fire")
    }

    pub fn get(&self, id: NodeId) -> Option<&Descriptor> {
        self.descriptors.get(&id)
    }
}
