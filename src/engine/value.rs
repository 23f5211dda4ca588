// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The type-erased value carried between nodes, and the narrow interface a
//! carrier object implements to participate in symbolic dependency
//! resolution.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A dependency result, or a supplied input, type-erased so the registry
/// and scheduler never need to know node-specific types.
///
/// Node bodies receive a `&[Value]` and `downcast_ref` the positions they
/// know the concrete type of, in declared dependency order.
#[derive(Clone)]
pub struct Value(Arc<dyn Any>);

impl Value {
    /// Wrap an owned value.
    pub fn new<T: Any>(value: T) -> Self {
        Value(Arc::new(value))
    }

    /// Wrap an already-shared value without an extra allocation.
    pub fn from_arc<T: Any>(value: Arc<T>) -> Self {
        Value(value)
    }

    /// Borrow the value as `T`, or `None` if it holds a different type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&"<erased>").finish()
    }
}

/// A carrier object that a method-style descriptor can be bound to.
///
/// This replaces reflective attribute access (Python's `getattr` walking
/// `self.a.b.c`) with an explicit, narrow interface: a receiver advertises
/// its own registered methods via [`Receiver::method`] and, for multi-hop
/// symbolic references, the receivers it holds via [`Receiver::child`].
/// Both default to "nothing here"; a carrier only overrides the ones it
/// actually exposes.
pub trait Receiver: Any {
    /// Borrow self as `Any`, for downcasting inside a node body.
    fn as_any(&self) -> &dyn Any;

    /// Hand back an owned, type-erased handle to self, so the engine can
    /// prepend the receiver as the first positional argument of a bound
    /// node's body without knowing the concrete receiver type.
    fn to_value(self: Arc<Self>) -> Value;

    /// Resolve one non-terminal path segment to the receiver it names.
    fn child(&self, _name: &str) -> Option<Arc<dyn Receiver>> {
        None
    }

    /// Resolve the terminal path segment to the descriptor registered for
    /// one of this receiver's own methods, bound to this receiver.
    fn method(&self, _name: &str) -> Option<(crate::engine::NodeId, Arc<dyn Receiver>)> {
        None
    }
}

/// An opaque identity token for a receiver, derived from the data pointer
/// of the `Arc` rather than value equality — two distinct instances of the
/// same struct are distinct receivers, per the identity rule in the data
/// model (same descriptor through two different receivers is two nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverToken(usize);

impl ReceiverToken {
    pub fn of(receiver: &Arc<dyn Receiver>) -> Self {
        ReceiverToken(Arc::as_ptr(receiver) as *const () as usize)
    }
}
