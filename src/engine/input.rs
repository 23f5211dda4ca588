// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input markers: placeholders for externally supplied values.

use std::any::Any;

use super::registry::DepRef;
use super::value::Value;

/// A placeholder identifying an externally supplied value by name.
///
/// The same constructor serves both roles: named with no value it is a
/// dependency reference (`Input::named("build").into()` inside a
/// descriptor's dependency list); named with a value it is a supplied
/// input (`Input::named("build").value("pdfium")` passed to `execute`).
/// It has no body of its own and is always ready — its priority is
/// fixed at -1.
#[derive(Clone)]
pub struct Input {
    pub name: &'static str,
    pub(crate) value: Option<Value>,
}

impl Input {
    /// An input marker with no value yet, for use as a dependency
    /// reference.
    pub fn named(name: &'static str) -> Self {
        Input { name, value: None }
    }

    /// Attach the concrete value supplied at execute time.
    pub fn value<T: Any>(mut self, value: T) -> Self {
        self.value = Some(Value::new(value));
        self
    }
}

impl From<Input> for DepRef {
    fn from(input: Input) -> DepRef {
        DepRef::Input(input.name)
    }
}
