// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while registering a computation.

use thiserror::Error;

/// Errors that can occur during [`crate::engine::Registry::register`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A registration option other than `"priority"` was supplied.
    #[error("unknown registration option '{0}': only 'priority' is recognized")]
    UnknownOption(String),
}
