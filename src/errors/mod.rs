// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error kinds for the registry, resolver and scheduler.
//!
//! Policy: everything is surfaced, nothing is recovered inside the engine.
//! A body failure propagates unchanged; there is no retry and no partial
//! result.

mod execution;
mod registration;
mod resolve;

pub use execution::ExecutionError;
pub use registration::RegistrationError;
pub use resolve::ResolveError;
