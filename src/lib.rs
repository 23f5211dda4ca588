// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;      // job-type/preset YAML loading for the reproducer demo
pub mod engine;       // the DI executor: registry, resolver, graph, scheduler
pub mod errors;       // error handling
pub mod observability; // structured logging
pub mod reproduce;   // crash reproducer nodes registered against the engine
