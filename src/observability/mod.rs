// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for the engine's lifecycle events.
//!
//! One struct per event, implementing `Display`, so the log text lives
//! in one place instead of being scattered as ad-hoc format strings at
//! call sites.

pub mod messages;
