// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deciding whether to use, and starting, a remote compilation cache.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::engine::Value;

/// `true` unless the caller disabled it, or asked to download a
/// prebuilt binary (nothing to compile, so nothing to cache).
pub fn should_enable_goma_body(args: &[Value]) -> Result<Value> {
    let disable_goma = args
        .first()
        .and_then(Value::downcast_ref::<bool>)
        .copied()
        .context("should_enable_goma: expected disable_goma input")?;
    let build = args
        .get(1)
        .and_then(Value::downcast_ref::<String>)
        .context("should_enable_goma: expected build input")?;

    Ok(Value::new(!disable_goma && build != "download"))
}

fn compiler_cache_dir() -> PathBuf {
    std::env::var("GOMA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join("goma"))
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("."))
}

/// Locate the compiler-cache control script, when enabled.
pub fn remote_compiler_dir_body(args: &[Value]) -> Result<Value> {
    let enabled = args
        .first()
        .and_then(Value::downcast_ref::<bool>)
        .copied()
        .context("remote_compiler_dir: expected should_enable_goma dependency")?;

    if !enabled {
        return Ok(Value::new(None::<PathBuf>));
    }

    let dir = compiler_cache_dir();
    if !dir.join("goma_ctl.py").is_file() {
        bail!("remote compiler cache not found at {}", dir.display());
    }

    Ok(Value::new(Some(dir)))
}

/// Start the compilation cache daemon if enabled, returning whether it
/// is now active.
pub fn ensure_remote_compiler_body(args: &[Value]) -> Result<Value> {
    let enabled = args
        .first()
        .and_then(Value::downcast_ref::<bool>)
        .copied()
        .context("ensure_remote_compiler: expected should_enable_goma dependency")?;
    let dir = args
        .get(1)
        .and_then(Value::downcast_ref::<Option<PathBuf>>)
        .context("ensure_remote_compiler: expected remote_compiler_dir dependency")?;

    if !enabled {
        return Ok(Value::new(false));
    }

    let dir = dir
        .as_ref()
        .context("ensure_remote_compiler: remote compiler enabled but directory not resolved")?;

    let status = Command::new("python")
        .arg("goma_ctl.py")
        .arg("ensure_start")
        .current_dir(dir)
        .status()
        .with_context(|| format!("starting remote compiler cache in {}", dir.display()))?;

    if !status.success() {
        bail!("goma_ctl.py ensure_start exited with {status}");
    }

    Ok(Value::new(true))
}
