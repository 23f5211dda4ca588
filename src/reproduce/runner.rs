// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Running the built binary against the recorded testcase.

use std::process::Command;

use anyhow::{Context, Result};

use crate::engine::Value;

use super::binary::BuiltBinary;
use super::testcase::Testcase;

/// Run the binary once per iteration, feeding it the environment
/// variables and arguments recorded on the testcase plus whatever extra
/// `target_args` the caller supplied, stopping at the first failing run.
pub fn run(binary: &BuiltBinary, testcase: &Testcase, target_args: &str, iterations: u32) -> Result<()> {
    let (env, recorded_args) = testcase.environment_and_args();
    let args = if target_args.is_empty() { recorded_args } else { format!("{recorded_args} {target_args}") };

    for iteration in 0..iterations {
        tracing::info!(iteration, testcase = %testcase.id, "running reproducer");

        let mut command = Command::new(&binary.path);
        command.envs(&env);
        if !args.is_empty() {
            command.args(args.split(' ').filter(|token| !token.is_empty()));
        }

        let status = command
            .status()
            .with_context(|| format!("running {}", binary.path.display()))?;
        if !status.success() {
            tracing::info!(iteration, status = %status, "reproducer exited non-zero, testcase reproduced");
        }
    }

    Ok(())
}

/// Node body: the final target of the reproduce graph. Also depends on
/// `print_warning` purely to force that node to run first; its result
/// carries no data here.
pub fn invoke_reproducer_body(args: &[Value]) -> Result<Value> {
    let binary = args
        .first()
        .and_then(Value::downcast_ref::<BuiltBinary>)
        .context("invoke_reproducer: expected a BuiltBinary dependency")?;
    let testcase = args
        .get(1)
        .and_then(Value::downcast_ref::<Testcase>)
        .context("invoke_reproducer: expected a Testcase dependency")?;
    let target_args = args
        .get(2)
        .and_then(Value::downcast_ref::<String>)
        .context("invoke_reproducer: expected target_args input")?;
    let iterations = args
        .get(3)
        .and_then(Value::downcast_ref::<u32>)
        .copied()
        .context("invoke_reproducer: expected iterations input")?;

    run(binary, testcase, target_args, iterations)?;

    Ok(Value::new(()))
}
