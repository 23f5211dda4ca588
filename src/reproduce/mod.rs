// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Crash-reproducer nodes, registered against the engine rather than
//! called directly from one another — plain glue wired together only
//! through declared dependencies.

mod binary;
mod goma;
mod runner;
mod testcase;

pub use binary::BuiltBinary;
pub use testcase::{StacktraceLine, Testcase};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::config::{load_job_catalog, BinaryDefinition, JobCatalog};
use crate::engine::{DepRef, Input, NodeId, Registry, Value};

/// The registered nodes of the reproduce graph, handed back so the CLI
/// binary can supply inputs and pick the final target.
pub struct ReproduceNodes {
    pub get_testcase: NodeId,
    pub print_warning: NodeId,
    pub should_enable_goma: NodeId,
    pub remote_compiler_dir: NodeId,
    pub ensure_remote_compiler: NodeId,
    pub supported_jobs: NodeId,
    pub binary_definition: NodeId,
    pub build_or_download_binary: NodeId,
    pub invoke_reproducer: NodeId,
}

/// Register every reproducer node against `registry`. `job_types_path`
/// points at the job-type catalog YAML; `domain` and `auth_header` are
/// the ClusterFuzz endpoint and stored credential `fetch_testcase` uses;
/// `work_dir` is where downloaded/built binaries land.
pub fn register(
    registry: &mut Registry,
    job_types_path: &Path,
    domain: String,
    auth_header: String,
    work_dir: PathBuf,
) -> anyhow::Result<ReproduceNodes> {
    let catalog = Arc::new(
        load_job_catalog(job_types_path)
            .with_context(|| format!("loading job type catalog from {}", job_types_path.display()))?,
    );

    let get_testcase = registry.register(
        testcase::get_testcase_body(domain, auth_header),
        vec![DepRef::Input("testcase_id")],
        &[("priority", 20)],
    )?;

    let print_warning = registry.register(
        testcase::print_warning_body,
        vec![DepRef::Node(get_testcase)],
        &[("priority", 0)],
    )?;

    let should_enable_goma = registry.register_default(
        goma::should_enable_goma_body,
        vec![DepRef::Input("disable_goma"), DepRef::Input("build")],
    );

    let remote_compiler_dir = registry.register(
        goma::remote_compiler_dir_body,
        vec![DepRef::Node(should_enable_goma)],
        &[("priority", 20)],
    )?;

    let ensure_remote_compiler = registry.register_default(
        goma::ensure_remote_compiler_body,
        vec![DepRef::Node(should_enable_goma), DepRef::Node(remote_compiler_dir)],
    );

    let supported_jobs = {
        let catalog = catalog.clone();
        registry.register_default(
            move |_args: &[Value]| Ok(Value::from_arc(catalog.clone())),
            vec![],
        )
    };

    let binary_definition = registry.register_default(
        binary_definition_body,
        vec![
            DepRef::Node(get_testcase),
            DepRef::Input("build"),
            DepRef::Node(supported_jobs),
        ],
    );

    let build_or_download_binary = registry.register_default(
        binary::build_or_download_binary_body(work_dir),
        vec![
            DepRef::Node(binary_definition),
            DepRef::Node(get_testcase),
            DepRef::Input("build"),
            DepRef::Node(ensure_remote_compiler),
        ],
    );

    let invoke_reproducer = registry.register_default(
        runner::invoke_reproducer_body,
        vec![
            DepRef::Node(build_or_download_binary),
            DepRef::Node(get_testcase),
            DepRef::Input("target_args"),
            DepRef::Input("iterations"),
            DepRef::Node(print_warning),
        ],
    );

    Ok(ReproduceNodes {
        get_testcase,
        print_warning,
        should_enable_goma,
        remote_compiler_dir,
        ensure_remote_compiler,
        supported_jobs,
        binary_definition,
        build_or_download_binary,
        invoke_reproducer,
    })
}

/// Resolve the binary definition for the testcase's job type.
fn binary_definition_body(args: &[Value]) -> anyhow::Result<Value> {
    let testcase = args
        .first()
        .and_then(Value::downcast_ref::<Testcase>)
        .context("binary_definition: expected a Testcase dependency")?;
    let build = args
        .get(1)
        .and_then(Value::downcast_ref::<String>)
        .context("binary_definition: expected build input")?;
    let catalog = args
        .get(2)
        .and_then(Value::downcast_ref::<JobCatalog>)
        .context("binary_definition: expected a JobCatalog dependency")?;

    let definition: BinaryDefinition = catalog.resolve(&testcase.job_type, build)?.clone();
    Ok(Value::new(definition))
}

/// Convenience builder for the `Input` values the CLI supplies.
pub fn inputs(
    testcase_id: String,
    build: String,
    disable_goma: bool,
    disable_gclient: bool,
    target_args: String,
    iterations: u32,
) -> Vec<Input> {
    vec![
        Input::named("testcase_id").value(testcase_id),
        Input::named("build").value(build),
        Input::named("disable_goma").value(disable_goma),
        Input::named("disable_gclient").value(disable_gclient),
        Input::named("target_args").value(target_args),
        Input::named("iterations").value(iterations),
    ]
}
