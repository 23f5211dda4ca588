// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use bedrock::engine::{self, Registry};
use bedrock::reproduce;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Locally reproduce a crash testcase.
#[derive(Parser)]
#[command(name = "reproduce", about = "Locally reproduce a testcase given a testcase ID")]
struct Args {
    /// The testcase ID to reproduce.
    testcase_id: String,

    /// Extra arguments to pass to the target binary.
    #[arg(long, default_value = "")]
    target_args: String,

    /// Which binary to run: "download" for a prebuilt artifact, or a
    /// build category ("standalone"/"chromium") to build locally.
    #[arg(long, default_value = "download")]
    build: String,

    /// Skip the remote compilation cache even when a local build would
    /// normally use it.
    #[arg(long)]
    disable_goma: bool,

    /// Skip source-sync steps a local build would normally run.
    #[arg(long)]
    disable_gclient: bool,

    /// How many times to run the binary against the testcase.
    #[arg(long, default_value_t = 1)]
    iterations: u32,

    /// The ClusterFuzz host to query for testcase details.
    #[arg(long, default_value = "clusterfuzz.com")]
    domain: String,

    /// Path to the job-type catalog YAML.
    #[arg(long, default_value = "resources/supported_job_types.yml")]
    job_types: PathBuf,

    /// Directory downloaded and built binaries are placed under.
    #[arg(long, default_value = "./reproduce-work")]
    work_dir: PathBuf,
}

fn stored_auth_header() -> anyhow::Result<String> {
    std::env::var("CLUSTERFUZZ_AUTH_HEADER")
        .map_err(|_| anyhow::anyhow!("CLUSTERFUZZ_AUTH_HEADER is not set; authenticate with ClusterFuzz first"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let auth_header = stored_auth_header()?;

    std::fs::create_dir_all(&args.work_dir)?;

    let mut registry = Registry::new();
    let nodes = reproduce::register(
        &mut registry,
        &args.job_types,
        args.domain,
        auth_header,
        args.work_dir,
    )?;

    let inputs = reproduce::inputs(
        args.testcase_id,
        args.build,
        args.disable_goma,
        args.disable_gclient,
        args.target_args,
        args.iterations,
    );

    engine::execute(&registry, nodes.invoke_reproducer, &inputs)?;

    Ok(())
}
