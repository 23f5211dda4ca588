// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Producing a runnable binary for a testcase: either download a
//! prebuilt artifact, or drive a local build.

use std::fs::File;
use std::io::copy;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::config::{BinaryDefinition, BuilderKind};
use crate::engine::Value;

use super::testcase::Testcase;

/// Where the produced binary ended up, ready to execute.
#[derive(Debug, Clone)]
pub struct BuiltBinary {
    pub path: PathBuf,
}

fn derive_binary_name(testcase: &Testcase) -> String {
    let (_, args) = testcase.environment_and_args();
    args.split(' ')
        .next()
        .and_then(|first| Path::new(first).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "target".to_string())
}

fn download_binary(work_dir: &Path, testcase: &Testcase, definition: &BinaryDefinition) -> Result<BuiltBinary> {
    let build_url = testcase
        .build_url
        .as_ref()
        .context("downloaded build requested but testcase has no build_url")?;

    let archive_path = work_dir.join(format!("{}.zip", testcase.id));
    let response = reqwest::blocking::get(build_url)
        .with_context(|| format!("downloading build archive from {build_url}"))?;
    if !response.status().is_success() {
        bail!("downloading build archive returned {}", response.status());
    }

    let mut archive_file = File::create(&archive_path)
        .with_context(|| format!("creating {}", archive_path.display()))?;
    let mut body = response;
    copy(&mut body, &mut archive_file).context("writing downloaded build archive")?;

    let extract_dir = work_dir.join(&testcase.id);
    std::fs::create_dir_all(&extract_dir)?;

    let archive_file = File::open(&archive_path)?;
    let mut zip = zip::ZipArchive::new(archive_file).context("opening build archive as zip")?;
    zip.extract(&extract_dir).context("extracting build archive")?;

    let binary_name = definition.binary_name.clone().unwrap_or_else(|| derive_binary_name(testcase));

    Ok(BuiltBinary { path: extract_dir.join(binary_name) })
}

/// Drive a local build for `definition`. Every builder checks out the
/// same way the source is synced (`gclient sync` for the chromium-based
/// builders, a plain checkout for standalone ones) and then invokes a
/// `build.sh` at the root of the checkout; builder-specific build flags
/// (sanitizer, target, msan instrumented libraries) are passed as
/// environment variables rather than being hardcoded per builder.
fn build_locally(work_dir: &Path, definition: &BinaryDefinition, goma_enabled: bool) -> Result<BuiltBinary> {
    let source_dir = work_dir.join(&definition.source);
    std::fs::create_dir_all(&source_dir)?;

    let mut command = Command::new("./build.sh");
    command.current_dir(&source_dir);
    command.env("BUILDER_KIND", builder_kind_name(definition.builder));
    if let Some(sanitizer) = &definition.sanitizer {
        command.env("SANITIZER", sanitizer);
    }
    if let Some(target) = &definition.target {
        command.env("TARGET", target);
    }
    command.env("GOMA_ENABLED", if goma_enabled { "1" } else { "0" });

    let status = command
        .status()
        .with_context(|| format!("running build.sh in {}", source_dir.display()))?;
    if !status.success() {
        bail!("build.sh exited with {status}");
    }

    let binary_name = definition.binary_name.clone().unwrap_or_else(|| definition.source.clone());
    Ok(BuiltBinary { path: source_dir.join("out").join(binary_name) })
}

fn builder_kind_name(kind: BuilderKind) -> &'static str {
    match kind {
        BuilderKind::Pdfium => "Pdfium",
        BuilderKind::V8 => "V8",
        BuilderKind::Chromium => "Chromium",
        BuilderKind::LibfuzzerMsan => "LibfuzzerMsan",
        BuilderKind::MsanChromium => "MsanChromium",
        BuilderKind::CfiChromium => "CfiChromium",
        BuilderKind::UbsanVptrChromium => "UbsanVptrChromium",
    }
}

/// Node body: build a closure capturing the working directory under
/// which downloads are unpacked and local builds are checked out.
pub fn build_or_download_binary_body(work_dir: PathBuf) -> impl Fn(&[Value]) -> Result<Value> {
    move |args: &[Value]| {
        let definition = args
            .first()
            .and_then(Value::downcast_ref::<BinaryDefinition>)
            .context("build_or_download_binary: expected a BinaryDefinition dependency")?;
        let testcase = args
            .get(1)
            .and_then(Value::downcast_ref::<Testcase>)
            .context("build_or_download_binary: expected a Testcase dependency")?;
        let build = args
            .get(2)
            .and_then(Value::downcast_ref::<String>)
            .context("build_or_download_binary: expected build input")?;
        let goma_enabled = args
            .get(3)
            .and_then(Value::downcast_ref::<bool>)
            .copied()
            .unwrap_or(false);

        let built = if build == "download" {
            download_binary(&work_dir, testcase, definition)?
        } else {
            build_locally(&work_dir, definition, goma_enabled)?
        };

        Ok(Value::new(built))
    }
}
