// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Job-type catalog: which builder and reproducer a ClusterFuzz job type
//! uses, loaded from a YAML resource and resolved through preset
//! inheritance.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobConfigError {
    #[error("job type file references unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("job definition '{0}' has no builder, and none of its presets set one")]
    MissingBuilder(String),
    #[error("job definition '{0}' has no reproducer, and none of its presets set one")]
    MissingReproducer(String),
    #[error("'{1}' is not a recognized builder for job definition '{0}'")]
    UnknownBuilder(String, String),
    #[error("'{1}' is not a recognized reproducer for job definition '{0}'")]
    UnknownReproducer(String, String),
    #[error("job type '{0}' is not supported for build mode '{1}'")]
    JobTypeNotSupported(String, String),
}

/// The builder strategy a binary definition selects; each variant is a
/// distinct source checkout and build recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderKind {
    Pdfium,
    V8,
    Chromium,
    LibfuzzerMsan,
    MsanChromium,
    CfiChromium,
    UbsanVptrChromium,
}

impl BuilderKind {
    fn parse(job_name: &str, raw: &str) -> Result<Self, JobConfigError> {
        Ok(match raw {
            "Pdfium" => BuilderKind::Pdfium,
            "V8" => BuilderKind::V8,
            "Chromium" => BuilderKind::Chromium,
            "LibfuzzerMsan" => BuilderKind::LibfuzzerMsan,
            "MsanChromium" => BuilderKind::MsanChromium,
            "CfiChromium" => BuilderKind::CfiChromium,
            "UbsanVptrChromium" => BuilderKind::UbsanVptrChromium,
            other => return Err(JobConfigError::UnknownBuilder(job_name.to_string(), other.to_string())),
        })
    }
}

/// The reproduction strategy a binary definition selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReproducerKind {
    Base,
    LibfuzzerJob,
    LinuxChromeJob,
}

impl ReproducerKind {
    fn parse(job_name: &str, raw: &str) -> Result<Self, JobConfigError> {
        Ok(match raw {
            "Base" => ReproducerKind::Base,
            "LibfuzzerJob" => ReproducerKind::LibfuzzerJob,
            "LinuxChromeJob" => ReproducerKind::LinuxChromeJob,
            other => return Err(JobConfigError::UnknownReproducer(job_name.to_string(), other.to_string())),
        })
    }
}

/// A fully resolved job type: which builder and reproducer to use, and
/// the handful of build parameters each needs.
#[derive(Debug, Clone)]
pub struct BinaryDefinition {
    pub builder: BuilderKind,
    pub source: String,
    pub reproducer: ReproducerKind,
    pub binary_name: Option<String>,
    pub sanitizer: Option<String>,
    pub target: Option<String>,
}

/// Raw YAML shape of one job definition, before preset inheritance is
/// applied.
#[derive(Debug, Clone, Default, Deserialize)]
struct JobDefinitionRaw {
    #[serde(default)]
    preset: Option<String>,
    #[serde(default)]
    builder: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    reproducer: Option<String>,
    #[serde(default)]
    binary: Option<String>,
    #[serde(default)]
    sanitizer: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JobTypesFile {
    #[serde(default)]
    presets: HashMap<String, JobDefinitionRaw>,
    #[serde(default)]
    standalone: HashMap<String, JobDefinitionRaw>,
    #[serde(default)]
    chromium: HashMap<String, JobDefinitionRaw>,
}

/// Every job type this tool knows how to build and reproduce, split by
/// build category exactly as `supported_job_types.yml` is.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    pub standalone: HashMap<String, BinaryDefinition>,
    pub chromium: HashMap<String, BinaryDefinition>,
}

impl JobCatalog {
    /// Resolve the binary definition for `job_type` the way
    /// `get_binary_definition` does: prefer the explicit build category
    /// unless the caller asked to download a prebuilt binary, then fall
    /// back through `chromium` then `standalone`.
    pub fn resolve(&self, job_type: &str, build_param: &str) -> Result<&BinaryDefinition, JobConfigError> {
        if build_param != "download" {
            if let Some(category) = self.category(build_param) {
                if let Some(def) = category.get(job_type) {
                    return Ok(def);
                }
            }
        }

        for category in [&self.chromium, &self.standalone] {
            if let Some(def) = category.get(job_type) {
                return Ok(def);
            }
        }

        Err(JobConfigError::JobTypeNotSupported(job_type.to_string(), build_param.to_string()))
    }

    fn category(&self, build_param: &str) -> Option<&HashMap<String, BinaryDefinition>> {
        match build_param {
            "standalone" => Some(&self.standalone),
            "chromium" => Some(&self.chromium),
            _ => None,
        }
    }
}

/// Merge a job definition with its preset chain, explicit fields always
/// winning over the preset's. Mirrors `parse_job_definition`'s recursive
/// base-then-override merge.
fn resolve_definition<'a>(
    name: &str,
    raw: &'a JobDefinitionRaw,
    presets: &'a HashMap<String, JobDefinitionRaw>,
) -> Result<JobDefinitionRaw, JobConfigError> {
    let mut resolved = match &raw.preset {
        Some(preset_name) => {
            let preset = presets
                .get(preset_name)
                .ok_or_else(|| JobConfigError::UnknownPreset(preset_name.clone()))?;
            resolve_definition(name, preset, presets)?
        }
        None => JobDefinitionRaw::default(),
    };

    if raw.builder.is_some() {
        resolved.builder = raw.builder.clone();
    }
    if raw.source.is_some() {
        resolved.source = raw.source.clone();
    }
    if raw.reproducer.is_some() {
        resolved.reproducer = raw.reproducer.clone();
    }
    if raw.binary.is_some() {
        resolved.binary = raw.binary.clone();
    }
    if raw.sanitizer.is_some() {
        resolved.sanitizer = raw.sanitizer.clone();
    }
    if raw.target.is_some() {
        resolved.target = raw.target.clone();
    }

    Ok(resolved)
}

fn build_binary_definition(
    name: &str,
    raw: &JobDefinitionRaw,
    presets: &HashMap<String, JobDefinitionRaw>,
) -> Result<BinaryDefinition, JobConfigError> {
    let resolved = resolve_definition(name, raw, presets)?;

    let builder_raw = resolved
        .builder
        .ok_or_else(|| JobConfigError::MissingBuilder(name.to_string()))?;
    let reproducer_raw = resolved
        .reproducer
        .ok_or_else(|| JobConfigError::MissingReproducer(name.to_string()))?;

    Ok(BinaryDefinition {
        builder: BuilderKind::parse(name, &builder_raw)?,
        source: resolved.source.unwrap_or_default(),
        reproducer: ReproducerKind::parse(name, &reproducer_raw)?,
        binary_name: resolved.binary,
        sanitizer: resolved.sanitizer,
        target: resolved.target,
    })
}

/// Load and fully resolve the job-type catalog from a YAML resource
/// file.
pub fn load_job_catalog<P: AsRef<Path>>(path: P) -> anyhow::Result<JobCatalog> {
    let content = fs::read_to_string(path)?;
    let file: JobTypesFile = serde_yaml::from_str(&content)?;

    let mut catalog = JobCatalog::default();
    for (name, raw) in &file.standalone {
        catalog
            .standalone
            .insert(name.clone(), build_binary_definition(name, raw, &file.presets)?);
    }
    for (name, raw) in &file.chromium {
        catalog
            .chromium
            .insert(name.clone(), build_binary_definition(name, raw, &file.presets)?);
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
presets:
  chromium_base:
    source: chromium
    reproducer: LinuxChromeJob
standalone:
  pdfium_asan:
    builder: Pdfium
    source: pdfium
    reproducer: Base
chromium:
  linux_asan_chrome:
    preset: chromium_base
    builder: Chromium
    sanitizer: ASAN
"#;

    #[test]
    fn resolves_preset_inheritance() {
        let file: JobTypesFile = serde_yaml::from_str(SAMPLE).unwrap();
        let def = build_binary_definition("linux_asan_chrome", &file.chromium["linux_asan_chrome"], &file.presets)
            .unwrap();
        assert_eq!(def.builder, BuilderKind::Chromium);
        assert_eq!(def.reproducer, ReproducerKind::LinuxChromeJob);
        assert_eq!(def.source, "chromium");
        assert_eq!(def.sanitizer.as_deref(), Some("ASAN"));
    }

    #[test]
    fn unknown_preset_is_reported() {
        let mut file: JobTypesFile = serde_yaml::from_str(SAMPLE).unwrap();
        file.chromium.get_mut("linux_asan_chrome").unwrap().preset = Some("missing".to_string());
        let err = build_binary_definition("linux_asan_chrome", &file.chromium["linux_asan_chrome"], &file.presets)
            .unwrap_err();
        assert_eq!(err, JobConfigError::UnknownPreset("missing".to_string()));
    }

    #[test]
    fn catalog_resolves_build_param_download_through_either_category() {
        let file: JobTypesFile = serde_yaml::from_str(SAMPLE).unwrap();
        let mut catalog = JobCatalog::default();
        catalog.standalone.insert(
            "pdfium_asan".to_string(),
            build_binary_definition("pdfium_asan", &file.standalone["pdfium_asan"], &file.presets).unwrap(),
        );

        let found = catalog.resolve("pdfium_asan", "download").unwrap();
        assert_eq!(found.builder, BuilderKind::Pdfium);

        let missing = catalog.resolve("nonexistent", "download").unwrap_err();
        assert_eq!(missing, JobConfigError::JobTypeNotSupported("nonexistent".to_string(), "download".to_string()));
    }

    #[test]
    fn loads_catalog_from_a_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("supported_job_types.yml");
        std::fs::write(&path, SAMPLE).unwrap();

        let catalog = load_job_catalog(&path).unwrap();
        assert_eq!(catalog.standalone["pdfium_asan"].builder, BuilderKind::Pdfium);
        assert_eq!(catalog.chromium["linux_asan_chrome"].reproducer, ReproducerKind::LinuxChromeJob);
    }
}
