// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod jobs;

pub use jobs::{
    load_job_catalog, BinaryDefinition, BuilderKind, JobCatalog, JobConfigError, ReproducerKind,
};
