// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The testcase value fetched from ClusterFuzz and the node that fetches
//! it.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::engine::Value;

/// A crash testcase pulled from ClusterFuzz's testcase-detail endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Testcase {
    pub id: String,
    pub job_type: String,
    #[serde(default)]
    pub reproducible: bool,
    #[serde(default)]
    pub gestures: Vec<String>,
    #[serde(default)]
    pub build_url: Option<String>,
    #[serde(default)]
    pub stacktrace_lines: Vec<StacktraceLine>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StacktraceLine {
    pub content: String,
}

impl Testcase {
    /// Parse the environment variables and target arguments embedded in
    /// the recorded stacktrace by scanning `[Environment] NAME = VALUE`
    /// and `Running command: ...` lines.
    pub fn environment_and_args(&self) -> (HashMap<String, String>, String) {
        let mut env = HashMap::new();
        let mut args = String::new();

        for line in &self.stacktrace_lines {
            if let Some(rest) = line.content.strip_prefix("[Environment] ") {
                if let Some((name, value)) = rest.split_once(" = ") {
                    env.insert(name.to_string(), value.to_string());
                }
            } else if let Some(rest) = line.content.strip_prefix("Running command: ") {
                let tokens: Vec<&str> = rest.split(' ').collect();
                if tokens.len() > 2 {
                    args = tokens[1..tokens.len() - 1].join(" ");
                }
            }
        }

        (env, args)
    }
}

const TESTCASE_INFO_PATH: &str = "/v2/testcase-detail/refresh";

/// Fetch testcase metadata from ClusterFuzz. `domain` is the ClusterFuzz
/// host; `auth_header` is the stored bearer token sent as the
/// `Authorization` header.
pub fn fetch_testcase(domain: &str, auth_header: &str, testcase_id: &str) -> Result<Testcase> {
    let url = format!("https://{domain}{TESTCASE_INFO_PATH}");

    let client = reqwest::blocking::Client::new();
    let response = client
        .post(&url)
        .header("Authorization", auth_header)
        .header("User-Agent", "clusterfuzz-tools")
        .json(&serde_json::json!({ "testcaseId": testcase_id }))
        .send()
        .with_context(|| format!("requesting testcase info from {url}"))?;

    if !response.status().is_success() {
        anyhow::bail!("ClusterFuzz returned {} fetching testcase {testcase_id}", response.status());
    }

    response
        .json::<Testcase>()
        .context("parsing testcase info response")
}

/// Node body wrapper: downcasts the `testcase_id` input, calls
/// [`fetch_testcase`] and wraps the result as a [`Value`].
pub fn get_testcase_body(domain: String, auth_header: String) -> impl Fn(&[Value]) -> Result<Value> {
    move |args: &[Value]| {
        let testcase_id = args
            .first()
            .and_then(Value::downcast_ref::<String>)
            .context("get_testcase: expected testcase_id input")?;
        let testcase = fetch_testcase(&domain, &auth_header, testcase_id)?;
        Ok(Value::new(testcase))
    }
}

/// Warn if the testcase might not reproduce cleanly. A priority-0
/// "pre-warning" node that depends only on `get_testcase`.
pub fn print_warning_body(args: &[Value]) -> Result<Value> {
    let testcase = args
        .first()
        .and_then(Value::downcast_ref::<Testcase>)
        .context("print_warning: expected a Testcase dependency")?;

    if !testcase.reproducible {
        tracing::warn!(
            "testcase {} is marked unreproducible; it might not reproduce correctly here",
            testcase.id
        );
    }
    if !testcase.gestures.is_empty() {
        tracing::warn!("testcase {} uses gestures and is not guaranteed to reproduce correctly", testcase.id);
    }

    Ok(Value::new(()))
}
