// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use diagnostics::*;
use serde::Serialize;
use standings::{Standings, load_config};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "STANDINGS_CONFIG";

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NO_DATA: u8 = 2;
pub const EXIT_BAD_REQUEST: u8 = 64;

/// Result of a command that ran without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Output was handed to the handler.
    Found,
    /// Nothing matched; the message explains what was looked for.
    NoData(String),
}

/// Get the configuration path with an optional override, falling back to
/// the STANDINGS_CONFIG environment variable
pub fn get_config_path_with_override(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    env::var(CONFIG_ENV)
        .map_err(|_| anyhow!("{CONFIG_ENV} environment variable not set and no --config given"))
        .map(PathBuf::from)
}

/// Load and validate the configuration, then open its snapshot store.
pub fn open_standings(override_path: Option<PathBuf>) -> Result<Standings> {
    let path = get_config_path_with_override(override_path)?;
    let path_str = path.display().to_string();
    debug!("Loading configuration from {path_str}", path_str: path_str.as_str());

    let config = load_config(&path)
        .with_context(|| format!("Failed to load configuration from {path_str}"))?;
    Standings::open(config).context("Failed to open snapshot store")
}

/// Pretty JSON for command output.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

/// Exit status for a failed command: caller mistakes are reported apart
/// from storage and configuration failures.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<standings::Error>() {
        Some(e) if e.is_bad_request() => EXIT_BAD_REQUEST,
        _ => EXIT_FAILURE,
    }
}

/// Exit status for an argument parsing failure. Help and version requests
/// are not failures.
#[must_use]
pub fn parse_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() { EXIT_BAD_REQUEST } else { 0 }
}
