// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use crate::ident;
use crate::schema::Naming;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// One snapshot table the engine may read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    #[serde(default)]
    pub naming: Naming,
}

impl TableConfig {
    pub fn new(name: impl Into<String>, naming: Naming) -> Self {
        Self {
            name: name.into(),
            naming,
        }
    }
}

/// Engine configuration.
///
/// Table order matters: it is the "first encountered" order used to break
/// ties between rows from different tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// DuckDB database file, opened read-only. In-memory when absent.
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Table holding one Sync Record per ingestion run.
    #[serde(default = "default_sync_table")]
    pub sync_table: String,

    pub tables: Vec<TableConfig>,

    /// Size of the top-N set when the caller does not give one.
    #[serde(default = "default_top")]
    pub default_top: usize,
}

fn default_sync_table() -> String {
    "syncs".to_string()
}

fn default_top() -> usize {
    10
}

impl Config {
    /// In-memory configuration over the given tables.
    pub fn with_tables(tables: Vec<TableConfig>) -> Self {
        Self {
            database: None,
            sync_table: default_sync_table(),
            tables,
            default_top: default_top(),
        }
    }
}

/// Load configuration from YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(&path)?;
    let config: Config = serde_yaml_ng::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.tables.is_empty() {
        return Err(config_error("at least one table must be configured"));
    }

    if !ident::is_valid(&config.sync_table) {
        return Err(config_error(format!(
            "sync_table {:?} is not a valid identifier",
            config.sync_table
        )));
    }

    let mut seen = BTreeSet::new();
    for table in &config.tables {
        if !ident::is_valid(&table.name) {
            return Err(config_error(format!(
                "table name {:?} is not a valid identifier",
                table.name
            )));
        }
        if !seen.insert(table.name.to_ascii_lowercase()) {
            return Err(config_error(format!("table {:?} is listed twice", table.name)));
        }
    }

    if config.default_top == 0 {
        return Err(config_error("default_top must be greater than 0"));
    }

    Ok(())
}

fn config_error(message: impl Into<String>) -> Error {
    Error::Config {
        message: message.into(),
    }
}
