// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

// Error types for standings queries.
//
// "No data" is not represented here: queries return `None` or empty
// collections when nothing matches.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A table or column name failed the identifier allow-list
    #[error("Invalid identifier: {name:?}")]
    InvalidIdentifier { name: String },

    /// Input matched none of: date, date+hour, date+hour:minute:second
    #[error("Malformed timestamp: {input:?} (expected YYYY-MM-DD, YYYY-MM-DD HH or YYYY-MM-DD HH:MM:SS)")]
    MalformedTimestamp { input: String },

    /// Metric is not one of the numeric logical fields
    #[error("Unknown metric: {metric:?}")]
    UnknownMetric { metric: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl Error {
    /// True for errors caused by caller input rather than by storage or
    /// configuration.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Error::InvalidIdentifier { .. }
                | Error::MalformedTimestamp { .. }
                | Error::UnknownMetric { .. }
        )
    }
}

/// Result type for standings operations
pub type Result<T> = std::result::Result<T, Error>;
