// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Identifier chokepoint.
//!
//! Table and column names cannot be bound as query parameters, so they are
//! interpolated into generated SQL. Every such name passes through
//! [`checked`] first; nothing else in the crate constructs an [`Alias`] for a
//! table or column.

use crate::error::{Error, Result};
use sea_query::Alias;

/// ASCII letters, digits and underscore only; never empty.
#[must_use]
pub fn is_valid(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate `name` and wrap it for use in a sea-query statement.
pub fn checked(name: &str) -> Result<Alias> {
    if is_valid(name) {
        Ok(Alias::new(name))
    } else {
        Err(Error::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}
