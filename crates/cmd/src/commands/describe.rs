// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Outcome, to_json};
use anyhow::{Context, Result};
use diagnostics::*;
use standings::Standings;

/// Describe command - shows whether each configured table exists and which
/// logical fields it carries
pub fn describe_command<F>(standings: &Standings, mut handler: F) -> Result<Outcome>
where
    F: FnMut(&str),
{
    let tables = standings.describe().context("Failed to probe tables")?;
    let count = tables.len();
    debug!("describe_command probed {count} tables", count: count);

    handler(&to_json(&tables)?);
    Ok(Outcome::Found)
}
