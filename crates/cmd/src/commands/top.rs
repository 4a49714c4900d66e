// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Outcome, to_json};
use anyhow::{Context, Result};
use diagnostics::*;
use standings::Standings;

/// Top command - ranks entities of the most recent run by one metric
pub fn top_command<F>(
    standings: &Standings,
    metric: &str,
    count: Option<usize>,
    mut handler: F,
) -> Result<Outcome>
where
    F: FnMut(&str),
{
    let n = count.unwrap_or(standings.config().default_top);
    debug!("top_command called with metric {metric}, n {n}", metric: metric, n: n);

    let top = standings
        .top(metric, n)
        .with_context(|| format!("Failed to select top {n} by {metric}"))?;
    if top.is_empty() {
        return Ok(Outcome::NoData(format!(
            "No entities with {metric} in the most recent run"
        )));
    }

    handler(&to_json(&top)?);
    Ok(Outcome::Found)
}
