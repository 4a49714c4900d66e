// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Outcome, to_json};
use anyhow::{Context, Result};
use diagnostics::*;
use standings::Standings;

/// History command - top entities of the most recent run together with
/// their daily series
pub fn history_command<F>(
    standings: &Standings,
    metric: &str,
    count: Option<usize>,
    mut handler: F,
) -> Result<Outcome>
where
    F: FnMut(&str),
{
    let n = count.unwrap_or(standings.config().default_top);
    debug!("history_command called with metric {metric}, n {n}", metric: metric, n: n);

    let result = standings
        .top_series(metric, n)
        .with_context(|| format!("Failed to build {metric} history for top {n}"))?;
    if result.top.is_empty() {
        return Ok(Outcome::NoData(format!(
            "No entities with {metric} in the most recent run"
        )));
    }

    handler(&to_json(&result)?);
    Ok(Outcome::Found)
}
