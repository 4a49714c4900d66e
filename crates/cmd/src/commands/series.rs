// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Outcome, to_json};
use anyhow::{Context, Result};
use diagnostics::*;
use standings::Standings;

pub fn series_command<F>(
    standings: &Standings,
    metric: &str,
    names: &[String],
    mut handler: F,
) -> Result<Outcome>
where
    F: FnMut(&str),
{
    let count = names.len();
    debug!("series_command called with metric {metric} for {count} names", metric: metric, count: count);

    let series = standings
        .series(names, metric)
        .with_context(|| format!("Failed to build daily {metric} series"))?;
    if series.is_empty() {
        return Ok(Outcome::NoData(format!(
            "No {metric} samples for {}",
            names.join(", ")
        )));
    }

    handler(&to_json(&series)?);
    Ok(Outcome::Found)
}
