// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Outcome, to_json};
use anyhow::{Context, Result};
use diagnostics::*;
use standings::Standings;

pub fn closest_command<F>(standings: &Standings, timestamp: &str, mut handler: F) -> Result<Outcome>
where
    F: FnMut(&str),
{
    debug!("closest_command called with timestamp {timestamp}", timestamp: timestamp);

    let snapshot = standings
        .closest(timestamp)
        .with_context(|| format!("Failed to resolve snapshot closest to {timestamp}"))?;

    match snapshot {
        Some(snapshot) => {
            handler(&to_json(&snapshot)?);
            Ok(Outcome::Found)
        }
        None => Ok(Outcome::NoData(format!(
            "No snapshots have been captured; nothing is close to {timestamp}"
        ))),
    }
}
