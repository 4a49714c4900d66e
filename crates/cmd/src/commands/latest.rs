// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::common::{Outcome, to_json};
use anyhow::{Context, Result};
use standings::Standings;

pub fn latest_command<F>(standings: &Standings, mut handler: F) -> Result<Outcome>
where
    F: FnMut(&str),
{
    let snapshot = standings
        .latest()
        .context("Failed to read the latest ingestion run")?;

    match snapshot {
        Some(snapshot) => {
            handler(&to_json(&snapshot)?);
            Ok(Outcome::Found)
        }
        None => {
            let table = &standings.config().sync_table;
            Ok(Outcome::NoData(format!(
                "No ingestion run with rows found (sync table {table})"
            )))
        }
    }
}
