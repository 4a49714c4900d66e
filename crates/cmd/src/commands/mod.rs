// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod closest;
pub mod describe;
pub mod history;
pub mod latest;
pub mod series;
pub mod top;

pub use closest::closest_command;
pub use describe::describe_command;
pub use history::history_command;
pub use latest::latest_command;
pub use series::series_command;
pub use top::top_command;

use crate::cli::Commands;
use crate::common::Outcome;
use anyhow::Result;
use standings::Standings;

/// Dispatch a parsed subcommand, handing its JSON output to `handler`.
pub fn run_command<F>(standings: &Standings, command: Commands, handler: F) -> Result<Outcome>
where
    F: FnMut(&str),
{
    match command {
        Commands::Describe => describe_command(standings, handler),
        Commands::Closest { timestamp } => closest_command(standings, &timestamp, handler),
        Commands::Latest => latest_command(standings, handler),
        Commands::Top { metric, count } => top_command(standings, &metric, count, handler),
        Commands::Series { metric, names } => series_command(standings, &metric, &names, handler),
        Commands::History { metric, count } => history_command(standings, &metric, count, handler),
    }
}
