// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "standings")]
pub struct Cli {
    /// Configuration file (defaults to $STANDINGS_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Show which configured tables exist and which fields they carry
    Describe,
    /// Show the ranking closest to a point in time
    Closest {
        /// YYYY-MM-DD, YYYY-MM-DD HH or YYYY-MM-DD HH:MM:SS
        timestamp: String,
    },
    /// Show the ranking written by the most recent ingestion run
    Latest,
    /// Show the top entities of the most recent run
    Top {
        /// Numeric field to rank by
        #[arg(short, long, default_value = "kudos")]
        metric: String,

        /// How many entities (defaults to the configured default_top)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Show one value per day for the named entities
    Series {
        /// Numeric field to track
        #[arg(short, long, default_value = "kudos")]
        metric: String,

        /// Entity names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Show daily series for the top entities of the most recent run
    History {
        /// Numeric field to rank by and track
        #[arg(short, long, default_value = "kudos")]
        metric: String,

        /// How many entities (defaults to the configured default_top)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}
