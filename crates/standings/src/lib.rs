// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Standings: temporal queries over ranked-leaderboard snapshots
//!
//! Snapshot rows accumulate in DuckDB tables whose layouts differ (real or
//! anonymous positional column names, optional `sync_id`). The engine
//! answers four read-only queries across all of them without migrating any
//! data:
//! - the ranking closest to a requested time ([`Standings::closest`]),
//! - the ranking of the latest ingestion run ([`Standings::latest`]),
//! - the top-N entities of the latest run ([`Standings::top`]),
//! - one value per entity per day ([`Standings::series`]).

pub mod config;
pub mod dedup;
mod engine;
mod error;
pub mod history;
pub mod ident;
pub mod probe;
pub mod projection;
mod record;
pub mod schema;
pub mod sync;
pub mod time;
pub mod topn;

pub use config::{Config, TableConfig, load_config, validate_config};
pub use engine::{Snapshot, Standings, TopSeries, parse_metric};
pub use error::{Error, Result};
pub use history::{Point, Series};
pub use probe::TableDescriptor;
pub use record::Record;
pub use schema::{Field, Naming};
pub use sync::SyncRecord;
pub use time::Bucket;
pub use topn::Ranked;
