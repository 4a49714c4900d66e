// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::config::Config;
use crate::dedup::dedupe_by_identity;
use crate::error::{Error, Result};
use crate::history::{Series, build_daily_series};
use crate::ident;
use crate::probe::{TableDescriptor, describe};
use crate::projection::{Scope, build_union_projection, fetch, normalized};
use crate::record::Record;
use crate::schema::Field;
use crate::sync::{SyncRecord, latest_sync};
use crate::time::{Bucket, in_bucket, resolve_closest_bucket};
use crate::topn::{Ranked, select_top_n};
use diagnostics::*;
use duckdb::{AccessMode, Connection};
use sea_query::Expr;
use serde::Serialize;

/// A deduplicated ranking at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Set when the snapshot was resolved from a requested time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<Bucket>,
    /// Set when the snapshot is the latest ingestion run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync: Option<SyncRecord>,
    pub rows: Vec<Record>,
}

/// Top-N entities of the latest run with their daily history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSeries {
    pub metric: Field,
    pub top: Vec<Ranked>,
    pub series: Series,
}

/// Read-only query engine over a snapshot store.
///
/// Every call probes the configured tables afresh; nothing is cached
/// between calls.
pub struct Standings {
    conn: Connection,
    config: Config,
}

impl Standings {
    /// Open the configured database read-only, or an empty in-memory
    /// database when none is configured.
    pub fn open(config: Config) -> Result<Self> {
        let conn = match &config.database {
            Some(path) => {
                let path_str = path.display().to_string();
                info!("Opening snapshot store {path_str} read-only", path_str: path_str.as_str());
                let flags = duckdb::Config::default().access_mode(AccessMode::ReadOnly)?;
                Connection::open_with_flags(path, flags)?
            }
            None => Connection::open_in_memory()?,
        };
        Ok(Self::with_connection(conn, config))
    }

    #[must_use]
    pub fn with_connection(conn: Connection, config: Config) -> Self {
        Self { conn, config }
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Probe the configured tables.
    pub fn describe(&self) -> Result<Vec<TableDescriptor>> {
        describe(&self.conn, &self.config.tables)
    }

    /// Resolve a requested time to its closest bucket.
    pub fn resolve(&self, timestamp: &str) -> Result<Option<Bucket>> {
        let tables = self.describe()?;
        resolve_closest_bucket(&self.conn, &tables, timestamp)
    }

    /// The ranking closest to `timestamp`.
    pub fn closest(&self, timestamp: &str) -> Result<Option<Snapshot>> {
        let tables = self.describe()?;
        let Some(bucket) = resolve_closest_bucket(&self.conn, &tables, timestamp)? else {
            return Ok(None);
        };

        let rows = self.snapshot_rows(&tables, Field::FolderDate, |desc| {
            Ok(Scope::Only(in_bucket(desc, &bucket)?))
        })?;
        let count = rows.len();
        let key = &bucket.key;
        info!("Closest snapshot {key} has {count} rows", key: key, count: count);

        Ok(Some(Snapshot {
            bucket: Some(bucket),
            sync: None,
            rows,
        }))
    }

    /// The ranking written by the most recent ingestion run.
    pub fn latest(&self) -> Result<Option<Snapshot>> {
        let Some(sync) = latest_sync(&self.conn, &self.config.sync_table)? else {
            return Ok(None);
        };
        let tables = self.describe()?;
        let rows = self.snapshot_rows(&tables, Field::SyncId, |desc| {
            Ok(Scope::Only(
                Expr::expr(normalized(desc, Field::SyncId)?).eq(sync.sync_id.as_str()),
            ))
        })?;
        if rows.is_empty() {
            let id = &sync.sync_id;
            debug!("Latest sync {id} has no rows", id: id);
            return Ok(None);
        }
        Ok(Some(Snapshot {
            bucket: None,
            sync: Some(sync),
            rows,
        }))
    }

    /// Top `n` entities of the latest run by `metric`.
    pub fn top(&self, metric: &str, n: usize) -> Result<Vec<Ranked>> {
        let metric = parse_metric(metric)?;
        let latest = latest_sync(&self.conn, &self.config.sync_table)?;
        let tables = self.describe()?;
        select_top_n(&self.conn, &tables, latest.as_ref(), metric, n)
    }

    /// Daily `metric` series for the given entity keys.
    pub fn series(&self, keys: &[String], metric: &str) -> Result<Series> {
        let metric = parse_metric(metric)?;
        let tables = self.describe()?;
        build_daily_series(&self.conn, &tables, keys, metric)
    }

    /// Select the top `n` first, then build series for exactly that set.
    pub fn top_series(&self, metric: &str, n: usize) -> Result<TopSeries> {
        let metric = parse_metric(metric)?;
        let latest = latest_sync(&self.conn, &self.config.sync_table)?;
        let tables = self.describe()?;
        let top = select_top_n(&self.conn, &tables, latest.as_ref(), metric, n)?;
        let keys: Vec<String> = top.iter().map(|r| r.name.clone()).collect();
        let series = build_daily_series(&self.conn, &tables, &keys, metric)?;
        Ok(TopSeries {
            metric,
            top,
            series,
        })
    }

    /// Full-width rows of every table having a name and `scope_field`,
    /// deduplicated and ordered by rank.
    fn snapshot_rows<F>(&self, tables: &[TableDescriptor], scope_field: Field, scope: F) -> Result<Vec<Record>>
    where
        F: FnMut(&TableDescriptor) -> Result<Scope>,
    {
        let Some(statement) =
            build_union_projection(tables, &Field::ALL, &[Field::Name, scope_field], scope)?
        else {
            return Ok(Vec::new());
        };
        let mut rows = dedupe_by_identity(fetch(&self.conn, &statement, &Field::ALL)?);
        // Unranked rows go last; equal ranks keep first-seen order.
        rows.sort_by_key(|r| (r.rank.is_none(), r.rank));
        Ok(rows)
    }
}

/// Validate a metric name: an identifier naming an integer logical field.
pub fn parse_metric(metric: &str) -> Result<Field> {
    ident::checked(metric)?;
    Field::parse(metric)
        .filter(|f| f.is_metric())
        .ok_or_else(|| Error::UnknownMetric {
            metric: metric.to_string(),
        })
}
