// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Top-N selector over the most recent ingestion run.

use crate::error::Result;
use crate::probe::TableDescriptor;
use crate::projection::{Scope, build_union_projection, fetch, normalized};
use crate::record::Record;
use crate::schema::Field;
use crate::sync::SyncRecord;
use crate::time::{parse_instant, table_captures};
use diagnostics::*;
use duckdb::Connection;
use sea_query::Expr;
use serde::Serialize;
use std::collections::HashMap;

/// An entity and its metric value in the latest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub name: String,
    pub value: i64,
}

/// How a table is narrowed to "the latest run".
///
/// Tables with `sync_id` follow the latest Sync Record. Tables without it
/// follow their own most recent capture instant.
fn latest_run_scope(
    conn: &Connection,
    desc: &TableDescriptor,
    latest: Option<&SyncRecord>,
) -> Result<Scope> {
    if desc.has(Field::SyncId) {
        return Ok(match latest {
            Some(sync) => Scope::Only(
                Expr::expr(normalized(desc, Field::SyncId)?).eq(sync.sync_id.as_str()),
            ),
            None => Scope::Exclude,
        });
    }
    if desc.has(Field::FolderDate) {
        let newest = table_captures(conn, desc)?
            .into_iter()
            .filter_map(|raw| parse_instant(&raw).map(|t| (t, raw)))
            .max_by(|a, b| a.0.cmp(&b.0));
        return Ok(match newest {
            Some((_, raw)) => {
                let name = &desc.name;
                debug!("Table {name} has no sync_id; scoping to capture {raw}", name: name, raw: raw.as_str());
                Scope::Only(Expr::expr(normalized(desc, Field::FolderDate)?).eq(raw))
            }
            None => Scope::Exclude,
        });
    }
    Ok(Scope::Exclude)
}

/// Fold rows into one value per trimmed entity key, keeping the maximum
/// and the first-seen order. Rows without a key or a value are ignored.
#[must_use]
pub fn max_per_entity(rows: &[Record], metric: Field) -> Vec<Ranked> {
    let mut out: Vec<Ranked> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let (Some(key), Some(value)) = (row.key(), row.integer(metric)) else {
            continue;
        };
        match index.get(key) {
            Some(&at) => out[at].value = out[at].value.max(value),
            None => {
                index.insert(key, out.len());
                out.push(Ranked {
                    name: key.to_string(),
                    value,
                });
            }
        }
    }
    out
}

/// Order by value, highest first, and keep `n`. The sort is stable, so
/// equal values stay in first-seen order.
#[must_use]
pub fn rank(mut entries: Vec<Ranked>, n: usize) -> Vec<Ranked> {
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries.truncate(n);
    entries
}

/// Top `n` entities by `metric`, scoped to the latest run.
///
/// Entities seen in several tables count once, with their maximum value.
/// Returns an empty list when no table qualifies.
pub fn select_top_n(
    conn: &Connection,
    tables: &[TableDescriptor],
    latest: Option<&SyncRecord>,
    metric: Field,
    n: usize,
) -> Result<Vec<Ranked>> {
    if n == 0 {
        return Ok(Vec::new());
    }

    let metric_name = metric.as_str();
    let fields = [Field::Name, metric];
    let Some(statement) =
        build_union_projection(tables, &fields, &fields, |desc| latest_run_scope(conn, desc, latest))?
    else {
        debug!("No table carries name and {metric_name}", metric_name: metric_name);
        return Ok(Vec::new());
    };

    let rows = fetch(conn, &statement, &fields)?;
    let top = rank(max_per_entity(&rows, metric), n);
    let count = top.len();
    info!("Selected top {count} entities by {metric_name}", count: count, metric_name: metric_name);
    Ok(top)
}
