// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! History aggregator: one point per entity per calendar day.

use crate::error::Result;
use crate::probe::TableDescriptor;
use crate::projection::{Scope, build_union_projection, fetch};
use crate::record::Record;
use crate::schema::Field;
use chrono::{NaiveDate, NaiveDateTime};
use diagnostics::*;
use duckdb::Connection;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// The last value observed for an entity on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Point {
    pub day: NaiveDate,
    pub value: i64,
}

/// Daily series keyed by trimmed entity key.
pub type Series = BTreeMap<String, Vec<Point>>;

/// Group rows by (key, day) and keep the latest sample of each day.
///
/// Rows must be in first-seen order; a later row with the same capture
/// instant does not displace an earlier one. The latest sample is chosen
/// before its value is looked at: when it has no value the day is left
/// out rather than filled from an earlier sample. Rows without a key or a
/// parseable capture instant are ignored.
#[must_use]
pub fn daily_latest(rows: &[Record], metric: Field) -> Series {
    let mut days: BTreeMap<(String, NaiveDate), (NaiveDateTime, Option<i64>)> = BTreeMap::new();

    for row in rows {
        let Some(key) = row.key() else {
            continue;
        };
        let Some(captured) = row.captured() else {
            let raw = row.folder_date.clone().unwrap_or_default();
            warn!("Skipping sample for {key} with unparseable capture instant {raw}", key: key, raw: raw.as_str());
            continue;
        };
        let value = row.integer(metric);
        days.entry((key.to_string(), captured.date()))
            .and_modify(|kept| {
                if captured > kept.0 {
                    *kept = (captured, value);
                }
            })
            .or_insert((captured, value));
    }

    let mut series = Series::new();
    for ((key, day), (_, value)) in days {
        if let Some(value) = value {
            series.entry(key).or_default().push(Point { day, value });
        }
    }
    series
}

/// Daily series of `metric` for the given entity keys across all tables
/// having name, capture instant and the metric.
///
/// Keys are compared after trimming surrounding whitespace, and only that:
/// differently cased or spelled names are separate series. Matching is done
/// on [`Record::key`], the same identity the top-N selector and the dedup
/// resolver use. Keys with no samples are absent from the result.
pub fn build_daily_series(
    conn: &Connection,
    tables: &[TableDescriptor],
    keys: &[String],
    metric: Field,
) -> Result<Series> {
    let wanted: BTreeSet<&str> = keys
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if wanted.is_empty() {
        return Ok(Series::new());
    }

    let fields = [Field::Name, Field::FolderDate, metric];
    let Some(statement) = build_union_projection(tables, &fields, &fields, |_| Ok(Scope::All))?
    else {
        let metric_name = metric.as_str();
        debug!("No table carries name, folder_date and {metric_name}", metric_name: metric_name);
        return Ok(Series::new());
    };

    let mut rows = fetch(conn, &statement, &fields)?;
    rows.retain(|r| r.key().is_some_and(|k| wanted.contains(k)));
    let series = daily_latest(&rows, metric);
    let entities = series.len();
    let points: usize = series.values().map(Vec::len).sum();
    info!("Built {points} daily points for {entities} entities", points: points, entities: entities);
    Ok(series)
}
