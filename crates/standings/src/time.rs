// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Time resolver: maps a requested instant onto the hour bucket of the
//! nearest stored capture batch.

use crate::error::{Error, Result};
use crate::probe::TableDescriptor;
use crate::projection::normalized;
use crate::schema::Field;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use diagnostics::*;
use duckdb::Connection;
use sea_query::{Expr, Query, QueryStatementWriter, SelectStatement, SqliteQueryBuilder, UnionType};
use serde::Serialize;

/// Parse a requested timestamp at one of three precisions, padding the
/// missing parts: a bare date means noon, a bare hour means `HH:00:00`.
///
/// `T` is accepted in place of the space separator.
pub fn parse_target(input: &str) -> Result<NaiveDateTime> {
    let malformed = || Error::MalformedTimestamp {
        input: input.to_string(),
    };
    let text = input.trim();

    let (date_part, time_part) = match text.find([' ', 'T']) {
        Some(pos) => (&text[..pos], Some(&text[pos + 1..])),
        None => (text, None),
    };
    if date_part.len() != 10 {
        return Err(malformed());
    }
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|_| malformed())?;

    let time = match time_part {
        None => NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(malformed)?,
        Some(hour) if hour.len() == 2 && hour.bytes().all(|b| b.is_ascii_digit()) => {
            let hour: u32 = hour.parse().map_err(|_| malformed())?;
            NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(malformed)?
        }
        Some(hms) if hms.len() == 8 => {
            NaiveTime::parse_from_str(hms, "%H:%M:%S").map_err(|_| malformed())?
        }
        Some(_) => return Err(malformed()),
    };

    Ok(date.and_time(time))
}

/// Parse a stored instant. Tolerates a `T` separator, fractional seconds
/// and missing seconds.
#[must_use]
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Truncate to the start of the hour.
#[must_use]
pub fn hour_of(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .date()
        .and_hms_opt(instant.hour(), 0, 0)
        .unwrap_or(instant)
}

/// An hour of stored captures selected for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Bucket key, `YYYY-MM-DD HH:00:00`.
    pub key: String,
    /// The requested hour itself had captures.
    pub exact: bool,
    /// Every stored capture instant falling in this hour, as stored.
    pub captures: Vec<String>,
}

/// Pick the bucket for `target` from `pool`.
///
/// An exact hour match wins even when a capture in another hour is
/// arithmetically closer. Otherwise the capture nearest to `target` decides
/// the hour, the earliest in pool order winning ties. `None` when the pool
/// has no parseable instant.
#[must_use]
pub fn closest_bucket(target: NaiveDateTime, pool: &[String]) -> Option<Bucket> {
    let parsed: Vec<(&String, NaiveDateTime)> = pool
        .iter()
        .filter_map(|raw| match parse_instant(raw) {
            Some(instant) => Some((raw, instant)),
            None => {
                warn!("Skipping unparseable capture instant {raw}", raw: raw);
                None
            }
        })
        .collect();

    let wanted = hour_of(target);
    let (hour, exact) = if parsed.iter().any(|(_, t)| hour_of(*t) == wanted) {
        (wanted, true)
    } else {
        let mut best: Option<(NaiveDateTime, i64)> = None;
        for (_, instant) in &parsed {
            let distance = (*instant - target).num_milliseconds().abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((*instant, distance));
            }
        }
        (hour_of(best?.0), false)
    };

    Some(Bucket {
        key: hour.format("%Y-%m-%d %H:00:00").to_string(),
        exact,
        captures: parsed
            .iter()
            .filter(|(_, t)| hour_of(*t) == hour)
            .map(|(raw, _)| (*raw).clone())
            .collect(),
    })
}

/// Distinct capture instants of one table, or of all tables when unioned.
fn captures_of(desc: &TableDescriptor) -> Result<SelectStatement> {
    Ok(Query::select()
        .distinct()
        .expr_as(normalized(desc, Field::FolderDate)?, crate::ident::checked("capture")?)
        .from(desc.table()?)
        .and_where(desc.column(Field::FolderDate)?.is_not_null())
        .to_owned())
}

fn run_pool(conn: &Connection, statement: &SelectStatement) -> Result<Vec<String>> {
    let sql = statement.to_string(SqliteQueryBuilder);
    debug!("Capture pool: {sql}", sql: sql.as_str());
    let mut stmt = conn.prepare(&sql)?;
    let values = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(sort_pool(values))
}

/// Order a pool by instant (text for unparseable entries), dropping repeats.
fn sort_pool(mut values: Vec<String>) -> Vec<String> {
    values.sort_by(|a, b| {
        (parse_instant(a), a.as_str()).cmp(&(parse_instant(b), b.as_str()))
    });
    values.dedup();
    values
}

/// All stored capture instants across every table that records one,
/// ascending.
pub fn capture_pool(conn: &Connection, tables: &[TableDescriptor]) -> Result<Vec<String>> {
    let mut union: Option<SelectStatement> = None;
    for desc in tables.iter().filter(|d| d.exists && d.has(Field::FolderDate)) {
        let select = captures_of(desc)?;
        match union.as_mut() {
            None => union = Some(select),
            Some(u) => {
                u.union(UnionType::Distinct, select);
            }
        }
    }
    match union {
        None => Ok(Vec::new()),
        Some(statement) => run_pool(conn, &statement),
    }
}

/// Stored capture instants of a single table, ascending.
pub fn table_captures(conn: &Connection, desc: &TableDescriptor) -> Result<Vec<String>> {
    if !desc.exists || !desc.has(Field::FolderDate) {
        return Ok(Vec::new());
    }
    run_pool(conn, &captures_of(desc)?)
}

/// Resolve `input` to the closest bucket over all tables.
///
/// `Ok(None)` means nothing has been captured yet.
pub fn resolve_closest_bucket(
    conn: &Connection,
    tables: &[TableDescriptor],
    input: &str,
) -> Result<Option<Bucket>> {
    let target = parse_target(input)?;
    let pool = capture_pool(conn, tables)?;
    let bucket = closest_bucket(target, &pool);
    match &bucket {
        Some(b) => {
            let key = &b.key;
            let exact = b.exact;
            debug!("Resolved {input} to bucket {key} (exact={exact})", input: input, key: key, exact: exact);
        }
        None => debug!("No capture instants to resolve {input} against", input: input),
    }
    Ok(bucket)
}

/// Filter matching rows whose capture instant lies in `bucket`.
pub fn in_bucket(desc: &TableDescriptor, bucket: &Bucket) -> Result<sea_query::SimpleExpr> {
    Ok(Expr::expr(normalized(desc, Field::FolderDate)?).is_in(bucket.captures.iter().cloned()))
}
