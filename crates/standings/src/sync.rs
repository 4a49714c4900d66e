// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::Result;
use crate::ident;
use crate::probe::table_exists;
use crate::projection::Duck;
use diagnostics::*;
use duckdb::{Connection, OptionalExt};
use sea_query::{Expr, Func, Order, Query, QueryStatementWriter, SqliteQueryBuilder};
use serde::Serialize;

/// One ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncRecord {
    pub sync_id: String,
    pub sync_date: String,
}

/// The Sync Record with the greatest `sync_date`, if the sync table exists
/// and has one.
pub fn latest_sync(conn: &Connection, sync_table: &str) -> Result<Option<SyncRecord>> {
    if !table_exists(conn, sync_table)? {
        debug!("Sync table {sync_table} does not exist", sync_table: sync_table);
        return Ok(None);
    }

    let id = ident::checked("sync_id")?;
    let date = ident::checked("sync_date")?;
    let sql = Query::select()
        .expr(Func::cast_as(Expr::col(id.clone()), Duck::Varchar))
        .expr(Func::cast_as(Expr::col(date.clone()), Duck::Varchar))
        .from(ident::checked(sync_table)?)
        .and_where(Expr::col(id).is_not_null())
        .and_where(Expr::col(date.clone()).is_not_null())
        .order_by(date, Order::Desc)
        .limit(1)
        .to_string(SqliteQueryBuilder);
    debug!("Latest sync: {sql}", sql: sql.as_str());

    let record = conn
        .query_row(&sql, [], |row| {
            Ok(SyncRecord {
                sync_id: row.get(0)?,
                sync_date: row.get(1)?,
            })
        })
        .optional()?;
    Ok(record)
}
