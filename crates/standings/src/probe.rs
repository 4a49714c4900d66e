// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Table and column existence probes.
//!
//! A missing table or column is an ordinary outcome: it decides whether a
//! table takes part in a query. Names that fail the identifier allow-list
//! are reported as missing and never reach the database.

use crate::config::TableConfig;
use crate::error::Result;
use crate::ident;
use crate::schema::{Field, Naming};
use diagnostics::*;
use duckdb::{Connection, params};
use sea_query::{Alias, Expr};
use serde::Serialize;
use std::collections::BTreeSet;

/// Does a stored table called `name` exist?
///
/// Views are not counted: projections order rows by `rowid`, which only
/// stored tables have.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    if !ident::is_valid(name) {
        debug!("Rejected table name {name} before probing", name: name);
        return Ok(false);
    }
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables \
         WHERE lower(table_name) = lower(?) AND table_type IN ('BASE TABLE', 'LOCAL TEMPORARY')",
        params![name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Does `table` have a physical column for the logical field `logical`?
pub fn column_exists(conn: &Connection, table: &TableConfig, logical: &str) -> Result<bool> {
    let column = table.naming.resolve(logical);
    if !ident::is_valid(&table.name) || !ident::is_valid(&column) {
        let table_name = &table.name;
        debug!("Rejected column {column} of {table_name} before probing", column: column, table_name: table_name);
        return Ok(false);
    }
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.columns \
         WHERE lower(table_name) = lower(?) AND lower(column_name) = lower(?)",
        params![table.name, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Capabilities of one configured table, probed for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub naming: Naming,
    /// Position in the configuration; the first-seen order across tables.
    pub ordinal: usize,
    pub exists: bool,
    /// Logical fields with a physical column in this table.
    pub fields: BTreeSet<Field>,
}

impl TableDescriptor {
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }

    #[must_use]
    pub fn has_all(&self, fields: &[Field]) -> bool {
        fields.iter().all(|f| self.has(*f))
    }

    /// Validated table identifier.
    pub fn table(&self) -> Result<Alias> {
        ident::checked(&self.name)
    }

    /// Column expression for `field` in this table.
    pub fn column(&self, field: Field) -> Result<Expr> {
        Ok(Expr::col(ident::checked(
            &self.naming.resolve(field.as_str()),
        )?))
    }
}

/// Probe every configured table. Results are not cached across calls.
pub fn describe(conn: &Connection, tables: &[TableConfig]) -> Result<Vec<TableDescriptor>> {
    let mut out = Vec::with_capacity(tables.len());
    for (ordinal, table) in tables.iter().enumerate() {
        let exists = table_exists(conn, &table.name)?;
        let mut fields = BTreeSet::new();
        if exists {
            for field in Field::ALL {
                if column_exists(conn, table, field.as_str())? {
                    fields.insert(field);
                }
            }
        }
        let name = &table.name;
        let field_count = fields.len();
        debug!("Probed table {name}: exists={exists}, {field_count} logical fields", name: name, exists: exists, field_count: field_count);
        out.push(TableDescriptor {
            name: table.name.clone(),
            naming: table.naming,
            ordinal,
            exists,
            fields,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE leaderboard (name VARCHAR, kudos BIGINT, folder_date VARCHAR);
             CREATE TABLE archive (column3 VARCHAR, column9 VARCHAR, column10 VARCHAR);",
        )
        .expect("create");
        conn
    }

    #[test]
    fn test_table_exists() {
        let conn = setup();
        assert!(table_exists(&conn, "leaderboard").expect("lookup"));
        assert!(table_exists(&conn, "LEADERBOARD").expect("lookup"));
        assert!(!table_exists(&conn, "missing").expect("lookup"));
    }

    #[test]
    fn test_views_are_not_tables() {
        let conn = setup();
        conn.execute_batch(
            "CREATE VIEW board_view AS SELECT * FROM leaderboard;
             CREATE TEMPORARY TABLE scratch (name VARCHAR);",
        )
        .expect("create");
        assert!(!table_exists(&conn, "board_view").expect("lookup"));
        assert!(table_exists(&conn, "scratch").expect("lookup"));

        let descriptors =
            describe(&conn, &[TableConfig::new("board_view", Naming::Real)]).expect("describe");
        assert!(!descriptors[0].exists);
        assert!(descriptors[0].fields.is_empty());
    }

    #[test]
    fn test_rejects_injection() {
        let conn = setup();
        assert!(!table_exists(&conn, "leaderboard; DROP TABLE leaderboard").expect("lookup"));
        assert!(!table_exists(&conn, "leader board").expect("lookup"));
        let table = TableConfig::new("leaderboard", Naming::Real);
        assert!(!column_exists(&conn, &table, "kudos;").expect("lookup"));
        assert!(!column_exists(&conn, &table, "kudos name").expect("lookup"));
        assert!(table_exists(&conn, "leaderboard").expect("still there"));
    }

    #[test]
    fn test_column_exists_follows_naming() {
        let conn = setup();
        let real = TableConfig::new("leaderboard", Naming::Real);
        let generic = TableConfig::new("archive", Naming::Generic);

        assert!(column_exists(&conn, &real, "kudos").expect("lookup"));
        assert!(!column_exists(&conn, &real, "sync_id").expect("lookup"));
        assert!(column_exists(&conn, &generic, "kudos").expect("lookup"));
        assert!(column_exists(&conn, &generic, "folder_date").expect("lookup"));
        assert!(!column_exists(&conn, &generic, "sync_id").expect("lookup"));
        assert!(!column_exists(&conn, &generic, "kudos_total").expect("lookup"));
    }

    #[test]
    fn test_describe() {
        let conn = setup();
        let tables = vec![
            TableConfig::new("leaderboard", Naming::Real),
            TableConfig::new("archive", Naming::Generic),
            TableConfig::new("missing", Naming::Real),
        ];
        let descriptors = describe(&conn, &tables).expect("describe");
        assert_eq!(descriptors.len(), 3);

        assert!(descriptors[0].exists);
        assert!(descriptors[0].has_all(&[Field::Name, Field::Kudos, Field::FolderDate]));
        assert!(!descriptors[0].has(Field::SyncId));

        assert_eq!(descriptors[1].ordinal, 1);
        assert_eq!(
            descriptors[1].fields.iter().copied().collect::<Vec<_>>(),
            vec![Field::Name, Field::Kudos, Field::FolderDate]
        );

        assert!(!descriptors[2].exists);
        assert!(descriptors[2].fields.is_empty());
    }
}
