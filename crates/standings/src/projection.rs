// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Schema normalizer.
//!
//! Builds one `UNION ALL` over every participating table, projecting each
//! requested logical field under its logical name and normalized type.
//! Tables missing a required field are left out; tables missing an optional
//! field contribute a typed NULL in its place.

use crate::error::Result;
use crate::ident;
use crate::probe::TableDescriptor;
use crate::record::Record;
use crate::schema::{Field, Kind};
use diagnostics::*;
use duckdb::Connection;
use sea_query::{
    Expr, Func, Iden, Query, QueryStatementWriter, SelectStatement, SimpleExpr,
    SqliteQueryBuilder, UnionType,
};

/// Types and functions referenced by generated DuckDB SQL.
#[derive(Iden)]
pub enum Duck {
    Varchar,
    Bigint,
}

const SOURCE: &str = "source";
const ROW: &str = "row_id";

/// Which rows of a participating table enter the union.
#[derive(Debug, Clone)]
pub enum Scope {
    All,
    Only(SimpleExpr),
    /// The table qualifies on fields but has nothing in scope.
    Exclude,
}

/// `CAST(<field column> AS <normalized type>)` for a column known to exist.
pub fn normalized(desc: &TableDescriptor, field: Field) -> Result<SimpleExpr> {
    Ok(cast(desc.column(field)?, field.kind()))
}

fn cast(expr: impl Into<SimpleExpr>, kind: Kind) -> SimpleExpr {
    match kind {
        Kind::Integer => Func::cast_as(expr, Duck::Bigint).into(),
        Kind::Text | Kind::Instant => Func::cast_as(expr, Duck::Varchar).into(),
    }
}

/// The union projection of `fields` over every table having all of
/// `required`. `scope` narrows each participating table; `None` means no
/// table participates.
pub fn build_union_projection<F>(
    tables: &[TableDescriptor],
    fields: &[Field],
    required: &[Field],
    mut scope: F,
) -> Result<Option<SelectStatement>>
where
    F: FnMut(&TableDescriptor) -> Result<Scope>,
{
    let mut union: Option<SelectStatement> = None;

    for desc in tables {
        if !desc.exists || !desc.has_all(required) {
            continue;
        }
        let condition = match scope(desc)? {
            Scope::All => None,
            Scope::Only(cond) => Some(cond),
            Scope::Exclude => {
                let name = &desc.name;
                debug!("Table {name} has no rows in scope", name: name);
                continue;
            }
        };

        let mut select = Query::select();
        select
            .expr_as(cast(Expr::val(desc.ordinal as i64), Kind::Integer), ident::checked(SOURCE)?)
            .expr_as(cast(Expr::cust("rowid"), Kind::Integer), ident::checked(ROW)?);
        for field in fields {
            let expr = if desc.has(*field) {
                normalized(desc, *field)?
            } else {
                cast(Expr::cust("NULL"), field.kind())
            };
            select.expr_as(expr, ident::checked(field.as_str())?);
        }
        select.from(desc.table()?);
        if let Some(cond) = condition {
            select.and_where(cond);
        }

        match union.as_mut() {
            None => union = Some(select),
            Some(u) => {
                u.union(UnionType::All, select);
            }
        }
    }

    Ok(union)
}

/// Run a projection built by [`build_union_projection`] with the same
/// `fields`, returning rows in first-seen order.
pub fn fetch(conn: &Connection, statement: &SelectStatement, fields: &[Field]) -> Result<Vec<Record>> {
    let sql = statement.to_string(SqliteQueryBuilder);
    debug!("Union projection: {sql}", sql: sql.as_str());

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut records = Vec::new();

    while let Some(row) = rows.next()? {
        let source: i64 = row.get(0)?;
        let mut record = Record {
            source: usize::try_from(source).unwrap_or_default(),
            row: row.get(1)?,
            ..Record::default()
        };
        for (i, field) in fields.iter().enumerate() {
            match field.kind() {
                Kind::Integer => record.set_integer(*field, row.get(i + 2)?),
                Kind::Text | Kind::Instant => record.set_text(*field, row.get(i + 2)?),
            }
        }
        records.push(record);
    }

    records.sort_by_key(Record::seen_order);
    let count = records.len();
    debug!("Union projection returned {count} rows", count: count);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::probe::describe;
    use crate::schema::Naming;

    fn setup() -> (Connection, Vec<TableDescriptor>) {
        let conn = Connection::open_in_memory().expect("open");
        conn.execute_batch(
            "CREATE TABLE leaderboard (name VARCHAR, kudos BIGINT, folder_date VARCHAR, sync_id VARCHAR);
             INSERT INTO leaderboard VALUES
               ('Alice', 120, '2024-11-27 09:00:00', 's2'),
               ('Bob', 90, '2024-11-26 17:00:00', 's1');
             CREATE TABLE archive (column3 VARCHAR, column9 VARCHAR, column10 VARCHAR);
             INSERT INTO archive VALUES ('Carol', '75', '2024-11-25 08:00:00');
             CREATE TABLE names_only (name VARCHAR);
             INSERT INTO names_only VALUES ('Dave');",
        )
        .expect("seed");
        let tables = vec![
            TableConfig::new("leaderboard", Naming::Real),
            TableConfig::new("archive", Naming::Generic),
            TableConfig::new("names_only", Naming::Real),
        ];
        let descriptors = describe(&conn, &tables).expect("describe");
        (conn, descriptors)
    }

    #[test]
    fn test_required_fields_select_tables() {
        let (conn, tables) = setup();
        let fields = [Field::Name, Field::Kudos, Field::SyncId];
        let statement = build_union_projection(&tables, &fields, &[Field::Name, Field::Kudos], |_| Ok(Scope::All))
            .expect("build")
            .expect("some table qualifies");

        let records = fetch(&conn, &statement, &fields).expect("fetch");
        let names: Vec<_> = records.iter().filter_map(|r| r.name.clone()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);

        // Optional sync_id is NULL for the generic table, kudos is normalized.
        assert_eq!(records[2].sync_id, None);
        assert_eq!(records[2].kudos, Some(75));
        assert_eq!(records[2].source, 1);
        assert_eq!(records[0].sync_id.as_deref(), Some("s2"));
    }

    #[test]
    fn test_required_optional_field_excludes_table() {
        let (conn, tables) = setup();
        let fields = [Field::Name, Field::SyncId];
        let statement = build_union_projection(&tables, &fields, &fields, |_| Ok(Scope::All))
            .expect("build")
            .expect("leaderboard qualifies");
        let records = fetch(&conn, &statement, &fields).expect("fetch");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.source == 0));
    }

    #[test]
    fn test_scope_narrows_and_excludes() {
        let (conn, tables) = setup();
        let fields = [Field::Name, Field::Kudos];
        let statement = build_union_projection(&tables, &fields, &fields, |desc| {
            if desc.name == "archive" {
                return Ok(Scope::Exclude);
            }
            Ok(Scope::Only(
                Expr::expr(normalized(desc, Field::Name)?).eq("Bob"),
            ))
        })
        .expect("build")
        .expect("leaderboard qualifies");
        let records = fetch(&conn, &statement, &fields).expect("fetch");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kudos, Some(90));
    }

    #[test]
    fn test_no_participating_tables() {
        let (_conn, tables) = setup();
        let projection =
            build_union_projection(&tables, &[Field::Name], &[Field::DataDate], |_| Ok(Scope::All))
                .expect("build");
        assert!(projection.is_none());
    }

    #[test]
    fn test_generated_sql_quotes_identifiers() {
        let (_conn, tables) = setup();
        let statement = build_union_projection(&tables, &[Field::Name], &[Field::Name], |_| Ok(Scope::All))
            .expect("build")
            .expect("tables qualify");
        let sql = statement.to_string(SqliteQueryBuilder);
        assert!(sql.contains(r#"FROM "leaderboard""#), "{sql}");
        assert!(sql.contains(r#"CAST("column3" AS varchar) AS "name""#), "{sql}");
        assert!(sql.contains("UNION ALL"), "{sql}");
    }
}
