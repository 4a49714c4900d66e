// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logical fields and the per-table column naming strategies.
//!
//! Snapshot tables come in two layouts: some carry real column names
//! (`name`, `kudos`, ...), others were exported with anonymous positional
//! columns (`column0` .. `column12`). Query code only speaks in logical
//! field names and asks the table's [`Naming`] for the physical column.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL type a logical field is normalized to in projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Integer,
    Instant,
}

/// The closed set of logical snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    /// Foreign id of the rank group the row belongs to
    LeaderboardId,
    Rank,
    /// Display name; the entity identity
    Name,
    FirstPlaces,
    SecondPlaces,
    ThirdPlaces,
    /// Completion count
    Finishes,
    KudosRank,
    Kudos,
    /// Capture-batch instant shared by a physical run
    FolderDate,
    /// Ingestion instant of the row
    DataDate,
    SyncId,
}

impl Field {
    /// All fields, in generic column order.
    pub const ALL: [Field; 13] = [
        Field::Id,
        Field::LeaderboardId,
        Field::Rank,
        Field::Name,
        Field::FirstPlaces,
        Field::SecondPlaces,
        Field::ThirdPlaces,
        Field::Finishes,
        Field::KudosRank,
        Field::Kudos,
        Field::FolderDate,
        Field::DataDate,
        Field::SyncId,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::LeaderboardId => "leaderboard_id",
            Field::Rank => "rank",
            Field::Name => "name",
            Field::FirstPlaces => "first_places",
            Field::SecondPlaces => "second_places",
            Field::ThirdPlaces => "third_places",
            Field::Finishes => "finishes",
            Field::KudosRank => "kudos_rank",
            Field::Kudos => "kudos",
            Field::FolderDate => "folder_date",
            Field::DataDate => "data_date",
            Field::SyncId => "sync_id",
        }
    }

    /// Look up a logical field by its name. Exact match only.
    #[must_use]
    pub fn parse(logical: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.as_str() == logical)
    }

    /// Positional column name used by anonymized tables.
    #[must_use]
    pub fn generic_column(self) -> &'static str {
        const GENERIC: [&str; 13] = [
            "column0", "column1", "column2", "column3", "column4", "column5", "column6",
            "column7", "column8", "column9", "column10", "column11", "column12",
        ];
        GENERIC[self as usize]
    }

    #[must_use]
    pub fn kind(self) -> Kind {
        match self {
            Field::Id | Field::LeaderboardId | Field::Name | Field::SyncId => Kind::Text,
            Field::FolderDate | Field::DataDate => Kind::Instant,
            Field::Rank
            | Field::FirstPlaces
            | Field::SecondPlaces
            | Field::ThirdPlaces
            | Field::Finishes
            | Field::KudosRank
            | Field::Kudos => Kind::Integer,
        }
    }

    /// Integer fields can be ranked and charted.
    #[must_use]
    pub fn is_metric(self) -> bool {
        self.kind() == Kind::Integer
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column naming strategy of one physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Naming {
    /// Columns carry the logical names.
    #[default]
    Real,
    /// Columns are `column0` .. `column12` in [`Field::ALL`] order.
    Generic,
}

impl Naming {
    /// Physical column for `logical` under this strategy.
    ///
    /// Names outside the logical field set pass through unchanged; callers
    /// must probe the column before relying on it.
    #[must_use]
    pub fn resolve(self, logical: &str) -> String {
        match self {
            Naming::Real => logical.to_string(),
            Naming::Generic => match Field::parse(logical) {
                Some(field) => field.generic_column().to_string(),
                None => logical.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_naming_is_identity() {
        assert_eq!(Naming::Real.resolve("kudos"), "kudos");
        assert_eq!(Naming::Real.resolve("folder_date"), "folder_date");
        assert_eq!(Naming::Real.resolve("anything_else"), "anything_else");
    }

    #[test]
    fn test_generic_naming_lookup() {
        assert_eq!(Naming::Generic.resolve("id"), "column0");
        assert_eq!(Naming::Generic.resolve("name"), "column3");
        assert_eq!(Naming::Generic.resolve("kudos"), "column9");
        assert_eq!(Naming::Generic.resolve("folder_date"), "column10");
        assert_eq!(Naming::Generic.resolve("sync_id"), "column12");
    }

    #[test]
    fn test_generic_naming_passes_unknown_through() {
        assert_eq!(Naming::Generic.resolve("races"), "races");
        assert_eq!(Naming::Generic.resolve("Kudos"), "Kudos");
    }

    #[test]
    fn test_field_table_is_consistent() {
        for (i, field) in Field::ALL.into_iter().enumerate() {
            assert_eq!(field.generic_column(), format!("column{i}"));
            assert_eq!(Field::parse(field.as_str()), Some(field));
        }
        assert_eq!(Field::parse("races"), None);
    }

    #[test]
    fn test_metrics_are_integer_fields() {
        let metrics: Vec<&str> = Field::ALL
            .into_iter()
            .filter(|f| f.is_metric())
            .map(Field::as_str)
            .collect();
        assert_eq!(
            metrics,
            vec!["rank", "first_places", "second_places", "third_places", "finishes", "kudos_rank", "kudos"]
        );
    }

    #[test]
    fn test_naming_deserializes_snake_case() {
        let naming: Naming = serde_yaml_ng::from_str("generic").expect("parse");
        assert_eq!(naming, Naming::Generic);
    }
}
