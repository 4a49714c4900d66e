// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::schema::Field;
use crate::time;
use chrono::NaiveDateTime;
use serde::Serialize;

/// One normalized snapshot row, whatever the physical layout it came from.
///
/// Fields a table does not have, or that a query did not project, are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Ordinal of the source table in the configuration.
    #[serde(skip)]
    pub source: usize,
    /// Storage row id within the source table.
    #[serde(skip)]
    pub row: i64,

    pub id: Option<String>,
    pub leaderboard_id: Option<String>,
    pub rank: Option<i64>,
    pub name: Option<String>,
    pub first_places: Option<i64>,
    pub second_places: Option<i64>,
    pub third_places: Option<i64>,
    pub finishes: Option<i64>,
    pub kudos_rank: Option<i64>,
    pub kudos: Option<i64>,
    pub folder_date: Option<String>,
    pub data_date: Option<String>,
    pub sync_id: Option<String>,
}

impl Record {
    /// Value of an integer field.
    #[must_use]
    pub fn integer(&self, field: Field) -> Option<i64> {
        match field {
            Field::Rank => self.rank,
            Field::FirstPlaces => self.first_places,
            Field::SecondPlaces => self.second_places,
            Field::ThirdPlaces => self.third_places,
            Field::Finishes => self.finishes,
            Field::KudosRank => self.kudos_rank,
            Field::Kudos => self.kudos,
            _ => None,
        }
    }

    pub fn set_integer(&mut self, field: Field, value: Option<i64>) {
        match field {
            Field::Rank => self.rank = value,
            Field::FirstPlaces => self.first_places = value,
            Field::SecondPlaces => self.second_places = value,
            Field::ThirdPlaces => self.third_places = value,
            Field::Finishes => self.finishes = value,
            Field::KudosRank => self.kudos_rank = value,
            Field::Kudos => self.kudos = value,
            _ => {}
        }
    }

    /// Set a text or instant field.
    pub fn set_text(&mut self, field: Field, value: Option<String>) {
        match field {
            Field::Id => self.id = value,
            Field::LeaderboardId => self.leaderboard_id = value,
            Field::Name => self.name = value,
            Field::FolderDate => self.folder_date = value,
            Field::DataDate => self.data_date = value,
            Field::SyncId => self.sync_id = value,
            _ => {}
        }
    }

    /// Entity key with surrounding whitespace removed; `None` when empty.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Parsed capture instant, when present and well formed.
    #[must_use]
    pub fn captured(&self) -> Option<NaiveDateTime> {
        self.folder_date.as_deref().and_then(time::parse_instant)
    }

    /// First-seen order: configured table order, then insertion order.
    #[must_use]
    pub fn seen_order(&self) -> (usize, i64) {
        (self.source, self.row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_trims_and_drops_empty() {
        let mut record = Record {
            name: Some("  Alice ".to_string()),
            ..Record::default()
        };
        assert_eq!(record.key(), Some("Alice"));

        record.name = Some("   ".to_string());
        assert_eq!(record.key(), None);

        record.name = None;
        assert_eq!(record.key(), None);
    }

    #[test]
    fn test_integer_accessors() {
        let mut record = Record::default();
        for field in Field::ALL.into_iter().filter(|f| f.is_metric()) {
            record.set_integer(field, Some(7));
            assert_eq!(record.integer(field), Some(7));
        }
        record.set_integer(Field::Name, Some(1));
        assert_eq!(record.integer(Field::Name), None);
    }
}
