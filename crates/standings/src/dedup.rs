// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::record::Record;
use std::collections::HashMap;

/// Collapse rows sharing an entity key to the one captured last.
///
/// Rows arrive in first-seen order. A later duplicate replaces the retained
/// row only when both capture instants are known and the later one is
/// strictly more recent; otherwise the first row stays. The survivor keeps
/// the position of the first occurrence and carries the trimmed key as its
/// name. Rows without a usable key are dropped.
#[must_use]
pub fn dedupe_by_identity(rows: Vec<Record>) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::with_capacity(rows.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for mut row in rows {
        let Some(key) = row.key().map(str::to_string) else {
            continue;
        };
        match index.get(&key) {
            Some(&at) => {
                let newer = match (out[at].captured(), row.captured()) {
                    (Some(kept), Some(candidate)) => candidate > kept,
                    _ => false,
                };
                if newer {
                    row.name = Some(key);
                    out[at] = row;
                }
            }
            None => {
                row.name = Some(key.clone());
                index.insert(key, out.len());
                out.push(row);
            }
        }
    }

    out
}
