//! Double-fixture reconciliation.
//!
//! Collapses the per-fixture records of one gameweek into exactly one record
//! per player. Only the configured stats are summed; anything else keeps the
//! first fixture's value so prices and flags are never double-counted.

use std::collections::HashMap;

use crate::{
    cli::types::{GameweekNumber, PlayerId},
    error::{FplError, Result},
    fpl::StatField,
    pipeline::normalize::GameweekPlayerRecord,
};


/// Most fixtures a player can have in one gameweek that we know how to merge.
pub const MAX_FIXTURES_PER_GAMEWEEK: usize = 2;

/// Reconcile normalized records into at most one record per
/// (player, gameweek), preserving first-appearance order.
///
/// Records are never merged across gameweeks.
pub fn reconcile(
    records: Vec<GameweekPlayerRecord>,
    summed_fields: &[StatField],
) -> Result<Vec<GameweekPlayerRecord>> {
    let mut groups: Vec<Vec<GameweekPlayerRecord>> = Vec::new();
    let mut index: HashMap<(PlayerId, GameweekNumber), usize> = HashMap::new();

    for record in records {
        let key = (record.player_id, record.gameweek);
        match index.get(&key) {
            Some(&slot) => groups[slot].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    groups
        .into_iter()
        .map(|group| reconcile_group(group, summed_fields))
        .collect()
}

fn reconcile_group(
    mut group: Vec<GameweekPlayerRecord>,
    summed_fields: &[StatField],
) -> Result<GameweekPlayerRecord> {
    match group.len() {
        1 => Ok(group.remove(0)),
        2 => {
            let second = group.remove(1);
            let first = group.remove(0);
            Ok(merge_fixtures(first, &second, summed_fields))
        }
        count => {
            let first = &group[0];
            Err(FplError::UnexpectedFixtureCount {
                gameweek: first.gameweek.as_u8(),
                player_id: first.player_id.as_u32(),
                count,
            })
        }
    }
}

/// Sum the configured stats of two fixture records for the same player.
pub fn merge_fixtures(
    mut first: GameweekPlayerRecord,
    second: &GameweekPlayerRecord,
    summed_fields: &[StatField],
) -> GameweekPlayerRecord {
    for &field in summed_fields {
        let merged = match (first.stats.get(field), second.stats.get(field)) {
            (None, None) => None,
            (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
        };
        first.stats.set(field, merged);
    }
    first
}
