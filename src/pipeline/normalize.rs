//! Flatten one gameweek's live payload into per-fixture records.

use crate::{
    cli::types::{GameweekNumber, PlayerId},
    error::{FplError, Result},
    fpl::{types::LivePayload, StatLine},
};

/// One player's stats for one fixture in a gameweek.
///
/// A player with two fixtures appears twice until reconciled.
#[derive(Debug, Clone, PartialEq)]
pub struct GameweekPlayerRecord {
    pub player_id: PlayerId,
    pub gameweek: GameweekNumber,
    pub stats: StatLine,
}

impl GameweekPlayerRecord {
    pub fn new(player_id: PlayerId, gameweek: GameweekNumber, stats: StatLine) -> Self {
        Self {
            player_id,
            gameweek,
            stats,
        }
    }
}

/// One record per payload entry, in payload order. Duplicates are kept.
///
/// Each entry's stats are validated against the fixed schema; the first
/// invalid entry fails the gameweek with its player id attached.
pub fn normalize(gameweek: GameweekNumber, payload: &LivePayload) -> Result<Vec<GameweekPlayerRecord>> {
    payload
        .elements
        .iter()
        .map(|element| {
            let stats =
                StatLine::from_json(&element.stats).map_err(|message| FplError::InvalidPayload {
                    gameweek: gameweek.as_u8(),
                    player_id: Some(element.id.as_u32()),
                    message,
                })?;
            Ok(GameweekPlayerRecord::new(element.id, gameweek, stats))
        })
        .collect()
}
