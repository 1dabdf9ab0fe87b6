//! Static player reference table: id -> name, team, position.
//!
//! Built once per run from the season-wide metadata and read-only afterwards.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::{
    cli::types::{PlayerId, Position},
    error::{CodeKind, FplError, Result},
    fpl::types::{Bootstrap, Element, ElementType, Team},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReference {
    pub id: PlayerId,
    pub full_name: String,
    pub team_name: String,
    pub position: Position,
    /// Season-wide price in tenths of a million, when published.
    pub now_cost: Option<f64>,
}

/// A `{code, display_name}` entry from one of the bootstrap code tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: u32,
    pub display_name: String,
}

impl CodeEntry {
    pub fn new(code: u32, display_name: impl Into<String>) -> Self {
        Self {
            code,
            display_name: display_name.into(),
        }
    }
}

impl From<&Team> for CodeEntry {
    fn from(team: &Team) -> Self {
        Self::new(team.id, team.name.clone())
    }
}

impl From<&ElementType> for CodeEntry {
    fn from(element_type: &ElementType) -> Self {
        Self::new(element_type.id, element_type.singular_name_short.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTable {
    players: BTreeMap<PlayerId, PlayerReference>,
}

impl ReferenceTable {
    pub fn get(&self, id: PlayerId) -> Option<&PlayerReference> {
        self.players.get(&id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerReference> {
        self.players.values()
    }

    /// Returns the previous entry for the same id, if any.
    pub fn insert(&mut self, player: PlayerReference) -> Option<PlayerReference> {
        self.players.insert(player.id, player)
    }
}

impl FromIterator<PlayerReference> for ReferenceTable {
    fn from_iter<I: IntoIterator<Item = PlayerReference>>(iter: I) -> Self {
        let mut table = Self::default();
        for player in iter {
            table.insert(player);
        }
        table
    }
}

/// Build the reference table, resolving team and position codes.
///
/// A player whose team or position code is missing from the code tables is
/// an error; dropping them would silently corrupt every downstream join.
pub fn build_reference(
    players: &[Element],
    team_codes: &[CodeEntry],
    position_codes: &[CodeEntry],
) -> Result<ReferenceTable> {
    let teams = index_codes(team_codes);
    let positions = index_codes(position_codes);

    let mut table = ReferenceTable::default();
    for player in players {
        let team_name = teams.get(&player.team).ok_or(FplError::UnknownCode {
            player_id: player.id.as_u32(),
            kind: CodeKind::Team,
            code: player.team,
        })?;

        let position = positions
            .get(&player.element_type)
            .and_then(|name| name.parse::<Position>().ok())
            .ok_or(FplError::UnknownCode {
                player_id: player.id.as_u32(),
                kind: CodeKind::Position,
                code: player.element_type,
            })?;

        let reference = PlayerReference {
            id: player.id,
            full_name: full_name(&player.first_name, &player.second_name),
            team_name: (*team_name).to_string(),
            position,
            now_cost: player.now_cost,
        };

        if let Some(previous) = table.insert(reference) {
            warn!(player_id = %previous.id, "duplicate player id in season metadata; keeping the later entry");
        }
    }

    Ok(table)
}

/// Convenience wrapper over the bootstrap document.
pub fn build_reference_from_bootstrap(bootstrap: &Bootstrap) -> Result<ReferenceTable> {
    let team_codes: Vec<CodeEntry> = bootstrap.teams.iter().map(CodeEntry::from).collect();
    let position_codes: Vec<CodeEntry> = bootstrap
        .element_types
        .iter()
        .map(CodeEntry::from)
        .collect();
    build_reference(&bootstrap.elements, &team_codes, &position_codes)
}

fn full_name(first: &str, second: &str) -> String {
    [first.trim(), second.trim()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

fn index_codes(codes: &[CodeEntry]) -> HashMap<u32, &str> {
    codes
        .iter()
        .map(|entry| (entry.code, entry.display_name.as_str()))
        .collect()
}
