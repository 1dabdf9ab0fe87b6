//! Season and gameweek resolution from the season calendar.

use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeSet;

use crate::{
    cli::types::{GameweekNumber, SeasonLabel},
    error::{FplError, Result},
    fpl::types::Event,
};

/// Derive the season label from the first scheduled gameweek's deadline.
pub fn resolve_season(events: &[Event]) -> Result<SeasonLabel> {
    let first = events.first().ok_or_else(|| FplError::MissingSchedule {
        reason: "season metadata contains no gameweeks".to_string(),
    })?;

    let deadline = first
        .deadline_time
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| FplError::MissingSchedule {
            reason: format!("gameweek {} has no deadline timestamp", first.id),
        })?;

    let parsed = DateTime::parse_from_rfc3339(deadline).map_err(|e| FplError::MissingSchedule {
        reason: format!(
            "gameweek {} deadline `{}` is not a valid timestamp: {}",
            first.id, deadline, e
        ),
    })?;

    Ok(SeasonLabel::starting(parsed.with_timezone(&Utc).year()))
}

/// The highest gameweek N such that gameweeks 1..=N are finished.
///
/// `None` means the season has not started. Completion is assumed to be
/// monotonic; a feed with a finished gameweek after an unfinished one is
/// resolved at the first unfinished gameweek.
pub fn last_completed_gameweek(events: &[Event]) -> Option<GameweekNumber> {
    let mut ordered: Vec<&Event> = events.iter().collect();
    ordered.sort_by_key(|event| event.id);

    let mut last_finished = None;
    for event in ordered {
        if !event.finished {
            return event
                .id
                .checked_sub(1)
                .and_then(|n| GameweekNumber::new(n).ok());
        }
        if event.id == GameweekNumber::LAST.as_u8() {
            return Some(GameweekNumber::LAST);
        }
        last_finished = GameweekNumber::new(event.id).ok();
    }
    last_finished
}

/// Gameweeks in `1..=last_completed` with no artifact yet, ascending.
pub fn missing_gameweeks(
    last_completed: GameweekNumber,
    existing: &BTreeSet<GameweekNumber>,
) -> Vec<GameweekNumber> {
    last_completed
        .up_to()
        .filter(|gw| !existing.contains(gw))
        .collect()
}
