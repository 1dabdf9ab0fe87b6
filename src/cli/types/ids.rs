//! ID types for FPL players.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe wrapper for FPL player (element) IDs.
///
/// # Examples
///
/// ```rust
/// use fpl_gameweek::PlayerId;
///
/// let player_id = PlayerId::new(328);
/// assert_eq!(player_id.as_u32(), 328);
/// assert_eq!(player_id.to_string(), "328");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
