//! Values exchanged with the artifact stores

use serde::{Deserialize, Serialize};

use crate::cli::types::PlayerId;

/// Result of publishing one gameweek artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    /// Another writer published the gameweek first; nothing was changed.
    AlreadyPresent,
}

/// One line of the current-cost snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCost {
    pub id: PlayerId,
    /// Price in millions.
    pub now_cost: f64,
}
