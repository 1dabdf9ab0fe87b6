//! Wire types for the public FPL endpoints.
//!
//! Only the fields the pipeline reads are modelled; serde ignores the rest.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::types::PlayerId;

/// `bootstrap-static/`: season calendar, players, teams and positions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Bootstrap {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub element_types: Vec<ElementType>,
}

/// One gameweek in the season calendar.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    pub id: u8,
    #[serde(default)]
    pub name: String,
    /// e.g. `2024-08-16T17:30:00Z`
    #[serde(default)]
    pub deadline_time: Option<String>,
    #[serde(default)]
    pub finished: bool,
}

/// Season-wide player metadata.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Element {
    pub id: PlayerId,
    pub first_name: String,
    pub second_name: String,
    /// Team code, resolved through [`Bootstrap::teams`].
    pub team: u32,
    /// Position code, resolved through [`Bootstrap::element_types`].
    pub element_type: u32,
    /// Price in tenths of a million.
    #[serde(default)]
    pub now_cost: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElementType {
    pub id: u32,
    pub singular_name_short: String,
}

/// `event/{gw}/live/`: per-player performance for one gameweek.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LivePayload {
    #[serde(default)]
    pub elements: Vec<LiveElement>,
}

/// One player entry in the live payload. `stats` stays raw JSON until the
/// normalizer validates it, so a bad entry can be reported with its player id.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiveElement {
    pub id: PlayerId,
    pub stats: Value,
}
