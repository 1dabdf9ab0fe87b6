//! Fixed schema for a per-fixture stat object from the live endpoint.
//!
//! The live endpoint sends stats as a flat JSON object. Rather than carry that
//! object around as free-form keys, each stat name is a [`StatField`] and a
//! [`StatLine`] only holds known fields. Unknown keys and missing required
//! keys are rejected when the line is built.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FplError;

/// Every numeric stat the live endpoint publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Minutes,
    GoalsScored,
    Assists,
    CleanSheets,
    GoalsConceded,
    OwnGoals,
    PenaltiesSaved,
    PenaltiesMissed,
    YellowCards,
    RedCards,
    Saves,
    Bonus,
    Bps,
    Influence,
    Creativity,
    Threat,
    IctIndex,
    ClearancesBlocksInterceptions,
    Recoveries,
    Tackles,
    DefensiveContribution,
    Starts,
    ExpectedGoals,
    ExpectedAssists,
    ExpectedGoalInvolvements,
    ExpectedGoalsConceded,
    MngWin,
    MngDraw,
    MngLoss,
    MngUnderdogWin,
    MngUnderdogDraw,
    MngCleanSheets,
    MngGoalsScored,
    TotalPoints,
    NowCost,
}

impl StatField {
    pub const ALL: [StatField; 35] = [
        StatField::Minutes,
        StatField::GoalsScored,
        StatField::Assists,
        StatField::CleanSheets,
        StatField::GoalsConceded,
        StatField::OwnGoals,
        StatField::PenaltiesSaved,
        StatField::PenaltiesMissed,
        StatField::YellowCards,
        StatField::RedCards,
        StatField::Saves,
        StatField::Bonus,
        StatField::Bps,
        StatField::Influence,
        StatField::Creativity,
        StatField::Threat,
        StatField::IctIndex,
        StatField::ClearancesBlocksInterceptions,
        StatField::Recoveries,
        StatField::Tackles,
        StatField::DefensiveContribution,
        StatField::Starts,
        StatField::ExpectedGoals,
        StatField::ExpectedAssists,
        StatField::ExpectedGoalInvolvements,
        StatField::ExpectedGoalsConceded,
        StatField::MngWin,
        StatField::MngDraw,
        StatField::MngLoss,
        StatField::MngUnderdogWin,
        StatField::MngUnderdogDraw,
        StatField::MngCleanSheets,
        StatField::MngGoalsScored,
        StatField::TotalPoints,
        StatField::NowCost,
    ];

    /// Stats every fixture record must carry.
    pub const REQUIRED: [StatField; 5] = [
        StatField::Minutes,
        StatField::GoalsScored,
        StatField::Assists,
        StatField::ExpectedGoals,
        StatField::ExpectedAssists,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatField::Minutes => "minutes",
            StatField::GoalsScored => "goals_scored",
            StatField::Assists => "assists",
            StatField::CleanSheets => "clean_sheets",
            StatField::GoalsConceded => "goals_conceded",
            StatField::OwnGoals => "own_goals",
            StatField::PenaltiesSaved => "penalties_saved",
            StatField::PenaltiesMissed => "penalties_missed",
            StatField::YellowCards => "yellow_cards",
            StatField::RedCards => "red_cards",
            StatField::Saves => "saves",
            StatField::Bonus => "bonus",
            StatField::Bps => "bps",
            StatField::Influence => "influence",
            StatField::Creativity => "creativity",
            StatField::Threat => "threat",
            StatField::IctIndex => "ict_index",
            StatField::ClearancesBlocksInterceptions => "clearances_blocks_interceptions",
            StatField::Recoveries => "recoveries",
            StatField::Tackles => "tackles",
            StatField::DefensiveContribution => "defensive_contribution",
            StatField::Starts => "starts",
            StatField::ExpectedGoals => "expected_goals",
            StatField::ExpectedAssists => "expected_assists",
            StatField::ExpectedGoalInvolvements => "expected_goal_involvements",
            StatField::ExpectedGoalsConceded => "expected_goals_conceded",
            StatField::MngWin => "mng_win",
            StatField::MngDraw => "mng_draw",
            StatField::MngLoss => "mng_loss",
            StatField::MngUnderdogWin => "mng_underdog_win",
            StatField::MngUnderdogDraw => "mng_underdog_draw",
            StatField::MngCleanSheets => "mng_clean_sheets",
            StatField::MngGoalsScored => "mng_goals_scored",
            StatField::TotalPoints => "total_points",
            StatField::NowCost => "now_cost",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatField {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FplError::InvalidConfig {
                message: format!("unknown stat field `{}`", s),
            })
    }
}

/// Name of the one non-numeric stat on the live endpoint.
pub const IN_DREAMTEAM: &str = "in_dreamteam";

/// One fixture's worth of stats for one player.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatLine {
    values: BTreeMap<StatField, f64>,
    in_dreamteam: Option<bool>,
}

impl StatLine {
    /// A line with only the required stats set.
    pub fn new(
        minutes: f64,
        goals_scored: f64,
        assists: f64,
        expected_goals: f64,
        expected_assists: f64,
    ) -> Self {
        let mut line = Self::default();
        line.values.insert(StatField::Minutes, minutes);
        line.values.insert(StatField::GoalsScored, goals_scored);
        line.values.insert(StatField::Assists, assists);
        line.values.insert(StatField::ExpectedGoals, expected_goals);
        line.values.insert(StatField::ExpectedAssists, expected_assists);
        line
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, field: StatField, value: f64) -> Self {
        self.values.insert(field, value);
        self
    }

    /// Validate a raw stats object against the schema.
    ///
    /// Returns a human-readable message on failure; callers attach the
    /// gameweek/player context.
    pub fn from_json(raw: &Value) -> Result<Self, String> {
        let object = raw
            .as_object()
            .ok_or_else(|| format!("stats must be an object, got {}", json_kind(raw)))?;
        Self::from_map(object)
    }

    fn from_map(object: &Map<String, Value>) -> Result<Self, String> {
        let mut line = Self::default();

        for (key, value) in object {
            if key == IN_DREAMTEAM {
                line.in_dreamteam = match value {
                    Value::Null => None,
                    Value::Bool(b) => Some(*b),
                    other => {
                        return Err(format!(
                            "field `{}`: expected a boolean, got {}",
                            key,
                            json_kind(other)
                        ))
                    }
                };
                continue;
            }

            let field: StatField = key
                .parse()
                .map_err(|_| format!("unknown stat field `{}`", key))?;

            if let Some(number) = number_from_json(value)
                .map_err(|kind| format!("field `{}`: expected a number, got {}", key, kind))?
            {
                line.values.insert(field, number);
            }
        }

        let missing: Vec<&str> = StatField::REQUIRED
            .iter()
            .filter(|field| !line.values.contains_key(field))
            .map(|field| field.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(format!("missing required stat(s): {}", missing.join(", ")));
        }

        Ok(line)
    }

    pub fn get(&self, field: StatField) -> Option<f64> {
        self.values.get(&field).copied()
    }

    pub fn set(&mut self, field: StatField, value: Option<f64>) {
        match value {
            Some(v) => {
                self.values.insert(field, v);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    pub fn in_dreamteam(&self) -> Option<bool> {
        self.in_dreamteam
    }

    pub fn set_in_dreamteam(&mut self, value: Option<bool>) {
        self.in_dreamteam = value;
    }

    /// Required stats are guaranteed present once a line is built.
    pub fn minutes(&self) -> f64 {
        self.get(StatField::Minutes).unwrap_or(0.0)
    }

    pub fn goals_scored(&self) -> f64 {
        self.get(StatField::GoalsScored).unwrap_or(0.0)
    }

    pub fn assists(&self) -> f64 {
        self.get(StatField::Assists).unwrap_or(0.0)
    }

    pub fn expected_goals(&self) -> f64 {
        self.get(StatField::ExpectedGoals).unwrap_or(0.0)
    }

    pub fn expected_assists(&self) -> f64 {
        self.get(StatField::ExpectedAssists).unwrap_or(0.0)
    }

    /// Present stats in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (StatField, f64)> + '_ {
        self.values.iter().map(|(field, value)| (*field, *value))
    }
}

/// Numbers arrive either as JSON numbers or as numeric strings ("0.60").
fn number_from_json(value: &Value) -> Result<Option<f64>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or("a non-finite number"),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or("a non-numeric string"),
        other => Err(json_kind(other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stat_field_names_match_serde() {
        for field in StatField::ALL {
            let via_serde = serde_json::to_value(field).unwrap();
            assert_eq!(via_serde, json!(field.as_str()));
            assert_eq!(field.as_str().parse::<StatField>().unwrap(), field);
        }
    }

    #[test]
    fn test_from_json_accepts_numbers_and_numeric_strings() {
        let line = StatLine::from_json(&json!({
            "minutes": 90,
            "goals_scored": 1,
            "assists": 0,
            "expected_goals": "0.60",
            "expected_assists": "0.10",
            "influence": "43.2",
            "in_dreamteam": true
        }))
        .unwrap();

        assert_eq!(line.minutes(), 90.0);
        assert_eq!(line.expected_goals(), 0.6);
        assert_eq!(line.get(StatField::Influence), Some(43.2));
        assert_eq!(line.get(StatField::Saves), None);
        assert_eq!(line.in_dreamteam(), Some(true));
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        let err = StatLine::from_json(&json!({
            "minutes": 90,
            "goals_scored": 0,
            "assists": 0,
            "expected_goals": 0.1,
            "expected_assists": 0.0,
            "hat_tricks": 1
        }))
        .unwrap_err();
        assert!(err.contains("unknown stat field `hat_tricks`"));
    }

    #[test]
    fn test_from_json_rejects_missing_required() {
        let err = StatLine::from_json(&json!({
            "minutes": 90,
            "goals_scored": 0
        }))
        .unwrap_err();
        assert!(err.contains("assists"));
        assert!(err.contains("expected_goals"));
        assert!(err.contains("expected_assists"));
    }

    #[test]
    fn test_from_json_rejects_bad_types() {
        let err = StatLine::from_json(&json!({
            "minutes": "ninety",
            "goals_scored": 0,
            "assists": 0,
            "expected_goals": 0.1,
            "expected_assists": 0.0
        }))
        .unwrap_err();
        assert!(err.contains("field `minutes`"));

        let err = StatLine::from_json(&json!([1, 2])).unwrap_err();
        assert!(err.contains("stats must be an object"));
    }

    #[test]
    fn test_null_optional_is_absent() {
        let line = StatLine::from_json(&json!({
            "minutes": 0,
            "goals_scored": 0,
            "assists": 0,
            "expected_goals": 0,
            "expected_assists": 0,
            "saves": null
        }))
        .unwrap();
        assert_eq!(line.get(StatField::Saves), None);
    }

    #[test]
    fn test_set_and_clear() {
        let mut line = StatLine::new(90.0, 0.0, 0.0, 0.0, 0.0);
        line.set(StatField::Saves, Some(3.0));
        assert_eq!(line.get(StatField::Saves), Some(3.0));
        line.set(StatField::Saves, None);
        assert_eq!(line.get(StatField::Saves), None);
    }
}
