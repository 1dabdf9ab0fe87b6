//! Per-player derived metrics.
//!
//! Everything here is a pure function of one reconciled record plus the
//! position's goal value and the player's price. No cross-record state.

use serde::Serialize;

use crate::{fpl::StatField, pipeline::normalize::GameweekPlayerRecord};

pub const MINUTES_PER_NINETY: f64 = 90.0;
/// Expected points awarded per ninety minutes played.
pub const POINTS_PER_NINETY: f64 = 2.0;
/// Expected points per expected assist, for every position.
pub const POINTS_PER_ASSIST: f64 = 3.0;

/// The three components of expected points and their sum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedPoints {
    pub minutes_component: f64,
    pub goal_component: f64,
    pub assist_component: f64,
    pub total: f64,
}

impl ExpectedPoints {
    pub fn compute(minutes: f64, expected_goals: f64, expected_assists: f64, goal_value: f64) -> Self {
        let minutes_component = minutes / MINUTES_PER_NINETY * POINTS_PER_NINETY;
        let goal_component = expected_goals * goal_value;
        let assist_component = expected_assists * POINTS_PER_ASSIST;
        Self {
            minutes_component,
            goal_component,
            assist_component,
            total: minutes_component + goal_component + assist_component,
        }
    }
}

/// Computed fields attached to one reconciled record.
///
/// `None` means undefined: per-90 rates when no minutes were played, cost
/// ratios when the price is zero or unknown, and anything built on an
/// optional stat the record does not carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub nineties: f64,
    pub goal_involvements: f64,
    pub expected_goal_involvements: f64,
    pub expected_goals_per_90: Option<f64>,
    pub expected_assists_per_90: Option<f64>,
    pub expected_goal_involvements_per_90: Option<f64>,
    pub clean_sheets_per_90: Option<f64>,
    pub goals_conceded_per_90: Option<f64>,
    pub expected_goals_conceded_per_90: Option<f64>,
    pub saves_per_90: Option<f64>,
    pub expected_points: ExpectedPoints,
    pub xgi_to_cost_ratio: Option<f64>,
    pub expected_points_to_cost_ratio: Option<f64>,
    pub performance_vs_xg: f64,
    pub performance_vs_xa: f64,
    /// Positive when fewer goals were conceded than expected.
    pub performance_vs_xgc: Option<f64>,
}

impl DerivedMetrics {
    /// Output column name and value for every derived field.
    ///
    /// `expected_goal_involvements` is included and takes precedence over the
    /// raw stat of the same name.
    pub fn columns(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("nineties", Some(self.nineties)),
            ("goal_involvements", Some(self.goal_involvements)),
            ("expected_goal_involvements", Some(self.expected_goal_involvements)),
            ("expected_goals_per_90", self.expected_goals_per_90),
            ("expected_assists_per_90", self.expected_assists_per_90),
            ("expected_goal_involvements_per_90", self.expected_goal_involvements_per_90),
            ("clean_sheets_per_90", self.clean_sheets_per_90),
            ("goals_conceded_per_90", self.goals_conceded_per_90),
            ("expected_goals_conceded_per_90", self.expected_goals_conceded_per_90),
            ("saves_per_90", self.saves_per_90),
            ("minutes_expected_points", Some(self.expected_points.minutes_component)),
            ("goal_expected_points", Some(self.expected_points.goal_component)),
            ("assist_expected_points", Some(self.expected_points.assist_component)),
            ("expected_points", Some(self.expected_points.total)),
            ("xgi_to_cost_ratio", self.xgi_to_cost_ratio),
            ("expected_points_to_cost_ratio", self.expected_points_to_cost_ratio),
            ("performance_vs_xg", Some(self.performance_vs_xg)),
            ("performance_vs_xa", Some(self.performance_vs_xa)),
            ("performance_vs_xgc", self.performance_vs_xgc),
        ]
    }
}

/// Derive metrics for one reconciled record.
///
/// `goal_value` is the points-per-goal for the player's position and
/// `cost` the price in millions.
pub fn derive(record: &GameweekPlayerRecord, goal_value: f64, cost: Option<f64>) -> DerivedMetrics {
    let stats = &record.stats;
    let minutes = stats.minutes();
    let nineties = minutes / MINUTES_PER_NINETY;

    let per_90 = |value: Option<f64>| value.and_then(|v| per_ninety(v, nineties));

    let expected_goals = stats.expected_goals();
    let expected_assists = stats.expected_assists();
    let expected_goal_involvements = expected_goals + expected_assists;
    let expected_points = ExpectedPoints::compute(minutes, expected_goals, expected_assists, goal_value);

    let goals_conceded = stats.get(StatField::GoalsConceded);
    let expected_goals_conceded = stats.get(StatField::ExpectedGoalsConceded);

    DerivedMetrics {
        nineties,
        goal_involvements: stats.goals_scored() + stats.assists(),
        expected_goal_involvements,
        expected_goals_per_90: per_90(Some(expected_goals)),
        expected_assists_per_90: per_90(Some(expected_assists)),
        expected_goal_involvements_per_90: per_90(Some(expected_goal_involvements)),
        clean_sheets_per_90: per_90(stats.get(StatField::CleanSheets)),
        goals_conceded_per_90: per_90(goals_conceded),
        expected_goals_conceded_per_90: per_90(expected_goals_conceded),
        saves_per_90: per_90(stats.get(StatField::Saves)),
        expected_points,
        xgi_to_cost_ratio: per_cost(expected_goal_involvements * 100.0, cost),
        expected_points_to_cost_ratio: per_cost(expected_points.total, cost),
        performance_vs_xg: stats.goals_scored() - expected_goals,
        performance_vs_xa: stats.assists() - expected_assists,
        performance_vs_xgc: match (expected_goals_conceded, goals_conceded) {
            (Some(xgc), Some(gc)) => Some(xgc - gc),
            _ => None,
        },
    }
}

fn per_ninety(value: f64, nineties: f64) -> Option<f64> {
    (nineties > 0.0).then(|| value / nineties)
}

fn per_cost(value: f64, cost: Option<f64>) -> Option<f64> {
    cost.filter(|c| *c != 0.0).map(|c| value / c)
}

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
