//! Gameweek materialization: join, derive, drop, cast, order, publish.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::{
    cli::types::{GameweekNumber, SeasonLabel},
    config::{ColumnSpec, ColumnType, PipelineConfig},
    error::{FplError, Result},
    fpl::stats::IN_DREAMTEAM,
    fpl::StatField,
    pipeline::{
        metrics::{derive, round2},
        normalize::GameweekPlayerRecord,
        reference::ReferenceTable,
    },
    storage::{ArtifactStore, WriteOutcome},
};


/// Raw prices are published in tenths of a million.
pub const COST_DIVISOR: f64 = 10.0;

/// One typed value in an output row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Cast a pre-output value to the configured column type.
    ///
    /// Floats are rounded to two decimals here, so every published float
    /// goes through exactly one rounding step.
    pub fn cast(self, column_type: ColumnType) -> std::result::Result<Cell, String> {
        match (column_type, self) {
            (ColumnType::Int64, Cell::Null) => Err("null value in an integer column".to_string()),
            (ColumnType::Int64, Cell::Int(i)) => Ok(Cell::Int(i)),
            (ColumnType::Int64, Cell::Float(f)) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    Ok(Cell::Int(f as i64))
                } else {
                    Err(format!("{} is not a whole number", f))
                }
            }
            (ColumnType::Int64, Cell::Text(s)) => s
                .trim()
                .parse::<i64>()
                .map(Cell::Int)
                .map_err(|_| format!("`{}` is not an integer", s)),
            (ColumnType::Int64, Cell::Bool(_)) => {
                Err("boolean value in an integer column".to_string())
            }

            (ColumnType::NullableInt64, Cell::Null) => Ok(Cell::Null),
            (ColumnType::NullableInt64, other) => other.cast(ColumnType::Int64),

            (ColumnType::Float64, Cell::Null) => Ok(Cell::Null),
            (ColumnType::Float64, Cell::Int(i)) => Ok(Cell::Float(i as f64)),
            (ColumnType::Float64, Cell::Float(f)) if f.is_finite() => Ok(Cell::Float(publishable(f))),
            (ColumnType::Float64, Cell::Float(f)) => Err(format!("{} is not a finite number", f)),
            (ColumnType::Float64, Cell::Text(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| Cell::Float(publishable(f)))
                .ok_or_else(|| format!("`{}` is not a number", s)),
            (ColumnType::Float64, Cell::Bool(_)) => {
                Err("boolean value in a float column".to_string())
            }

            (ColumnType::String, Cell::Null) => Ok(Cell::Null),
            (ColumnType::String, Cell::Text(s)) => Ok(Cell::Text(s)),
            (ColumnType::String, other) => Ok(Cell::Text(other.to_string())),

            (ColumnType::Bool, Cell::Null) => Ok(Cell::Null),
            (ColumnType::Bool, Cell::Bool(b)) => Ok(Cell::Bool(b)),
            (ColumnType::Bool, Cell::Int(0)) => Ok(Cell::Bool(false)),
            (ColumnType::Bool, Cell::Int(1)) => Ok(Cell::Bool(true)),
            (ColumnType::Bool, other) => Err(format!("`{}` is not a boolean", other)),
        }
    }
}

/// CSV text for a cell. Null renders as an empty field.
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(i) => write!(f, "{}", i),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

fn publishable(value: f64) -> f64 {
    let rounded = round2(value);
    // No "-0" in output.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// The typed, ordered record set for one gameweek.
#[derive(Debug, Clone, PartialEq)]
pub struct GameweekTable {
    pub gameweek: GameweekNumber,
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<Cell>>,
}

impl GameweekTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Header plus one line per row. Identical tables give identical bytes.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.into_inner().map_err(|e| FplError::Io(e.into_error()))
    }
}

/// Join reconciled records with the reference table, derive metrics, drop
/// the configured raw fields, cast and order the output columns.
///
/// Records for players missing from the reference table are dropped with a
/// warning. Any cast failure fails the whole gameweek.
pub fn build_table(
    gameweek: GameweekNumber,
    records: &[GameweekPlayerRecord],
    reference: &ReferenceTable,
    config: &PipelineConfig,
) -> Result<GameweekTable> {
    let mut rows = Vec::with_capacity(records.len());

    for record in records {
        let Some(player) = reference.get(record.player_id) else {
            warn!(
                gameweek = gameweek.as_u8(),
                player_id = record.player_id.as_u32(),
                "no reference entry for player; dropping record"
            );
            continue;
        };

        let goal_value = config.goal_value(player.position)?;
        let cost = record
            .stats
            .get(StatField::NowCost)
            .or(player.now_cost)
            .map(|raw| raw / COST_DIVISOR);
        let metrics = derive(record, goal_value, cost);

        let mut values: HashMap<&str, Cell> = HashMap::new();
        for (field, value) in record.stats.iter() {
            values.insert(field.as_str(), Cell::Float(value));
        }
        if let Some(flag) = record.stats.in_dreamteam() {
            values.insert(IN_DREAMTEAM, Cell::Bool(flag));
        }
        values.insert("now_cost", cost.map_or(Cell::Null, Cell::Float));
        for (name, value) in metrics.columns() {
            values.insert(name, value.map_or(Cell::Null, Cell::Float));
        }
        values.insert("id", Cell::Int(i64::from(record.player_id.as_u32())));
        values.insert("gameweek", Cell::Int(i64::from(gameweek.as_u8())));
        values.insert("full_name", Cell::Text(player.full_name.clone()));
        values.insert("team_name", Cell::Text(player.team_name.clone()));
        values.insert("position", Cell::Text(player.position.to_string()));

        for dropped in &config.columns_to_drop {
            values.remove(dropped.as_str());
        }

        let row = config
            .columns
            .iter()
            .map(|spec| {
                values
                    .remove(spec.name.as_str())
                    .unwrap_or(Cell::Null)
                    .cast(spec.column_type)
                    .map_err(|message| FplError::TypeCoercion {
                        gameweek: gameweek.as_u8(),
                        player_id: Some(record.player_id.as_u32()),
                        column: spec.name.clone(),
                        message,
                    })
            })
            .collect::<Result<Vec<Cell>>>()?;

        if !values.is_empty() {
            debug!(
                gameweek = gameweek.as_u8(),
                player_id = record.player_id.as_u32(),
                unlisted = values.len(),
                "fields not in the output column list were left out"
            );
        }

        rows.push(row);
    }

    Ok(GameweekTable {
        gameweek,
        columns: config.columns.clone(),
        rows,
    })
}

/// Build the gameweek's table and publish it through `store`.
///
/// An artifact that appeared since the caller's existence check is left
/// untouched and reported as [`WriteOutcome::AlreadyPresent`].
pub fn materialize<S: ArtifactStore + ?Sized>(
    store: &mut S,
    season: &SeasonLabel,
    gameweek: GameweekNumber,
    records: &[GameweekPlayerRecord],
    reference: &ReferenceTable,
    config: &PipelineConfig,
) -> Result<WriteOutcome> {
    let table = build_table(gameweek, records, reference, config)?;
    store.write(season, &table)
}
