//! `ArtifactStore` operations for the SQLite backend

use chrono::Utc;
use rusqlite::{params, params_from_iter, types::Value};
use std::collections::BTreeSet;
use tracing::debug;

use super::{
    schema::{check_rows_layout, quote_ident, rows_table_sql, SqliteStore, ROW_KEY_COLUMNS},
    ArtifactStore, PlayerCost, WriteOutcome,
};
use crate::{
    cli::types::{GameweekNumber, SeasonLabel},
    config::ColumnSpec,
    error::Result,
    pipeline::materialize::{Cell, GameweekTable},
};

impl ArtifactStore for SqliteStore {
    fn existing(&self, season: &SeasonLabel) -> Result<BTreeSet<GameweekNumber>> {
        let mut stmt = self
            .conn
            .prepare("SELECT gameweek FROM gameweek_artifacts WHERE season = ? ORDER BY gameweek")?;
        let numbers = stmt
            .query_map(params![season.to_string()], |row| row.get::<_, u8>(0))?
            .collect::<rusqlite::Result<Vec<u8>>>()?;

        Ok(numbers
            .into_iter()
            .filter_map(|n| GameweekNumber::new(n).ok())
            .collect())
    }

    fn exists(&self, season: &SeasonLabel, gameweek: GameweekNumber) -> Result<bool> {
        let present = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM gameweek_artifacts WHERE season = ? AND gameweek = ?)",
            params![season.to_string(), gameweek.as_u8()],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(present)
    }

    /// Marker and rows go in one transaction; a failure leaves neither.
    fn write(&mut self, season: &SeasonLabel, table: &GameweekTable) -> Result<WriteOutcome> {
        let season_key = season.to_string();
        let gameweek = table.gameweek.as_u8();

        let tx = self.conn.transaction()?;

        let present = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM gameweek_artifacts WHERE season = ? AND gameweek = ?)",
            params![season_key, gameweek],
            |row| row.get::<_, bool>(0),
        )?;
        if present {
            return Ok(WriteOutcome::AlreadyPresent);
        }

        tx.execute(&rows_table_sql(&table.columns), [])?;
        check_rows_layout(&tx, &table.columns)?;

        {
            let mut stmt = tx.prepare(&insert_row_sql(&table.columns))?;
            for (index, row) in table.rows.iter().enumerate() {
                let mut values = Vec::with_capacity(row.len() + 3);
                values.push(Value::Text(season_key.clone()));
                values.push(Value::Integer(i64::from(gameweek)));
                values.push(Value::Integer(index as i64));
                values.extend(row.iter().map(cell_to_sql));
                stmt.execute(params_from_iter(values))?;
            }
        }

        tx.execute(
            "INSERT INTO gameweek_artifacts (season, gameweek, row_count, created_at)
             VALUES (?, ?, ?, ?)",
            params![season_key, gameweek, table.len() as i64, Utc::now().timestamp()],
        )?;
        tx.commit()?;

        debug!(season = %season_key, gameweek, rows = table.len(), "published gameweek rows");
        Ok(WriteOutcome::Written)
    }

    fn write_player_costs(&mut self, season: &SeasonLabel, costs: &[PlayerCost]) -> Result<()> {
        let season_key = season.to_string();
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM player_costs WHERE season = ?", params![season_key])?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO player_costs (season, player_id, now_cost) VALUES (?, ?, ?)",
            )?;
            for cost in costs {
                stmt.execute(params![season_key, cost.id.as_u32(), cost.now_cost])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.label.clone()
    }
}

fn insert_row_sql(columns: &[ColumnSpec]) -> String {
    let names: Vec<String> = ROW_KEY_COLUMNS
        .into_iter()
        .map(str::to_string)
        .chain(columns.iter().map(|c| quote_ident(&c.name)))
        .collect();
    let placeholders = vec!["?"; names.len()].join(", ");
    format!(
        "INSERT INTO gameweek_rows ({}) VALUES ({})",
        names.join(", "),
        placeholders
    )
}

fn cell_to_sql(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Int(i) => Value::Integer(*i),
        Cell::Float(f) => Value::Real(*f),
        Cell::Text(s) => Value::Text(s.clone()),
        Cell::Bool(b) => Value::Integer(i64::from(*b)),
    }
}
