//! SQLite connection and schema management

use rusqlite::Connection;
use std::collections::BTreeSet;
use std::path::Path;

use crate::{
    config::{ColumnSpec, ColumnType},
    error::{FplError, Result},
};

pub(crate) const ROW_KEY_COLUMNS: [&str; 3] = ["artifact_season", "artifact_gameweek", "row_index"];

/// SQLite-backed artifact store.
///
/// `gameweek_artifacts` marks which gameweeks are published; their rows
/// live in `gameweek_rows`, whose columns follow the configured output
/// columns and are created on first write.
pub struct SqliteStore {
    pub(crate) conn: Connection,
    pub(crate) label: String,
}

impl SqliteStore {
    /// Open (or create) the database file and ensure the fixed tables exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let mut store = Self {
            conn,
            label: path.display().to_string(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self {
            conn,
            label: ":memory:".to_string(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS gameweek_artifacts (
                season TEXT NOT NULL,
                gameweek INTEGER NOT NULL,
                row_count INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (season, gameweek)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS player_costs (
                season TEXT NOT NULL,
                player_id INTEGER NOT NULL,
                now_cost REAL NOT NULL,
                PRIMARY KEY (season, player_id)
            )",
            [],
        )?;

        Ok(())
    }
}

/// `CREATE TABLE` for the row table, one SQL column per output column.
///
/// The `artifact_*` key columns are separate from any configured
/// `gameweek` column, which is free to be dropped or renamed.
pub(crate) fn rows_table_sql(columns: &[ColumnSpec]) -> String {
    let mut sql = String::from(
        "CREATE TABLE IF NOT EXISTS gameweek_rows (\n    artifact_season TEXT NOT NULL,\n    artifact_gameweek INTEGER NOT NULL,\n    row_index INTEGER NOT NULL",
    );
    for column in columns {
        sql.push_str(",\n    ");
        sql.push_str(&quote_ident(&column.name));
        sql.push(' ');
        sql.push_str(sql_type(column.column_type));
    }
    sql.push_str(",\n    PRIMARY KEY (artifact_season, artifact_gameweek, row_index)\n)");
    sql
}

/// Fail when the stored row table was created for a different column list.
///
/// The layout is fixed by the first write; it is never migrated.
pub(crate) fn check_rows_layout(conn: &Connection, columns: &[ColumnSpec]) -> Result<()> {
    let mut stmt = conn.prepare("PRAGMA table_info(gameweek_rows)")?;
    let stored = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    let stored: BTreeSet<&str> = stored
        .iter()
        .map(String::as_str)
        .filter(|name| !ROW_KEY_COLUMNS.contains(name))
        .collect();
    let configured: BTreeSet<&str> = columns.iter().map(|c| c.name.as_str()).collect();

    if stored == configured {
        return Ok(());
    }

    let missing: Vec<&str> = configured.difference(&stored).copied().collect();
    let extra: Vec<&str> = stored.difference(&configured).copied().collect();
    Err(FplError::InvalidConfig {
        message: format!(
            "configured columns do not match the stored gameweek_rows table \
             (not in table: [{}]; only in table: [{}])",
            missing.join(", "),
            extra.join(", ")
        ),
    })
}

pub(crate) fn sql_type(column_type: ColumnType) -> &'static str {
    match column_type {
        ColumnType::Int64 | ColumnType::NullableInt64 | ColumnType::Bool => "INTEGER",
        ColumnType::Float64 => "REAL",
        ColumnType::String => "TEXT",
    }
}

pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
