//! Durable artifact storage.
//!
//! One artifact per (season, gameweek). Two backends:
//! - `csv_store`: `Gameweek_<n>.csv` files under a per-season directory
//! - `schema` / `queries`: a SQLite database with a marker table and a row table

pub mod csv_store;
pub mod models;
pub mod queries;
pub mod schema;


use std::collections::BTreeSet;
use std::path::Path;

use crate::{
    cli::types::{GameweekNumber, SeasonLabel, StoreKind},
    error::Result,
    pipeline::materialize::GameweekTable,
};

pub use csv_store::CsvStore;
pub use models::*;
pub use schema::SqliteStore;

/// Where gameweek artifacts live.
///
/// An existing artifact is authoritative: `write` never replaces one.
pub trait ArtifactStore {
    /// Gameweeks already materialized for `season`.
    fn existing(&self, season: &SeasonLabel) -> Result<BTreeSet<GameweekNumber>>;

    fn exists(&self, season: &SeasonLabel, gameweek: GameweekNumber) -> Result<bool>;

    /// Publish `table` all-or-nothing.
    fn write(&mut self, season: &SeasonLabel, table: &GameweekTable) -> Result<WriteOutcome>;

    /// Replace the season's cost snapshot.
    fn write_player_costs(&mut self, season: &SeasonLabel, costs: &[PlayerCost]) -> Result<()>;

    /// Human-readable location, for status output.
    fn location(&self) -> String;
}

/// Open the configured backend rooted at `data_dir`.
pub fn open_store(kind: StoreKind, data_dir: &Path) -> Result<Box<dyn ArtifactStore>> {
    match kind {
        StoreKind::Csv => Ok(Box::new(CsvStore::new(data_dir.join(CSV_DIR_NAME)))),
        StoreKind::Sqlite => Ok(Box::new(SqliteStore::open(&data_dir.join(SQLITE_FILE_NAME))?)),
    }
}

pub const CSV_DIR_NAME: &str = "player_data";
pub const SQLITE_FILE_NAME: &str = "fpl.db";
