//! Artifact store selection.

use std::fmt;

/// Where materialized gameweeks are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StoreKind {
    /// One CSV file per gameweek under `<data-dir>/player_data/<season>/`
    #[default]
    Csv,
    /// A SQLite database at `<data-dir>/fpl.db`
    Sqlite,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreKind::Csv => "csv",
            StoreKind::Sqlite => "sqlite",
        };
        write!(f, "{}", s)
    }
}
