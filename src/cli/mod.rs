//! CLI argument definitions and parsing.

pub mod types;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use types::StoreKind;

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Root directory for artifacts (or set `FPL_GAMEWEEK_DATA_DIR`).
    #[clap(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Pipeline config JSON (or set `FPL_GAMEWEEK_CONFIG`). Defaults to the built-in config.
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Artifact backend.
    #[clap(long, value_enum, default_value_t = StoreKind::Csv, global = true)]
    pub store: StoreKind,

    /// Debug-level logging for this crate (`RUST_LOG` still wins when set).
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[clap(
    name = "fpl-gameweek",
    version,
    about = "Consolidate Fantasy Premier League gameweek stats into one file per gameweek"
)]
pub struct Cli {
    #[clap(flatten)]
    pub global: GlobalArgs,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Materialize every completed gameweek that has no artifact yet.
    ///
    /// Existing artifacts are never rewritten. A failing gameweek is reported
    /// and the remaining gameweeks are still processed.
    Sync,

    /// Show the season, the last completed gameweek and which gameweeks are stored.
    Status {
        /// Output as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Write the current price of every player (`player_cost.csv` or the `player_costs` table).
    Costs,
}
