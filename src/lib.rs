//! Fantasy Premier League gameweek consolidation
//!
//! Pulls per-gameweek player stats from the public FPL API, merges them with
//! season-wide player metadata, derives per-90 and expected-points metrics,
//! and writes one flat artifact per completed gameweek (CSV files or SQLite).
//!
//! ## Features
//!
//! - **Resumable**: only completed gameweeks without an artifact are fetched
//! - **Double gameweeks**: two fixtures in one gameweek are summed into one row
//! - **Typed output**: fixed column order and types from `fpl_config.json`
//! - **Atomic publication**: an artifact is either complete or absent
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fpl_gameweek::{commands::run_sync, config::PipelineConfig, fpl::FplClient, storage::CsvStore};
//!
//! # async fn example() -> fpl_gameweek::Result<()> {
//! let config = PipelineConfig::builtin()?;
//! let client = FplClient::from_config(&config)?;
//! let mut store = CsvStore::new("player_data");
//!
//! let report = run_sync(&client, &mut store, config).await?;
//! println!("wrote {} gameweeks", report.written.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export FPL_GAMEWEEK_DATA_DIR=~/fpl      # artifact root
//! export FPL_GAMEWEEK_CONFIG=./fpl.json   # custom pipeline config
//! export RUST_LOG=fpl_gameweek=debug      # log filter
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod fpl;
pub mod pipeline;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{GameweekNumber, PlayerId, Position, SeasonLabel, StoreKind};
pub use error::{FplError, Result};

pub const DATA_DIR_ENV_VAR: &str = "FPL_GAMEWEEK_DATA_DIR";
pub const CONFIG_ENV_VAR: &str = "FPL_GAMEWEEK_CONFIG";
