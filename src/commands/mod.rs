//! Command implementations for the fpl-gameweek CLI

pub mod common;
pub mod costs;
pub mod status;
pub mod sync;

#[cfg(test)]
mod tests;

pub use common::RunContext;
pub use sync::{run_sync, GameweekFailure, SyncReport};
