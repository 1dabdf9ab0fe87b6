//! Type-safe wrappers and enums for FPL gameweek data.

pub mod ids;
pub mod position;
pub mod store;
pub mod time;

pub use ids::PlayerId;
pub use position::Position;
pub use store::StoreKind;
pub use time::{GameweekNumber, SeasonLabel};
