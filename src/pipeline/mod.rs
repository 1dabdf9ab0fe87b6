//! The gameweek consolidation pipeline.
//!
//! Per gameweek, in order: `normalize` -> `reconcile` -> `metrics` ->
//! `materialize`. `season` decides which gameweeks to run and `reference`
//! supplies the static player data every row is joined with.

pub mod materialize;
pub mod metrics;
pub mod normalize;
pub mod reconcile;
pub mod reference;
pub mod season;

pub use materialize::{build_table, materialize, Cell, GameweekTable};
pub use metrics::{derive, DerivedMetrics, ExpectedPoints};
pub use normalize::{normalize, GameweekPlayerRecord};
pub use reconcile::reconcile;
pub use reference::{build_reference, build_reference_from_bootstrap, PlayerReference, ReferenceTable};
pub use season::{last_completed_gameweek, missing_gameweeks, resolve_season};
