//! FPL API surface: wire types, the stat schema, and the HTTP source.

pub mod http;
pub mod stats;
pub mod types;

pub use http::{FplClient, FplSource, FPL_BASE_URL};
pub use stats::{StatField, StatLine};
