//! Core utilities for the FPL gameweek pipeline
//!
//! This module consolidates common plumbing used across the application:
//! - `fs`: data directory resolution and atomic file publishing
//! - `http`: HTTP client construction

pub mod fs;
pub mod http;

pub use fs::{publish_atomically, resolve_data_dir};
pub use http::build_client;
