//! League Fixtures
//!
//! Reconciles independently published per-team rugby league schedules into
//! one authoritative fixture list per league, and mints match identifiers that
//! keep resolving after the identifier scheme or team names change.

pub mod config;
pub mod fixtures;
pub mod logging;
pub mod season;
