//! Runtime configuration.
//!
//! Everything is read from environment variables (a `.env` file is loaded by
//! the binary first). Library users can build a [`FixturesConfig`] directly.
//!
//! Environment variables:
//! - SEASON_FILE=/path/to/season.json (default: ./season.json)
//! - MATCH_ID_PREFIX=<prefix> (default: fx-)
//! - LEGACY_ID_PREFIX=<prefix> (default: local-)
//! - PLACEHOLDER_KICKOFF=HH:MM[:SS] UTC time treated as "time not confirmed" (default: 12:00:00)
//! - LEAGUES=SL,NRL (default: all leagues in the season file)

use chrono::NaiveTime;
use tracing::warn;

use crate::fixtures::codec::{DEFAULT_ID_PREFIX, DEFAULT_LEGACY_PREFIX};
use crate::fixtures::types::default_placeholder_time;

/// Default season file location
pub const DEFAULT_SEASON_FILE: &str = "./season.json";

/// Fixture subsystem configuration
#[derive(Debug, Clone, PartialEq)]
pub struct FixturesConfig {
    /// Season definition document
    pub season_file: String,
    /// Prefix for current-scheme match identifiers
    pub id_prefix: String,
    /// Prefix for legacy match identifiers
    pub legacy_id_prefix: String,
    /// UTC time of day that marks an unconfirmed kickoff
    pub placeholder_time: NaiveTime,
    /// Leagues to load; empty means all
    pub leagues: Vec<String>,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            season_file: DEFAULT_SEASON_FILE.to_string(),
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            legacy_id_prefix: DEFAULT_LEGACY_PREFIX.to_string(),
            placeholder_time: default_placeholder_time(),
            leagues: Vec::new(),
        }
    }
}

impl FixturesConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let season_file = std::env::var("SEASON_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.season_file);

        let id_prefix = std::env::var("MATCH_ID_PREFIX")
            .ok()
            .filter(|s| is_url_safe_prefix(s))
            .unwrap_or(defaults.id_prefix);

        let legacy_id_prefix = std::env::var("LEGACY_ID_PREFIX")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.legacy_id_prefix);

        let placeholder_time = match std::env::var("PLACEHOLDER_KICKOFF") {
            Ok(raw) => parse_time_of_day(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Invalid PLACEHOLDER_KICKOFF, using default");
                defaults.placeholder_time
            }),
            Err(_) => defaults.placeholder_time,
        };

        Self {
            season_file,
            id_prefix,
            legacy_id_prefix,
            placeholder_time,
            leagues: enabled_leagues_from_env(),
        }
    }

    /// Whether a league should be loaded (case-insensitive)
    pub fn league_enabled(&self, league_id: &str) -> bool {
        self.leagues.is_empty()
            || self
                .leagues
                .iter()
                .any(|l| l.eq_ignore_ascii_case(league_id))
    }
}

/// Get enabled leagues from LEAGUES env var (comma-separated).
/// If unset/empty, returns empty Vec meaning "all leagues".
/// Example: LEAGUES="SL,NRL"
pub fn enabled_leagues_from_env() -> Vec<String> {
    std::env::var("LEAGUES")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Parse `HH:MM` or `HH:MM:SS`
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// A current-scheme prefix must survive in a URL path unescaped
fn is_url_safe_prefix(prefix: &str) -> bool {
    if prefix.is_empty() {
        return false;
    }
    let ok = prefix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        warn!(prefix, "MATCH_ID_PREFIX is not URL safe, using default");
    }
    ok
}
