//! Core types shared by every stage of fixture reconciliation and lookup.
//!
//! Source schedules arrive as one list per team, each declared from that team's
//! point of view. Reconciliation turns them into immutable [`FixtureRecord`]s,
//! and [`FixtureView`] is the shape handed to collaborators.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Time of day substituted when a kickoff has not been confirmed yet.
pub const DEFAULT_PLACEHOLDER_TIME: (u32, u32, u32) = (12, 0, 0);

/// Default placeholder kickoff time as a `NaiveTime`
pub fn default_placeholder_time() -> NaiveTime {
    let (h, m, s) = DEFAULT_PLACEHOLDER_TIME;
    NaiveTime::from_hms_opt(h, m, s).unwrap_or(NaiveTime::MIN)
}

/// Kickoff of a fixture: either a confirmed UTC instant or just a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kickoff {
    /// Kickoff time has been published
    Confirmed(DateTime<Utc>),
    /// Only the date is known; the time is the placeholder sentinel
    Placeholder(NaiveDate),
}

impl Kickoff {
    /// Parse a kickoff from source data.
    ///
    /// Accepted forms:
    /// - `2026-02-12` (date only) -> placeholder
    /// - RFC 3339 timestamp -> confirmed, unless its UTC time-of-day equals
    ///   `placeholder_time`, in which case it is the sentinel and becomes a placeholder
    pub fn parse(raw: &str, placeholder_time: NaiveTime) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(Kickoff::Placeholder(date));
        }
        let utc = DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc);
        Some(Self::from_utc(utc, placeholder_time))
    }

    /// Classify a UTC instant against the placeholder sentinel time
    pub fn from_utc(utc: DateTime<Utc>, placeholder_time: NaiveTime) -> Self {
        if utc.time() == placeholder_time {
            Kickoff::Placeholder(utc.date_naive())
        } else {
            Kickoff::Confirmed(utc)
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Kickoff::Placeholder(_))
    }

    /// UTC instant used for ordering; placeholders sit at the sentinel time
    pub fn utc(&self, placeholder_time: NaiveTime) -> DateTime<Utc> {
        match self {
            Kickoff::Confirmed(t) => *t,
            Kickoff::Placeholder(date) => Utc.from_utc_datetime(&date.and_time(placeholder_time)),
        }
    }

    /// Date portion, used by the dedup key
    pub fn date(&self) -> NaiveDate {
        match self {
            Kickoff::Confirmed(t) => t.date_naive(),
            Kickoff::Placeholder(date) => *date,
        }
    }
}

/// Which side of the fixture the declaring team plays on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

/// Team registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMeta {
    /// Short code used by the season data (e.g. "YRK")
    pub code: String,
    /// Stable registry identifier (e.g. "york-knights")
    pub id: String,
    /// Canonical display name
    pub name: String,
    /// League this team belongs to
    #[serde(default)]
    pub league: String,
    /// Home ground, used when a fixture does not declare a venue
    #[serde(default)]
    pub venue: Option<String>,
}

/// One fixture as declared by a single team
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredFixture {
    pub round: u32,
    /// Position of the entry in the source listing, counted across rounds.
    /// Schedules built by hand may leave every entry at 0 and are then
    /// scanned round by round in list order.
    pub sequence: usize,
    /// Opponent code or name as written by the source
    pub opponent: String,
    pub side: Side,
    pub kickoff: Kickoff,
    pub venue: Option<String>,
}

/// A team's own list of fixtures
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSchedule {
    /// Team code or name as written by the source
    pub team: String,
    pub fixtures: Vec<DeclaredFixture>,
}

/// One reconciled match in a league's master list. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureRecord {
    pub match_number: u32,
    pub round: u32,
    pub kickoff: Kickoff,
    pub venue: String,
    pub home_team: String,
    pub away_team: String,
    pub league_id: String,
}

/// The composite key an identifier encodes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchIdentity {
    pub league_id: String,
    pub match_number: u32,
    pub home_team: String,
    pub away_team: String,
}

impl MatchIdentity {
    pub fn new(
        league_id: impl Into<String>,
        match_number: u32,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Self {
        Self {
            league_id: league_id.into(),
            match_number,
            home_team: home_team.into(),
            away_team: away_team.into(),
        }
    }
}

impl From<&FixtureRecord> for MatchIdentity {
    fn from(record: &FixtureRecord) -> Self {
        Self::new(
            record.league_id.clone(),
            record.match_number,
            record.home_team.clone(),
            record.away_team.clone(),
        )
    }
}

/// Scores are owned by the live-results collaborator and always null here
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

/// Fixture as exposed to collaborators (HTTP layer, renderers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureView {
    pub id: String,
    pub legacy_id: String,
    pub match_number: u32,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM` UTC, or `TBC` when the kickoff is a placeholder
    pub time: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub round: u32,
    pub home_team: String,
    pub away_team: String,
    pub venue: String,
    pub scores: Scores,
}
