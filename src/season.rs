//! Season definition loading.
//!
//! The season document carries both collaborator inputs: the team registry
//! and the ordered rounds of per-team declarations. Each round entry is one
//! team's own view of a fixture, so a match normally appears once per side.
//!
//! ```json
//! {
//!   "leagues": [{
//!     "league_id": "SL",
//!     "teams": [{ "code": "YRK", "id": "york-knights", "name": "York Knights" }],
//!     "aliases": { "hullkr": "Hull Kingston Rovers" },
//!     "rounds": [{ "round": 1, "fixtures": [
//!       { "team": "YRK", "opponent": "HKR", "side": "home", "kickoff": "2026-02-12T12:00:00Z" }
//!     ]}]
//!   }]
//! }
//! ```

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::fixtures::types::{DeclaredFixture, Kickoff, Side, TeamMeta, TeamSchedule};

/// Raw season document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonFile {
    #[serde(default)]
    pub leagues: Vec<LeagueFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueFile {
    pub league_id: String,
    #[serde(default)]
    pub teams: Vec<TeamMeta>,
    /// Extra spellings for this league's clubs: alias -> canonical name
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub rounds: Vec<RoundFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundFile {
    pub round: u32,
    #[serde(default)]
    pub fixtures: Vec<RoundEntry>,
}

/// One team's declaration of a fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Declaring team (code or name)
    pub team: String,
    pub opponent: String,
    pub side: Side,
    /// `YYYY-MM-DD` or RFC 3339
    pub kickoff: String,
    #[serde(default)]
    pub venue: Option<String>,
}

/// Season data for one league, ready for reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueSeason {
    pub league_id: String,
    pub teams: Vec<TeamMeta>,
    pub aliases: Vec<(String, String)>,
    /// Per-team schedules, teams in order of first appearance. Each entry
    /// keeps its position in the document so rounds scan in file order.
    pub schedules: Vec<TeamSchedule>,
}

/// All leagues of a season
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeasonDefinition {
    pub leagues: Vec<LeagueSeason>,
}

impl SeasonFile {
    /// Load from a JSON file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading season file {}", path.display()))?;
        let file = Self::from_json(&contents)
            .with_context(|| format!("parsing season file {}", path.display()))?;
        info!(
            path = %path.display(),
            leagues = file.leagues.len(),
            "Loaded season file"
        );
        Ok(file)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert to per-team schedules. Entries whose kickoff cannot be parsed
    /// are skipped with a warning, like any other unusable source record.
    pub fn into_definition(self, placeholder_time: NaiveTime) -> SeasonDefinition {
        let leagues = self
            .leagues
            .into_iter()
            .map(|league| league.into_season(placeholder_time))
            .collect();
        SeasonDefinition { leagues }
    }
}

impl LeagueFile {
    fn into_season(self, placeholder_time: NaiveTime) -> LeagueSeason {
        let mut schedules: Vec<TeamSchedule> = Vec::new();
        let mut sequence = 0;

        for round in self.rounds {
            for entry in round.fixtures {
                sequence += 1;
                let Some(kickoff) = Kickoff::parse(&entry.kickoff, placeholder_time) else {
                    warn!(
                        league = %self.league_id,
                        round = round.round,
                        team = %entry.team,
                        kickoff = %entry.kickoff,
                        "Skipping entry with unparseable kickoff"
                    );
                    continue;
                };

                let declared = DeclaredFixture {
                    round: round.round,
                    sequence,
                    opponent: entry.opponent,
                    side: entry.side,
                    kickoff,
                    venue: entry.venue,
                };

                match schedules.iter_mut().find(|s| s.team == entry.team) {
                    Some(schedule) => schedule.fixtures.push(declared),
                    None => schedules.push(TeamSchedule {
                        team: entry.team,
                        fixtures: vec![declared],
                    }),
                }
            }
        }

        let teams = self
            .teams
            .into_iter()
            .map(|mut team| {
                if team.league.is_empty() {
                    team.league = self.league_id.clone();
                }
                team
            })
            .collect();

        LeagueSeason {
            league_id: self.league_id,
            teams,
            aliases: self.aliases.into_iter().collect(),
            schedules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::types::default_placeholder_time;
    use std::io::Write;

    const SEASON_JSON: &str = r#"{
        "leagues": [{
            "league_id": "SL",
            "teams": [
                { "code": "YRK", "id": "york-knights", "name": "York Knights", "venue": "LNER Community Stadium" },
                { "code": "HKR", "id": "hull-kr", "name": "Hull KR" }
            ],
            "aliases": { "yck": "York Knights" },
            "rounds": [
                { "round": 1, "fixtures": [
                    { "team": "YRK", "opponent": "HKR", "side": "home", "kickoff": "2026-02-12T12:00:00Z" },
                    { "team": "HKR", "opponent": "YRK", "side": "away", "kickoff": "2026-02-12T20:00:00Z" },
                    { "team": "HKR", "opponent": "YRK", "side": "away", "kickoff": "soon" }
                ]},
                { "round": 2, "fixtures": [
                    { "team": "YRK", "opponent": "HKR", "side": "away", "kickoff": "2026-02-19", "venue": "Craven Park" }
                ]}
            ]
        }]
    }"#;

    #[test]
    fn test_into_definition_groups_by_team() {
        let file = SeasonFile::from_json(SEASON_JSON).unwrap();
        let season = file.into_definition(default_placeholder_time());

        assert_eq!(season.leagues.len(), 1);
        let league = &season.leagues[0];
        assert_eq!(league.league_id, "SL");
        assert_eq!(league.teams[1].league, "SL");
        assert_eq!(
            league.aliases,
            vec![("yck".to_string(), "York Knights".to_string())]
        );

        let teams: Vec<&str> = league.schedules.iter().map(|s| s.team.as_str()).collect();
        assert_eq!(teams, vec!["YRK", "HKR"]);

        let york = &league.schedules[0];
        assert_eq!(york.fixtures.len(), 2);
        assert_eq!(york.fixtures[0].sequence, 1);
        assert_eq!(york.fixtures[1].sequence, 4);
        assert_eq!(league.schedules[1].fixtures[0].sequence, 2);
        assert!(york.fixtures[0].kickoff.is_placeholder());
        assert_eq!(york.fixtures[1].side, Side::Away);
        assert_eq!(york.fixtures[1].venue.as_deref(), Some("Craven Park"));

        // The unparseable kickoff is skipped
        assert_eq!(league.schedules[1].fixtures.len(), 1);
        assert!(!league.schedules[1].fixtures[0].kickoff.is_placeholder());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEASON_JSON.as_bytes()).unwrap();

        let loaded = SeasonFile::load_from(file.path()).unwrap();
        assert_eq!(loaded.leagues[0].rounds.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeasonFile::load_from(dir.path().join("missing.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("reading season file"));
    }

    #[test]
    fn test_load_invalid_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ \"leagues\": [ { \"teams\": [] } ] }").unwrap();
        let err = SeasonFile::load_from(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing season file"));
    }
}
