//! Master fixture lists and match identifiers.
//!
//! Per-team season schedules are reconciled into one deduplicated list per
//! league, and every fixture gets identifiers that keep resolving when the
//! encoding or the team names change.
//!
//! ## Architecture
//!
//! - **normalize**: Canonicalizes team names (alias table + guarded fuzzy fallback)
//! - **registry**: Team metadata lookup per league
//! - **reconcile**: Merges per-team schedules into numbered master lists
//! - **codec**: Current (opaque) and legacy (plain text) identifier schemes
//! - **resolve**: Finds fixtures from identifiers of either scheme
//! - **types**: Core data structures shared by all of the above
//!
//! ## Usage
//!
//! ```ignore
//! let season = SeasonFile::load_from(&config.season_file)?
//!     .into_definition(config.placeholder_time);
//! let service = FixtureService::build(&season, &config)?;
//!
//! let fixtures = service.master_fixtures("SL");
//! let found = service.find_match_by_id(&fixtures[0].legacy_id);
//! ```
//!
//! The service is immutable once built and can be shared across threads
//! behind an `Arc`.

pub mod codec;
mod normalize;
mod reconcile;
mod registry;
mod resolve;
pub mod types;

pub use codec::MatchIdentityCodec;
pub use normalize::{fuzzy_name_match, normalize_name, CanonicalizerBuilder, TeamNameCanonicalizer};
pub use reconcile::{DropReason, DroppedFixture, FixtureReconciler, ReconcileResult, UNKNOWN_VENUE};
pub use registry::TeamRegistry;
pub use resolve::{MatchResolver, ResolveMethod};
pub use types::*;

use anyhow::{bail, Result};
use chrono::NaiveTime;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::FixturesConfig;
use crate::season::SeasonDefinition;

/// One league's reconciled fixtures and its registry
#[derive(Debug, Clone)]
pub struct LeagueFixtures {
    pub league_id: String,
    pub registry: TeamRegistry,
    /// Master list, ordered by kickoff
    pub fixtures: Vec<FixtureRecord>,
    pub dropped: Vec<DroppedFixture>,
    pub merged: usize,
}

/// Immutable handle over every league's master fixture list
#[derive(Debug, Clone)]
pub struct FixtureService {
    canon: TeamNameCanonicalizer,
    codec: MatchIdentityCodec,
    placeholder_time: NaiveTime,
    leagues: Vec<LeagueFixtures>,
    /// Every league's fixtures, for identifier resolution
    universe: Vec<FixtureRecord>,
    /// Current and legacy identifier -> index into `universe`
    id_index: HashMap<String, usize>,
}

impl FixtureService {
    /// Build the service from a season definition. Called once by the host.
    pub fn build(season: &SeasonDefinition, config: &FixturesConfig) -> Result<Self> {
        let mut builder = CanonicalizerBuilder::with_defaults();
        let enabled: Vec<_> = season
            .leagues
            .iter()
            .filter(|l| config.league_enabled(&l.league_id))
            .collect();
        // Registry spellings first so they win over alias targets
        for league in &enabled {
            for team in &league.teams {
                builder.add_canonical(&team.name);
            }
        }
        for league in &enabled {
            for (alias, canonical) in &league.aliases {
                builder.add_alias(alias, canonical);
            }
        }
        let canon = builder.build()?;
        let codec = MatchIdentityCodec::new(&config.id_prefix, &config.legacy_id_prefix);

        let mut leagues: Vec<LeagueFixtures> = Vec::new();
        for league in &season.leagues {
            if !config.league_enabled(&league.league_id) {
                debug!(league = %league.league_id, "League disabled by configuration");
                continue;
            }
            if leagues
                .iter()
                .any(|l| l.league_id.eq_ignore_ascii_case(&league.league_id))
            {
                bail!("league '{}' is defined more than once", league.league_id);
            }

            let registry = TeamRegistry::new(league.teams.clone(), &canon);
            let result = FixtureReconciler::new(&canon, &registry)
                .with_placeholder_time(config.placeholder_time)
                .reconcile(&league.schedules, &league.league_id);

            leagues.push(LeagueFixtures {
                league_id: league.league_id.clone(),
                registry,
                fixtures: result.fixtures,
                dropped: result.dropped,
                merged: result.merged,
            });
        }

        let universe: Vec<FixtureRecord> = leagues
            .iter()
            .flat_map(|l| l.fixtures.iter().cloned())
            .collect();

        let mut id_index = HashMap::with_capacity(universe.len() * 2);
        for (idx, record) in universe.iter().enumerate() {
            id_index.entry(codec.fixture_id(record)).or_insert(idx);
            id_index.entry(codec.fixture_legacy_id(record)).or_insert(idx);
        }

        info!(
            leagues = leagues.len(),
            fixtures = universe.len(),
            teams = canon.len(),
            "Fixture service built"
        );

        Ok(Self {
            canon,
            codec,
            placeholder_time: config.placeholder_time,
            leagues,
            universe,
            id_index,
        })
    }

    /// Master fixture list for a league (case-insensitive), ordered by kickoff.
    /// Unknown leagues yield an empty list.
    pub fn master_fixtures(&self, league_id: &str) -> Vec<FixtureView> {
        self.league(league_id)
            .map(|l| l.fixtures.iter().map(|f| self.view(f)).collect())
            .unwrap_or_default()
    }

    /// Fixtures a team plays in. `team` may be a code, registry id or any
    /// spelling the canonicalizer understands. With a league hint that knows
    /// the team, only that league is searched; otherwise every league is.
    pub fn fixtures_for_team(&self, team: &str, league_hint: Option<&str>) -> Vec<FixtureView> {
        let hinted = league_hint
            .and_then(|hint| self.league(hint))
            .filter(|l| l.registry.resolve(team, &self.canon).is_some());

        let leagues: Vec<&LeagueFixtures> = match hinted {
            Some(league) => vec![league],
            None => self.leagues.iter().collect(),
        };

        let mut records: Vec<&FixtureRecord> = Vec::new();
        for league in leagues {
            let Some(meta) = league.registry.resolve(team, &self.canon) else {
                continue;
            };
            records.extend(
                league
                    .fixtures
                    .iter()
                    .filter(|f| f.home_team == meta.name || f.away_team == meta.name),
            );
        }

        let placeholder_time = self.placeholder_time;
        records.sort_by_key(|f| (f.kickoff.utc(placeholder_time), f.match_number));
        records.into_iter().map(|f| self.view(f)).collect()
    }

    /// Find a fixture by current or legacy identifier
    pub fn find_match_by_id(&self, id: &str) -> Option<FixtureView> {
        self.find_record(id).map(|record| self.view(record))
    }

    /// Record lookup behind [`find_match_by_id`](Self::find_match_by_id)
    pub fn find_record(&self, id: &str) -> Option<&FixtureRecord> {
        if let Some(&idx) = self.id_index.get(id.trim()) {
            return self.universe.get(idx);
        }
        let (record, method) = MatchResolver::new(&self.codec)
            .with_canonicalizer(&self.canon)
            .resolve_with_method(id, &self.universe)?;
        debug!(id, match_number = record.match_number, ?method, "Resolved identifier");
        Some(record)
    }

    /// Project a record into the collaborator-facing view
    pub fn view(&self, record: &FixtureRecord) -> FixtureView {
        let utc = record.kickoff.utc(self.placeholder_time);
        let time = if record.kickoff.is_placeholder() {
            "TBC".to_string()
        } else {
            utc.format("%H:%M").to_string()
        };
        FixtureView {
            id: self.codec.fixture_id(record),
            legacy_id: self.codec.fixture_legacy_id(record),
            match_number: record.match_number,
            date: record.kickoff.date().format("%Y-%m-%d").to_string(),
            time,
            timestamp: utc.timestamp_millis(),
            round: record.round,
            home_team: record.home_team.clone(),
            away_team: record.away_team.clone(),
            venue: record.venue.clone(),
            scores: Scores::default(),
        }
    }

    pub fn league(&self, league_id: &str) -> Option<&LeagueFixtures> {
        self.leagues
            .iter()
            .find(|l| l.league_id.eq_ignore_ascii_case(league_id))
    }

    pub fn leagues(&self) -> &[LeagueFixtures] {
        &self.leagues
    }

    pub fn canonicalizer(&self) -> &TeamNameCanonicalizer {
        &self.canon
    }

    pub fn codec(&self) -> &MatchIdentityCodec {
        &self.codec
    }
}
