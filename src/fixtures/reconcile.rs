//! Per-team schedule reconciliation.
//!
//! Each team publishes its own fixture list, so a real match usually shows up
//! twice (once from each side), possibly with different kickoff times. This
//! module merges those declarations into one numbered, ordered master list.

use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use super::normalize::TeamNameCanonicalizer;
use super::registry::TeamRegistry;
use super::types::{
    default_placeholder_time, DeclaredFixture, FixtureRecord, Kickoff, Side, TeamSchedule,
};

/// Venue used when neither the fixture nor the home team names one
pub const UNKNOWN_VENUE: &str = "TBC";

/// Dedup key: kickoff date plus canonical home and away names. Deliberately
/// coarser than the full timestamp since sources disagree on kickoff times.
type DedupKey = (NaiveDate, String, String);

/// Why a declared fixture was left out of the master list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The declaring team is not in the registry
    UnknownTeam,
    /// The opponent is not in the registry
    UnknownOpponent,
    /// Team and opponent resolve to the same club
    SelfFixture,
}

/// A declared fixture that did not make it into the master list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFixture {
    pub team: String,
    pub opponent: String,
    pub round: u32,
    pub reason: DropReason,
}

/// Result of reconciling one league
#[derive(Debug, Clone, Default)]
pub struct ReconcileResult {
    /// Master list, ordered by kickoff
    pub fixtures: Vec<FixtureRecord>,
    /// Declarations skipped because they could not be resolved
    pub dropped: Vec<DroppedFixture>,
    /// Declarations folded into a match already seen
    pub merged: usize,
}

/// Merges per-team schedules into a league master list
#[derive(Debug, Clone)]
pub struct FixtureReconciler<'a> {
    canon: &'a TeamNameCanonicalizer,
    registry: &'a TeamRegistry,
    placeholder_time: NaiveTime,
}

impl<'a> FixtureReconciler<'a> {
    pub fn new(canon: &'a TeamNameCanonicalizer, registry: &'a TeamRegistry) -> Self {
        Self {
            canon,
            registry,
            placeholder_time: default_placeholder_time(),
        }
    }

    pub fn with_placeholder_time(mut self, placeholder_time: NaiveTime) -> Self {
        self.placeholder_time = placeholder_time;
        self
    }

    /// Reconcile per-team schedules into one master list.
    ///
    /// The algorithm:
    /// 1. Scan declarations in source order (see [`DeclaredFixture::sequence`])
    /// 2. Resolve both teams against the registry, dropping what does not resolve
    /// 3. Key by (date, canonical home, canonical away); the first sighting of a
    ///    key takes the next match number
    /// 4. On a repeated key keep the better kickoff: confirmed beats placeholder,
    ///    otherwise the earlier time wins
    /// 5. Sort the result by kickoff
    pub fn reconcile(&self, schedules: &[TeamSchedule], league_id: &str) -> ReconcileResult {
        let mut declarations: Vec<(&TeamSchedule, &DeclaredFixture)> = schedules
            .iter()
            .flat_map(|schedule| schedule.fixtures.iter().map(move |f| (schedule, f)))
            .collect();
        // Stable: equal keys keep team and list order
        declarations.sort_by_key(|(_, fixture)| (fixture.sequence, fixture.round));

        let mut result = ReconcileResult::default();
        let mut by_key: HashMap<DedupKey, usize> = HashMap::new();

        for (schedule, fixture) in declarations {
            let Some(team) = self.registry.resolve(&schedule.team, self.canon) else {
                self.drop_fixture(&mut result, schedule, fixture, DropReason::UnknownTeam);
                continue;
            };
            let Some(opponent) = self.registry.resolve(&fixture.opponent, self.canon) else {
                self.drop_fixture(&mut result, schedule, fixture, DropReason::UnknownOpponent);
                continue;
            };
            if team.id == opponent.id {
                self.drop_fixture(&mut result, schedule, fixture, DropReason::SelfFixture);
                continue;
            }

            let (home, away) = match fixture.side {
                Side::Home => (team, opponent),
                Side::Away => (opponent, team),
            };
            let home_team = self.canon.canonicalize(&home.name);
            let away_team = self.canon.canonicalize(&away.name);
            let key: DedupKey = (fixture.kickoff.date(), home_team.clone(), away_team.clone());
            let declared_venue = fixture
                .venue
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty());

            if let Some(&idx) = by_key.get(&key) {
                result.merged += 1;
                let existing = &mut result.fixtures[idx];
                if self.prefers(&fixture.kickoff, &existing.kickoff) {
                    debug!(
                        match_number = existing.match_number,
                        from = %schedule.team,
                        old = ?existing.kickoff,
                        new = ?fixture.kickoff,
                        "Replacing kickoff with better declaration"
                    );
                    existing.kickoff = fixture.kickoff;
                    if let Some(venue) = declared_venue {
                        existing.venue = venue.to_string();
                    }
                } else {
                    debug!(
                        match_number = existing.match_number,
                        from = %schedule.team,
                        "Duplicate declaration folded"
                    );
                }
                continue;
            }

            let venue = declared_venue
                .map(str::to_string)
                .or_else(|| home.venue.clone())
                .unwrap_or_else(|| UNKNOWN_VENUE.to_string());
            let match_number = result.fixtures.len() as u32 + 1;

            by_key.insert(key, result.fixtures.len());
            result.fixtures.push(FixtureRecord {
                match_number,
                round: fixture.round,
                kickoff: fixture.kickoff,
                venue,
                home_team,
                away_team,
                league_id: league_id.to_string(),
            });
        }

        let placeholder_time = self.placeholder_time;
        result
            .fixtures
            .sort_by_key(|f| (f.kickoff.utc(placeholder_time), f.match_number));

        info!(
            league = league_id,
            fixtures = result.fixtures.len(),
            merged = result.merged,
            dropped = result.dropped.len(),
            "Reconciled master fixture list"
        );

        result
    }

    /// Whether `candidate` should replace `current` for the same match
    fn prefers(&self, candidate: &Kickoff, current: &Kickoff) -> bool {
        match (candidate.is_placeholder(), current.is_placeholder()) {
            (false, true) => true,
            (true, false) => false,
            _ => candidate.utc(self.placeholder_time) < current.utc(self.placeholder_time),
        }
    }

    fn drop_fixture(
        &self,
        result: &mut ReconcileResult,
        schedule: &TeamSchedule,
        fixture: &DeclaredFixture,
        reason: DropReason,
    ) {
        warn!(
            team = %schedule.team,
            opponent = %fixture.opponent,
            round = fixture.round,
            reason = ?reason,
            "Dropping unresolvable fixture"
        );
        result.dropped.push(DroppedFixture {
            team: schedule.team.clone(),
            opponent: fixture.opponent.clone(),
            round: fixture.round,
            reason,
        });
    }
}
