//! Identifier resolution against a fixture universe.
//!
//! Identifiers in the wild come in two schemes and may predate the current
//! team names, so resolution falls through progressively looser strategies:
//! exact identifier match, then decoded key + fuzzy names (current scheme),
//! then the same for the legacy scheme.

use tracing::debug;

use super::codec::MatchIdentityCodec;
use super::normalize::{fuzzy_name_match, TeamNameCanonicalizer};
use super::types::{FixtureRecord, MatchIdentity};

/// How an identifier was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMethod {
    /// Equal to the fixture's current identifier
    ExactCurrent,
    /// Equal to the fixture's legacy identifier
    ExactLegacy,
    /// Decoded current identifier, names matched loosely
    DecodedCurrent,
    /// Decoded legacy identifier, names matched loosely
    DecodedLegacy,
}

/// Resolves identifiers of either scheme to fixtures
#[derive(Debug, Clone)]
pub struct MatchResolver<'a> {
    codec: &'a MatchIdentityCodec,
    canon: Option<&'a TeamNameCanonicalizer>,
}

impl<'a> MatchResolver<'a> {
    pub fn new(codec: &'a MatchIdentityCodec) -> Self {
        Self { codec, canon: None }
    }

    /// Also compare decoded names after canonicalization, so retired short
    /// forms still find the renamed fixture
    pub fn with_canonicalizer(mut self, canon: &'a TeamNameCanonicalizer) -> Self {
        self.canon = Some(canon);
        self
    }

    /// Resolve `id` against `universe`. `None` is an ordinary "not found".
    pub fn resolve<'u>(&self, id: &str, universe: &'u [FixtureRecord]) -> Option<&'u FixtureRecord> {
        self.resolve_with_method(id, universe).map(|(record, _)| record)
    }

    /// Like [`resolve`](Self::resolve) but also reports which strategy hit
    pub fn resolve_with_method<'u>(
        &self,
        id: &str,
        universe: &'u [FixtureRecord],
    ) -> Option<(&'u FixtureRecord, ResolveMethod)> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }

        for record in universe {
            if self.codec.fixture_id(record) == id {
                return Some((record, ResolveMethod::ExactCurrent));
            }
            if self.codec.fixture_legacy_id(record) == id {
                return Some((record, ResolveMethod::ExactLegacy));
            }
        }

        if let Some(identity) = self.codec.decode(id) {
            if let Some(record) = self.fuzzy_find(&identity, universe) {
                return Some((record, ResolveMethod::DecodedCurrent));
            }
            debug!(id, "Decoded identifier matched no fixture");
        }

        if let Some(identity) = self.codec.legacy_decode(id) {
            if let Some(record) = self.fuzzy_find(&identity, universe) {
                return Some((record, ResolveMethod::DecodedLegacy));
            }
            debug!(id, "Legacy identifier matched no fixture");
        }

        None
    }

    /// First fixture with the same match number whose names match loosely
    fn fuzzy_find<'u>(
        &self,
        identity: &MatchIdentity,
        universe: &'u [FixtureRecord],
    ) -> Option<&'u FixtureRecord> {
        universe.iter().find(|record| {
            record.match_number == identity.match_number
                && self.names_match(&identity.home_team, &record.home_team)
                && self.names_match(&identity.away_team, &record.away_team)
        })
    }

    fn names_match(&self, decoded: &str, current: &str) -> bool {
        if fuzzy_name_match(decoded, current) {
            return true;
        }
        match self.canon.and_then(|c| c.lookup(decoded)) {
            Some(canonical) => fuzzy_name_match(canonical, current),
            None => false,
        }
    }
}
