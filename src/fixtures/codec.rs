//! Match identifier encoding.
//!
//! Current identifiers are `<prefix><payload>` where the payload is the
//! URL-safe base64 (no padding) of a JSON array
//! `[league_id, match_number, home_team, away_team]`. The transform is fully
//! reversible, so a decoded identifier yields the exact tuple it was built from.
//!
//! Legacy identifiers are plain text: `local-NRL-7-Sydney Roosters-Wests Tigers`.
//! They are still accepted on the way in because older links carry them.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use tracing::debug;

use super::types::{FixtureRecord, MatchIdentity};

/// Prefix of current-scheme identifiers
pub const DEFAULT_ID_PREFIX: &str = "fx-";

/// Prefix of legacy hyphen-delimited identifiers
pub const DEFAULT_LEGACY_PREFIX: &str = "local-";

type WireTuple = (String, u32, String, String);

/// Encoder/decoder for both identifier schemes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchIdentityCodec {
    prefix: String,
    legacy_prefix: String,
}

impl Default for MatchIdentityCodec {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ID_PREFIX.to_string(),
            legacy_prefix: DEFAULT_LEGACY_PREFIX.to_string(),
        }
    }
}

impl MatchIdentityCodec {
    pub fn new(prefix: impl Into<String>, legacy_prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            legacy_prefix: legacy_prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn legacy_prefix(&self) -> &str {
        &self.legacy_prefix
    }

    /// Encode a match key into an opaque, URL-path-safe identifier.
    ///
    /// Deterministic and injective: the JSON array quotes and escapes every
    /// string field, so no two distinct tuples share a serialization.
    pub fn encode(
        &self,
        league_id: &str,
        match_number: u32,
        home_team: &str,
        away_team: &str,
    ) -> String {
        let tuple = (league_id, match_number, home_team, away_team);
        // Serializing a tuple of strings and an integer cannot fail
        let json = serde_json::to_string(&tuple).unwrap_or_default();
        let mut id = String::with_capacity(self.prefix.len() + json.len() * 4 / 3 + 4);
        id.push_str(&self.prefix);
        URL_SAFE_NO_PAD.encode_string(json.as_bytes(), &mut id);
        id
    }

    pub fn encode_identity(&self, identity: &MatchIdentity) -> String {
        self.encode(
            &identity.league_id,
            identity.match_number,
            &identity.home_team,
            &identity.away_team,
        )
    }

    /// Current-scheme identifier of a fixture
    pub fn fixture_id(&self, record: &FixtureRecord) -> String {
        self.encode(
            &record.league_id,
            record.match_number,
            &record.home_team,
            &record.away_team,
        )
    }

    /// Decode a current-scheme identifier. Anything `encode` could not have
    /// produced yields `None`.
    pub fn decode(&self, id: &str) -> Option<MatchIdentity> {
        let payload = id.strip_prefix(self.prefix.as_str())?;
        let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
        let json = std::str::from_utf8(&bytes).ok()?;
        let (league_id, match_number, home_team, away_team) =
            serde_json::from_str::<WireTuple>(json).ok()?;

        // Reject alternative spellings of the same tuple (extra whitespace,
        // escaped characters) so every tuple has exactly one identifier.
        let identity = MatchIdentity::new(league_id, match_number, home_team, away_team);
        if self.encode_identity(&identity) != id {
            debug!(id, "Identifier decodes but is not canonical");
            return None;
        }
        Some(identity)
    }

    /// Legacy plain-text identifier:
    /// `prefix + league + "-" + number + "-" + home + "-" + away`
    pub fn legacy_encode(
        &self,
        league_id: &str,
        match_number: u32,
        home_team: &str,
        away_team: &str,
    ) -> String {
        format!(
            "{}{}-{}-{}-{}",
            self.legacy_prefix, league_id, match_number, home_team, away_team
        )
    }

    /// Legacy identifier of a fixture
    pub fn fixture_legacy_id(&self, record: &FixtureRecord) -> String {
        self.legacy_encode(
            &record.league_id,
            record.match_number,
            &record.home_team,
            &record.away_team,
        )
    }

    /// Best-effort parse of a legacy identifier.
    ///
    /// Tokens split on `-`: first is the league, second the match number, last
    /// the away team, and everything between is rejoined as the home team.
    /// A hyphenated away team or league therefore parses wrongly; that is the
    /// behavior old links were minted against, so it stays.
    pub fn legacy_decode(&self, id: &str) -> Option<MatchIdentity> {
        let rest = id.strip_prefix(self.legacy_prefix.as_str())?;
        let tokens: Vec<&str> = rest.split('-').collect();
        if tokens.len() < 4 {
            return None;
        }

        let league_id = tokens[0];
        let match_number = tokens[1].parse::<u32>().ok()?;
        let away_team = tokens[tokens.len() - 1];
        let home_team = tokens[2..tokens.len() - 1].join("-");

        if league_id.is_empty() || home_team.is_empty() || away_team.is_empty() {
            return None;
        }

        Some(MatchIdentity::new(
            league_id,
            match_number,
            home_team,
            away_team,
        ))
    }
}
