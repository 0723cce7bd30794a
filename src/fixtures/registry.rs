//! Team metadata lookup for one league.

use std::collections::HashMap;

use super::normalize::{normalize_name, TeamNameCanonicalizer};
use super::types::TeamMeta;

/// Team registry keyed by code, registry id and canonical name
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    teams: Vec<TeamMeta>,
    /// Lowercased code -> index
    by_code: HashMap<String, usize>,
    /// Lowercased registry id -> index
    by_id: HashMap<String, usize>,
    /// Normalized canonical name -> index
    by_name: HashMap<String, usize>,
}

impl TeamRegistry {
    /// Build a registry. Team names are rewritten to their canonical form so
    /// that every record produced from this registry carries canonical names.
    pub fn new(teams: Vec<TeamMeta>, canon: &TeamNameCanonicalizer) -> Self {
        let mut registry = Self::default();
        for mut team in teams {
            team.name = canon.canonicalize(&team.name);
            let idx = registry.teams.len();
            registry
                .by_code
                .entry(team.code.to_ascii_lowercase())
                .or_insert(idx);
            registry
                .by_id
                .entry(team.id.to_ascii_lowercase())
                .or_insert(idx);
            registry
                .by_name
                .entry(normalize_name(&team.name))
                .or_insert(idx);
            registry.teams.push(team);
        }
        registry
    }

    /// Resolve a raw team reference: code, then registry id, then any
    /// spelling the canonicalizer understands.
    pub fn resolve(&self, raw: &str, canon: &TeamNameCanonicalizer) -> Option<&TeamMeta> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let lower = raw.to_ascii_lowercase();
        let idx = self
            .by_code
            .get(&lower)
            .or_else(|| self.by_id.get(&lower))
            .or_else(|| {
                canon
                    .lookup(raw)
                    .and_then(|name| self.by_name.get(&normalize_name(name)))
            })?;
        self.teams.get(*idx)
    }

    pub fn teams(&self) -> &[TeamMeta] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
