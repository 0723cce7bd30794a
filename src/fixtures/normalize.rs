//! Team name canonicalization.
//!
//! Every spelling of a club (codes, short forms, sponsor-free names, shouting
//! caps) is mapped onto one canonical display name so that fixtures declared
//! by different teams can be keyed and compared.

use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::debug;

/// Inputs shorter than this never take the substring fallback
const MIN_FUZZY_LEN: usize = 3;

/// Lowercase and strip everything outside `[a-z0-9]`.
///
/// # Examples
///
/// ```
/// use league_fixtures::fixtures::normalize_name;
/// assert_eq!(normalize_name("Hull K.R."), "hullkr");
/// assert_eq!(normalize_name("St. Helens"), "sthelens");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Loose name comparison: punctuation/case-insensitive equality, or one name
/// containing the other. Empty names never match.
pub fn fuzzy_name_match(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    let b = normalize_name(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

/// Collects canonical names and aliases before freezing them into a
/// [`TeamNameCanonicalizer`].
#[derive(Debug, Clone, Default)]
pub struct CanonicalizerBuilder {
    /// Canonical names in declaration order
    names: Vec<String>,
    /// Normalized alias -> canonical name
    aliases: HashMap<String, String>,
}

impl CanonicalizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preloaded with the rugby league clubs this crate knows about
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        add_default_teams(&mut builder);
        builder
    }

    /// Register a canonical name. Declaration order decides nothing except
    /// which of two names with the same normalized form is kept.
    pub fn add_canonical(&mut self, name: &str) -> &mut Self {
        let name = name.trim();
        if !name.is_empty() && !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
        self
    }

    /// Register aliases for a canonical name (the canonical is registered too)
    pub fn add_aliases(&mut self, canonical: &str, aliases: &[&str]) -> &mut Self {
        self.add_canonical(canonical);
        for alias in aliases {
            self.add_alias(alias, canonical);
        }
        self
    }

    /// Register one alias. Later registrations for the same key win.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) -> &mut Self {
        let key = normalize_name(alias);
        if key.is_empty() {
            return self;
        }
        self.add_canonical(canonical);
        if let Some(previous) = self.aliases.insert(key.clone(), canonical.trim().to_string()) {
            if previous != canonical.trim() {
                debug!(alias = %key, %previous, canonical = %canonical, "Alias re-pointed");
            }
        }
        self
    }

    /// Freeze the table.
    ///
    /// Fails when an alias points at a name whose own normalized form is an
    /// alias for a different club, since canonicalizing twice would then move
    /// the result again. Alias targets are rewritten to the kept spelling of
    /// their normalized form, so "Barrow-Raiders" and "Barrow Raiders" settle
    /// on whichever was declared first.
    pub fn build(mut self) -> Result<TeamNameCanonicalizer> {
        for (key, target) in &self.aliases {
            let normalized = normalize_name(target);
            if let Some(next) = self.aliases.get(&normalized) {
                if normalize_name(next) != normalized {
                    bail!(
                        "alias '{}' -> '{}' chains to '{}'; point it at the final name",
                        key,
                        target,
                        next
                    );
                }
            }
        }

        let mut canonical = Vec::with_capacity(self.names.len());
        let mut by_normalized = HashMap::with_capacity(self.names.len());
        for name in self.names {
            let normalized = normalize_name(&name);
            if normalized.is_empty() {
                continue;
            }
            // A canonical name shadowed by an alias to another club is not a
            // valid answer on its own.
            if let Some(target) = self.aliases.get(&normalized) {
                if *target != name {
                    debug!(%name, %target, "Canonical name shadowed by alias");
                    continue;
                }
            }
            if by_normalized.contains_key(&normalized) {
                continue;
            }
            by_normalized.insert(normalized.clone(), canonical.len());
            canonical.push((normalized, name));
        }

        for target in self.aliases.values_mut() {
            let Some(&idx) = by_normalized.get(&normalize_name(target)) else {
                continue;
            };
            let kept = &canonical[idx].1;
            if *kept != *target {
                debug!(%target, %kept, "Alias target respelled to canonical name");
                *target = kept.clone();
            }
        }

        Ok(TeamNameCanonicalizer {
            canonical,
            by_normalized,
            aliases: self.aliases,
        })
    }
}

/// Maps arbitrary team spellings to one canonical name. Immutable and cheap
/// to share.
#[derive(Debug, Clone)]
pub struct TeamNameCanonicalizer {
    /// (normalized, canonical) in declaration order
    canonical: Vec<(String, String)>,
    by_normalized: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl TeamNameCanonicalizer {
    /// Canonicalizer over the built-in club table
    pub fn with_defaults() -> Result<Self> {
        CanonicalizerBuilder::with_defaults().build()
    }

    /// Canonicalize a team name.
    ///
    /// Rules applied:
    /// 1. Normalize (lowercase, keep `[a-z0-9]`)
    /// 2. Explicit alias table
    /// 3. Exact match against normalized canonical names
    /// 4. Substring containment either way, only if exactly one club qualifies
    /// 5. Otherwise the input is returned unchanged
    pub fn canonicalize(&self, name: &str) -> String {
        self.lookup(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string())
    }

    /// Like [`canonicalize`](Self::canonicalize) but reports failure as `None`
    pub fn lookup(&self, name: &str) -> Option<&str> {
        let normalized = normalize_name(name);
        if normalized.is_empty() {
            return None;
        }

        if let Some(canonical) = self.aliases.get(&normalized) {
            return Some(canonical.as_str());
        }

        if let Some(&idx) = self.by_normalized.get(&normalized) {
            return Some(self.canonical[idx].1.as_str());
        }

        if normalized.len() < MIN_FUZZY_LEN {
            return None;
        }

        let mut candidates = self
            .canonical
            .iter()
            .filter(|(norm, _)| norm.contains(&normalized) || normalized.contains(norm.as_str()));
        let first = candidates.next()?;
        if let Some(second) = candidates.next() {
            debug!(
                input = %name,
                first = %first.1,
                second = %second.1,
                "Ambiguous team name; add an alias to disambiguate"
            );
            return None;
        }
        Some(first.1.as_str())
    }

    /// Canonical names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.canonical.iter().map(|(_, name)| name.as_str())
    }

    /// Normalized alias keys with their canonical targets
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of canonical names known
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Super League, Championship and NRL clubs with their common short forms.
/// Pairs that share a word ("Hull", "Knights", "Tigers", "Warriors",
/// "Dragons") only resolve through the aliases listed here.
fn add_default_teams(b: &mut CanonicalizerBuilder) {
    // Super League
    b.add_aliases("Bradford Bulls", &["bradford", "bulls"]);
    b.add_aliases("Castleford Tigers", &["castleford", "cas", "cas tigers"]);
    b.add_aliases("Catalans Dragons", &["catalans", "catalan dragons"]);
    b.add_aliases("Huddersfield Giants", &["huddersfield", "giants"]);
    b.add_aliases("Hull FC", &["hull fc", "hullfc", "black and whites"]);
    b.add_aliases(
        "Hull Kingston Rovers",
        &["hullkr", "hull kr", "hull k.r.", "hkr", "hull kingston"],
    );
    b.add_aliases("Leeds Rhinos", &["leeds", "rhinos"]);
    b.add_aliases("Leigh Leopards", &["leigh", "leopards", "leigh centurions"]);
    b.add_aliases("St Helens", &["saints", "saint helens", "st. helens"]);
    b.add_aliases("Toulouse Olympique", &["toulouse"]);
    b.add_aliases("Wakefield Trinity", &["wakefield", "trinity"]);
    b.add_aliases("Warrington Wolves", &["warrington", "wolves", "wire"]);
    b.add_aliases("Wigan Warriors", &["wigan"]);
    b.add_aliases("York Knights", &["york", "york city knights"]);

    // Championship
    b.add_aliases("Featherstone Rovers", &["featherstone", "fev"]);
    b.add_aliases("Halifax Panthers", &["halifax", "fax"]);
    b.add_aliases("Widnes Vikings", &["widnes"]);
    b.add_aliases("London Broncos", &["london"]);

    // NRL
    b.add_aliases("Brisbane Broncos", &["brisbane"]);
    b.add_aliases("Canberra Raiders", &["canberra", "raiders"]);
    b.add_aliases(
        "Canterbury-Bankstown Bulldogs",
        &["canterbury", "bulldogs", "canterbury bulldogs"],
    );
    b.add_aliases(
        "Cronulla-Sutherland Sharks",
        &["cronulla", "sharks", "cronulla sharks"],
    );
    b.add_aliases("Dolphins", &["redcliffe dolphins"]);
    b.add_aliases("Gold Coast Titans", &["gold coast", "titans"]);
    b.add_aliases(
        "Manly Warringah Sea Eagles",
        &["manly", "sea eagles", "manly sea eagles"],
    );
    b.add_aliases("Melbourne Storm", &["melbourne", "storm"]);
    b.add_aliases("Newcastle Knights", &["newcastle"]);
    b.add_aliases(
        "New Zealand Warriors",
        &["nz warriors", "nzw", "warriors nz"],
    );
    b.add_aliases(
        "North Queensland Cowboys",
        &["north queensland", "nq cowboys", "cowboys"],
    );
    b.add_aliases("Parramatta Eels", &["parramatta", "parra", "eels"]);
    b.add_aliases("Penrith Panthers", &["penrith"]);
    b.add_aliases(
        "South Sydney Rabbitohs",
        &["souths", "south sydney", "rabbitohs", "bunnies"],
    );
    b.add_aliases(
        "St George Illawarra Dragons",
        &["st george", "st george illawarra", "sgi", "saints nrl"],
    );
    b.add_aliases("Sydney Roosters", &["roosters", "easts"]);
    b.add_aliases("Wests Tigers", &["wests"]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon() -> TeamNameCanonicalizer {
        TeamNameCanonicalizer::with_defaults().unwrap()
    }

    #[test]
    fn test_normalize_name_basic() {
        assert_eq!(normalize_name("HULL KR"), "hullkr");
        assert_eq!(normalize_name("Canterbury-Bankstown Bulldogs"), "canterburybankstownbulldogs");
        assert_eq!(normalize_name("  "), "");
    }

    #[test]
    fn test_canonicalize_alias_short_forms() {
        let c = canon();
        assert_eq!(c.canonicalize("hullkr"), "Hull Kingston Rovers");
        assert_eq!(c.canonicalize("HULL KR"), "Hull Kingston Rovers");
        assert_eq!(c.canonicalize("Hull K.R."), "Hull Kingston Rovers");
        assert_eq!(c.canonicalize("Saints"), "St Helens");
    }

    #[test]
    fn test_canonicalize_exact_canonical_spelling() {
        let c = canon();
        assert_eq!(c.canonicalize("york knights"), "York Knights");
        assert_eq!(c.canonicalize("SYDNEY ROOSTERS"), "Sydney Roosters");
        assert_eq!(c.canonicalize("St. Helens"), "St Helens");
    }

    #[test]
    fn test_canonicalize_unique_substring_fallback() {
        let c = canon();
        // input contains the canonical form
        assert_eq!(c.canonicalize("Wigan Warriors RLFC"), "Wigan Warriors");
        // canonical form contains the input
        assert_eq!(c.canonicalize("Illawarra"), "St George Illawarra Dragons");
    }

    #[test]
    fn test_canonicalize_ambiguous_substring_is_unchanged() {
        let c = canon();
        // Hull FC and Hull Kingston Rovers
        assert_eq!(c.canonicalize("Hull"), "Hull");
        // York Knights and Newcastle Knights
        assert_eq!(c.canonicalize("Knights"), "Knights");
        // Castleford Tigers and Wests Tigers
        assert_eq!(c.canonicalize("Tigers"), "Tigers");
    }

    #[test]
    fn test_canonicalize_unknown_is_unchanged() {
        let c = canon();
        assert_eq!(c.canonicalize("Barrow Raiders FC"), "Barrow Raiders FC");
        assert_eq!(c.canonicalize(""), "");
        assert_eq!(c.canonicalize("fc"), "fc");
    }

    #[test]
    fn test_canonicalize_idempotent() {
        let c = canon();
        for input in [
            "hullkr", "HULL KR", "Hull", "york", "Wests", "Illawarra", "Wigan Warriors RLFC",
            "nobody", "", "St. Helens", "Dolphins", "Redcliffe", "tigers", "Canterbury-Bankstown",
        ] {
            let once = c.canonicalize(input);
            assert_eq!(c.canonicalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_alias_wins_over_canonical_match() {
        let mut b = CanonicalizerBuilder::new();
        b.add_canonical("Rovers");
        b.add_aliases("Featherstone Rovers", &["rovers"]);
        let c = b.build().unwrap();
        assert_eq!(c.canonicalize("Rovers"), "Featherstone Rovers");
        assert_eq!(c.canonicalize("Featherstone Rovers"), "Featherstone Rovers");
    }

    #[test]
    fn test_alias_target_respelled_to_kept_canonical() {
        let mut b = CanonicalizerBuilder::new();
        b.add_canonical("Barrow Raiders");
        b.add_alias("brw", "Barrow-Raiders");
        let c = b.build().unwrap();

        let once = c.canonicalize("brw");
        assert_eq!(once, "Barrow Raiders");
        assert_eq!(c.canonicalize(&once), once);
        assert_eq!(c.canonicalize("BARROW-RAIDERS"), "Barrow Raiders");
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["Barrow Raiders"]);
    }

    #[test]
    fn test_idempotent_over_every_alias_and_name() {
        let mut b = CanonicalizerBuilder::with_defaults();
        b.add_canonical("Sheffield Eagles");
        b.add_alias("sheff", "sheffield-eagles");
        b.add_alias("eagles", "SHEFFIELD EAGLES");
        b.add_alias("saints", "St. Helens");
        let c = b.build().unwrap();

        let keys: Vec<String> = c.aliases().map(|(k, _)| k.to_string()).collect();
        let names: Vec<String> = c.names().map(str::to_string).collect();
        for input in keys.iter().chain(names.iter()) {
            let once = c.canonicalize(input);
            assert_eq!(c.canonicalize(&once), once, "not idempotent for {:?}", input);
        }
        assert_eq!(c.canonicalize("eagles"), "Sheffield Eagles");
        assert_eq!(c.canonicalize("saints"), "St Helens");
    }

    #[test]
    fn test_build_rejects_alias_chain() {
        let mut b = CanonicalizerBuilder::new();
        b.add_alias("hkr", "Hull KR");
        b.add_alias("hull kr", "Hull Kingston Rovers");
        assert!(b.build().is_err());
    }

    #[test]
    fn test_fuzzy_name_match() {
        assert!(fuzzy_name_match("Wests Tigers", "wests-tigers"));
        assert!(fuzzy_name_match("Wests Tigers", "Wests Tigers RLFC"));
        assert!(fuzzy_name_match("Roosters", "Sydney Roosters"));
        assert!(!fuzzy_name_match("Sydney Roosters", "Wests Tigers"));
        assert!(!fuzzy_name_match("", "Wests Tigers"));
        assert!(!fuzzy_name_match("--", "Wests Tigers"));
    }
}
