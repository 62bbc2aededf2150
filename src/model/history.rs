//! In-memory match history.
//!
//! Holds a finite set of completed matches and answers per-team queries.
//! A store is a snapshot: it is built once and never mutated afterwards,
//! so anything derived from it can be recomputed from scratch.

use std::collections::{BTreeSet, HashMap};

use crate::types::{Match, TeamId, TeamMatch};

/// An immutable snapshot of completed matches.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    /// Oldest first. Later entries are more recent.
    matches: Vec<Match>,
    /// Every known team, including registered teams with no matches.
    teams: BTreeSet<TeamId>,
    /// Lookup key → canonical id.
    index: HashMap<String, TeamId>,
}

impl HistoryStore {
    /// Build a store from matches in retrieval order.
    ///
    /// Matches that carry a kick-off time are ordered by it; duplicates of
    /// the same fixture (same teams and kick-off) are dropped.
    pub fn new(matches: impl IntoIterator<Item = Match>) -> Self {
        let mut ordered: Vec<Match> = Vec::new();
        for m in matches {
            let duplicate = m.kickoff.is_some()
                && ordered.iter().any(|o| {
                    o.kickoff == m.kickoff && o.home_team == m.home_team && o.away_team == m.away_team
                });
            if !duplicate {
                ordered.push(m);
            }
        }
        // Stable: undated matches keep insertion order ahead of dated ones.
        ordered.sort_by_key(|m| m.kickoff);

        let mut store = Self {
            matches: Vec::with_capacity(ordered.len()),
            ..Self::default()
        };
        for m in ordered {
            store.register(m.home_team.clone());
            store.register(m.away_team.clone());
            store.matches.push(m);
        }
        store
    }

    /// Build a store keeping only matches that fall within the most recent
    /// `window` matches of at least one of the two participants.
    pub fn with_window(matches: impl IntoIterator<Item = Match>, window: usize) -> Self {
        let full = Self::new(matches);
        let mut seen: HashMap<&TeamId, usize> = HashMap::new();
        let mut keep = vec![false; full.matches.len()];

        for (idx, m) in full.matches.iter().enumerate().rev() {
            let home_n = seen.entry(&m.home_team).or_insert(0);
            let home_in = *home_n < window;
            *home_n += 1;
            let away_n = seen.entry(&m.away_team).or_insert(0);
            let away_in = *away_n < window;
            *away_n += 1;
            keep[idx] = home_in || away_in;
        }

        let mut windowed = Self::new(
            full.matches
                .iter()
                .zip(keep)
                .filter(|(_, k)| *k)
                .map(|(m, _)| m.clone()),
        );
        // Teams whose every match fell out of the window stay known.
        for team in &full.teams {
            windowed.register(team.clone());
        }
        windowed
    }

    /// Make a team known even if it has no recorded matches.
    pub fn register_team(mut self, name: &str) -> Self {
        self.register(TeamId::new(name.trim()));
        self
    }

    fn register(&mut self, team: TeamId) {
        self.index
            .entry(TeamId::lookup_key(team.as_str()))
            .or_insert_with(|| team.clone());
        self.teams.insert(team);
    }

    /// Resolve a user-supplied name to a known team (trimmed, case-insensitive).
    pub fn resolve(&self, name: &str) -> Option<TeamId> {
        let exact = TeamId::new(name.trim());
        if self.teams.contains(&exact) {
            return Some(exact);
        }
        self.index.get(&TeamId::lookup_key(name)).cloned()
    }

    pub fn contains(&self, team: &TeamId) -> bool {
        self.teams.contains(team)
    }

    /// The last `n` matches played by `team`, most recent first.
    /// Unknown teams yield an empty list.
    pub fn recent_matches(&self, team: &TeamId, n: usize) -> Vec<TeamMatch> {
        self.matches
            .iter()
            .rev()
            .filter_map(|m| m.for_team(team))
            .take(n)
            .collect()
    }

    /// Every match `team` played, in store order.
    pub fn matches_for<'a>(
        &'a self,
        team: &'a TeamId,
    ) -> impl DoubleEndedIterator<Item = &'a Match> + 'a {
        self.matches.iter().filter(move |m| m.involves(team))
    }

    /// All known teams, sorted by name.
    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.teams.iter()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
