//! Team strength estimation.
//!
//! Turns a [`HistoryStore`] snapshot into per-team scoring averages and the
//! league baseline. The table is owned by the estimator instance and is
//! rebuilt from scratch for every snapshot; there is no incremental update.

use std::collections::BTreeMap;

use tracing::debug;

use super::history::HistoryStore;
use crate::types::{LeagueBaseline, PredictError, TeamId, TeamStats};

/// Home advantage used when the corpus has no away goals to divide by.
pub const DEFAULT_HOME_ADVANTAGE: f64 = 1.1;

pub struct StrengthEstimator {
    stats: BTreeMap<TeamId, TeamStats>,
    baseline: LeagueBaseline,
}

impl StrengthEstimator {
    pub fn new(store: &HistoryStore) -> Self {
        Self::with_home_advantage_fallback(store, DEFAULT_HOME_ADVANTAGE)
    }

    pub fn with_home_advantage_fallback(store: &HistoryStore, fallback: f64) -> Self {
        let matches = store.matches();
        let n = matches.len() as f64;

        let (home_total, away_total) = matches.iter().fold((0u64, 0u64), |(h, a), m| {
            (h + u64::from(m.home_goals), a + u64::from(m.away_goals))
        });
        let (avg_home_goals, avg_away_goals) = if matches.is_empty() {
            (0.0, 0.0)
        } else {
            (home_total as f64 / n, away_total as f64 / n)
        };
        let home_advantage_ratio = if avg_away_goals > 0.0 {
            avg_home_goals / avg_away_goals
        } else {
            fallback
        };

        let mut stats = BTreeMap::new();
        for team in store.teams() {
            let (mut scored, mut conceded, mut played) = (0u32, 0u32, 0u32);
            for m in store.matches_for(team) {
                if let Some(tm) = m.for_team(team) {
                    scored += tm.goals_for;
                    conceded += tm.goals_against;
                    played += 1;
                }
            }
            stats.insert(team.clone(), TeamStats::from_totals(scored, conceded, played));
        }

        debug!(
            teams = stats.len(),
            matches = matches.len(),
            avg_home_goals,
            avg_away_goals,
            home_advantage_ratio,
            "Team strength table built"
        );

        Self {
            stats,
            baseline: LeagueBaseline {
                avg_home_goals,
                avg_away_goals,
                home_advantage_ratio,
            },
        }
    }

    pub fn baseline(&self) -> LeagueBaseline {
        self.baseline
    }

    pub fn overall_home_goals(&self) -> f64 {
        self.baseline.avg_home_goals
    }

    pub fn overall_away_goals(&self) -> f64 {
        self.baseline.avg_away_goals
    }

    pub fn home_advantage_ratio(&self) -> f64 {
        self.baseline.home_advantage_ratio
    }

    /// Stats for `team`.
    ///
    /// A team missing from the corpus is `UnknownTeam`; a known team with no
    /// matches is `InsufficientData`.
    pub fn team_stats(&self, team: &TeamId) -> Result<TeamStats, PredictError> {
        let stats = self
            .stats
            .get(team)
            .ok_or_else(|| PredictError::UnknownTeam(team.to_string()))?;
        if stats.matches_played == 0 {
            return Err(PredictError::InsufficientData(team.to_string()));
        }
        Ok(*stats)
    }

    pub fn avg_scored_per_match(&self, team: &TeamId) -> Result<f64, PredictError> {
        self.team_stats(team).map(|s| s.avg_scored)
    }

    pub fn avg_conceded_per_match(&self, team: &TeamId) -> Result<f64, PredictError> {
        self.team_stats(team).map(|s| s.avg_conceded)
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
