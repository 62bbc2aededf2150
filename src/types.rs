//! Shared types for the scoreline predictor.
//!
//! These types form the data model used across the model, strategy,
//! engine and bot modules. They are plain value objects: nothing here
//! holds shared mutable state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Teams and matches
// ---------------------------------------------------------------------------

/// Team identifier. Wraps the team's display name as recorded in history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(String);

impl TeamId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for case-insensitive lookups of user-typed names.
    pub fn lookup_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A completed match. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub home_team: TeamId,
    pub away_team: TeamId,
    pub home_goals: u32,
    pub away_goals: u32,
    /// Kick-off time, when the source provides one. Used for recency ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kickoff: Option<DateTime<Utc>>,
}

impl Match {
    pub fn new(home: &str, away: &str, home_goals: u32, away_goals: u32) -> Self {
        Self {
            home_team: TeamId::new(home),
            away_team: TeamId::new(away),
            home_goals,
            away_goals,
            kickoff: None,
        }
    }

    pub fn with_kickoff(mut self, kickoff: DateTime<Utc>) -> Self {
        self.kickoff = Some(kickoff);
        self
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home_team == team || &self.away_team == team
    }

    /// This match seen from `team`'s side, or `None` if it didn't play.
    pub fn for_team(&self, team: &TeamId) -> Option<TeamMatch> {
        if &self.home_team == team {
            Some(TeamMatch {
                opponent: self.away_team.clone(),
                venue: Venue::Home,
                goals_for: self.home_goals,
                goals_against: self.away_goals,
            })
        } else if &self.away_team == team {
            Some(TeamMatch {
                opponent: self.home_team.clone(),
                venue: Venue::Away,
                goals_for: self.away_goals,
                goals_against: self.home_goals,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} {}",
            self.home_team, self.home_goals, self.away_goals, self.away_team
        )
    }
}

/// Where a team played a given match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Away,
}

/// One match from a single team's perspective.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMatch {
    pub opponent: TeamId,
    pub venue: Venue,
    pub goals_for: u32,
    pub goals_against: u32,
}

// ---------------------------------------------------------------------------
// Derived statistics
// ---------------------------------------------------------------------------

/// Per-team scoring averages, always rebuilt from the current match set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub avg_scored: f64,
    pub avg_conceded: f64,
    pub matches_played: u32,
}

impl TeamStats {
    /// Stats for a team with no qualifying matches.
    pub fn neutral() -> Self {
        Self {
            avg_scored: 0.0,
            avg_conceded: 0.0,
            matches_played: 0,
        }
    }

    pub fn from_totals(scored: u32, conceded: u32, played: u32) -> Self {
        if played == 0 {
            return Self::neutral();
        }
        Self {
            avg_scored: f64::from(scored) / f64::from(played),
            avg_conceded: f64::from(conceded) / f64::from(played),
            matches_played: played,
        }
    }
}

/// League-wide scoring context for one prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeagueBaseline {
    pub avg_home_goals: f64,
    pub avg_away_goals: f64,
    pub home_advantage_ratio: f64,
}

/// Expected goals for one specific (home, away) pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixtureRates {
    pub lambda_home: f64,
    pub lambda_away: f64,
}

// ---------------------------------------------------------------------------
// Prediction output
// ---------------------------------------------------------------------------

/// An exact final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// A scoreline with its model probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreProbability {
    pub score: Scoreline,
    pub probability: f64,
}

/// Full-time result (1X2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Home => write!(f, "home"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Away => write!(f, "away"),
        }
    }
}

/// Everything the model says about one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub home: TeamId,
    pub away: TeamId,
    pub lambda_home: f64,
    pub lambda_away: f64,
    pub prob_home_win: f64,
    pub prob_draw: f64,
    pub prob_away_win: f64,
    /// Total-goals line used for the over/under market (e.g. 2.5).
    pub over_under_line: f64,
    pub prob_over: f64,
    pub prob_under: f64,
    pub prob_btts: f64,
    pub top_scores: Vec<ScoreProbability>,
    /// Strongest 1X2 probability on a 0 to 10 scale.
    pub confidence: f64,
    /// Raw Poisson mass captured by the bounded score grid.
    pub coverage: f64,
    /// Whether the probabilities above were rescaled by `coverage`.
    pub renormalized: bool,
}

impl PredictionResult {
    pub fn probability(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.prob_home_win,
            Outcome::Draw => self.prob_draw,
            Outcome::Away => self.prob_away_win,
        }
    }

    /// The most likely 1X2 outcome. Ties resolve home, then draw, then away.
    pub fn favourite(&self) -> Outcome {
        Outcome::ALL
            .into_iter()
            .fold(Outcome::Home, |best, o| {
                if self.probability(o) > self.probability(best) {
                    o
                } else {
                    best
                }
            })
    }
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vs {} (λ {:.2}/{:.2} | 1 {:.1}% X {:.1}% 2 {:.1}%)",
            self.home,
            self.away,
            self.lambda_home,
            self.lambda_away,
            self.prob_home_win * 100.0,
            self.prob_draw * 100.0,
            self.prob_away_win * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain errors returned by the prediction pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("Team not found: {0}")]
    UnknownTeam(String),

    #[error("Insufficient data for team: {0}")]
    InsufficientData(String),

    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("History provider unavailable ({provider}): {message}")]
    ProviderUnavailable { provider: String, message: String },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
