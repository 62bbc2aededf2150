//! Expected-goal rates for a fixture.
//!
//! Maher-style relative-strength model: each side's attack and
//! defense are normalized against the league scoring context before the
//! home advantage is applied.

use serde::Deserialize;
use tracing::debug;

use crate::types::{FixtureRates, LeagueBaseline, TeamStats};

/// Lower bound on λ so sparse histories never predict a certain 0 goals.
pub const DEFAULT_MIN_RATE: f64 = 0.2;

/// Strength formula variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthFormula {
    /// Attack/defense divided by the league average goals per side.
    #[default]
    LeagueNormalized,
    /// Legacy variant: scored × opponent conceded / venue average.
    RatioOfAverages,
}

#[derive(Debug, Clone, Copy)]
pub struct GoalRateModel {
    formula: StrengthFormula,
    min_rate: f64,
}

impl Default for GoalRateModel {
    fn default() -> Self {
        Self::new(StrengthFormula::default(), DEFAULT_MIN_RATE)
    }
}

impl GoalRateModel {
    pub fn new(formula: StrengthFormula, min_rate: f64) -> Self {
        Self { formula, min_rate }
    }

    pub fn formula(&self) -> StrengthFormula {
        self.formula
    }

    /// Compute λ_home and λ_away for `home` hosting `away`.
    pub fn rates(&self, home: &TeamStats, away: &TeamStats, league: &LeagueBaseline) -> FixtureRates {
        let (lambda_home, lambda_away) = match self.formula {
            StrengthFormula::LeagueNormalized => league_normalized(home, away, league),
            StrengthFormula::RatioOfAverages => ratio_of_averages(home, away, league),
        };

        let rates = FixtureRates {
            lambda_home: self.floor(lambda_home),
            lambda_away: self.floor(lambda_away),
        };

        debug!(
            formula = ?self.formula,
            raw_home = lambda_home,
            raw_away = lambda_away,
            lambda_home = rates.lambda_home,
            lambda_away = rates.lambda_away,
            "Fixture rates computed"
        );

        rates
    }

    fn floor(&self, rate: f64) -> f64 {
        if rate.is_finite() {
            rate.max(self.min_rate)
        } else {
            self.min_rate
        }
    }
}

fn positive_or_one(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        1.0
    }
}

fn league_normalized(home: &TeamStats, away: &TeamStats, league: &LeagueBaseline) -> (f64, f64) {
    let league_avg = positive_or_one((league.avg_home_goals + league.avg_away_goals) / 2.0);

    let home_attack = home.avg_scored / league_avg;
    let away_attack = away.avg_scored / league_avg;
    let home_defense = home.avg_conceded / league_avg;
    let away_defense = away.avg_conceded / league_avg;

    let lambda_home = league.avg_home_goals
        * home_attack
        * (1.0 / positive_or_one(away_defense))
        * league.home_advantage_ratio;
    let lambda_away = league.avg_away_goals * away_attack * (1.0 / positive_or_one(home_defense));

    (lambda_home, lambda_away)
}

fn ratio_of_averages(home: &TeamStats, away: &TeamStats, league: &LeagueBaseline) -> (f64, f64) {
    let lambda_home = home.avg_scored * away.avg_conceded / positive_or_one(league.avg_home_goals);
    let lambda_away = away.avg_scored * home.avg_conceded / positive_or_one(league.avg_away_goals);
    (lambda_home, lambda_away)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
