//! Value-bet detection.
//!
//! Compares model 1X2 probabilities to bookmaker decimal odds and flags
//! outcomes whose expected value `p − 1/odds` is positive.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::kelly::{KellyCalculator, KellyConfig};
use crate::types::{Outcome, PredictError, PredictionResult};

// ---------------------------------------------------------------------------
// Configuration (defaults, overridden by `[value]` in config.toml)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    /// EV an outcome must exceed to be flagged.
    pub min_edge: f64,
    pub kelly_multiplier: f64,
    pub max_stake_pct: f64,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            min_edge: 0.0,
            kelly_multiplier: 0.25,
            max_stake_pct: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Odds
// ---------------------------------------------------------------------------

/// Validated decimal odds for the three full-time outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Odds {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl Odds {
    /// Every price must be finite and strictly greater than 1.0.
    pub fn new(home: f64, draw: f64, away: f64) -> Result<Self, PredictError> {
        for (label, price) in [("home", home), ("draw", draw), ("away", away)] {
            if !price.is_finite() || price <= 1.0 {
                return Err(PredictError::InvalidOdds(format!(
                    "{label} odds must be a decimal price above 1.0, got {price}"
                )));
            }
        }
        Ok(Self { home, draw, away })
    }

    pub fn price(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }

    /// Sum of implied probabilities; above 1 by the bookmaker's margin.
    pub fn overround(&self) -> f64 {
        1.0 / self.home + 1.0 / self.draw + 1.0 / self.away
    }
}

impl TryFrom<[f64; 3]> for Odds {
    type Error = PredictError;

    fn try_from(v: [f64; 3]) -> Result<Self, Self::Error> {
        Self::new(v[0], v[1], v[2])
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Model vs. market for one outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeEv {
    pub outcome: Outcome,
    pub probability: f64,
    pub odds: f64,
    pub implied: f64,
    pub ev: f64,
}

/// A positive-EV selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueBet {
    pub outcome: Outcome,
    pub probability: f64,
    pub odds: f64,
    pub ev: f64,
    pub kelly_fraction: f64,
    /// Suggested bankroll share after multiplier and cap.
    pub stake_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueReport {
    pub odds: Odds,
    /// Always home, draw and away, in that order.
    pub evaluations: Vec<OutcomeEv>,
    /// Sorted by EV descending. Empty means no value bet.
    pub value_bets: Vec<ValueBet>,
}

impl ValueReport {
    pub fn has_value(&self) -> bool {
        !self.value_bets.is_empty()
    }

    pub fn ev(&self, outcome: Outcome) -> f64 {
        self.evaluations
            .iter()
            .find(|e| e.outcome == outcome)
            .map(|e| e.ev)
            .unwrap_or(0.0)
    }
}

pub struct ValueBetEvaluator {
    config: ValueConfig,
    kelly: KellyCalculator,
}

impl Default for ValueBetEvaluator {
    fn default() -> Self {
        Self::new(ValueConfig::default())
    }
}

impl ValueBetEvaluator {
    pub fn new(config: ValueConfig) -> Self {
        let kelly = KellyCalculator::new(KellyConfig {
            multiplier: config.kelly_multiplier,
            max_stake_pct: config.max_stake_pct,
        });
        Self { config, kelly }
    }

    pub fn config(&self) -> &ValueConfig {
        &self.config
    }

    /// Evaluate validated odds against a prediction.
    pub fn evaluate(&self, prediction: &PredictionResult, odds: &Odds) -> ValueReport {
        let evaluations: Vec<OutcomeEv> = Outcome::ALL
            .into_iter()
            .map(|outcome| {
                let probability = prediction.probability(outcome);
                let price = odds.price(outcome);
                let implied = 1.0 / price;
                OutcomeEv {
                    outcome,
                    probability,
                    odds: price,
                    implied,
                    ev: probability - implied,
                }
            })
            .collect();

        let mut value_bets: Vec<ValueBet> = evaluations
            .iter()
            .filter(|e| e.ev > self.config.min_edge)
            .map(|e| {
                let stake = self.kelly.stake(e.probability, e.odds);
                ValueBet {
                    outcome: e.outcome,
                    probability: e.probability,
                    odds: e.odds,
                    ev: e.ev,
                    kelly_fraction: stake.map(|s| s.kelly_fraction).unwrap_or(0.0),
                    stake_fraction: stake.map(|s| s.stake_fraction).unwrap_or(0.0),
                }
            })
            .collect();
        value_bets.sort_by(|a, b| b.ev.partial_cmp(&a.ev).unwrap_or(std::cmp::Ordering::Equal));

        for bet in &value_bets {
            debug!(
                home = %prediction.home,
                away = %prediction.away,
                outcome = %bet.outcome,
                ev = format!("{:.3}", bet.ev),
                odds = bet.odds,
                stake = format!("{:.2}%", bet.stake_fraction * 100.0),
                "Value bet detected"
            );
        }

        ValueReport {
            odds: *odds,
            evaluations,
            value_bets,
        }
    }

    /// Evaluate unvalidated odds. Missing or invalid odds skip the
    /// comparison and return `None`.
    pub fn evaluate_raw(
        &self,
        prediction: &PredictionResult,
        odds: Option<[f64; 3]>,
    ) -> Option<ValueReport> {
        let raw = odds?;
        match Odds::try_from(raw) {
            Ok(odds) => Some(self.evaluate(prediction, &odds)),
            Err(e) => {
                warn!(error = %e, "Skipping value-bet comparison");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
