//! Poisson goal model: history, team strengths, goal rates and the score grid.
//!
//! [`Predictor`] wires the stages together:
//! `HistoryStore → StrengthEstimator → GoalRateModel → ScoreGrid`.
//! Every stage is a pure function of its inputs, so the same snapshot and
//! team pair always produce the same [`PredictionResult`].

pub mod distribution;
pub mod history;
pub mod rates;
pub mod strength;

use serde::Deserialize;
use tracing::{debug, info};

use crate::types::{PredictError, PredictionResult};
use distribution::{ScoreGrid, TruncationPolicy};
use history::HistoryStore;
use rates::{GoalRateModel, StrengthFormula, DEFAULT_MIN_RATE};
use strength::{StrengthEstimator, DEFAULT_HOME_ADVANTAGE};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Model parameters (defaults, overridden by `[model]` in config.toml).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub formula: StrengthFormula,
    /// Highest goal count tabulated per side.
    pub max_goals: u32,
    pub over_under_line: f64,
    /// Number of exact scores reported.
    pub top_k: usize,
    /// Floor applied to both λ values.
    pub min_rate: f64,
    pub home_advantage_fallback: f64,
    /// Most recent matches kept per team.
    pub history_window: usize,
    pub truncation: TruncationPolicy,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            formula: StrengthFormula::LeagueNormalized,
            max_goals: 6,
            over_under_line: 2.5,
            top_k: 6,
            min_rate: DEFAULT_MIN_RATE,
            home_advantage_fallback: DEFAULT_HOME_ADVANTAGE,
            history_window: 5,
            truncation: TruncationPolicy::Renormalize,
        }
    }
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// The synchronous prediction pipeline.
#[derive(Debug, Clone, Default)]
pub struct Predictor {
    config: ModelConfig,
}

impl Predictor {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Predict `home` hosting `away` from the matches in `store`.
    ///
    /// Team names are resolved case-insensitively against the store.
    pub fn predict(
        &self,
        store: &HistoryStore,
        home: &str,
        away: &str,
    ) -> Result<PredictionResult, PredictError> {
        let home_id = store
            .resolve(home)
            .ok_or_else(|| PredictError::UnknownTeam(home.trim().to_string()))?;
        let away_id = store
            .resolve(away)
            .ok_or_else(|| PredictError::UnknownTeam(away.trim().to_string()))?;

        let estimator =
            StrengthEstimator::with_home_advantage_fallback(store, self.config.home_advantage_fallback);
        let home_stats = estimator.team_stats(&home_id)?;
        let away_stats = estimator.team_stats(&away_id)?;
        let baseline = estimator.baseline();

        let model = GoalRateModel::new(self.config.formula, self.config.min_rate);
        let rates = model.rates(&home_stats, &away_stats, &baseline);

        let grid = ScoreGrid::build(&rates, self.config.max_goals, self.config.truncation);
        debug!(
            max_goals = grid.max_goals(),
            coverage = grid.coverage(),
            "Score grid built"
        );

        let line = self.config.over_under_line;
        let result = PredictionResult {
            home: home_id,
            away: away_id,
            lambda_home: rates.lambda_home,
            lambda_away: rates.lambda_away,
            prob_home_win: grid.prob_home_win(),
            prob_draw: grid.prob_draw(),
            prob_away_win: grid.prob_away_win(),
            over_under_line: line,
            prob_over: grid.prob_over(line),
            prob_under: grid.prob_under(line),
            prob_btts: grid.prob_btts(),
            top_scores: grid.top_scores(self.config.top_k),
            confidence: grid.confidence(),
            coverage: grid.coverage(),
            renormalized: self.config.truncation == TruncationPolicy::Renormalize,
        };

        info!(
            home = %result.home,
            away = %result.away,
            lambda_home = format!("{:.3}", result.lambda_home),
            lambda_away = format!("{:.3}", result.lambda_away),
            p_home = format!("{:.3}", result.prob_home_win),
            p_draw = format!("{:.3}", result.prob_draw),
            p_away = format!("{:.3}", result.prob_away_win),
            "Prediction computed"
        );

        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
