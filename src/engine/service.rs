//! Prediction service.
//!
//! Boundary orchestration around the pure model: resolves both team names
//! through a [`HistoryProvider`], fetches their recent matches concurrently,
//! builds a fresh [`HistoryStore`] snapshot, runs the [`Predictor`] and,
//! when odds are supplied, the [`ValueBetEvaluator`].
//!
//! Provider failures never reach the caller as transport errors: they are
//! logged and reported as insufficient data.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::data::{HistoryProvider, TeamRef};
use crate::model::history::HistoryStore;
use crate::model::Predictor;
use crate::strategy::{ValueBetEvaluator, ValueReport};
use crate::types::{Match, PredictError, PredictionResult};

/// Prediction plus the optional odds comparison.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionReport {
    pub prediction: PredictionResult,
    /// `None` when no odds (or invalid odds) were supplied.
    pub value: Option<ValueReport>,
    pub home_matches: usize,
    pub away_matches: usize,
}

pub struct PredictionService {
    provider: Arc<dyn HistoryProvider>,
    predictor: Predictor,
    evaluator: ValueBetEvaluator,
}

impl PredictionService {
    pub fn new(
        provider: Arc<dyn HistoryProvider>,
        predictor: Predictor,
        evaluator: ValueBetEvaluator,
    ) -> Self {
        Self {
            provider,
            predictor,
            evaluator,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Predict `home` hosting `away`, optionally comparing against decimal
    /// odds `(home, draw, away)`.
    pub async fn predict(
        &self,
        home: &str,
        away: &str,
        odds: Option<[f64; 3]>,
    ) -> Result<PredictionReport, PredictError> {
        let (home_ref, away_ref) = futures::join!(self.resolve(home), self.resolve(away));
        let (home_ref, away_ref) = (home_ref?, away_ref?);

        let window = self.predictor.config().history_window;
        let (home_history, away_history) = futures::join!(
            self.history(&home_ref, window),
            self.history(&away_ref, window)
        );
        let (home_history, away_history) = (home_history?, away_history?);
        let (home_matches, away_matches) = (home_history.len(), away_history.len());

        let store = HistoryStore::new(home_history.into_iter().chain(away_history))
            .register_team(&home_ref.name)
            .register_team(&away_ref.name);

        let prediction = self.predictor.predict(&store, &home_ref.name, &away_ref.name)?;
        let value = self.evaluator.evaluate_raw(&prediction, odds);

        info!(
            provider = self.provider.name(),
            home = %prediction.home,
            away = %prediction.away,
            home_matches,
            away_matches,
            value_bets = value.as_ref().map(|v| v.value_bets.len()).unwrap_or(0),
            "Prediction served"
        );

        Ok(PredictionReport {
            prediction,
            value,
            home_matches,
            away_matches,
        })
    }

    async fn resolve(&self, name: &str) -> Result<TeamRef, PredictError> {
        let name = name.trim();
        match self.provider.search_team(name).await {
            Ok(Some(team)) => Ok(team),
            Ok(None) => Err(PredictError::UnknownTeam(name.to_string())),
            Err(e) => Err(self.unavailable(name, e)),
        }
    }

    async fn history(&self, team: &TeamRef, count: usize) -> Result<Vec<Match>, PredictError> {
        match self.provider.recent_matches(team, count).await {
            Ok(matches) if matches.is_empty() => {
                Err(PredictError::InsufficientData(team.name.clone()))
            }
            Ok(matches) => Ok(matches),
            Err(e) => Err(self.unavailable(&team.name, e)),
        }
    }

    /// Log the transport failure and degrade it to insufficient data.
    fn unavailable(&self, team: &str, err: anyhow::Error) -> PredictError {
        let cause = PredictError::ProviderUnavailable {
            provider: self.provider.name().to_string(),
            message: format!("{err:#}"),
        };
        warn!(team, error = %cause, "History provider failed");
        PredictError::InsufficientData(team.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
