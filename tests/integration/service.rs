//! Prediction service against real provider implementations.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use scoreline::bot::handle_text;
use scoreline::data::static_history::StaticHistoryProvider;
use scoreline::data::{HistoryProvider, TeamRef};
use scoreline::engine::PredictionService;
use scoreline::model::Predictor;
use scoreline::strategy::ValueBetEvaluator;
use scoreline::types::{Match, PredictError};

/// Knows every team but fails every fixture request.
struct FlakyProvider;

#[async_trait]
impl HistoryProvider for FlakyProvider {
    async fn search_team(&self, name: &str) -> Result<Option<TeamRef>> {
        Ok(Some(TeamRef {
            id: name.to_lowercase(),
            name: name.to_string(),
        }))
    }

    async fn recent_matches(&self, _team: &TeamRef, _count: usize) -> Result<Vec<Match>> {
        anyhow::bail!("upstream timed out")
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

fn service(provider: impl HistoryProvider + 'static) -> PredictionService {
    PredictionService::new(
        Arc::new(provider),
        Predictor::default(),
        ValueBetEvaluator::default(),
    )
}

fn dataset_service() -> PredictionService {
    let provider = StaticHistoryProvider::from_file("data/matches.json").unwrap();
    service(provider)
}

#[tokio::test]
async fn test_bundled_dataset_prediction() {
    let report = dataset_service().predict("Paris SG", "Marseille", None).await.unwrap();
    let p = &report.prediction;

    assert_eq!(p.home.as_str(), "Paris SG");
    assert_eq!(p.away.as_str(), "Marseille");
    assert!(report.home_matches <= 5 && report.home_matches > 0);
    assert!(report.away_matches <= 5 && report.away_matches > 0);
    assert!((p.prob_home_win + p.prob_draw + p.prob_away_win - 1.0).abs() < 1e-9);
    assert!(p.lambda_home >= 0.2 && p.lambda_away >= 0.2);
    assert_eq!(p.top_scores.len(), 6);
}

#[tokio::test]
async fn test_bundled_dataset_is_deterministic() {
    let svc = dataset_service();
    let first = svc.predict("lyon", "nice", Some([2.5, 3.1, 2.9])).await.unwrap();
    let second = svc.predict("Lyon", "Nice", Some([2.5, 3.1, 2.9])).await.unwrap();
    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.value, second.value);
}

#[tokio::test]
async fn test_unknown_team_from_dataset() {
    let err = dataset_service().predict("Lyon", "Atlantis FC", None).await.unwrap_err();
    assert_eq!(err, PredictError::UnknownTeam("Atlantis FC".into()));
}

#[tokio::test]
async fn test_provider_failure_reported_as_insufficient_data() {
    let svc = service(FlakyProvider);
    let err = svc.predict("Lyon", "Nice", None).await.unwrap_err();
    assert!(matches!(err, PredictError::InsufficientData(_)));

    let reply = handle_text(&svc, "/predict Lyon-Nice").await.unwrap();
    assert!(reply.starts_with("❌ Insufficient data"));
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let svc = Arc::new(dataset_service());
    let fixtures = [
        ("Paris SG", "Lyon"),
        ("Monaco", "Lille"),
        ("Nice", "Lens"),
        ("Rennes", "Marseille"),
    ];

    let handles: Vec<_> = fixtures
        .iter()
        .map(|&(h, a)| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move { svc.predict(h, a, None).await })
        })
        .collect();

    for (handle, (h, a)) in handles.into_iter().zip(fixtures) {
        let concurrent = handle.await.unwrap().unwrap();
        let sequential = svc.predict(h, a, None).await.unwrap();
        assert_eq!(concurrent.prediction, sequential.prediction);
    }
}
