//! End-to-end checks of the synchronous prediction pipeline.
//!
//! Golden values for the four-match reference league are pinned here;
//! they were computed independently from the closed-form Poisson sums.

use scoreline::model::distribution::{ScoreGrid, TruncationPolicy};
use scoreline::model::history::HistoryStore;
use scoreline::model::rates::{GoalRateModel, StrengthFormula};
use scoreline::model::strength::StrengthEstimator;
use scoreline::model::{ModelConfig, Predictor};
use scoreline::strategy::{Odds, ValueBetEvaluator};
use scoreline::types::{Match, Outcome, PredictError, TeamId};

const EPS: f64 = 1e-6;

fn reference_league() -> HistoryStore {
    HistoryStore::new(vec![
        Match::new("A", "B", 2, 1),
        Match::new("C", "A", 0, 3),
        Match::new("B", "C", 1, 1),
        Match::new("A", "C", 1, 1),
    ])
}

fn predictor(max_goals: u32, truncation: TruncationPolicy) -> Predictor {
    Predictor::new(ModelConfig {
        max_goals,
        truncation,
        ..ModelConfig::default()
    })
}

#[test]
fn test_reference_strengths_and_rates() {
    let store = reference_league();
    let est = StrengthEstimator::new(&store);
    assert!((est.overall_home_goals() - 1.0).abs() < 1e-12);
    assert!((est.overall_away_goals() - 1.5).abs() < 1e-12);

    let a = est.team_stats(&TeamId::from("A")).unwrap();
    let b = est.team_stats(&TeamId::from("B")).unwrap();
    let rates = GoalRateModel::default().rates(&a, &b, &est.baseline());
    assert!((rates.lambda_home - 8.0 / 9.0).abs() < 1e-12);
    assert!((rates.lambda_away - 2.25).abs() < 1e-12);
}

#[test]
fn test_reference_prediction_max_goals_5() {
    let result = predictor(5, TruncationPolicy::Renormalize)
        .predict(&reference_league(), "A", "B")
        .unwrap();

    let sum = result.prob_home_win + result.prob_draw + result.prob_away_win;
    assert!((sum - 1.0).abs() < 0.01);
    assert!((result.prob_home_win - 0.137694).abs() < EPS);
    assert!((result.prob_draw - 0.189498).abs() < EPS);
    assert!((result.prob_away_win - 0.672808).abs() < EPS);
    assert!((result.prob_over - 0.596015).abs() < EPS);
    assert!((result.prob_btts - 0.524955).abs() < EPS);
    assert_eq!(result.favourite(), Outcome::Away);

    let top: Vec<String> = result.top_scores.iter().map(|s| s.score.to_string()).collect();
    assert_eq!(top, vec!["0-2", "0-1", "1-2", "1-1", "0-3", "1-3"]);
}

#[test]
fn test_raw_truncation_loses_tail_mass() {
    let store = reference_league();
    let raw5 = predictor(5, TruncationPolicy::Raw).predict(&store, "A", "B").unwrap();
    let raw_sum = raw5.prob_home_win + raw5.prob_draw + raw5.prob_away_win;
    assert!((raw_sum - 0.972322).abs() < EPS);

    let raw6 = predictor(6, TruncationPolicy::Raw).predict(&store, "A", "B").unwrap();
    assert!((raw6.prob_home_win - 0.134157).abs() < EPS);
    assert!((raw6.prob_draw - 0.184258).abs() < EPS);
    assert!((raw6.prob_away_win - 0.673173).abs() < EPS);
    assert!((raw6.prob_over - 0.598785).abs() < EPS);
    assert!((raw6.prob_btts - 0.521854).abs() < EPS);
    assert!(raw6.prob_home_win + raw6.prob_draw + raw6.prob_away_win > raw_sum);
}

#[test]
fn test_over_under_complement_on_half_line() {
    let result = Predictor::default().predict(&reference_league(), "A", "B").unwrap();
    assert!((result.prob_over + result.prob_under - 1.0).abs() < 1e-9);
}

#[test]
fn test_prediction_is_idempotent() {
    let store = reference_league();
    let p = Predictor::default();
    let first = p.predict(&store, "A", "B").unwrap();
    let second = p.predict(&store, "A", "B").unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_home_advantage_with_identical_teams() {
    let store = HistoryStore::new(vec![Match::new("X", "Y", 2, 1), Match::new("Y", "X", 2, 1)]);
    let p = Predictor::default();

    let xy = p.predict(&store, "X", "Y").unwrap();
    let yx = p.predict(&store, "Y", "X").unwrap();
    assert!(xy.prob_home_win > xy.prob_away_win);
    assert!(yx.prob_home_win > yx.prob_away_win);
    assert!((xy.prob_home_win - yx.prob_home_win).abs() < 1e-12);
}

#[test]
fn test_no_home_advantage_when_ratio_is_one() {
    let store = HistoryStore::new(vec![Match::new("X", "Y", 1, 1), Match::new("Y", "X", 1, 1)]);
    let result = Predictor::default().predict(&store, "X", "Y").unwrap();
    assert!((result.prob_home_win - result.prob_away_win).abs() < 1e-12);
}

#[test]
fn test_unknown_team() {
    let err = Predictor::default()
        .predict(&reference_league(), "A", "Atlantis")
        .unwrap_err();
    assert_eq!(err, PredictError::UnknownTeam("Atlantis".into()));
}

#[test]
fn test_known_team_without_matches_is_insufficient() {
    let store = reference_league().register_team("D");
    let err = Predictor::default().predict(&store, "A", "D").unwrap_err();
    assert_eq!(err, PredictError::InsufficientData("D".into()));
}

#[test]
fn test_ratio_of_averages_variant() {
    let p = Predictor::new(ModelConfig {
        formula: StrengthFormula::RatioOfAverages,
        ..ModelConfig::default()
    });
    let result = p.predict(&reference_league(), "A", "B").unwrap();
    // 2.0 × 1.5 / 1.0 and 1.0 × (2/3) / 1.5
    assert!((result.lambda_home - 3.0).abs() < 1e-12);
    assert!((result.lambda_away - 4.0 / 9.0).abs() < 1e-12);
}

#[test]
fn test_value_bets_against_reference_prediction() {
    let result = Predictor::default().predict(&reference_league(), "A", "B").unwrap();
    let odds = Odds::new(2.10, 3.20, 3.60).unwrap();
    let report = ValueBetEvaluator::default().evaluate(&result, &odds);

    let away_ev = report.ev(Outcome::Away);
    assert!((away_ev - (result.prob_away_win - 1.0 / 3.60)).abs() < 1e-12);
    assert_eq!(report.value_bets.len(), 1);
    assert_eq!(report.value_bets[0].outcome, Outcome::Away);
}

#[test]
fn test_grid_direct_build_matches_predictor() {
    let store = reference_league();
    let est = StrengthEstimator::new(&store);
    let a = est.team_stats(&TeamId::from("A")).unwrap();
    let b = est.team_stats(&TeamId::from("B")).unwrap();
    let rates = GoalRateModel::default().rates(&a, &b, &est.baseline());
    let grid = ScoreGrid::build(&rates, 6, TruncationPolicy::Renormalize);

    let result = Predictor::default().predict(&store, "A", "B").unwrap();
    assert_eq!(grid.prob_home_win(), result.prob_home_win);
    assert!((grid.confidence() - result.confidence).abs() < 1e-12);
}
