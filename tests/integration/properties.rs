//! Property-based tests for the score grid and value sizing.

use proptest::prelude::*;

use scoreline::model::distribution::{ScoreGrid, TruncationPolicy, RANK_RESOLUTION};
use scoreline::model::rates::{GoalRateModel, StrengthFormula, DEFAULT_MIN_RATE};
use scoreline::strategy::kelly::{KellyCalculator, KellyConfig};
use scoreline::types::{FixtureRates, LeagueBaseline, TeamStats};

fn rates(lambda_home: f64, lambda_away: f64) -> FixtureRates {
    FixtureRates {
        lambda_home,
        lambda_away,
    }
}

// ── Score grid ──────────────────────────────────────────────

proptest! {
    /// With max_goals = 10 the tail beyond the grid is tiny for λ ≤ 3.
    #[test]
    fn raw_grid_mass_close_to_one(lh in 0.2f64..3.0, la in 0.2f64..3.0) {
        let grid = ScoreGrid::build(&rates(lh, la), 10, TruncationPolicy::Raw);
        let total = grid.total();
        prop_assert!(total <= 1.0 + 1e-9, "mass above 1: {total}");
        prop_assert!(total > 0.99, "mass too low for λ=({lh}, {la}): {total}");
    }

    /// Enlarging the grid never loses mass.
    #[test]
    fn raw_mass_grows_with_max_goals(lh in 0.2f64..4.0, la in 0.2f64..4.0, n in 0u32..12) {
        let small = ScoreGrid::build(&rates(lh, la), n, TruncationPolicy::Raw).total();
        let large = ScoreGrid::build(&rates(lh, la), n + 1, TruncationPolicy::Raw).total();
        prop_assert!(large >= small - 1e-12, "n={n}: {small} -> {large}");
    }

    /// Renormalized grids always sum to one, as do their 1X2 markets.
    #[test]
    fn renormalized_outcomes_sum_to_one(lh in 0.2f64..6.0, la in 0.2f64..6.0, n in 0u32..10) {
        let grid = ScoreGrid::build(&rates(lh, la), n, TruncationPolicy::Renormalize);
        prop_assert!((grid.total() - 1.0).abs() < 1e-9);
        let outcomes = grid.prob_home_win() + grid.prob_draw() + grid.prob_away_win();
        prop_assert!((outcomes - 1.0).abs() < 1e-9, "1X2 sum {outcomes}");
    }

    /// Top scores come out in non-increasing probability order.
    #[test]
    fn top_scores_sorted(lh in 0.2f64..4.0, la in 0.2f64..4.0, k in 1usize..20) {
        let grid = ScoreGrid::build(&rates(lh, la), 6, TruncationPolicy::Renormalize);
        let top = grid.top_scores(k);
        prop_assert_eq!(top.len(), k.min(49));
        for pair in top.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability - RANK_RESOLUTION);
        }
    }
}

// ── Goal rates ──────────────────────────────────────────────

proptest! {
    /// Rates are finite and respect the floor whatever the inputs.
    #[test]
    fn rates_respect_floor(
        hs in 0.0f64..5.0, hc in 0.0f64..5.0,
        as_ in 0.0f64..5.0, ac in 0.0f64..5.0,
        lh in 0.0f64..4.0, la in 0.0f64..4.0,
        ratio_of_averages in any::<bool>(),
    ) {
        let formula = if ratio_of_averages {
            StrengthFormula::RatioOfAverages
        } else {
            StrengthFormula::LeagueNormalized
        };
        let home = TeamStats { avg_scored: hs, avg_conceded: hc, matches_played: 1 };
        let away = TeamStats { avg_scored: as_, avg_conceded: ac, matches_played: 1 };
        let league = LeagueBaseline {
            avg_home_goals: lh,
            avg_away_goals: la,
            home_advantage_ratio: if la > 0.0 { lh / la } else { 1.1 },
        };
        let r = GoalRateModel::new(formula, DEFAULT_MIN_RATE).rates(&home, &away, &league);
        prop_assert!(r.lambda_home.is_finite() && r.lambda_home >= DEFAULT_MIN_RATE);
        prop_assert!(r.lambda_away.is_finite() && r.lambda_away >= DEFAULT_MIN_RATE);
    }
}

// ── Kelly sizing ────────────────────────────────────────────

proptest! {
    /// Suggested stakes never exceed the configured cap.
    #[test]
    fn kelly_stake_capped(p in 0.01f64..0.99, odds in 1.01f64..20.0) {
        let kelly = KellyCalculator::new(KellyConfig::default());
        if let Some(stake) = kelly.stake(p, odds) {
            prop_assert!(stake.stake_fraction > 0.0);
            prop_assert!(stake.stake_fraction <= KellyConfig::default().max_stake_pct + 1e-12);
        }
    }
}
