//! Joint scoreline distribution.
//!
//! Treats the two teams' goal counts as independent Poisson variables and
//! tabulates their product over a bounded `0..=max_goals` grid. Every derived
//! market is an exact sum over grid cells.

use serde::Deserialize;

use crate::types::{FixtureRates, ScoreProbability, Scoreline};

/// What to do with the probability mass that falls outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Keep raw cell masses; totals fall short of 1 for large λ.
    Raw,
    /// Divide every cell by the grid's raw mass.
    #[default]
    Renormalize,
}

/// Ranking granularity for exact scores. Cells that are mathematically tied
/// can differ in the last bits depending on how λ was computed.
pub const RANK_RESOLUTION: f64 = 1e-12;

/// Probabilities in [0, 1] bucketed to [`RANK_RESOLUTION`]; NaN sorts last.
fn rank_key(p: f64) -> i64 {
    if p.is_finite() {
        (p / RANK_RESOLUTION).round() as i64
    } else {
        i64::MIN
    }
}

/// Poisson PMF for k = 0..=max_k via p(k) = p(k-1)·λ/k.
pub fn poisson_pmf(lambda: f64, max_k: u32) -> Vec<f64> {
    let lambda = if lambda.is_finite() { lambda.max(0.0) } else { 0.0 };
    let mut out = Vec::with_capacity(max_k as usize + 1);
    out.push((-lambda).exp());
    for k in 1..=max_k {
        let prev = out[k as usize - 1];
        out.push(prev * lambda / f64::from(k));
    }
    out
}

/// Probability table over scorelines, row = home goals, column = away goals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    max_goals: u32,
    cells: Vec<f64>,
    coverage: f64,
}

impl ScoreGrid {
    pub fn build(rates: &FixtureRates, max_goals: u32, policy: TruncationPolicy) -> Self {
        let pmf_h = poisson_pmf(rates.lambda_home, max_goals);
        let pmf_a = poisson_pmf(rates.lambda_away, max_goals);

        let mut cells = Vec::with_capacity(pmf_h.len() * pmf_a.len());
        for p_i in &pmf_h {
            for p_j in &pmf_a {
                cells.push(p_i * p_j);
            }
        }
        let coverage: f64 = cells.iter().sum();

        if policy == TruncationPolicy::Renormalize && coverage > 0.0 {
            for c in &mut cells {
                *c /= coverage;
            }
        }

        Self {
            max_goals,
            cells,
            coverage,
        }
    }

    pub fn max_goals(&self) -> u32 {
        self.max_goals
    }

    /// Raw Poisson mass captured by the grid before any renormalization.
    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    fn side(&self) -> usize {
        self.max_goals as usize + 1
    }

    /// Probability of exactly `home`-`away`; 0 outside the grid.
    pub fn get(&self, home: u32, away: u32) -> f64 {
        if home > self.max_goals || away > self.max_goals {
            return 0.0;
        }
        self.cells[home as usize * self.side() + away as usize]
    }

    /// All cells in (home, away) enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (Scoreline, f64)> + '_ {
        let side = self.side();
        self.cells.iter().enumerate().map(move |(idx, &p)| {
            let score = Scoreline {
                home: (idx / side) as u32,
                away: (idx % side) as u32,
            };
            (score, p)
        })
    }

    fn sum_where(&self, pred: impl Fn(Scoreline) -> bool) -> f64 {
        self.iter().filter(|(s, _)| pred(*s)).map(|(_, p)| p).sum()
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    pub fn prob_home_win(&self) -> f64 {
        self.sum_where(|s| s.home > s.away)
    }

    pub fn prob_draw(&self) -> f64 {
        self.sum_where(|s| s.home == s.away)
    }

    pub fn prob_away_win(&self) -> f64 {
        self.sum_where(|s| s.home < s.away)
    }

    /// Total goals strictly above `line`.
    pub fn prob_over(&self, line: f64) -> f64 {
        self.sum_where(|s| f64::from(s.home + s.away) > line)
    }

    /// Total goals strictly below `line`.
    pub fn prob_under(&self, line: f64) -> f64 {
        self.sum_where(|s| f64::from(s.home + s.away) < line)
    }

    pub fn prob_btts(&self) -> f64 {
        self.sum_where(|s| s.home > 0 && s.away > 0)
    }

    /// The `k` most likely scorelines, descending. Probabilities equal to
    /// within [`RANK_RESOLUTION`] keep enumeration order.
    pub fn top_scores(&self, k: usize) -> Vec<ScoreProbability> {
        let mut ranked: Vec<ScoreProbability> = self
            .iter()
            .map(|(score, probability)| ScoreProbability { score, probability })
            .collect();
        ranked.sort_by_key(|s| std::cmp::Reverse(rank_key(s.probability)));
        ranked.truncate(k);
        ranked
    }

    /// Strongest 1X2 probability scaled to 0 to 10.
    pub fn confidence(&self) -> f64 {
        self.prob_home_win()
            .max(self.prob_draw())
            .max(self.prob_away_win())
            * 10.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
