//! Kelly criterion stake sizing for decimal odds.
//!
//! Suggests a bankroll fraction for a value bet using fractional Kelly
//! with a configurable multiplier and cap.

use tracing::debug;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct KellyConfig {
    /// Fractional Kelly multiplier (0.25 = quarter-Kelly).
    pub multiplier: f64,
    /// Maximum stake as a fraction of bankroll.
    pub max_stake_pct: f64,
}

impl Default for KellyConfig {
    fn default() -> Self {
        Self {
            multiplier: 0.25,
            max_stake_pct: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Kelly calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KellyStake {
    /// Raw Kelly fraction.
    pub kelly_fraction: f64,
    /// After multiplier and cap.
    pub stake_fraction: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KellyCalculator {
    config: KellyConfig,
}

impl KellyCalculator {
    pub fn new(config: KellyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KellyConfig {
        &self.config
    }

    /// Size a stake on decimal `odds` given win probability `probability`.
    ///
    /// Kelly formula: f* = (b·p − q) / b
    /// where b = odds − 1, p = win probability, q = 1 − p.
    /// Returns `None` when the Kelly fraction is not positive.
    pub fn stake(&self, probability: f64, odds: f64) -> Option<KellyStake> {
        let b = odds - 1.0;
        if !(b > 0.0) || !probability.is_finite() {
            return None;
        }

        let q = 1.0 - probability;
        let kelly = (b * probability - q) / b;
        if kelly <= 0.0 {
            debug!(probability, odds, kelly, "Negative Kelly, no stake");
            return None;
        }

        let stake_fraction = (kelly * self.config.multiplier).min(self.config.max_stake_pct);

        Some(KellyStake {
            kelly_fraction: kelly,
            stake_fraction,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
