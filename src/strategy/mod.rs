//! Betting strategy: value detection against bookmaker odds and
//! Kelly stake sizing.

pub mod kelly;
pub mod value;

pub use value::{Odds, ValueBet, ValueBetEvaluator, ValueConfig, ValueReport};
