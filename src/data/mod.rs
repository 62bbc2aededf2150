//! Match history providers.
//!
//! Defines the `HistoryProvider` trait and its implementations:
//! - API-Sports football fixtures (live data)
//! - a static JSON dataset (offline / demo)

pub mod api_sports;
pub mod static_history;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::Match;

/// A team as known to a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    /// Provider-specific identifier.
    pub id: String,
    /// Canonical display name, as used in the provider's matches.
    pub name: String,
}

/// Abstraction over sources of completed matches.
///
/// Transport failures are returned as errors; the prediction service treats
/// them the same as an empty history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Look a team up by (possibly partial) name.
    async fn search_team(&self, name: &str) -> Result<Option<TeamRef>>;

    /// The team's last `count` completed matches, in any order.
    async fn recent_matches(&self, team: &TeamRef, count: usize) -> Result<Vec<Match>>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}
