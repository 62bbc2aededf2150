//! Static dataset provider.
//!
//! Serves match history from a JSON file loaded once at startup. Useful for
//! offline runs, demos and tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use super::{HistoryProvider, TeamRef};
use crate::model::history::HistoryStore;
use crate::types::Match;

const PROVIDER_NAME: &str = "static-dataset";

pub struct StaticHistoryProvider {
    store: HistoryStore,
}

impl StaticHistoryProvider {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            store: HistoryStore::new(matches),
        }
    }

    /// Load a JSON array of matches from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read match dataset: {}", path.display()))?;
        let matches: Vec<Match> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse match dataset: {}", path.display()))?;

        info!(path = %path.display(), matches = matches.len(), "Match dataset loaded");
        Ok(Self::new(matches))
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }
}

#[async_trait]
impl HistoryProvider for StaticHistoryProvider {
    async fn search_team(&self, name: &str) -> Result<Option<TeamRef>> {
        Ok(self.store.resolve(name).map(|id| TeamRef {
            id: id.to_string(),
            name: id.to_string(),
        }))
    }

    async fn recent_matches(&self, team: &TeamRef, count: usize) -> Result<Vec<Match>> {
        let Some(id) = self.store.resolve(&team.name) else {
            return Ok(Vec::new());
        };
        let mut recent: Vec<Match> = self.store.matches_for(&id).rev().take(count).cloned().collect();
        recent.reverse();
        Ok(recent)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticHistoryProvider {
        StaticHistoryProvider::new(vec![
            Match::new("Lyon", "Nice", 2, 1),
            Match::new("Nice", "Lens", 0, 0),
            Match::new("Lens", "Lyon", 1, 3),
        ])
    }

    fn temp_path() -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("scoreline_test_dataset_{}.json", uuid::Uuid::new_v4()));
        p
    }

    #[tokio::test]
    async fn test_search_team() {
        let p = provider();
        let lyon = p.search_team("lyon").await.unwrap().unwrap();
        assert_eq!(lyon.name, "Lyon");
        assert!(p.search_team("Marseille").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_matches_limited() {
        let p = provider();
        let lyon = p.search_team("Lyon").await.unwrap().unwrap();
        let recent = p.recent_matches(&lyon, 1).await.unwrap();
        assert_eq!(recent, vec![Match::new("Lens", "Lyon", 1, 3)]);
        assert_eq!(p.recent_matches(&lyon, 10).await.unwrap().len(), 2);
    }

    #[test]
    fn test_from_file() {
        let path = temp_path();
        let matches = vec![Match::new("A", "B", 1, 0), Match::new("B", "A", 2, 2)];
        std::fs::write(&path, serde_json::to_string(&matches).unwrap()).unwrap();

        let p = StaticHistoryProvider::from_file(&path).unwrap();
        assert_eq!(p.store().len(), 2);
        assert_eq!(p.name(), "static-dataset");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_from_missing_file_errors() {
        let result = StaticHistoryProvider::from_file("/tmp/scoreline_does_not_exist_xyz.json");
        assert!(result.is_err());
    }

    #[test]
    fn test_search_blocking() {
        let p = provider();
        let found = tokio_test::block_on(p.search_team("NICE")).unwrap();
        assert_eq!(found.unwrap().name, "Nice");
    }
}
