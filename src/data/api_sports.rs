//! API-Football (API-Sports) history provider.
//!
//! API: `https://v3.football.api-sports.io/`
//! Auth: `x-apisports-key` header. Free tier: 100 req/day.
//!
//! Two endpoints are used: `/teams?search=` to resolve a name and
//! `/fixtures?team=&last=` for recent results. One prediction costs four
//! calls (two searches, two fixture lists).

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, info};

use super::{HistoryProvider, TeamRef};
use crate::types::{Match, TeamId};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

const BASE_URL: &str = "https://v3.football.api-sports.io";
const PROVIDER_NAME: &str = "api-sports";

// ---------------------------------------------------------------------------
// API response types (API-Sports JSON → Rust)
// ---------------------------------------------------------------------------

/// Common envelope. `errors` is `[]` on success and an object keyed by
/// error kind otherwise.
#[derive(Debug, Deserialize)]
struct ApiSportsResponse<T> {
    #[serde(default)]
    errors: serde_json::Value,
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct TeamEntry {
    team: ApiTeam,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct FixtureEntry {
    fixture: ApiFixture,
    teams: ApiFixtureTeams,
    goals: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiFixture {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ApiFixtureTeams {
    home: ApiTeam,
    away: ApiTeam,
}

/// Goals are null for fixtures that have not been played.
#[derive(Debug, Deserialize)]
struct ApiGoals {
    home: Option<u32>,
    away: Option<u32>,
}

fn has_errors(errors: &serde_json::Value) -> bool {
    match errors {
        serde_json::Value::Array(a) => !a.is_empty(),
        serde_json::Value::Object(o) => !o.is_empty(),
        serde_json::Value::Null => false,
        _ => true,
    }
}

impl FixtureEntry {
    fn into_match(self) -> Option<Match> {
        let (home_goals, away_goals) = (self.goals.home?, self.goals.away?);
        Some(Match {
            home_team: TeamId::new(self.teams.home.name),
            away_team: TeamId::new(self.teams.away.name),
            home_goals,
            away_goals,
            kickoff: self.fixture.date,
        })
    }
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

pub struct ApiSportsProvider {
    http: Client,
    api_key: SecretString,
    base_url: String,
    /// Restrict fixtures to a season; `None` lets the API pick the latest.
    season: Option<u16>,
}

impl ApiSportsProvider {
    pub fn new(api_key: SecretString, season: Option<u16>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("scoreline/0.1.0")
            .build()
            .context("Failed to build API-Sports HTTP client")?;
        Ok(Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
            season,
        })
    }

    /// Point the client at a different host (e.g. a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn teams_url(&self, name: &str) -> String {
        format!("{}/teams?search={}", self.base_url, urlencoding::encode(name.trim()))
    }

    fn fixtures_url(&self, team_id: &str, count: usize) -> String {
        let mut url = format!(
            "{}/fixtures?team={}&last={}",
            self.base_url,
            urlencoding::encode(team_id),
            count
        );
        if let Some(season) = self.season {
            url.push_str(&format!("&season={season}"));
        }
        url
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<Vec<T>> {
        debug!(url = %url, "Fetching API-Sports");

        let resp = self
            .http
            .get(url)
            .header("x-apisports-key", self.api_key.expose_secret())
            .send()
            .await
            .context("API-Sports request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("API-Sports error {status}: {body}");
        }

        let body: ApiSportsResponse<T> = resp
            .json()
            .await
            .context("Failed to parse API-Sports response")?;

        if has_errors(&body.errors) {
            anyhow::bail!("API-Sports returned errors: {}", body.errors);
        }

        Ok(body.response)
    }
}

#[async_trait]
impl HistoryProvider for ApiSportsProvider {
    async fn search_team(&self, name: &str) -> Result<Option<TeamRef>> {
        let teams: Vec<TeamEntry> = self.get(&self.teams_url(name)).await?;
        let found = teams.into_iter().next().map(|t| TeamRef {
            id: t.team.id.to_string(),
            name: t.team.name,
        });
        debug!(query = name, found = ?found.as_ref().map(|t| &t.name), "Team search");
        Ok(found)
    }

    async fn recent_matches(&self, team: &TeamRef, count: usize) -> Result<Vec<Match>> {
        let fixtures: Vec<FixtureEntry> = self.get(&self.fixtures_url(&team.id, count)).await?;
        let total = fixtures.len();
        let matches: Vec<Match> = fixtures.into_iter().filter_map(FixtureEntry::into_match).collect();
        info!(
            team = %team.name,
            fixtures = total,
            completed = matches.len(),
            "Fetched recent fixtures"
        );
        Ok(matches)
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
