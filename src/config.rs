//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` (or the file named by `SCORELINE_CONFIG`) into
//! strongly-typed structs. Every section is optional and falls back to its
//! defaults. Secrets (API keys, bot token) are referenced by env-var name
//! and resolved at runtime.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::model::ModelConfig;
use crate::strategy::ValueConfig;

/// Env var naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SCORELINE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub bot: BotConfig,
    pub history: HistoryConfig,
    pub model: ModelConfig,
    pub value: ValueConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BotConfig {
    pub telegram_bot_token_env: String,
    /// Long-poll duration for `getUpdates`.
    pub poll_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token_env: "TELEGRAM_BOT_TOKEN".into(),
            poll_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HistorySource {
    #[default]
    ApiSports,
    Static,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    pub source: HistorySource,
    pub api_key_env: String,
    pub season: Option<u16>,
    /// JSON dataset used when `source = "static"`.
    pub dataset_path: PathBuf,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            source: HistorySource::ApiSports,
            api_key_env: "FOOTBALL_API_KEY".into(),
            season: None,
            dataset_path: PathBuf::from("data/matches.json"),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `SCORELINE_CONFIG`, else `config.toml`. A missing default
    /// file yields the built-in defaults; a missing explicit file is an error.
    pub fn load_default() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(&path),
            Err(_) if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::load(DEFAULT_CONFIG_PATH)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        let m = &self.model;
        anyhow::ensure!(m.history_window >= 1, "model.history_window must be at least 1");
        anyhow::ensure!(
            m.min_rate.is_finite() && m.min_rate > 0.0,
            "model.min_rate must be positive"
        );
        anyhow::ensure!(
            m.home_advantage_fallback.is_finite() && m.home_advantage_fallback > 0.0,
            "model.home_advantage_fallback must be positive"
        );
        let v = &self.value;
        anyhow::ensure!(
            (0.0..=1.0).contains(&v.kelly_multiplier),
            "value.kelly_multiplier must be within [0, 1]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&v.max_stake_pct),
            "value.max_stake_pct must be within [0, 1]"
        );
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// Like [`resolve_env`](Self::resolve_env), wrapped so it is never logged.
    pub fn resolve_secret(env_name: &str) -> Result<SecretString> {
        Self::resolve_env(env_name).map(SecretString::new)
    }
}
