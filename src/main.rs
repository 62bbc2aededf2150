//! SCORELINE: Poisson football score predictor.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the history provider and either answers one fixture from the
//! command line or runs the Telegram bot until Ctrl+C.
//!
//! Usage:
//!   scoreline                                   run the bot
//!   scoreline predict "TeamA-TeamB" [h d a]     one-shot prediction

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use scoreline::bot::telegram::TelegramClient;
use scoreline::bot::{command, format, Bot};
use scoreline::config::{AppConfig, HistorySource};
use scoreline::data::api_sports::ApiSportsProvider;
use scoreline::data::static_history::StaticHistoryProvider;
use scoreline::data::HistoryProvider;
use scoreline::engine::PredictionService;
use scoreline::model::Predictor;
use scoreline::strategy::ValueBetEvaluator;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load_default()?;

    init_logging();

    info!(
        source = ?cfg.history.source,
        formula = ?cfg.model.formula,
        max_goals = cfg.model.max_goals,
        history_window = cfg.model.history_window,
        "SCORELINE starting up"
    );

    let provider = build_provider(&cfg)?;
    let service = Arc::new(PredictionService::new(
        provider,
        Predictor::new(cfg.model.clone()),
        ValueBetEvaluator::new(cfg.value.clone()),
    ));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("predict") => predict_once(&service, &args[1..].join(" ")).await,
        Some(other) => {
            anyhow::bail!("Unknown subcommand: {other}. Usage: scoreline [predict FIXTURE [odds]]")
        }
        None => run_bot(&cfg, service).await,
    }
}

fn build_provider(cfg: &AppConfig) -> Result<Arc<dyn HistoryProvider>> {
    let provider: Arc<dyn HistoryProvider> = match cfg.history.source {
        HistorySource::ApiSports => {
            let key = AppConfig::resolve_secret(&cfg.history.api_key_env)
                .context("API-Sports key is required for source = \"api_sports\"")?;
            Arc::new(ApiSportsProvider::new(key, cfg.history.season)?)
        }
        HistorySource::Static => {
            Arc::new(StaticHistoryProvider::from_file(&cfg.history.dataset_path)?)
        }
    };
    info!(provider = provider.name(), "History provider ready");
    Ok(provider)
}

/// Answer a single fixture and print the reply to stdout.
async fn predict_once(service: &PredictionService, args: &str) -> Result<()> {
    let query = command::parse_fixture(args).map_err(|e| anyhow::anyhow!(format::error_text(&e)))?;
    match service.predict(&query.home, &query.away, query.odds).await {
        Ok(report) => {
            println!("{}", format::prediction_text(&report));
            Ok(())
        }
        Err(e) => anyhow::bail!(format::error_text(&e)),
    }
}

async fn run_bot(cfg: &AppConfig, service: Arc<PredictionService>) -> Result<()> {
    let token = AppConfig::resolve_secret(&cfg.bot.telegram_bot_token_env)
        .context("Telegram bot token is required to run the bot")?;
    let poll = cfg.bot.poll_timeout_secs;
    let client = TelegramClient::new(token, Duration::from_secs(poll))?;

    Bot::new(client, service, poll).run().await?;

    info!("SCORELINE shut down cleanly.");
    Ok(())
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scoreline=info"));

    let json_logging = std::env::var("SCORELINE_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
