//! Telegram bot front-end.
//!
//! Long-polls the Bot API, parses each message into a [`Command`] and
//! answers from the [`PredictionService`]. Every update is handled on its
//! own task so a slow provider never blocks polling.

pub mod command;
pub mod format;
pub mod telegram;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, warn, Instrument};

use crate::engine::PredictionService;
use command::Command;
use telegram::{TelegramClient, Update};

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Reply to one inbound text. `None` means the message is ignored.
pub async fn handle_text(service: &PredictionService, text: &str) -> Option<String> {
    let reply = match command::parse(text) {
        Ok(Command::Start) => format::start_text(),
        Ok(Command::Help) => format::help_text(),
        Ok(Command::Predict(query)) => {
            match service.predict(&query.home, &query.away, query.odds).await {
                Ok(report) => format::prediction_text(&report),
                Err(e) => {
                    info!(home = %query.home, away = %query.away, error = %e, "Prediction refused");
                    format::error_text(&e)
                }
            }
        }
        Ok(Command::Unknown(text)) if text.starts_with('/') => format::unknown_text(),
        Ok(Command::Unknown(_)) => return None,
        Err(e) => format::error_text(&e),
    };
    Some(reply)
}

pub struct Bot {
    client: Arc<TelegramClient>,
    service: Arc<PredictionService>,
    poll_timeout_secs: u64,
}

impl Bot {
    pub fn new(
        client: TelegramClient,
        service: Arc<PredictionService>,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            client: Arc::new(client),
            service,
            poll_timeout_secs,
        }
    }

    /// Poll until Ctrl+C.
    pub async fn run(&self) -> Result<()> {
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        let mut offset: i64 = 0;
        let mut backoff = Duration::from_secs(1);

        info!(
            provider = self.service.provider_name(),
            poll_timeout_secs = self.poll_timeout_secs,
            "Bot polling. Press Ctrl+C to stop."
        );

        loop {
            tokio::select! {
                polled = self.client.get_updates(offset, self.poll_timeout_secs) => {
                    match polled {
                        Ok(updates) => {
                            backoff = Duration::from_secs(1);
                            for update in updates {
                                offset = offset.max(update.update_id + 1);
                                self.dispatch(update);
                            }
                        }
                        Err(e) => {
                            warn!(error = %format!("{e:#}"), retry_in_secs = backoff.as_secs(), "Polling failed");
                            tokio::time::sleep(backoff).await;
                            backoff = (backoff * 2).min(MAX_BACKOFF);
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("Shutdown signal received.");
                    break;
                }
            }
        }

        Ok(())
    }

    fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(text) = message.text else {
            return;
        };

        let chat_id = message.chat.id;
        let user = message
            .from
            .and_then(|u| u.username)
            .unwrap_or_else(|| "-".to_string());
        let request_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!(
            "update",
            %request_id,
            update_id = update.update_id,
            chat_id,
            user = %user
        );
        let client = Arc::clone(&self.client);
        let service = Arc::clone(&self.service);

        tokio::spawn(
            async move {
                let Some(reply) = handle_text(&service, &text).await else {
                    return;
                };
                if let Err(e) = client.send_message(chat_id, &reply).await {
                    error!(error = %format!("{e:#}"), "Failed to send reply");
                }
            }
            .instrument(span),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
