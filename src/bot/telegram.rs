//! Minimal Telegram Bot API client (long polling).
//!
//! API docs: https://core.telegram.org/bots/api
//! Only `getUpdates` and `sendMessage` are used. The bot token is part of
//! every request path, so URLs are stripped from transport errors and
//! never logged.

use anyhow::{Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://api.telegram.org";

/// Telegram rejects messages longer than this.
pub const MAX_MESSAGE_LEN: usize = 4096;

// ---------------------------------------------------------------------------
// API types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TelegramResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub from: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct TelegramClient {
    http: Client,
    token: SecretString,
    base_url: String,
}

impl TelegramClient {
    /// `poll_timeout` is the long-poll duration; the HTTP timeout is set
    /// slightly above it.
    pub fn new(token: SecretString, poll_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(poll_timeout + Duration::from_secs(10))
            .user_agent("scoreline/0.1.0")
            .build()
            .context("Failed to build Telegram HTTP client")?;
        Ok(Self {
            http,
            token,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token.expose_secret(), method)
    }

    /// Long-poll for updates after `offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>> {
        let resp = self
            .http
            .get(self.method_url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", timeout_secs.to_string()),
                ("allowed_updates", r#"["message"]"#.to_string()),
            ])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Telegram getUpdates request failed")?;

        let updates: Vec<Update> = unwrap_response(resp, "getUpdates").await?;
        debug!(count = updates.len(), offset, "Polled updates");
        Ok(updates)
    }

    /// Send a plain-text message, truncated to Telegram's length limit.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let text = truncate(text, MAX_MESSAGE_LEN);
        let resp = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context("Telegram sendMessage request failed")?;

        let _: serde_json::Value = unwrap_response(resp, "sendMessage").await?;
        debug!(chat_id, len = text.len(), "Message sent");
        Ok(())
    }
}

async fn unwrap_response<T: for<'de> Deserialize<'de>>(
    resp: reqwest::Response,
    method: &str,
) -> Result<T> {
    let status = resp.status();
    let body: TelegramResponse<T> = resp
        .json()
        .await
        .map_err(reqwest::Error::without_url)
        .with_context(|| format!("Failed to parse Telegram {method} response ({status})"))?;
    parse_envelope(body, method)
}

fn parse_envelope<T>(body: TelegramResponse<T>, method: &str) -> Result<T> {
    if !body.ok {
        anyhow::bail!(
            "Telegram {method} failed: {}",
            body.description.unwrap_or_else(|| "no description".into())
        );
    }
    body.result
        .with_context(|| format!("Telegram {method} returned no result"))
}

/// Cut `text` to at most `max` bytes on a char boundary.
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_updates() {
        let json = r#"{
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 42, "type": "private"},
                 "from": {"id": 7, "is_bot": false, "username": "ana"}, "text": "/predict A-B"}},
                {"update_id": 11, "edited_message": {"chat": {"id": 42}}}
            ]
        }"#;
        let body: TelegramResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        let updates = parse_envelope(body, "getUpdates").unwrap();
        assert_eq!(updates.len(), 2);
        let msg = updates[0].message.as_ref().unwrap();
        assert_eq!(msg.chat.id, 42);
        assert_eq!(msg.text.as_deref(), Some("/predict A-B"));
        assert_eq!(msg.from.as_ref().unwrap().username.as_deref(), Some("ana"));
        assert!(updates[1].message.is_none());
    }

    #[test]
    fn test_error_envelope() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let body: TelegramResponse<Vec<Update>> = serde_json::from_str(json).unwrap();
        let err = parse_envelope(body, "getUpdates").unwrap_err();
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_ok_envelope_without_result() {
        let json = r#"{"ok": true}"#;
        let body: TelegramResponse<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(body.result.is_none());
        let err = parse_envelope(body, "sendMessage").unwrap_err();
        assert!(err.to_string().contains("returned no result"));
    }

    #[test]
    fn test_method_url_embeds_token() {
        let client = TelegramClient::new(SecretString::new("123:abc".into()), Duration::from_secs(30))
            .unwrap()
            .with_base_url("http://localhost:8081");
        assert_eq!(
            client.method_url("getUpdates"),
            "http://localhost:8081/bot123:abc/getUpdates"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate("abc", 10), "abc");
        // "é" is two bytes; cutting at 2 would split it.
        assert_eq!(truncate("aéb", 2), "a");
        assert_eq!(truncate("aéb", 3), "aé");
    }
}
