//! Chat command parsing.
//!
//! Accepted forms:
//! - `/start`, `/help`
//! - `/predict TeamA-TeamB [odds_home odds_draw odds_away]`
//! - `/predict Team A vs Team B [odds_home odds_draw odds_away]`
//!
//! A `@botname` suffix on the command (group chats) is ignored.

use crate::types::PredictError;

pub const USAGE: &str = "/predict TeamA-TeamB [odds_home odds_draw odds_away]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Predict(FixtureQuery),
    /// Anything that isn't a known command.
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureQuery {
    pub home: String,
    pub away: String,
    /// Raw decimal odds; validated later by the value-bet evaluator.
    pub odds: Option<[f64; 3]>,
}

/// Parse one inbound chat message.
pub fn parse(text: &str) -> Result<Command, PredictError> {
    let text = text.trim();
    let (head, rest) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    let command = head.split('@').next().unwrap_or(head).to_lowercase();

    match command.as_str() {
        "/start" => Ok(Command::Start),
        "/help" => Ok(Command::Help),
        "/predict" => parse_fixture(rest).map(Command::Predict),
        _ => Ok(Command::Unknown(text.to_string())),
    }
}

/// Parse the arguments of `/predict`.
pub fn parse_fixture(args: &str) -> Result<FixtureQuery, PredictError> {
    let mut tokens: Vec<&str> = args.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(PredictError::InvalidFormat(format!("Usage: {USAGE}")));
    }

    // The last three finite numbers are odds. A shorter numeric tail stays
    // part of the fixture, so names like "Hannover 96" survive.
    let numeric_tail = tokens
        .iter()
        .rev()
        .take_while(|t| t.parse::<f64>().is_ok_and(f64::is_finite))
        .count()
        .min(tokens.len() - 1);
    let odds = if numeric_tail >= 3 {
        let tail: Vec<f64> = tokens
            .split_off(tokens.len() - 3)
            .iter()
            .filter_map(|t| t.parse().ok())
            .collect();
        match tail.as_slice() {
            [home, draw, away] => Some([*home, *draw, *away]),
            _ => None,
        }
    } else {
        None
    };

    let fixture = tokens.join(" ");
    let (home, away) = split_fixture(&fixture).ok_or_else(|| {
        PredictError::InvalidFormat("Fixture must be TeamA-TeamB or TeamA vs TeamB".into())
    })?;

    if home.eq_ignore_ascii_case(away) {
        return Err(PredictError::InvalidFormat(
            "Home and away teams must be different".into(),
        ));
    }

    Ok(FixtureQuery {
        home: home.to_string(),
        away: away.to_string(),
        odds,
    })
}

/// Split on ` vs ` (case-insensitive) if present, otherwise on the first `-`.
fn split_fixture(fixture: &str) -> Option<(&str, &str)> {
    let lower = fixture.to_ascii_lowercase();
    let (home, away) = match lower.find(" vs ") {
        Some(pos) => (&fixture[..pos], &fixture[pos + 4..]),
        None => fixture.split_once('-')?,
    };
    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() {
        None
    } else {
        Some((home, away))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
