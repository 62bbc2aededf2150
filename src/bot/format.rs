//! Reply text for chat users.

use crate::engine::PredictionReport;
use crate::strategy::ValueReport;
use crate::types::{Outcome, PredictError};

use super::command::USAGE;

pub fn start_text() -> String {
    format!(
        "Hi! I'm your match prediction bot.\n\n\
         Use {USAGE}\n\
         Ex: /predict TeamA-TeamB 2.10 3.20 3.60\n\n\
         I'll reply with probabilities, likely scores and value bets."
    )
}

pub fn help_text() -> String {
    format!("Commands:\n{USAGE}\n/predict TeamA vs TeamB\n/start\n/help")
}

pub fn unknown_text() -> String {
    format!("Unknown command. Usage: {USAGE}")
}

/// User-facing message for a failed prediction.
pub fn error_text(err: &PredictError) -> String {
    match err {
        PredictError::UnknownTeam(team) => format!("❌ Team not found: {team}"),
        PredictError::InsufficientData(team) => {
            format!("❌ Insufficient data for {team}. Try another team or retry later.")
        }
        PredictError::InvalidFormat(msg) => format!("❌ Invalid format. {msg}"),
        PredictError::InvalidOdds(msg) => format!("❌ Invalid odds: {msg}"),
        PredictError::ProviderUnavailable { .. } => {
            "❌ Match data is unavailable right now. Try again later.".to_string()
        }
    }
}

pub fn prediction_text(report: &PredictionReport) -> String {
    let p = &report.prediction;
    let mut lines = Vec::new();

    lines.push(format!("Prediction: {} vs {}", p.home, p.away));
    lines.push(format!(
        "Expected goals (λ): {:.2} (home) | {:.2} (away)",
        p.lambda_home, p.lambda_away
    ));
    lines.push(format!(
        "Probabilities: {} win {:.3}, draw {:.3}, {} win {:.3}",
        p.home, p.prob_home_win, p.prob_draw, p.away, p.prob_away_win
    ));
    lines.push(format!(
        "Over {:.1}: {:.3} | Under {:.1}: {:.3} | BTTS: {:.3}",
        p.over_under_line, p.prob_over, p.over_under_line, p.prob_under, p.prob_btts
    ));
    lines.push(format!("Confidence: {:.1}/10", p.confidence));
    if p.renormalized {
        lines.push(format!(
            "Probabilities are conditional on the score grid ({:.1}% of the Poisson mass).",
            p.coverage * 100.0
        ));
    }
    lines.push("Most likely scores:".to_string());
    for s in &p.top_scores {
        lines.push(format!(" • {} → {:.3}", s.score, s.probability));
    }

    match &report.value {
        Some(value) => lines.extend(value_lines(value)),
        None => lines.push(
            "\nTo compare with bookmaker odds, send three odds after the fixture.".to_string(),
        ),
    }

    lines.join("\n")
}

fn value_lines(value: &ValueReport) -> Vec<String> {
    let mut lines = vec![
        "\nOdds comparison (EV = prob - 1/odds):".to_string(),
        format!(
            " EV home: {:.3}, EV draw: {:.3}, EV away: {:.3}",
            value.ev(Outcome::Home),
            value.ev(Outcome::Draw),
            value.ev(Outcome::Away)
        ),
    ];

    if value.has_value() {
        let picks: Vec<String> = value
            .value_bets
            .iter()
            .map(|b| {
                format!(
                    "{} @ {:.2} (EV {:.3}, stake {:.1}%)",
                    b.outcome,
                    b.odds,
                    b.ev,
                    b.stake_fraction * 100.0
                )
            })
            .collect();
        lines.push(format!("Value bets detected: {}", picks.join(", ")));
    } else {
        lines.push("No value bet detected against these odds.".to_string());
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
