//! Core engine: turns a fixture query into a prediction report.

pub mod service;

pub use service::{PredictionReport, PredictionService};
