//! SCORELINE: Poisson football score predictor with value-bet detection.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod model;
pub mod strategy;
pub mod data;
pub mod engine;
pub mod bot;
