//! Data ingestion layer for order-stats.
//!
//! Responsible for discovering the yearly CSV reports, turning their rows
//! into records filed by year and month, and running the analysis pipeline
//! over the resulting dataset.

pub mod analysis;
pub mod reader;

pub use stats_core as core;
