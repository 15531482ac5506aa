//! Runtime layer for order-stats.
//!
//! Loads the yearly reports concurrently on the tokio runtime and hands a
//! finished, read-only dataset to the analysis and presentation layers.

pub mod loader;

pub use stats_core as core;
pub use stats_data as data;
