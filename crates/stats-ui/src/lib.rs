//! Presentation layer for order-stats.
//!
//! Plain-text reports for stdout plus the [`ratatui`] chart views (monthly
//! bars and the cumulated expenses curve) and the event loop that switches
//! between them.

pub mod app;
pub mod bar_view;
pub mod curve_view;
pub mod report;
pub mod themes;

pub use stats_core as core;
