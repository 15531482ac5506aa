//! Core data model and statistics for order-stats.
//!
//! Purchase records are grouped into a year → month hierarchy
//! ([`ledger::YearLedger`], [`ledger::MonthBucket`]) collected in a
//! [`dataset::Dataset`]; [`statistics`] derives extrema, moments and
//! order statistics over the monthly aggregates.

pub mod dataset;
pub mod error;
pub mod formatting;
pub mod ledger;
pub mod models;
pub mod settings;
pub mod statistics;

pub use error::{Result, StatsError};
