//! Year-keyed collection of ledgers, iterated in ascending year order.

use std::collections::BTreeMap;

use crate::error::{Result, StatsError};
use crate::ledger::{LabelStyle, YearLedger};

/// All ledgers of a run, keyed by year label.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    years: BTreeMap<String, YearLedger>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finished ledger under its year label.
    ///
    /// The ledger is trimmed on the way in; a year that is already present is
    /// rejected.
    pub fn insert(&mut self, mut ledger: YearLedger) -> Result<()> {
        if self.years.contains_key(ledger.year()) {
            return Err(StatsError::DuplicateYear(ledger.year().to_string()));
        }
        ledger.trim();
        self.years.insert(ledger.year().to_string(), ledger);
        Ok(())
    }

    pub fn get(&self, year: &str) -> Option<&YearLedger> {
        self.years.get(year)
    }

    /// Ledgers in ascending year order.
    pub fn iter(&self) -> impl Iterator<Item = &YearLedger> {
        self.years.values()
    }

    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.years.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Number of retained months across all years.
    pub fn month_count(&self) -> usize {
        self.iter().map(YearLedger::month_count).sum()
    }

    pub fn record_count(&self) -> usize {
        self.iter().map(YearLedger::record_count).sum()
    }

    /// Labels of every retained month in ascending (year, month) order.
    pub fn month_labels(&self, style: LabelStyle) -> Vec<String> {
        self.iter().flat_map(|l| l.month_labels(style)).collect()
    }
}

impl TryFrom<Vec<YearLedger>> for Dataset {
    type Error = StatsError;

    /// Insert every ledger in turn; the first duplicate year aborts.
    fn try_from(ledgers: Vec<YearLedger>) -> Result<Self> {
        let mut dataset = Dataset::new();
        for ledger in ledgers {
            dataset.insert(ledger)?;
        }
        Ok(dataset)
    }
}
