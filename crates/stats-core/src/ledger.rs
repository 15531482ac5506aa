//! Per-month and per-year containers for purchase records.

use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};
use crate::models::{Record, Scope};

/// Upper-case English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// How month labels are rendered by [`YearLedger::month_labels`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// `"JANUARY 2021"`
    Full,
    /// `"JAN 2021"`
    Short,
}

/// The month holding an extreme aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremum {
    pub year: String,
    pub month: String,
    pub value: f64,
}

// ── MonthBucket ───────────────────────────────────────────────────────────────

/// All records of one calendar month, keyed by order identifier.
#[derive(Debug, Clone)]
pub struct MonthBucket {
    index: usize,
    orders: Vec<(String, Record)>,
    positions: HashMap<String, usize>,
    sum: f64,
    subset_sum: f64,
}

impl MonthBucket {
    /// Create an empty bucket. `index` is 0-based and must be below 12.
    pub fn new(index: usize) -> Self {
        debug_assert!(index < 12, "month index out of range: {index}");
        Self {
            index,
            orders: Vec::new(),
            positions: HashMap::new(),
            sum: 0.0,
            subset_sum: 0.0,
        }
    }

    /// Store `record` under `order_id` and update the running sums.
    ///
    /// An identifier already present in this month is rejected and leaves the
    /// bucket untouched.
    pub fn add(&mut self, order_id: impl Into<String>, record: Record) -> Result<()> {
        let order_id = order_id.into();
        if order_id.is_empty() {
            return Err(StatsError::MissingField("order id".to_string()));
        }
        if self.positions.contains_key(&order_id) {
            return Err(StatsError::DuplicateOrder {
                order_id,
                month: self.name().to_string(),
            });
        }

        self.sum += record.total;
        if record.is_subset_member() {
            self.subset_sum += record.total;
        }
        self.positions.insert(order_id.clone(), self.orders.len());
        self.orders.push((order_id, record));
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.index]
    }

    /// Running sum of all totals.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Running sum of the totals of subset-flagged records.
    pub fn subset_sum(&self) -> f64 {
        self.subset_sum
    }

    /// The aggregate selected by `scope`.
    pub fn value(&self, scope: Scope) -> f64 {
        match scope {
            Scope::All => self.sum,
            Scope::Subset => self.subset_sum,
        }
    }

    pub fn get(&self, order_id: &str) -> Option<&Record> {
        self.positions.get(order_id).map(|&i| &self.orders[i].1)
    }

    /// Orders in insertion order.
    pub fn orders(&self) -> impl Iterator<Item = (&str, &Record)> {
        self.orders.iter().map(|(id, rec)| (id.as_str(), rec))
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

// ── YearLedger ────────────────────────────────────────────────────────────────

/// The twelve months of one year.
///
/// Records are added while loading; afterwards [`YearLedger::trim`] drops the
/// months without orders and the ledger is only queried.
#[derive(Debug, Clone)]
pub struct YearLedger {
    year: String,
    months: Vec<MonthBucket>,
    closed: bool,
}

impl YearLedger {
    pub fn new(year: impl Into<String>) -> Self {
        Self {
            year: year.into(),
            months: (0..12).map(MonthBucket::new).collect(),
            closed: false,
        }
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    /// Route `record` to the month of its date.
    ///
    /// Fails with [`StatsError::LedgerClosed`] once the ledger was trimmed.
    pub fn add(&mut self, order_id: impl Into<String>, record: Record) -> Result<()> {
        if self.closed {
            return Err(StatsError::LedgerClosed(self.year.clone()));
        }
        if record.date.year().to_string() != self.year {
            return Err(StatsError::YearMismatch {
                expected: self.year.clone(),
                found: record.date.to_string(),
            });
        }

        // Untrimmed ledgers hold all twelve months in order.
        self.months[record.date.month0() as usize].add(order_id, record)
    }

    /// Remove every month without orders, keeping ascending order.
    pub fn trim(&mut self) {
        self.months.retain(|m| !m.is_empty());
        self.closed = true;
    }

    /// `true` once [`YearLedger::trim`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Retained months in ascending order.
    pub fn months(&self) -> &[MonthBucket] {
        &self.months
    }

    pub fn month_count(&self) -> usize {
        self.months.len()
    }

    pub fn record_count(&self) -> usize {
        self.months.iter().map(MonthBucket::len).sum()
    }

    /// Months with the minimal and maximal aggregate.
    ///
    /// The first month reaching an extreme wins ties.
    pub fn extrema(&self, scope: Scope) -> Result<(Extremum, Extremum)> {
        let mut months = self.months.iter();
        let first = months
            .next()
            .ok_or_else(|| StatsError::EmptyLedger(self.year.clone()))?;

        let mut min = first;
        let mut max = first;
        for month in months {
            let value = month.value(scope);
            if value < min.value(scope) {
                min = month;
            }
            if value > max.value(scope) {
                max = month;
            }
        }

        Ok((self.extremum(min, scope), self.extremum(max, scope)))
    }

    /// Sum of the monthly aggregates.
    pub fn sum_total(&self, scope: Scope) -> f64 {
        self.months.iter().map(|m| m.value(scope)).sum()
    }

    /// Σ (month value − `mean`)² over the retained months.
    pub fn sum_of_squared_deviations(&self, mean: f64, scope: Scope) -> f64 {
        self.months
            .iter()
            .map(|m| (m.value(scope) - mean).powi(2))
            .sum()
    }

    /// Monthly aggregates in ascending month order.
    pub fn values(&self, scope: Scope) -> Vec<f64> {
        self.months.iter().map(|m| m.value(scope)).collect()
    }

    /// One label per retained month, e.g. `"MARCH 2021"` or `"MAR 2021"`.
    pub fn month_labels(&self, style: LabelStyle) -> Vec<String> {
        self.months
            .iter()
            .map(|m| match style {
                LabelStyle::Full => format!("{} {}", m.name(), self.year),
                LabelStyle::Short => format!("{} {}", &m.name()[..3], self.year),
            })
            .collect()
    }

    fn extremum(&self, month: &MonthBucket, scope: Scope) -> Extremum {
        Extremum {
            year: self.year.clone(),
            month: month.name().to_string(),
            value: month.value(scope),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
