//! Analysis pipeline over a loaded dataset.
//!
//! Bundles the measures of both scopes with the per-month series the charts
//! need, returning an [`AnalysisReport`] ready for the presentation layer.

use serde::Serialize;
use stats_core::dataset::Dataset;
use stats_core::error::Result;
use stats_core::ledger::LabelStyle;
use stats_core::models::Scope;
use stats_core::statistics::{self, Measures};

// ── Public types ──────────────────────────────────────────────────────────────

/// Monthly series of one scope in ascending (year, month) order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySeries {
    pub scope: Scope,
    pub values: Vec<f64>,
    /// Running sum of `values`.
    pub cumulative: Vec<f64>,
}

impl MonthlySeries {
    fn of(dataset: &Dataset, scope: Scope) -> Self {
        Self {
            scope,
            values: statistics::flattened_values(dataset, scope),
            cumulative: statistics::cumulative_values(dataset, scope),
        }
    }
}

/// The complete output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Year labels in ascending order.
    pub years: Vec<String>,
    /// Number of records across all years.
    pub records: usize,
    /// `"JANUARY 2021"`-style label per retained month.
    pub labels: Vec<String>,
    /// `"JAN 2021"`-style label per retained month.
    pub short_labels: Vec<String>,
    pub total: MonthlySeries,
    pub subset: MonthlySeries,
    pub total_measures: Measures,
    pub subset_measures: Measures,
}

impl AnalysisReport {
    /// Measures of both scopes as pretty-printed JSON.
    pub fn measures_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "total": self.total_measures,
            "subset": self.subset_measures,
        }))
    }

    pub fn series(&self, scope: Scope) -> &MonthlySeries {
        match scope {
            Scope::All => &self.total,
            Scope::Subset => &self.subset,
        }
    }

    pub fn measures(&self, scope: Scope) -> &Measures {
        match scope {
            Scope::All => &self.total_measures,
            Scope::Subset => &self.subset_measures,
        }
    }
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run every analysis over `dataset`.
///
/// Fails with `EmptyDataset` when no year has a month with orders.
pub fn analyze(dataset: &Dataset) -> Result<AnalysisReport> {
    let total_measures = statistics::measures(dataset, Scope::All)?;
    let subset_measures = statistics::measures(dataset, Scope::Subset)?;

    Ok(AnalysisReport {
        years: dataset.years().map(str::to_string).collect(),
        records: dataset.record_count(),
        labels: dataset.month_labels(LabelStyle::Full),
        short_labels: dataset.month_labels(LabelStyle::Short),
        total: MonthlySeries::of(dataset, Scope::All),
        subset: MonthlySeries::of(dataset, Scope::Subset),
        total_measures,
        subset_measures,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
