//! Descriptive statistics over the monthly aggregates of a [`Dataset`].
//!
//! Every function works on retained months only: a year contributes as many
//! observations as it has months with orders.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, StatsError};
use crate::ledger::Extremum;
use crate::models::Scope;

// ── Order statistics ──────────────────────────────────────────────────────────

/// First and third quartile plus their distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Median of an ascending **sorted** slice.
///
/// Even lengths average the two middle elements.
pub fn median(sorted: &[f64]) -> Result<f64> {
    let n = sorted.len();
    if n == 0 {
        return Err(StatsError::EmptyInput);
    }
    let mid = n / 2;
    if n % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Quartiles of an ascending **sorted** slice by the exclusive-median method.
///
/// The lower half is the first `n / 2` elements. The upper half starts after
/// them for even `n` and one element later for odd `n`, so the middle element
/// belongs to neither half.
pub fn quartiles(sorted: &[f64]) -> Result<Quartiles> {
    let mid = sorted.len() / 2;
    let lower = &sorted[..mid];
    let upper = if sorted.len() % 2 == 0 {
        &sorted[mid..]
    } else {
        &sorted[mid + 1..]
    };

    let q1 = median(lower)?;
    let q3 = median(upper)?;
    Ok(Quartiles { q1, q3, iqr: q3 - q1 })
}

// ── Dataset statistics ────────────────────────────────────────────────────────

/// Months with the minimal and maximal aggregate across all years.
///
/// Years are scanned in ascending order and the first extreme found wins
/// ties. Years without retained months are passed over.
pub fn extrema(dataset: &Dataset, scope: Scope) -> Result<(Extremum, Extremum)> {
    let mut result: Option<(Extremum, Extremum)> = None;

    for ledger in dataset.iter().filter(|l| l.month_count() > 0) {
        let (min_new, max_new) = ledger.extrema(scope)?;
        result = Some(match result {
            None => (min_new, max_new),
            Some((min, max)) => (
                if min_new.value < min.value { min_new } else { min },
                if max_new.value > max.value { max_new } else { max },
            ),
        });
    }

    result.ok_or(StatsError::EmptyDataset)
}

/// Sum of every retained month's aggregate.
pub fn sum_total(dataset: &Dataset, scope: Scope) -> f64 {
    dataset.iter().map(|l| l.sum_total(scope)).sum()
}

/// Mean monthly aggregate, over retained months only.
pub fn mean(dataset: &Dataset, scope: Scope) -> Result<f64> {
    let months = non_empty_month_count(dataset)?;
    Ok(sum_total(dataset, scope) / months as f64)
}

/// Population variance of the monthly aggregates.
pub fn variance(dataset: &Dataset, scope: Scope) -> Result<f64> {
    let months = non_empty_month_count(dataset)?;
    let mean = sum_total(dataset, scope) / months as f64;
    let squares: f64 = dataset
        .iter()
        .map(|l| l.sum_of_squared_deviations(mean, scope))
        .sum();
    Ok(squares / months as f64)
}

pub fn standard_deviation(dataset: &Dataset, scope: Scope) -> Result<f64> {
    variance(dataset, scope).map(f64::sqrt)
}

/// Every retained month's aggregate in ascending (year, month) order.
pub fn flattened_values(dataset: &Dataset, scope: Scope) -> Vec<f64> {
    dataset.iter().flat_map(|l| l.values(scope)).collect()
}

/// Running sum of [`flattened_values`].
pub fn cumulative_values(dataset: &Dataset, scope: Scope) -> Vec<f64> {
    flattened_values(dataset, scope)
        .into_iter()
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// [`flattened_values`] sorted ascending, ready for [`median`] and [`quartiles`].
pub fn sorted_values(dataset: &Dataset, scope: Scope) -> Vec<f64> {
    let mut values = flattened_values(dataset, scope);
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

fn non_empty_month_count(dataset: &Dataset) -> Result<usize> {
    match dataset.month_count() {
        0 => Err(StatsError::EmptyDataset),
        n => Ok(n),
    }
}

// ── Measures ──────────────────────────────────────────────────────────────────

/// All descriptive measures of one scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measures {
    pub scope: Scope,
    /// Number of monthly observations.
    pub months: usize,
    pub minimum: Extremum,
    pub maximum: Extremum,
    pub sum: f64,
    pub mean: f64,
    pub variance: f64,
    pub standard_deviation: f64,
    pub median: f64,
    /// `None` when fewer than two months are available.
    pub quartiles: Option<Quartiles>,
}

/// Compute every measure of `scope` in one pass over the dataset.
pub fn measures(dataset: &Dataset, scope: Scope) -> Result<Measures> {
    let (minimum, maximum) = extrema(dataset, scope)?;
    let variance = variance(dataset, scope)?;
    let sorted = sorted_values(dataset, scope);
    let quartiles = match quartiles(&sorted) {
        Ok(q) => Some(q),
        Err(StatsError::EmptyInput) => None,
        Err(e) => return Err(e),
    };

    Ok(Measures {
        scope,
        months: sorted.len(),
        minimum,
        maximum,
        sum: sum_total(dataset, scope),
        mean: mean(dataset, scope)?,
        variance,
        standard_deviation: variance.sqrt(),
        median: median(&sorted)?,
        quartiles,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
