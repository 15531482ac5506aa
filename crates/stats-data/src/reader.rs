//! Report discovery and CSV loading.
//!
//! A data directory holds one CSV report per year, named
//! `<yyyy>_<suffix>.csv`. Each row becomes a [`Record`] filed into the
//! [`YearLedger`] of its report.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use stats_core::error::{Result, StatsError};
use stats_core::ledger::YearLedger;
use stats_core::models::Record;
use tracing::{debug, warn};

// ── Public types ──────────────────────────────────────────────────────────────

/// One yearly report found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSource {
    /// Four-digit year taken from the file name.
    pub year: String,
    pub path: PathBuf,
}

/// A CSV row split into its order identifier and the remaining fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based line number in the file.
    pub line: u64,
    pub order_id: String,
    /// Remaining columns keyed by normalised header name.
    pub fields: HashMap<String, String>,
}

/// What to do with a row that cannot be added to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowPolicy {
    /// Log a warning and continue with the next row.
    #[default]
    Skip,
    /// Stop loading and return the error.
    Abort,
}

impl RowPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            RowPolicy::Abort
        } else {
            RowPolicy::Skip
        }
    }
}

/// Counters for one loaded report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub year: String,
    pub rows_read: usize,
    pub rows_added: usize,
    pub rows_skipped: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find every `<yyyy>_<suffix>.csv` directly inside `data_dir`, sorted by year.
pub fn find_year_files(data_dir: &Path, suffix: &str) -> Result<Vec<YearSource>> {
    if !data_dir.is_dir() {
        return Err(StatsError::DataPathNotFound(data_dir.to_path_buf()));
    }

    let pattern = Regex::new(&format!(r"^([0-9]{{4}})_{}\.csv$", regex::escape(suffix)))
        .map_err(|e| StatsError::Config(format!("invalid suffix '{suffix}': {e}")))?;

    let mut sources: Vec<YearSource> = walkdir::WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            let year = pattern.captures(&name)?.get(1)?.as_str().to_string();
            Some(YearSource {
                year,
                path: entry.into_path(),
            })
        })
        .collect();

    sources.sort_by(|a, b| a.year.cmp(&b.year));
    debug!("Found {} reports in {}", sources.len(), data_dir.display());
    Ok(sources)
}

/// Read all rows of a CSV report.
///
/// The first column holds the order identifier whatever its header says.
/// Header names are trimmed, lower-cased and stripped of a byte-order mark,
/// so a `VAT` column is available as `vat`.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).map_err(|source| StatsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(normalise_header).collect();
    if headers.is_empty() {
        debug!("{} is empty, no orders read", path.display());
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let order_id = record.get(0).unwrap_or_default().trim().to_string();
        let fields = headers
            .iter()
            .skip(1)
            .zip(record.iter().skip(1))
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect();

        rows.push(RawRow {
            line,
            order_id,
            fields,
        });
    }

    Ok(rows)
}

/// Build the trimmed ledger of one yearly report.
///
/// Rows are added in file order. A row that fails to parse or is rejected by
/// the ledger is handled according to `policy`.
pub fn load_year(source: &YearSource, policy: RowPolicy) -> Result<(YearLedger, LoadReport)> {
    let rows = read_rows(&source.path)?;
    let mut ledger = YearLedger::new(source.year.clone());
    let mut report = LoadReport {
        year: source.year.clone(),
        ..Default::default()
    };

    for row in rows {
        report.rows_read += 1;

        let added = Record::from_fields(&row.fields)
            .and_then(|record| ledger.add(row.order_id.clone(), record));

        match added {
            Ok(()) => report.rows_added += 1,
            Err(e) => {
                let err = StatsError::Row {
                    path: source.path.clone(),
                    line: row.line,
                    source: Box::new(e),
                };
                match policy {
                    RowPolicy::Abort => return Err(err),
                    RowPolicy::Skip => {
                        warn!("Skipping row: {}", err);
                        report.rows_skipped += 1;
                    }
                }
            }
        }
    }

    ledger.trim();

    debug!(
        "Report {}: {} read, {} added, {} skipped, {} months",
        source.path.display(),
        report.rows_read,
        report.rows_added,
        report.rows_skipped,
        ledger.month_count(),
    );

    Ok((ledger, report))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn normalise_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
