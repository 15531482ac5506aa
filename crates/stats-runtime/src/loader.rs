//! Concurrent dataset loading.
//!
//! Every yearly report is loaded into its own ledger on tokio's blocking
//! pool. Ledgers share no state, so the years build in parallel while the
//! rows of one report are still added strictly in file order.

use std::path::Path;
use std::time::Instant;

use stats_core::dataset::Dataset;
use stats_core::error::{Result, StatsError};
use stats_data::reader::{find_year_files, load_year, LoadReport, RowPolicy, YearSource};
use tokio::task::JoinSet;

// ── Public types ──────────────────────────────────────────────────────────────

/// A finished dataset plus the per-report load counters, in year order.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub reports: Vec<LoadReport>,
}

impl LoadedDataset {
    /// Rows skipped across all reports.
    pub fn rows_skipped(&self) -> usize {
        self.reports.iter().map(|r| r.rows_skipped).sum()
    }
}

// ── DatasetLoader ─────────────────────────────────────────────────────────────

/// Builds a [`Dataset`] from a set of yearly reports.
///
/// # Example
/// ```no_run
/// use stats_data::reader::RowPolicy;
/// use stats_runtime::loader::DatasetLoader;
///
/// # async fn run() -> stats_core::Result<()> {
/// let loader = DatasetLoader::discover("data".as_ref(), "amazon_orders", RowPolicy::Skip)?;
/// let loaded = loader.load().await?;
/// println!("{} years", loaded.dataset.len());
/// # Ok(())
/// # }
/// ```
pub struct DatasetLoader {
    sources: Vec<YearSource>,
    policy: RowPolicy,
}

impl DatasetLoader {
    pub fn new(sources: Vec<YearSource>, policy: RowPolicy) -> Self {
        Self { sources, policy }
    }

    /// Collect the reports in `data_dir`; fails when there are none.
    pub fn discover(data_dir: &Path, suffix: &str, policy: RowPolicy) -> Result<Self> {
        let sources = find_year_files(data_dir, suffix)?;
        if sources.is_empty() {
            return Err(StatsError::NoDataFiles(data_dir.to_path_buf()));
        }
        Ok(Self::new(sources, policy))
    }

    pub fn sources(&self) -> &[YearSource] {
        &self.sources
    }

    /// Load every report concurrently and assemble the dataset.
    ///
    /// The first failing report aborts the load.
    pub async fn load(self) -> Result<LoadedDataset> {
        let started = Instant::now();
        let mut tasks = JoinSet::new();

        for source in self.sources {
            let policy = self.policy;
            tasks.spawn_blocking(move || load_year(&source, policy));
        }

        let mut dataset = Dataset::new();
        let mut reports = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (ledger, report) = joined.map_err(|e| StatsError::Other(anyhow::Error::new(e)))??;
            tracing::debug!(
                year = %report.year,
                rows = report.rows_added,
                skipped = report.rows_skipped,
                "report loaded"
            );
            dataset.insert(ledger)?;
            reports.push(report);
        }
        reports.sort_by(|a, b| a.year.cmp(&b.year));

        tracing::info!(
            years = dataset.len(),
            months = dataset.month_count(),
            records = dataset.record_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "dataset loaded"
        );

        Ok(LoadedDataset { dataset, reports })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use stats_core::models::Scope;
    use stats_core::statistics;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_report(dir: &Path, year: &str, rows: &[(&str, &str, &str, &str)]) {
        let path = dir.join(format!("{year}_amazon_orders.csv"));
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(
            file,
            "order id,items,to,date,total,shipping,shipping_refund,gift,VAT,refund,payments"
        )
        .unwrap();
        for (id, to, date, total) in rows {
            writeln!(
                file,
                "{id},Item,{to},{date},\"{total}\",\
                 \"0,00\",\"0,00\",\"0,00\",\"0,00\",\"0,00\",Visa"
            )
            .unwrap();
        }
    }

    // ── discover ──────────────────────────────────────────────────────────

    #[test]
    fn test_discover_no_reports() {
        let dir = TempDir::new().unwrap();
        let err = DatasetLoader::discover(dir.path(), "amazon_orders", RowPolicy::Skip)
            .err()
            .expect("empty directory must fail");
        assert!(matches!(err, StatsError::NoDataFiles(_)));
    }

    #[test]
    fn test_discover_lists_sources() {
        let dir = TempDir::new().unwrap();
        write_report(dir.path(), "2021", &[]);
        write_report(dir.path(), "2020", &[]);
        let loader = DatasetLoader::discover(dir.path(), "amazon_orders", RowPolicy::Skip).unwrap();
        let years: Vec<&str> = loader.sources().iter().map(|s| s.year.as_str()).collect();
        assert_eq!(years, vec!["2020", "2021"]);
    }

    // ── load ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_load_builds_all_years() {
        let dir = TempDir::new().unwrap();
        write_report(
            dir.path(),
            "2020",
            &[("a", "Jane", "2020-03-01", "10,00"), ("b", "0", "2020-04-01", "30,00")],
        );
        write_report(dir.path(), "2021", &[("c", "Jane", "2021-01-15", "20,00")]);
        write_report(dir.path(), "2019", &[("d", "Jane", "2019-12-24", "40,00")]);

        let loaded = DatasetLoader::discover(dir.path(), "amazon_orders", RowPolicy::Abort)
            .unwrap()
            .load()
            .await
            .unwrap();

        let years: Vec<&str> = loaded.dataset.years().collect();
        assert_eq!(years, vec!["2019", "2020", "2021"]);
        let report_years: Vec<&str> = loaded.reports.iter().map(|r| r.year.as_str()).collect();
        assert_eq!(report_years, years);
        assert_eq!(
            statistics::flattened_values(&loaded.dataset, Scope::All),
            vec![40.0, 10.0, 30.0, 20.0]
        );
        assert_eq!(loaded.rows_skipped(), 0);
    }

    #[tokio::test]
    async fn test_load_skip_policy_counts_rows() {
        let dir = TempDir::new().unwrap();
        write_report(
            dir.path(),
            "2021",
            &[("a", "Jane", "2021-01-15", "20,00"), ("b", "Jane", "2021-13-01", "1,00")],
        );

        let loaded = DatasetLoader::discover(dir.path(), "amazon_orders", RowPolicy::Skip)
            .unwrap()
            .load()
            .await
            .unwrap();
        assert_eq!(loaded.rows_skipped(), 1);
        assert_eq!(loaded.dataset.record_count(), 1);
    }

    #[tokio::test]
    async fn test_load_abort_policy_fails() {
        let dir = TempDir::new().unwrap();
        write_report(dir.path(), "2020", &[("a", "Jane", "2020-01-15", "20,00")]);
        write_report(dir.path(), "2021", &[("b", "Jane", "2020-01-15", "1,00")]);

        let result = DatasetLoader::discover(dir.path(), "amazon_orders", RowPolicy::Abort)
            .unwrap()
            .load()
            .await;
        match result {
            Err(StatsError::Row { source, .. }) => {
                assert!(matches!(*source, StatsError::YearMismatch { .. }))
            }
            other => panic!("expected row error, got {:?}", other.map(|l| l.dataset.len())),
        }
    }
}
