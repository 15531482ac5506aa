mod bootstrap;

use anyhow::{Context, Result};
use stats_core::models::Scope;
use stats_core::settings::{Analyses, Settings};
use stats_data::analysis::{analyze, AnalysisReport};
use stats_data::reader::RowPolicy;
use stats_runtime::loader::DatasetLoader;
use stats_ui::app::{App, ChartData, ViewMode};
use stats_ui::report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("order-stats v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Data dir: {}, suffix: {}, analyses: {:?}",
        settings.data_dir.display(),
        settings.suffix,
        settings.analysis
    );

    let loader = DatasetLoader::discover(
        &settings.data_dir,
        &settings.suffix,
        RowPolicy::from_strict(settings.strict),
    )
    .with_context(|| format!("reading reports from {}", settings.data_dir.display()))?;
    let loaded = loader.load().await.context("loading reports")?;

    if loaded.rows_skipped() > 0 {
        tracing::warn!("{} malformed rows were skipped", loaded.rows_skipped());
    }

    let analyses = settings.analyses();
    if analyses.is_empty() {
        print!("{}", report::render_dataset(&loaded.dataset));
        return Ok(());
    }

    let analysis = analyze(&loaded.dataset).context("analysing reports")?;

    if analyses.measures {
        if settings.json {
            println!("{}", analysis.measures_json()?);
        } else {
            print!("{}", measures_text(&analysis));
        }
    }

    let views = chart_views(analyses);
    if !views.is_empty() {
        tracing::info!("Opening {} chart views", views.len());
        let app = App::new(&settings.theme, views, ChartData::from_report(&analysis));
        app.run().await?;
    }

    Ok(())
}

/// Chart views for the selected analyses, in display order.
fn chart_views(analyses: Analyses) -> Vec<ViewMode> {
    let mut views = Vec::new();
    if analyses.cumulated {
        views.push(ViewMode::Cumulative);
    }
    if analyses.monthly {
        views.push(ViewMode::MonthlyTotal);
        views.push(ViewMode::MonthlySubset);
    }
    views
}

/// Measures of every order followed by those of the subset.
fn measures_text(analysis: &AnalysisReport) -> String {
    format!(
        "{}\n\n{}\n{}\n\n{}\n",
        report::banner("Measures Total"),
        report::render_measures(analysis.measures(Scope::All)),
        report::banner("Measures Subset"),
        report::render_measures(analysis.measures(Scope::Subset)),
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn load_report(rows: &[&str]) -> AnalysisReport {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("2021_amazon_orders.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "order id,items,to,date,total,shipping,shipping_refund,gift,VAT,refund,payments"
        )
        .unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }

        let runtime = tokio::runtime::Runtime::new().unwrap();
        let loaded = runtime
            .block_on(
                DatasetLoader::discover(tmp.path(), "amazon_orders", RowPolicy::Abort)
                    .unwrap()
                    .load(),
            )
            .unwrap();
        analyze(&loaded.dataset).unwrap()
    }

    #[test]
    fn test_chart_views_all() {
        let analyses = Analyses::from_codes(&["ALL"]).unwrap();
        assert_eq!(
            chart_views(analyses),
            vec![
                ViewMode::Cumulative,
                ViewMode::MonthlyTotal,
                ViewMode::MonthlySubset
            ]
        );
    }

    #[test]
    fn test_chart_views_measures_only() {
        let analyses = Analyses::from_codes(&["ME"]).unwrap();
        assert!(chart_views(analyses).is_empty());
    }

    #[test]
    fn test_chart_views_monthly() {
        let analyses = Analyses::from_codes(&["MC"]).unwrap();
        assert_eq!(
            chart_views(analyses),
            vec![ViewMode::MonthlyTotal, ViewMode::MonthlySubset]
        );
    }

    #[test]
    fn test_measures_text_has_both_sections() {
        let analysis = load_report(&[
            "a,Book,Jane,2021-01-04,\"10,00\",\"0,00\",\"0,00\",\"0,00\",\"0,00\",\"0,00\",Visa",
            "b,Film,0,2021-02-04,\"4,00\",\"0,00\",\"0,00\",\"0,00\",\"0,00\",\"0,00\",Visa",
        ]);
        let text = measures_text(&analysis);

        let total = text.find("########## Measures Total ##########").unwrap();
        let subset = text.find("########## Measures Subset ##########").unwrap();
        assert!(total < subset);
        assert!(text[..subset].contains("Sum total: 14.00 €"));
        assert!(text[subset..].contains("Sum total: 4.00 €"));
        assert!(text[subset..].contains("Minimum: JANUARY 2021 --> 0.00 €"));
    }
}
