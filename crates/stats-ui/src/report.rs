//! Plain-text reports written to stdout.
//!
//! [`render_dataset`] lists every order of every year; [`render_measures`]
//! prints the descriptive measures of one scope.

use std::fmt::Write;

use stats_core::dataset::Dataset;
use stats_core::formatting::{format_date, format_euro, format_euro_squared};
use stats_core::ledger::{MonthBucket, YearLedger};
use stats_core::models::Record;
use stats_core::statistics::Measures;

/// `########## <title> ##########`
pub fn banner(title: &str) -> String {
    let hashes = "#".repeat(10);
    format!("{hashes} {title} {hashes}")
}

/// Every order of `dataset`, year by year and month by month.
pub fn render_dataset(dataset: &Dataset) -> String {
    let mut out = String::new();
    for ledger in dataset.iter() {
        let _ = writeln!(out, "{}\n", banner(ledger.year()));
        out.push_str(&render_year(ledger));
        out.push('\n');
    }
    out
}

fn render_year(ledger: &YearLedger) -> String {
    let mut out = String::new();
    for month in ledger.months() {
        out.push_str(&render_month(month));
        out.push('\n');
    }
    out
}

fn render_month(month: &MonthBucket) -> String {
    let name = month.name();
    let mut out = format!("{}:\n{}\n\n", name, "-".repeat(name.len() + 1));
    for (order_id, record) in month.orders() {
        let _ = write!(out, "Order ID: {}\n\n{}\n\n", order_id, render_record(record));
    }
    out
}

/// One order as a block of `Label: value` lines.
pub fn render_record(record: &Record) -> String {
    let subset = if record.is_subset_member() { "Yes" } else { "No" };
    [
        format!("Items: {}", record.items),
        format!("Subset: {}", subset),
        format!("Date: {}", format_date(record.date)),
        format!("Total: {:.2}", record.total),
        format!("Shipping: {:.2}", record.shipping),
        format!("Shipping refund: {:.2}", record.shipping_refund),
        format!("Gift: {:.2}", record.gift),
        format!("VAT: {:.2}", record.vat),
        format!("Refund: {:.2}", record.refund),
        format!("Payments: {}", record.payments),
    ]
    .join("\n")
}

/// The measures of one scope, one line each.
///
/// Quartile lines read `n/a` when fewer than two months exist.
pub fn render_measures(measures: &Measures) -> String {
    let quartile = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), format_euro);
    let q = measures.quartiles;

    let lines = [
        format!(
            "Minimum: {} {} --> {}",
            measures.minimum.month,
            measures.minimum.year,
            format_euro(measures.minimum.value)
        ),
        format!(
            "Maximum: {} {} --> {}",
            measures.maximum.month,
            measures.maximum.year,
            format_euro(measures.maximum.value)
        ),
        format!("Sum total: {}", format_euro(measures.sum)),
        format!("Mean: {}", format_euro(measures.mean)),
        format!("Variance: {}", format_euro_squared(measures.variance)),
        format!("Standard deviation: {}", format_euro(measures.standard_deviation)),
        format!("Q1: {}", quartile(q.map(|q| q.q1))),
        format!("Median: {}", format_euro(measures.median)),
        format!("Q3: {}", quartile(q.map(|q| q.q3))),
        format!("IQR: {}", quartile(q.map(|q| q.iqr))),
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stats_core::ledger::YearLedger;
    use stats_core::models::{Recipient, Scope};
    use stats_core::statistics;

    fn record(date: (i32, u32, u32), total: f64, subset: bool) -> Record {
        Record {
            items: "Book".to_string(),
            recipient: if subset {
                Recipient::SubsetMarker
            } else {
                Recipient::Named("Jane".to_string())
            },
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            total,
            shipping: 0.0,
            shipping_refund: 0.0,
            gift: 0.0,
            vat: 1.5,
            refund: 0.0,
            payments: "Visa".to_string(),
        }
    }

    fn dataset(entries: &[(&str, (i32, u32, u32), f64, bool)]) -> Dataset {
        let mut ledger = YearLedger::new(entries[0].1 .0.to_string());
        for (id, date, total, subset) in entries {
            ledger.add(*id, record(*date, *total, *subset)).unwrap();
        }
        let mut dataset = Dataset::new();
        dataset.insert(ledger).unwrap();
        dataset
    }

    #[test]
    fn test_banner() {
        assert_eq!(banner("2021"), "########## 2021 ##########");
    }

    #[test]
    fn test_render_record() {
        let text = render_record(&record((2021, 3, 7), 12.5, true));
        assert!(text.starts_with("Items: Book\nSubset: Yes\nDate: 07.03.2021\n"));
        assert!(text.contains("Total: 12.50"));
        assert!(text.contains("VAT: 1.50"));
        assert!(text.ends_with("Payments: Visa"));
    }

    #[test]
    fn test_render_dataset_layout() {
        let data = dataset(&[
            ("a", (2021, 3, 7), 12.5, false),
            ("b", (2021, 1, 2), 4.0, true),
        ]);
        let text = render_dataset(&data);

        assert!(text.starts_with("########## 2021 ##########\n\n"));
        assert!(text.contains("JANUARY:\n--------\n\nOrder ID: b\n\n"));
        assert!(text.contains("MARCH:\n------\n\nOrder ID: a\n\n"));
        // Months in calendar order.
        assert!(text.find("JANUARY").unwrap() < text.find("MARCH").unwrap());
        assert!(!text.contains("FEBRUARY"));
    }

    #[test]
    fn test_render_dataset_empty() {
        assert_eq!(render_dataset(&Dataset::new()), "");
    }

    #[test]
    fn test_render_measures() {
        let data = dataset(&[
            ("a", (2021, 1, 2), 10.0, false),
            ("b", (2021, 2, 2), 20.0, false),
            ("c", (2021, 3, 2), 30.0, false),
            ("d", (2021, 4, 2), 40.0, false),
        ]);
        let measures = statistics::measures(&data, Scope::All).unwrap();
        let text = render_measures(&measures);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Minimum: JANUARY 2021 --> 10.00 €");
        assert_eq!(lines[1], "Maximum: APRIL 2021 --> 40.00 €");
        assert_eq!(lines[2], "Sum total: 100.00 €");
        assert_eq!(lines[3], "Mean: 25.00 €");
        assert_eq!(lines[4], "Variance: 125.00 €^2");
        assert_eq!(lines[6], "Q1: 15.00 €");
        assert_eq!(lines[7], "Median: 25.00 €");
        assert_eq!(lines[8], "Q3: 35.00 €");
        assert_eq!(lines[9], "IQR: 20.00 €");
    }

    #[test]
    fn test_render_measures_single_month_has_no_quartiles() {
        let data = dataset(&[("a", (2021, 5, 1), 9.99, true)]);
        let measures = statistics::measures(&data, Scope::Subset).unwrap();
        let text = render_measures(&measures);
        assert!(text.contains("Q1: n/a\n"));
        assert!(text.contains("IQR: n/a\n"));
        assert!(text.contains("Median: 9.99 €"));
    }
}
