//! Cumulated expenses line chart (ogive) for all orders and the subset.

use ratatui::{
    layout::Rect,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset as ChartSeries, GraphType},
    Frame,
};

use stats_core::formatting::format_euro_grouped;

use crate::themes::Theme;

/// Pair each value with its month position on the x axis.
pub fn points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

/// Lower and upper y bounds covering both curves, always including zero.
pub fn y_bounds(total: &[f64], subset: &[f64]) -> [f64; 2] {
    let (lo, hi) = total
        .iter()
        .chain(subset)
        .fold((0.0_f64, 0.0_f64), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi > lo {
        [lo, hi]
    } else {
        [lo, lo + 1.0]
    }
}

/// First, middle and last of `labels`; at most three x-axis ticks fit.
fn x_labels(labels: &[String]) -> Vec<Span<'_>> {
    match labels.len() {
        0 => Vec::new(),
        1 => vec![Span::raw(labels[0].as_str())],
        2 => vec![Span::raw(labels[0].as_str()), Span::raw(labels[1].as_str())],
        n => vec![
            Span::raw(labels[0].as_str()),
            Span::raw(labels[n / 2].as_str()),
            Span::raw(labels[n - 1].as_str()),
        ],
    }
}

/// Render the cumulated expenses of both scopes into `area`.
pub fn render_curve_view(
    frame: &mut Frame,
    area: Rect,
    labels: &[String],
    total: &[f64],
    subset: &[f64],
    theme: &Theme,
) {
    let total_points = points(total);
    let subset_points = points(subset);
    let [y_min, y_max] = y_bounds(total, subset);
    let x_max = labels.len().saturating_sub(1).max(1) as f64;

    let series = vec![
        ChartSeries::default()
            .name("Cumulated expenses in total")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.line_total)
            .data(&total_points),
        ChartSeries::default()
            .name("Cumulated expenses of the subset")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(theme.line_subset)
            .data(&subset_points),
    ];

    let chart = Chart::new(series)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Line::styled(" Cumulated expenses ", theme.title)),
        )
        .x_axis(
            Axis::default()
                .style(theme.axis)
                .bounds([0.0, x_max])
                .labels(x_labels(labels)),
        )
        .y_axis(
            Axis::default()
                .title("Expenses in €")
                .style(theme.axis)
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format_euro_grouped(y_min)),
                    Span::raw(format_euro_grouped(y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
