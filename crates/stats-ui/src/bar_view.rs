//! Horizontal bar chart of the monthly expenses.
//!
//! One bar per retained month, top to bottom in chronological order.

use ratatui::{
    layout::{Direction, Rect},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use stats_core::formatting::format_euro_grouped;

use crate::themes::Theme;

/// Bars are drawn in cents so two decimals survive the integer widget.
/// Negative months (refund-heavy) are drawn as empty bars.
pub fn bar_value(amount: f64) -> u64 {
    if amount.is_finite() && amount > 0.0 {
        (amount * 100.0).round() as u64
    } else {
        0
    }
}

/// Build the bars for `labels` / `values`, pairing them by position.
pub fn build_bars<'a>(labels: &'a [String], values: &[f64], theme: &Theme) -> Vec<Bar<'a>> {
    labels
        .iter()
        .zip(values)
        .map(|(label, &value)| {
            Bar::default()
                .value(bar_value(value))
                .text_value(format_euro_grouped(value))
                .label(Line::from(label.as_str()))
                .style(theme.bar)
                .value_style(theme.bar_value)
        })
        .collect()
}

/// Render the monthly bar chart titled `title` into `area`.
pub fn render_bar_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    labels: &[String],
    values: &[f64],
    theme: &Theme,
) {
    let bars = build_bars(labels, values, theme);
    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border)
                .title(Line::styled(format!(" {} ", title), theme.title)),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .label_style(theme.bar_label)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
