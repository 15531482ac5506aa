//! Chart application state and TUI event loop.
//!
//! [`App`] owns the theme, the chart data and the list of views selected on
//! the command line. `Tab` / `→` and `Shift+Tab` / `←` cycle through the
//! views; `q` or `Ctrl+C` quits.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame, Terminal,
};

use stats_data::analysis::AnalysisReport;

use crate::bar_view;
use crate::curve_view;
use crate::themes::Theme;

// ── ViewMode ──────────────────────────────────────────────────────────────────

/// One chart view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Monthly expenses of every order.
    MonthlyTotal,
    /// Monthly expenses of the subset.
    MonthlySubset,
    /// Cumulated expenses of both scopes.
    Cumulative,
}

impl ViewMode {
    pub fn title(self) -> &'static str {
        match self {
            ViewMode::MonthlyTotal => "Monthly expenses",
            ViewMode::MonthlySubset => "Monthly expenses of the subset",
            ViewMode::Cumulative => "Cumulated expenses",
        }
    }
}

// ── ChartData ─────────────────────────────────────────────────────────────────

/// Series the chart views draw, in (year, month) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    /// `"JANUARY 2021"`-style labels for the bar views.
    pub labels: Vec<String>,
    /// `"JAN 2021"`-style labels for the curve axis.
    pub short_labels: Vec<String>,
    pub total: Vec<f64>,
    pub subset: Vec<f64>,
    pub total_cumulative: Vec<f64>,
    pub subset_cumulative: Vec<f64>,
}

impl ChartData {
    pub fn from_report(report: &AnalysisReport) -> Self {
        Self {
            labels: report.labels.clone(),
            short_labels: report.short_labels.clone(),
            total: report.total.values.clone(),
            subset: report.subset.values.clone(),
            total_cumulative: report.total.cumulative.clone(),
            subset_cumulative: report.subset.cumulative.clone(),
        }
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    pub theme: Theme,
    pub views: Vec<ViewMode>,
    /// Index into `views`.
    pub current: usize,
    pub data: ChartData,
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, views: Vec<ViewMode>, data: ChartData) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            views,
            current: 0,
            data,
            should_quit: false,
        }
    }

    /// The view currently on screen, `None` when no view was selected.
    pub fn view_mode(&self) -> Option<ViewMode> {
        self.views.get(self.current).copied()
    }

    pub fn next_view(&mut self) {
        if !self.views.is_empty() {
            self.current = (self.current + 1) % self.views.len();
        }
    }

    pub fn previous_view(&mut self) {
        if !self.views.is_empty() {
            self.current = (self.current + self.views.len() - 1) % self.views.len();
        }
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.next_view(),
            KeyCode::BackTab | KeyCode::Left => self.previous_view(),
            _ => {}
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the chart TUI until the user quits.
    ///
    /// Redraws on every tick so terminal resizes are picked up.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the tab bar, the current view and the key hints into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let [tabs_area, body, hint] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let titles: Vec<Line> = self.views.iter().map(|v| Line::from(v.title())).collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border)
                    .title(Line::styled(" Order statistics ", self.theme.title)),
            )
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .select(self.current);
        frame.render_widget(tabs, tabs_area);

        match self.view_mode() {
            Some(mode @ ViewMode::MonthlyTotal) => bar_view::render_bar_view(
                frame,
                body,
                mode.title(),
                &self.data.labels,
                &self.data.total,
                &self.theme,
            ),
            Some(mode @ ViewMode::MonthlySubset) => bar_view::render_bar_view(
                frame,
                body,
                mode.title(),
                &self.data.labels,
                &self.data.subset,
                &self.theme,
            ),
            Some(ViewMode::Cumulative) => curve_view::render_curve_view(
                frame,
                body,
                &self.data.short_labels,
                &self.data.total_cumulative,
                &self.data.subset_cumulative,
                &self.theme,
            ),
            None => render_no_view(frame, body, &self.theme),
        }

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Tab/←/→ switch view · q quit",
                self.theme.dim,
            ))),
            hint,
        );
    }
}

fn render_no_view(frame: &mut Frame, area: Rect, theme: &Theme) {
    let paragraph = Paragraph::new(Line::from(Span::styled("No chart selected", theme.warning)))
        .block(Block::default().borders(Borders::ALL).border_style(theme.border));
    frame.render_widget(paragraph, area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
