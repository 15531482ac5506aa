use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Styles used by the chart views.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Frame ────────────────────────────────────────────────────────────────
    pub title: Style,
    pub border: Style,
    pub dim: Style,
    pub warning: Style,

    // ── Tabs ─────────────────────────────────────────────────────────────────
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Bars ─────────────────────────────────────────────────────────────────
    pub bar: Style,
    pub bar_value: Style,
    pub bar_label: Style,

    // ── Curves ───────────────────────────────────────────────────────────────
    /// Cumulated expenses of every order.
    pub line_total: Style,
    /// Cumulated expenses of the subset.
    pub line_subset: Style,
    pub axis: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            dim: Style::default().fg(Color::DarkGray),
            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            bar: Style::default().fg(Color::Cyan),
            bar_value: Style::default().fg(Color::Black).bg(Color::Cyan),
            bar_label: Style::default().fg(Color::Gray),

            line_total: Style::default().fg(Color::Cyan),
            line_subset: Style::default().fg(Color::Magenta),
            axis: Style::default().fg(Color::Gray),
        }
    }

    /// Light-background terminal theme.
    pub fn light() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            dim: Style::default().fg(Color::Gray),
            warning: Style::default().fg(Color::Red),

            tab_active: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            bar: Style::default().fg(Color::Blue),
            bar_value: Style::default().fg(Color::White).bg(Color::Blue),
            bar_label: Style::default().fg(Color::DarkGray),

            line_total: Style::default().fg(Color::Blue),
            line_subset: Style::default().fg(Color::Magenta),
            axis: Style::default().fg(Color::DarkGray),
        }
    }

    /// Basic 8-colour ANSI palette without modifiers.
    pub fn classic() -> Self {
        Self {
            title: Style::default().fg(Color::Cyan),
            border: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::White),
            warning: Style::default().fg(Color::Yellow),

            tab_active: Style::default().fg(Color::Yellow),
            tab_inactive: Style::default().fg(Color::White),

            bar: Style::default().fg(Color::Green),
            bar_value: Style::default().fg(Color::Black).bg(Color::Green),
            bar_label: Style::default().fg(Color::White),

            line_total: Style::default().fg(Color::Green),
            line_subset: Style::default().fg(Color::Red),
            axis: Style::default().fg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for `"auto"`
    /// and unknown names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
