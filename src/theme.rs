use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme described by the user's config. Only the first call wins.
pub fn init(config: &ThemeConfig) {
    if THEME.set(config.to_theme()).is_err() {
        tracing::debug!("theme already initialised");
    }
}

/// Get the active theme, falling back to the default preset.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub highlight: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
        }
    }
}

impl Theme {
    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::palette(
                (248, 248, 242),
                (139, 233, 253),
                (98, 114, 164),
                (68, 71, 90),
            ),
            "gruvbox" => Self::palette(
                (235, 219, 178),
                (131, 165, 152),
                (146, 131, 116),
                (80, 73, 69),
            ),
            "nord" => Self::palette(
                (229, 233, 240),
                (136, 192, 208),
                (76, 86, 106),
                (67, 76, 94),
            ),
            _ => Self::default(),
        }
    }

    fn palette(
        fg: (u8, u8, u8),
        accent: (u8, u8, u8),
        dim: (u8, u8, u8),
        surface: (u8, u8, u8),
    ) -> Self {
        let rgb = |(r, g, b): (u8, u8, u8)| Color::Rgb(r, g, b);
        Self {
            selected: Style::default().fg(Color::Black).bg(rgb(accent)),
            header: Style::default().fg(rgb(fg)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(rgb(dim)),
            border: Style::default().fg(rgb(surface)),
            status: Style::default().fg(rgb(fg)).bg(rgb(surface)),
            highlight: Style::default().bg(rgb(surface)).add_modifier(Modifier::BOLD),
        }
    }
}

// ── TOML config types ──

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ThemeConfig {
    preset: Option<String>,
    selected_fg: Option<String>,
    selected_bg: Option<String>,
    header_fg: Option<String>,
    dim_fg: Option<String>,
    border_fg: Option<String>,
    status_fg: Option<String>,
    status_bg: Option<String>,
    highlight_bg: Option<String>,
}

impl ThemeConfig {
    fn to_theme(&self) -> Theme {
        // Start from preset or default
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        // Override individual colors
        if let Some(c) = self.selected_fg.as_deref().and_then(parse_color) {
            theme.selected = theme.selected.fg(c);
        }
        if let Some(c) = self.selected_bg.as_deref().and_then(parse_color) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = self.header_fg.as_deref().and_then(parse_color) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = self.dim_fg.as_deref().and_then(parse_color) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = self.border_fg.as_deref().and_then(parse_color) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = self.status_fg.as_deref().and_then(parse_color) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = self.status_bg.as_deref().and_then(parse_color) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = self.highlight_bg.as_deref().and_then(parse_color) {
            theme.highlight = theme.highlight.bg(c);
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(s.get(1..3)?, 16).ok()?;
        let g = u8::from_str_radix(s.get(3..5)?, 16).ok()?;
        let b = u8::from_str_radix(s.get(5..7)?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}
