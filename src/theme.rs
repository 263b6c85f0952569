//! Color themes for the terminal UI
//!
//! Three schemes, selectable with `--theme` or `POKEVIEW_THEME`.

use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

/// Available color themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    /// Nord-inspired (default) - modern muted colors
    #[default]
    Nord,
    /// Amber CRT - orange/amber text on black
    AmberCrt,
    /// Green Phosphor - green text on black
    GreenPhosphor,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nord" => Ok(Theme::Nord),
            "amber" | "ambercrt" | "amber-crt" => Ok(Theme::AmberCrt),
            "green" | "greenphosphor" | "green-phosphor" => Ok(Theme::GreenPhosphor),
            _ => Err(format!(
                "Unknown theme '{s}'. Available: nord, amber-crt, green-phosphor"
            )),
        }
    }
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Nord => ColorScheme::nord(),
            Theme::AmberCrt => ColorScheme::amber_crt(),
            Theme::GreenPhosphor => ColorScheme::green_phosphor(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Nord => write!(f, "nord"),
            Theme::AmberCrt => write!(f, "amber-crt"),
            Theme::GreenPhosphor => write!(f, "green-phosphor"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    pub text: Color,
    /// Secondary info (urls, hints)
    pub text_dim: Color,
    /// Active tab, focused borders, key hints
    pub accent: Color,
    pub border: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Type chips
    pub chip: Color,
    /// Filled part of stat bars
    pub bar: Color,
    pub error: Color,
    pub success: Color,
}

impl ColorScheme {
    pub fn nord() -> Self {
        Self {
            text: Color::White,
            text_dim: Color::Gray,
            accent: Color::Yellow,
            border: Color::Gray,
            selection_bg: Color::Yellow,
            selection_fg: Color::Black,
            chip: Color::Cyan,
            bar: Color::LightBlue,
            error: Color::Red,
            success: Color::Green,
        }
    }

    pub fn amber_crt() -> Self {
        Self {
            text: Color::Rgb(255, 176, 0),
            text_dim: Color::Rgb(180, 120, 0),
            accent: Color::Rgb(255, 210, 90),
            border: Color::Rgb(150, 100, 0),
            selection_bg: Color::Rgb(255, 176, 0),
            selection_fg: Color::Black,
            chip: Color::Rgb(255, 200, 60),
            bar: Color::Rgb(255, 150, 0),
            error: Color::Rgb(255, 90, 40),
            success: Color::Rgb(255, 210, 90),
        }
    }

    pub fn green_phosphor() -> Self {
        Self {
            text: Color::Rgb(51, 255, 51),
            text_dim: Color::Rgb(30, 160, 30),
            accent: Color::Rgb(170, 255, 170),
            border: Color::Rgb(20, 130, 20),
            selection_bg: Color::Rgb(51, 255, 51),
            selection_fg: Color::Black,
            chip: Color::Rgb(120, 255, 120),
            bar: Color::Rgb(0, 200, 0),
            error: Color::Rgb(255, 80, 80),
            success: Color::Rgb(170, 255, 170),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("nord".parse::<Theme>(), Ok(Theme::Nord));
        assert_eq!("AMBER".parse::<Theme>(), Ok(Theme::AmberCrt));
        assert_eq!("green-phosphor".parse::<Theme>(), Ok(Theme::GreenPhosphor));
        assert!("dos".parse::<Theme>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for t in [Theme::Nord, Theme::AmberCrt, Theme::GreenPhosphor] {
            assert_eq!(t.to_string().parse::<Theme>(), Ok(t));
        }
    }

    #[test]
    fn test_selection_is_readable() {
        for t in [Theme::Nord, Theme::AmberCrt, Theme::GreenPhosphor] {
            let c = t.colors();
            assert_ne!(c.selection_bg, c.selection_fg);
            assert_ne!(c.error, c.text);
        }
    }
}
