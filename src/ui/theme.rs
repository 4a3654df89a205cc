//! Color theme for verdant
//!
//! A muted garden palette: greys for chrome, greens for living things.

use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    /// Pure white - maximum emphasis
    pub const WHITE: Color = Color::Rgb(255, 255, 255);

    /// Bright grey - primary text
    pub const GREY_100: Color = Color::Rgb(220, 220, 220);

    /// Light grey - secondary text
    pub const GREY_200: Color = Color::Rgb(180, 180, 180);

    /// Medium grey - muted text
    pub const GREY_300: Color = Color::Rgb(140, 140, 140);

    /// Dark grey - subtle elements
    pub const GREY_400: Color = Color::Rgb(100, 100, 100);

    /// Darker grey - borders, separators
    pub const GREY_500: Color = Color::Rgb(70, 70, 70);

    /// Dark grey - overlay backgrounds
    pub const GREY_700: Color = Color::Rgb(35, 35, 35);

    /// True black - deepest background
    pub const GREY_900: Color = Color::Rgb(18, 18, 18);

    /// Growth green - selections, success
    pub const GREEN: Color = Color::Rgb(120, 190, 120);

    /// Pale green - AI-sourced tags
    pub const GREEN_PALE: Color = Color::Rgb(160, 200, 160);

    /// Error red
    pub const RED: Color = Color::Rgb(210, 100, 100);

    /// Attention yellow
    pub const YELLOW: Color = Color::Rgb(220, 200, 120);

    pub fn header() -> Style {
        Style::default()
            .fg(Self::GREY_100)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::GREY_200)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::GREY_400)
    }

    pub fn selected() -> Style {
        Style::default().fg(Self::GREEN).add_modifier(Modifier::BOLD)
    }

    pub fn cursor_line() -> Style {
        Style::default()
            .fg(Self::WHITE)
            .bg(Self::GREY_700)
            .add_modifier(Modifier::BOLD)
    }
}
