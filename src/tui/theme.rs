//! Theme and Styling
//!
//! Colors and styles for the TUI.

use crate::http::ServiceHealth;
use crate::status::Tone;
use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (cyan/teal)
    pub const ACCENT: Color = Color::Rgb(0, 212, 255);

    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);

    /// Secondary text color (muted)
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);

    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    /// Links under result cards
    pub const LINK: Color = Color::Rgb(96, 165, 250);

    // === Background / Border Colors ===

    pub const BG_HIGHLIGHT: Color = Color::Rgb(38, 38, 38);

    pub const BORDER: Color = Color::Rgb(51, 51, 51);

    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Styles ===

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    /// Border style for a block that may hold focus
    pub fn border_for(focused: bool) -> Style {
        if focused {
            Self::border_focused()
        } else {
            Self::border()
        }
    }

    /// Selected item style
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Row under the form cursor
    pub fn cursor_row() -> Style {
        Style::default().bg(Self::BG_HIGHLIGHT)
    }

    pub fn link() -> Style {
        Style::default()
            .fg(Self::LINK)
            .add_modifier(Modifier::UNDERLINED)
    }

    /// Keyboard shortcut style
    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn placeholder() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    /// Style for a status message of the given tone
    pub fn tone(tone: Tone) -> Style {
        match tone {
            Tone::Neutral => Self::text_secondary(),
            Tone::Success => Style::default().fg(Self::SUCCESS),
            Tone::Warning => Style::default().fg(Self::WARNING),
            Tone::Error => Self::error().add_modifier(Modifier::BOLD),
        }
    }

    /// Color of a service's status dot
    pub fn health(health: &ServiceHealth) -> Style {
        match health {
            ServiceHealth::Unknown => Self::text_dim(),
            ServiceHealth::Healthy { .. } => Style::default().fg(Self::SUCCESS),
            ServiceHealth::Unreachable { .. } => Self::error(),
        }
    }
}

/// Glyphs used across the UI
pub struct Icons;

impl Icons {
    pub const DOT: &'static str = "●";
    pub const RADIO_ON: &'static str = "(•)";
    pub const RADIO_OFF: &'static str = "( )";
    pub const CHECK_ON: &'static str = "[x]";
    pub const CHECK_OFF: &'static str = "[ ]";
    pub const CURSOR: &'static str = "▌";
    pub const SELECTED: &'static str = "▶";
    pub const ARROW: &'static str = "→";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_styles_differ() {
        assert_ne!(Theme::tone(Tone::Error), Theme::tone(Tone::Success));
        assert_eq!(Theme::tone(Tone::Error).fg, Some(Theme::ERROR));
    }

    #[test]
    fn test_health_dot_colors() {
        assert_eq!(Theme::health(&ServiceHealth::Unknown).fg, Some(Theme::TEXT_DIM));
        let down = ServiceHealth::Unreachable {
            reason: "refused".into(),
            checked_at: chrono::Local::now(),
        };
        assert_eq!(Theme::health(&down).fg, Some(Theme::ERROR));
    }
}
