//! Color palette and shared styles for the dashboard.
//!
//! The dark palette follows the Tailwind CSS colors; the monochrome one is
//! used when colors are disabled in the configuration.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Dashboard colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppTheme {
    pub primary: Color,

    // Status colors
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub info: Color,

    // Text colors
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub border_inactive: Color,
    pub bg_selected: Color,
}

impl AppTheme {
    /// Dark theme using Tailwind-inspired colors.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            primary: Color::Rgb(34, 211, 238), // cyan-400

            success: Color::Rgb(74, 222, 128), // green-400
            warning: Color::Rgb(251, 191, 36), // amber-400
            danger: Color::Rgb(248, 113, 113), // red-400
            info: Color::Rgb(96, 165, 250),    // blue-400

            text_primary: Color::Rgb(248, 250, 252),   // slate-50
            text_secondary: Color::Rgb(148, 163, 184), // slate-400
            text_muted: Color::Rgb(100, 116, 139),     // slate-500

            border_inactive: Color::Rgb(71, 85, 105), // slate-600
            bg_selected: Color::Rgb(51, 65, 85),      // slate-700
        }
    }

    /// Terminal default colors only.
    #[must_use]
    pub const fn monochrome() -> Self {
        Self {
            primary: Color::Reset,
            success: Color::Reset,
            warning: Color::Reset,
            danger: Color::Reset,
            info: Color::Reset,
            text_primary: Color::Reset,
            text_secondary: Color::Reset,
            text_muted: Color::Reset,
            border_inactive: Color::Reset,
            bg_selected: Color::Reset,
        }
    }

    /// Pick the palette for the color setting.
    #[must_use]
    pub const fn for_color(no_color: bool) -> Self {
        if no_color { Self::monochrome() } else { Self::dark() }
    }

    #[inline]
    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_inactive)
    }

    /// Style for the selected row. Reversed when there is no color.
    #[must_use]
    pub fn selected_style(&self) -> Style {
        let style = Style::default()
            .bg(self.bg_selected)
            .fg(self.text_primary)
            .add_modifier(Modifier::BOLD);
        if self.bg_selected == Color::Reset {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    #[inline]
    #[must_use]
    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a key in hints and the help overlay.
    #[inline]
    #[must_use]
    pub fn key_style(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }
}

/// Default border type for all blocks.
pub const BORDER_TYPE: BorderType = BorderType::Rounded;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_color() {
        assert_eq!(AppTheme::for_color(false), AppTheme::dark());
        assert_eq!(AppTheme::for_color(true).primary, Color::Reset);
    }
}
