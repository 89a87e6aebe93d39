//! Shared utilities for TUI views

use std::str::FromStr;

use ratatui::style::Color;

/// Colours handed out to categories without a configured colour
const PALETTE: [Color; 6] = [
    Color::Yellow,
    Color::Red,
    Color::Green,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
];

/// Resolve a category's display colour: the configured name if it parses,
/// otherwise the palette entry for its position
pub fn category_color(configured: Option<&str>, index: usize) -> Color {
    configured
        .and_then(|name| Color::from_str(name).ok())
        .unwrap_or(PALETTE[index % PALETTE.len()])
}

/// Readable foreground for text drawn on `background`
pub fn contrast_fg(background: Color) -> Color {
    match background {
        Color::Yellow
        | Color::LightYellow
        | Color::Green
        | Color::LightGreen
        | Color::Cyan
        | Color::LightCyan
        | Color::White
        | Color::Gray => Color::Black,
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_color_wins() {
        assert_eq!(category_color(Some("red"), 0), Color::Red);
        assert_eq!(category_color(Some("#ff8800"), 0), Color::Rgb(0xff, 0x88, 0x00));
    }

    #[test]
    fn unknown_color_falls_back_to_palette() {
        assert_eq!(category_color(Some("not-a-colour"), 2), Color::Green);
        assert_eq!(category_color(None, 0), Color::Yellow);
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(category_color(None, 7), category_color(None, 1));
    }

    #[test]
    fn contrast_on_light_and_dark() {
        assert_eq!(contrast_fg(Color::Yellow), Color::Black);
        assert_eq!(contrast_fg(Color::Red), Color::White);
    }
}
