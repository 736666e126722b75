//! Color name helpers shared by the config layer and the CLI.

use crate::draw::{Color, color::*};

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
///
/// # Returns
/// - `Some(Color)` if the name matches a predefined color
/// - `None` if the name is not recognized
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.trim().to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

/// Parses either a color name or a `#rrggbb` / `#rrggbbaa` hex string.
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim();
    if value.starts_with('#') {
        value.parse().ok()
    } else {
        name_to_color(value)
    }
}

/// Maps a Color value to its human-readable name.
///
/// Only exact matches of the predefined palette are named; anything else is
/// reported as its hex string.
pub fn color_to_name(color: &Color) -> String {
    let name = match *color {
        RED => "red",
        GREEN => "green",
        BLUE => "blue",
        YELLOW => "yellow",
        ORANGE => "orange",
        PINK => "pink",
        WHITE => "white",
        BLACK => "black",
        _ => return color.to_string(),
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(name_to_color("ReD"), Some(RED));
        assert_eq!(name_to_color("teal"), None);
    }

    #[test]
    fn parse_color_accepts_hex() {
        assert_eq!(parse_color("#0000ff"), Some(BLUE));
        assert_eq!(parse_color(" pink "), Some(PINK));
        assert_eq!(parse_color("#nothex"), None);
    }

    #[test]
    fn color_names_round_trip() {
        assert_eq!(color_to_name(&ORANGE), "orange");
        assert_eq!(color_to_name(&Color::rgb(1, 2, 3)), "#010203");
        assert_eq!(parse_color(&color_to_name(&YELLOW)), Some(YELLOW));
    }
}
