//! Color name helpers shared by the config loader and the CLI.

use crate::draw::{Color, color::*};

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
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

/// Maps a Color value to its human-readable name.
///
/// Uses approximate matching (threshold-based) to identify colors.
///
/// # Returns
/// A static string with the color name, or "Custom" if the color doesn't
/// match any predefined color.
pub fn color_to_name(color: &Color) -> &'static str {
    // Match colors approximately with 0.1 tolerance
    if color.r > 0.9 && color.g < 0.1 && color.b < 0.1 {
        "Red"
    } else if color.r < 0.1 && color.g > 0.9 && color.b < 0.1 {
        "Green"
    } else if color.r < 0.1 && color.g < 0.1 && color.b > 0.9 {
        "Blue"
    } else if color.r > 0.9 && color.g > 0.9 && color.b < 0.1 {
        "Yellow"
    } else if color.r > 0.9 && (0.4..=0.6).contains(&color.g) && color.b < 0.1 {
        "Orange"
    } else if color.r > 0.9 && color.g < 0.1 && color.b > 0.9 {
        "Pink"
    } else if color.r > 0.9 && color.g > 0.9 && color.b > 0.9 {
        "White"
    } else if color.r < 0.1 && color.g < 0.1 && color.b < 0.1 {
        "Black"
    } else {
        "Custom"
    }
}

/// Parses a color given as a name or as `#RRGGBB`.
pub fn parse_color(input: &str) -> Result<Color, String> {
    let trimmed = input.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("Expected #RRGGBB, got '{}'", input));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("Invalid hex color '{}'", input))
        };
        return Ok(Color::from_rgb8(channel(0..2)?, channel(2..4)?, channel(4..6)?));
    }

    name_to_color(trimmed).ok_or_else(|| format!("Unknown color '{}'", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(name_to_color("Red"), Some(RED));
        assert_eq!(name_to_color(" BLACK "), Some(BLACK));
        assert_eq!(name_to_color("teal"), None);
    }

    #[test]
    fn color_names_round_trip_for_palette() {
        for name in ["red", "green", "blue", "yellow", "white", "black"] {
            let color = name_to_color(name).unwrap();
            assert!(color_to_name(&color).eq_ignore_ascii_case(name));
        }
        assert_eq!(color_to_name(&LIGHT_BLUE), "Custom");
    }

    #[test]
    fn parse_color_accepts_hex_and_names() {
        assert_eq!(parse_color("#0000ff"), Ok(BLUE));
        assert_eq!(parse_color("pink"), Ok(PINK));
        assert_eq!(
            parse_color("#ADD8E6"),
            Ok(Color::from_rgb8(0xAD, 0xD8, 0xE6))
        );
    }

    #[test]
    fn parse_color_rejects_bad_input() {
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#zzzzzz").is_err());
        assert!(parse_color("mauve").is_err());
    }
}
