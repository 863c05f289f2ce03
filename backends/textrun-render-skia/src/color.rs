//! Fill colors as runs write them

use textrun_core::error::{RenderError, Result};
use tiny_skia::Color;

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a basic CSS color name
pub fn parse_color(color: &str) -> Result<Color> {
    let color = color.trim();
    if let Some(hex) = color.strip_prefix('#') {
        let channels = match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, digit) in rgb.iter_mut().zip(hex.chars()) {
                    let value = digit
                        .to_digit(16)
                        .ok_or_else(|| RenderError::InvalidColor(color.to_string()))?;
                    *slot = (value * 17) as u8;
                }
                [rgb[0], rgb[1], rgb[2], 255]
            },
            6 | 8 => {
                let byte = |i: usize| {
                    hex.get(i..i + 2)
                        .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                        .ok_or_else(|| RenderError::InvalidColor(color.to_string()))
                };
                let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
                [byte(0)?, byte(2)?, byte(4)?, alpha]
            },
            _ => return Err(RenderError::InvalidColor(color.to_string()).into()),
        };
        return Ok(Color::from_rgba8(
            channels[0],
            channels[1],
            channels[2],
            channels[3],
        ));
    }

    let named = match color.to_ascii_lowercase().as_str() {
        "black" => Color::from_rgba8(0, 0, 0, 255),
        "white" => Color::from_rgba8(255, 255, 255, 255),
        "red" => Color::from_rgba8(255, 0, 0, 255),
        "green" => Color::from_rgba8(0, 128, 0, 255),
        "blue" => Color::from_rgba8(0, 0, 255, 255),
        "gray" | "grey" => Color::from_rgba8(128, 128, 128, 255),
        "transparent" => Color::from_rgba8(0, 0, 0, 0),
        _ => return Err(RenderError::InvalidColor(color.to_string()).into()),
    };
    Ok(named)
}
