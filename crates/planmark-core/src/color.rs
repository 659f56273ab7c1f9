//! Pen colors for annotations.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[error("Unknown color name: {0}")]
    UnknownName(String),
    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
}

/// RGBA8 pen color.
///
/// Serialized as a string: a palette name (`"blue"`) or a hex value
/// (`"#rrggbb"` / `"#rrggbbaa"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PenColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PenColor {
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// The swatches offered by the pen color picker, in display order.
    pub const PALETTE: [(&'static str, PenColor); 5] = [
        ("blue", Self::BLUE),
        ("red", Self::RED),
        ("green", Self::GREEN),
        ("orange", Self::ORANGE),
        ("black", Self::BLACK),
    ];

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Look up a palette color by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::PALETTE
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, c)| *c)
    }

    /// Palette name of this color, if it is one of the swatches.
    pub fn name(&self) -> Option<&'static str> {
        Self::PALETTE.iter().find(|(_, c)| c == self).map(|(n, _)| *n)
    }

    /// Hex representation, `#rrggbb` for opaque colors and `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    fn parse_hex(s: &str) -> Result<Self, ParseColorError> {
        let invalid = || ParseColorError::InvalidHex(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        match digits.len() {
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl Default for PenColor {
    fn default() -> Self {
        Self::BLUE
    }
}

impl fmt::Display for PenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.to_hex()),
        }
    }
}

impl FromStr for PenColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            Self::parse_hex(s)
        } else {
            Self::from_name(s).ok_or_else(|| ParseColorError::UnknownName(s.to_string()))
        }
    }
}

impl TryFrom<String> for PenColor {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PenColor> for String {
    fn from(color: PenColor) -> Self {
        color.to_string()
    }
}

impl From<Color> for PenColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<PenColor> for Color {
    fn from(color: PenColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_names() {
        assert_eq!(PenColor::from_name("Red"), Some(PenColor::RED));
        assert_eq!(PenColor::ORANGE.name(), Some("orange"));
        assert_eq!(PenColor::from_name("purple"), None);
    }

    #[test]
    fn test_parse_hex() {
        let c: PenColor = "#ff8000".parse().unwrap();
        assert_eq!(c, PenColor::rgb(255, 128, 0));

        let c: PenColor = "#00000080".parse().unwrap();
        assert_eq!(c.a, 128);

        assert!(matches!("#12345".parse::<PenColor>(), Err(ParseColorError::InvalidHex(_))));
        assert!(matches!("#gg0000".parse::<PenColor>(), Err(ParseColorError::InvalidHex(_))));
        assert!(matches!("teal".parse::<PenColor>(), Err(ParseColorError::UnknownName(_))));
    }

    #[test]
    fn test_display_prefers_name() {
        assert_eq!(PenColor::GREEN.to_string(), "green");
        assert_eq!(PenColor::rgb(1, 2, 3).to_string(), "#010203");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&PenColor::RED).unwrap();
        assert_eq!(json, "\"red\"");
        let back: PenColor = serde_json::from_str("\"#0000ff\"").unwrap();
        assert_eq!(back, PenColor::BLUE);
        assert!(serde_json::from_str::<PenColor>("\"mauve\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color: Color = PenColor::ORANGE.into();
        assert_eq!(PenColor::from(color), PenColor::ORANGE);
    }
}
