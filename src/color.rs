//! Wall color values.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::ColorParseError;

/// An 8-bit sRGB wall color.
///
/// Parsed from hex notation (`#rrggbb` or `#rgb`, the `#` is optional and
/// case is ignored). Two colors are equal when their RGB values are equal,
/// so `#FFF` and `#ffffff` compare equal. The canonical text form is
/// lowercase `#rrggbb`.
///
/// # Example
///
/// ```
/// use kitchen_renderer::WallColor;
///
/// let navy: WallColor = "#1E3A5C".parse().unwrap();
/// assert_eq!(navy.to_string(), "#1e3a5c");
/// assert!("#fff".parse::<WallColor>().unwrap().is_neutral());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WallColor {
    rgb: [u8; 3],
}

impl WallColor {
    /// The neutral default (`#ffffff`). A neutral wall shows the base photo untinted.
    pub const NEUTRAL: Self = Self::new(255, 255, 255);

    /// Creates a color from its channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            rgb: [red, green, blue],
        }
    }

    /// Returns the channels as an `[r, g, b]` array.
    pub fn channels(&self) -> [u8; 3] {
        self.rgb
    }

    /// Returns the color as a `palette` sRGB value.
    pub fn as_srgb(&self) -> Srgb<u8> {
        let [r, g, b] = self.rgb;
        Srgb::new(r, g, b)
    }

    /// Returns true if this is the neutral default color.
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

impl Default for WallColor {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl From<Srgb<u8>> for WallColor {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

impl FromStr for WallColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        // Only the 3 and 6 digit forms are wall colors.
        let is_hex = digits.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex || (digits.len() != 3 && digits.len() != 6) {
            return Err(ColorParseError {
                input: s.to_string(),
            });
        }

        Srgb::<u8>::from_str(digits)
            .map(Self::from)
            .map_err(|_| ColorParseError {
                input: s.to_string(),
            })
    }
}

impl TryFrom<String> for WallColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WallColor> for String {
    fn from(color: WallColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for WallColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.channels();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for WallColor {
    fn schema_name() -> String {
        "WallColor".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        let long: WallColor = "#1e3a5c".parse().unwrap();
        assert_eq!(long.channels(), [0x1e, 0x3a, 0x5c]);

        let short: WallColor = "#abc".parse().unwrap();
        assert_eq!(short.channels(), [0xaa, 0xbb, 0xcc]);

        let bare: WallColor = "ff0000".parse().unwrap();
        assert_eq!(bare.channels(), [255, 0, 0]);
    }

    #[test]
    fn canonical_form_is_lowercase() {
        let color: WallColor = "#A1B2C3".parse().unwrap();
        assert_eq!(color.to_string(), "#a1b2c3");
    }

    #[test]
    fn neutral_matches_every_white_spelling() {
        for text in ["#ffffff", "#FFFFFF", "#fff", "ffffff"] {
            let color: WallColor = text.parse().unwrap();
            assert!(color.is_neutral(), "{text} should be neutral");
        }
        assert!(!WallColor::new(254, 255, 255).is_neutral());
        assert!(WallColor::default().is_neutral());
    }

    #[test]
    fn rejects_malformed_input() {
        let inputs = [
            "", "#", "#12", "#12345", "#gggggg", "blue", "#1234567", "#ééé", "#+f+f+f", "+0+0+0",
            "#+ff",
        ];
        for text in inputs {
            assert!(text.parse::<WallColor>().is_err(), "{text} should fail");
        }
    }

    #[test]
    fn serializes_as_canonical_string() {
        let color = WallColor::new(30, 58, 92);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#1e3a5c\"");

        let restored: WallColor = serde_json::from_str("\"#1E3A5C\"").unwrap();
        assert_eq!(restored, color);

        assert!(serde_json::from_str::<WallColor>("\"nope\"").is_err());
    }
}
