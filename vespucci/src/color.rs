//! Color representation used by shape styles.

use serde::{Deserialize, Serialize};

/// RGBA color of a shape or label.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl From<String> for Color {
    fn from(value: String) -> Self {
        Self::try_from_hex(&value).unwrap_or(Color::BLACK)
    }
}

impl From<Color> for String {
    fn from(val: Color) -> Self {
        val.to_hex()
    }
}

impl Color {
    /// Transparent color: `#00000000`
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    /// Red color: `#FF0000FF`
    pub const RED: Color = Color::rgba(255, 0, 0, 255);
    /// Green color: `#00FF00FF`
    pub const GREEN: Color = Color::rgba(0, 255, 0, 255);
    /// Blue color: `#0000FFFF`
    pub const BLUE: Color = Color::rgba(0, 0, 255, 255);
    /// Yellow color: `#FFFF00FF`
    pub const YELLOW: Color = Color::rgba(255, 255, 0, 255);
    /// Orange color: `#FFA500FF`
    pub const ORANGE: Color = Color::rgba(255, 165, 0, 255);
    /// White color: `#FFFFFFFF`
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    /// Black color: `#000000FF`
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    /// Gray color: `#AAAAAAFF`
    pub const GRAY: Color = Color::rgba(170, 170, 170, 255);
    /// Purple color: `#800080FF`
    pub const PURPLE: Color = Color::rgba(128, 0, 128, 255);

    /// Constructs color from its RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Converts the color into HEX8 string: `#RRGGBBAA`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }

    /// Parses a color from the hex string. Hex string can be either HEX6 (`#RRGGBB`) or HEX8
    /// (`#RRGGBBAA`).
    pub fn try_from_hex(hex_string: &str) -> Option<Self> {
        if hex_string.len() != 7 && hex_string.len() != 9 || hex_string.chars().next()? != '#' {
            return None;
        }

        let r = u8::from_str_radix(&hex_string[1..3], 16).ok()?;
        let g = u8::from_str_radix(&hex_string[3..5], 16).ok()?;
        let b = u8::from_str_radix(&hex_string[5..7], 16).ok()?;
        let a = if hex_string.len() == 9 {
            u8::from_str_radix(&hex_string[7..9], 16).ok()?
        } else {
            255
        };

        Some(Self { r, g, b, a })
    }

    /// Returns a new color instance, copied from the base one but with the given alpha
    /// channel.
    pub fn with_alpha(&self, a: u8) -> Self {
        Self { a, ..*self }
    }

    /// Returns a new color instance with the alpha channel set from an opacity value in
    /// `0.0..=1.0`. This is what an opacity slider applies on top of a palette color.
    pub fn with_opacity(&self, opacity: f64) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.with_alpha(a)
    }

    /// Returns true if the color is fully transparent (`a == 0`).
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let color = Color::rgba(255, 165, 0, 127);
        assert_eq!(color.to_hex(), "#FFA5007F");
        assert_eq!(Color::try_from_hex("#FFA5007F"), Some(color));
    }

    #[test]
    fn hex6_implies_opaque() {
        assert_eq!(Color::try_from_hex("#FF0000"), Some(Color::RED));
    }

    #[test]
    fn invalid_hex_is_rejected() {
        assert_eq!(Color::try_from_hex("FF0000"), None);
        assert_eq!(Color::try_from_hex("#FF00"), None);
        assert_eq!(Color::try_from_hex("#GG0000"), None);
    }

    #[test]
    fn opacity_sets_alpha() {
        assert_eq!(Color::RED.with_opacity(0.5), Color::rgba(255, 0, 0, 128));
        assert!(Color::RED.with_opacity(0.0).is_transparent());
        assert_eq!(Color::RED.with_opacity(2.0), Color::RED);
    }
}
