//! Unified color definitions for CLI and TUI rendering.

use crate::shades::{Rgb, hex_to_rgb};

/// RGB color that can be converted to both colored crate and ratatui formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeColor(pub u8, pub u8, pub u8);

impl ThemeColor {
    /// Apply a dimming factor to the color.
    pub fn apply_dim(&self, factor: f32) -> Self {
        ThemeColor(
            (self.0 as f32 * factor) as u8,
            (self.1 as f32 * factor) as u8,
            (self.2 as f32 * factor) as u8,
        )
    }

    /// Get RGB tuple for use with colored crate's truecolor method.
    pub fn rgb(&self) -> (u8, u8, u8) {
        (self.0, self.1, self.2)
    }

    /// Parse a `#RRGGBB` swatch; `None` for anything the shade engine rejects.
    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_rgb(hex).map(Self::from)
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting_text(&self) -> Self {
        let luma = 0.299 * f32::from(self.0) + 0.587 * f32::from(self.1) + 0.114 * f32::from(self.2);
        if luma > 150.0 { theme::INK } else { theme::PAPER }
    }
}

impl From<Rgb> for ThemeColor {
    fn from(rgb: Rgb) -> Self {
        ThemeColor(rgb.r, rgb.g, rgb.b)
    }
}

// Color constants for consistent theming
pub mod theme {
    use super::ThemeColor;

    pub const GREEN: ThemeColor = ThemeColor(142, 192, 124);
    pub const RED: ThemeColor = ThemeColor(204, 36, 29);
    pub const GRAY: ThemeColor = ThemeColor(128, 128, 128);
    pub const GOLD: ThemeColor = ThemeColor(215, 153, 33);
    pub const FRAME: ThemeColor = ThemeColor(55, 55, 50);
    pub const YELLOW: ThemeColor = ThemeColor(250, 189, 47);
    pub const MUTED: ThemeColor = ThemeColor(90, 90, 90);
    pub const INK: ThemeColor = ThemeColor(20, 20, 20);
    pub const PAPER: ThemeColor = ThemeColor(245, 247, 250);
}

/// Compute a deterministic badge color from an organization name.
/// Uses MD5 to hash the string, derives a hue from the first two bytes,
/// and converts HSV to RGB with fixed saturation and value for readability.
pub fn string_to_color(s: &str) -> ThemeColor {
    let hash = md5::compute(s);
    let hue = (u16::from(hash[0]) | (u16::from(hash[1]) << 8)) % 360;
    let saturation = 0.45;
    let value = 0.8;
    let (r, g, b) = hsv_to_rgb(hue as f32, saturation, value);
    ThemeColor(r, g, b)
}

/// Convert HSV color to RGB.
/// h: hue (0-360), s: saturation (0-1), v: value (0-1)
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h as u32 {
        0..60 => (c, x, 0.0),
        60..120 => (x, c, 0.0),
        120..180 => (0.0, c, x),
        180..240 => (0.0, x, c),
        240..300 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_to_color_is_stable() {
        assert_eq!(string_to_color("Future Optics"), string_to_color("Future Optics"));
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(ThemeColor::from_hex("#03a9f4"), Some(ThemeColor(3, 169, 244)));
        assert_eq!(ThemeColor::from_hex("#03f"), None);
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(ThemeColor(255, 255, 255).contrasting_text(), theme::INK);
        assert_eq!(ThemeColor(1, 76, 110).contrasting_text(), theme::PAPER);
    }

    #[test]
    fn test_hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (255, 0, 0));
        assert_eq!(hsv_to_rgb(120.0, 1.0, 1.0), (0, 255, 0));
    }
}
