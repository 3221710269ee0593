//! Brand color shade engine.
//!
//! Turns an organization's base color into a 50–900 shade ramp and into the
//! HSL triple the dashboard's theme variables are written in. Every function
//! here is pure; malformed input degrades to an explicit variant rather than
//! an error.

use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer};

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Position of a color within a shade ramp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShadeKey {
    S50,
    S100,
    S200,
    S300,
    S400,
    S500,
    S600,
    S700,
    S800,
    S900,
}

impl ShadeKey {
    pub const ALL: [ShadeKey; 10] = [
        ShadeKey::S50,
        ShadeKey::S100,
        ShadeKey::S200,
        ShadeKey::S300,
        ShadeKey::S400,
        ShadeKey::S500,
        ShadeKey::S600,
        ShadeKey::S700,
        ShadeKey::S800,
        ShadeKey::S900,
    ];

    pub fn value(self) -> u16 {
        match self {
            ShadeKey::S50 => 50,
            ShadeKey::S100 => 100,
            ShadeKey::S200 => 200,
            ShadeKey::S300 => 300,
            ShadeKey::S400 => 400,
            ShadeKey::S500 => 500,
            ShadeKey::S600 => 600,
            ShadeKey::S700 => 700,
            ShadeKey::S800 => 800,
            ShadeKey::S900 => 900,
        }
    }

    pub fn from_value(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.value() == value)
    }
}

impl fmt::Display for ShadeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Serialize for ShadeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Blend weights toward white for the light half of the ramp.
const LIGHT_STEPS: [(ShadeKey, f64); 5] = [
    (ShadeKey::S50, 0.05),
    (ShadeKey::S100, 0.15),
    (ShadeKey::S200, 0.30),
    (ShadeKey::S300, 0.45),
    (ShadeKey::S400, 0.60),
];

/// Blend weights toward black for the dark half. The weight falls as the key
/// rises, the inverse of the light half.
const DARK_STEPS: [(ShadeKey, f64); 4] = [
    (ShadeKey::S600, 0.90),
    (ShadeKey::S700, 0.75),
    (ShadeKey::S800, 0.60),
    (ShadeKey::S900, 0.45),
];

/// A full ramp of hex colors keyed by shade.
pub type ShadeRamp = BTreeMap<ShadeKey, String>;

/// Outcome of shade generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shades {
    Ramp(ShadeRamp),
    /// The base color did not decode; callers fall back to the default palette.
    Malformed,
}

impl Shades {
    pub fn get(&self, key: ShadeKey) -> Option<&str> {
        match self {
            Shades::Ramp(ramp) => ramp.get(&key).map(String::as_str),
            Shades::Malformed => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Shades::Ramp(ramp) => ramp.is_empty(),
            Shades::Malformed => true,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShadeKey, &str)> {
        let ramp = match self {
            Shades::Ramp(ramp) => Some(ramp),
            Shades::Malformed => None,
        };
        ramp.into_iter()
            .flat_map(|ramp| ramp.iter().map(|(key, hex)| (*key, hex.as_str())))
    }
}

/// Decode a `#RRGGBB` string (leading `#` optional, any case).
///
/// Shorthand `#RGB` is rejected here even though [`hex_to_hsl`] accepts it.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex).as_bytes();
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<u8> {
        let hi = nibble(digits[i])?;
        let lo = nibble(digits[i + 1])?;
        Some(hi << 4 | lo)
    };
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Rounds half toward positive infinity, so `-2.5` becomes `-2`.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Blend two colors; `weight` is the share of `a`.
///
/// The response to `weight` is not linear, so the ramp weights are calibrated
/// constants rather than paint proportions. The operations run in a fixed
/// order because `2*weight - 1 + 1` is not always `2*weight` in floating point.
/// Channels that leave [0, 255] saturate.
pub fn mix_colors(a: Rgb, b: Rgb, weight: f64) -> Rgb {
    let w = 2.0 * weight - 1.0;
    let w1 = w + 1.0;
    let w2 = 1.0 - w1;
    let blend = |x: u8, y: u8| -> u8 {
        let v = round_half_up((w1 * f64::from(x) + w2 * f64::from(y)) / 2.0);
        v.clamp(0.0, 255.0) as u8
    };
    Rgb::new(blend(a.r, b.r), blend(a.g, b.g), blend(a.b, b.b))
}

/// Encode as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Build the ten-step ramp for `base`. Key 500 is `base` itself, untouched.
pub fn generate_color_shades(base: &str) -> Shades {
    let Some(base_rgb) = hex_to_rgb(base) else {
        tracing::debug!(base, "base color is not #RRGGBB, no shades generated");
        return Shades::Malformed;
    };

    let mut ramp = ShadeRamp::new();
    for (key, weight) in LIGHT_STEPS {
        ramp.insert(key, rgb_to_hex(mix_colors(base_rgb, Rgb::WHITE, weight)));
    }
    ramp.insert(ShadeKey::S500, base.to_string());
    for (key, weight) in DARK_STEPS {
        ramp.insert(key, rgb_to_hex(mix_colors(base_rgb, Rgb::BLACK, weight)));
    }
    Shades::Ramp(ramp)
}

/// A color in HSL, formatted for CSS custom properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    /// Degrees in [0, 360).
    pub hue: u16,
    /// Percent, one decimal.
    pub saturation: f64,
    /// Percent, one decimal.
    pub lightness: f64,
}

impl Hsl {
    pub const BLACK: Hsl = Hsl {
        hue: 0,
        saturation: 0.0,
        lightness: 0.0,
    };
}

// f64's Display drops a zero fraction, which is the shape HSL variables expect.
impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.hue, self.saturation, self.lightness)
    }
}

/// Outcome of [`hex_to_hsl`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HslConversion {
    Converted(Hsl),
    /// Input was not a 4 or 7 character hex color; behaves as black.
    Degraded,
}

impl HslConversion {
    pub fn hsl(&self) -> Hsl {
        match self {
            HslConversion::Converted(hsl) => *hsl,
            HslConversion::Degraded => Hsl::BLACK,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, HslConversion::Degraded)
    }
}

impl fmt::Display for HslConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hsl().fmt(f)
    }
}

/// Convert `#RGB` or `#RRGGBB` to HSL.
///
/// Only the length is checked; the first character is skipped whatever it is.
/// Other lengths and non-hex digits give [`HslConversion::Degraded`].
pub fn hex_to_hsl(hex: &str) -> HslConversion {
    match decode_for_hsl(hex) {
        Some(rgb) => HslConversion::Converted(rgb_to_hsl(rgb)),
        None => {
            tracing::debug!(hex, "color did not decode for HSL, using black");
            HslConversion::Degraded
        }
    }
}

fn decode_for_hsl(hex: &str) -> Option<Rgb> {
    let chars: Vec<char> = hex.chars().collect();
    let digit = |c: char| c.to_digit(16).map(|d| d as u8);
    match chars.len() {
        4 => {
            let short = |c: char| digit(c).map(|d| d * 17);
            Some(Rgb::new(short(chars[1])?, short(chars[2])?, short(chars[3])?))
        }
        7 => {
            let pair = |i: usize| -> Option<u8> { Some(digit(chars[i])? << 4 | digit(chars[i + 1])?) };
            Some(Rgb::new(pair(1)?, pair(3)?, pair(5)?))
        }
        _ => None,
    }
}

fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let cmin = r.min(g).min(b);
    let cmax = r.max(g).max(b);
    let delta = cmax - cmin;

    let sector = if delta == 0.0 {
        0.0
    } else if cmax == r {
        ((g - b) / delta) % 6.0
    } else if cmax == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    let mut hue = round_half_up(sector * 60.0);
    if hue < 0.0 {
        hue += 360.0;
    }

    let lightness = (cmax + cmin) / 2.0;
    let saturation = if delta == 0.0 {
        0.0
    } else {
        delta / (1.0 - (2.0 * lightness - 1.0).abs())
    };

    Hsl {
        hue: hue as u16,
        saturation: round_tenths(saturation * 100.0),
        lightness: round_tenths(lightness * 100.0),
    }
}

/// Round to one decimal, breaking ties away from zero.
///
/// The decision is made on the exact decimal expansion of `value`, so a
/// double that sits exactly on `.x5` rounds up while one a hair below it
/// rounds down. `{:.1}` would round exact ties to even instead.
fn round_tenths(value: f64) -> f64 {
    // An f64 has at most 1074 fractional digits, so this never rounds.
    let exact = format!("{:.1074}", value.abs());
    let (whole, frac) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits = frac.bytes().map(|d| u64::from(d.saturating_sub(b'0')));
    let tenths = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);
    let whole: u64 = whole.parse().unwrap_or(0);
    let scaled = whole * 10 + tenths + u64::from(round_up);
    (scaled as f64 / 10.0).copysign(value)
}
