//! Cell colors: hex parsing, interpolation and HSL jitter.

use palette::{FromColor, Hsl, Srgb};
use peniko::Color;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a color string is not a supported hex color.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}, expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorError(pub String);

/// An sRGB color with 8-bit channels.
///
/// Serialized as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for CellColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl CellColor {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque color from RGB channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from RGBA channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` string (the `#` is optional).
    pub fn parse(s: &str) -> Result<Self, ColorError> {
        let err = || ColorError(s.to_string());
        let hex = s.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, ch) in out.iter_mut().zip(hex.chars()) {
                    let v = ch.to_digit(16).ok_or_else(err)? as u8;
                    *slot = v * 17;
                }
                Ok(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => Err(err()),
        }
    }

    /// Lowercase hex string, with alpha only when it is not 255.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with its alpha replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Apply a 0..=100 opacity percentage.
    ///
    /// Full opacity leaves the color untouched; anything lower sets alpha to
    /// `round(opacity * 2.55)`.
    pub fn with_opacity(self, opacity: u8) -> Self {
        if opacity >= 100 {
            self
        } else {
            self.with_alpha((f64::from(opacity) * 2.55).round() as u8)
        }
    }

    /// Linear interpolation in RGB space, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self::rgba(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }

    /// Perturb hue by up to 0.05 turns (wrapping), saturation by up to 0.1 and
    /// lightness by up to 0.075, clamping both to `0..=1`. Alpha is kept.
    pub fn jitter(self, rng: &mut impl Rng) -> Self {
        let rgb = Srgb::new(self.r, self.g, self.b).into_format::<f32>();
        let hsl: Hsl = Hsl::from_color(rgb);

        let hue = (hsl.hue.into_positive_degrees() + rng.gen_range(-18.0..18.0)).rem_euclid(360.0);
        let saturation = (hsl.saturation + rng.gen_range(-0.1..0.1)).clamp(0.0, 1.0);
        let lightness = (hsl.lightness + rng.gen_range(-0.075..0.075)).clamp(0.0, 1.0);

        let jittered: Hsl = Hsl::new(hue, saturation, lightness);
        let out: Srgb<u8> = Srgb::from_color(jittered).into_format();
        Self::rgba(out.red, out.green, out.blue, self.a)
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CellColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CellColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CellColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl From<CellColor> for Color {
    fn from(c: CellColor) -> Self {
        Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

impl From<Color> for CellColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::rgba(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}
