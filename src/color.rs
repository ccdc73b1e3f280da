use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Error;

/// Firework colors based on the chemical compounds that produce them.
pub const DEFAULT_PALETTE: [Rgba; 10] = [
    Rgba::rgb(255, 30, 30),   // Strontium (intense red)
    Rgba::rgb(220, 50, 50),   // Lithium (medium red)
    Rgba::rgb(255, 140, 0),   // Calcium (orange)
    Rgba::rgb(255, 220, 0),   // Sodium (yellow)
    Rgba::rgb(0, 255, 100),   // Barium (green)
    Rgba::rgb(60, 120, 255),  // Copper halides (blue)
    Rgba::rgb(100, 100, 255), // Caesium (indigo)
    Rgba::rgb(180, 50, 255),  // Potassium/Rubidium (violet)
    Rgba::rgb(255, 200, 50),  // Charcoal/Iron (gold)
    Rgba::rgb(255, 255, 255), // Titanium/Magnesium (white)
];

/// An sRGB color with straight (non-premultiplied) alpha in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Same hue with a different opacity.
    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Premultiplied channels in `0.0..=1.0`.
    pub fn premultiplied(self) -> [f32; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r as f32 / 255.0 * a,
            self.g as f32 / 255.0 * a,
            self.b as f32 / 255.0 * a,
            a,
        ]
    }

    /// Converts HSL (hue in degrees, saturation and lightness in `0..=1`).
    pub fn from_hsla(h: f32, s: f32, l: f32, a: f32) -> Self {
        let h = h.rem_euclid(360.0) / 360.0;
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            let v = to_channel(l);
            return Self::new(v, v, v, a.clamp(0.0, 1.0));
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
            to_channel(hue_to_rgb(p, q, h)),
            to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
            a.clamp(0.0, 1.0),
        )
    }

    /// Linear interpolation between two colors, `t` clamped to `0..=1`.
    pub fn mix(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
            self.a + (other.a - self.a) * t,
        )
    }
}

fn to_channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let invalid = || Error::InvalidColor(s.to_string());

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let (name, args) = text
            .strip_suffix(')')
            .and_then(|t| t.split_once('('))
            .ok_or_else(invalid)?;
        let args: Vec<&str> = args.split(',').map(str::trim).collect();

        match (name.trim(), args.as_slice()) {
            ("rgb", [r, g, b]) => Ok(Rgba::rgb(
                parse_u8(r).ok_or_else(invalid)?,
                parse_u8(g).ok_or_else(invalid)?,
                parse_u8(b).ok_or_else(invalid)?,
            )),
            ("rgba", [r, g, b, a]) => Ok(Rgba::new(
                parse_u8(r).ok_or_else(invalid)?,
                parse_u8(g).ok_or_else(invalid)?,
                parse_u8(b).ok_or_else(invalid)?,
                parse_alpha(a).ok_or_else(invalid)?,
            )),
            ("hsl", [h, s, l]) => Ok(Rgba::from_hsla(
                parse_f32(h).ok_or_else(invalid)?,
                parse_percent(s).ok_or_else(invalid)?,
                parse_percent(l).ok_or_else(invalid)?,
                1.0,
            )),
            ("hsla", [h, s, l, a]) => Ok(Rgba::from_hsla(
                parse_f32(h).ok_or_else(invalid)?,
                parse_percent(s).ok_or_else(invalid)?,
                parse_percent(l).ok_or_else(invalid)?,
                parse_alpha(a).ok_or_else(invalid)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f32 / 255.0)),
        _ => None,
    }
}

fn parse_f32(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_u8(s: &str) -> Option<u8> {
    parse_f32(s).map(|v| v.clamp(0.0, 255.0).round() as u8)
}

fn parse_percent(s: &str) -> Option<f32> {
    parse_f32(s.strip_suffix('%')?).map(|v| v / 100.0)
}

fn parse_alpha(s: &str) -> Option<f32> {
    match s.strip_suffix('%') {
        Some(pct) => parse_f32(pct).map(|v| (v / 100.0).clamp(0.0, 1.0)),
        None => parse_f32(s).map(|v| v.clamp(0.0, 1.0)),
    }
}
