//! Hex color parsing and tint/shade mixing.
//!
//! Colors travel through the app as `#rrggbb` strings; this module is the
//! only place they are taken apart into channels.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use crate::consts::SCALE_STEPS;

/// An opaque RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as canonical lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse `#RGB` or `#RRGGBB` values into RGB channels.
#[must_use]
pub fn parse_hex_rgb(raw: &str) -> Option<Rgb> {
    let hex = raw.trim().strip_prefix('#')?;
    let digits: Vec<u8> = hex.bytes().map(hex_digit).collect::<Option<_>>()?;
    match digits.as_slice() {
        &[r, g, b] => Some(Rgb::new(r * 17, g * 17, b * 17)),
        &[r1, r0, g1, g0, b1, b0] => Some(Rgb::new(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
        _ => None,
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Linearly interpolate each channel from `base` toward `target`.
///
/// `amount` is clamped to `0.0..=1.0`. Channels round half up.
#[must_use]
pub fn mix(base: Rgb, target: Rgb, amount: f64) -> Rgb {
    let amount = amount.clamp(0.0, 1.0);
    let channel = |from: u8, to: u8| -> u8 {
        let value = f64::from(from) + (f64::from(to) - f64::from(from)) * amount;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = (value + 0.5).floor().clamp(0.0, 255.0) as u8;
        rounded
    };
    Rgb::new(channel(base.r, target.r), channel(base.g, target.g), channel(base.b, target.b))
}

/// Four progressively lighter variants of `hex`, mixed toward white.
#[must_use]
pub fn tints(hex: &str) -> Option<Vec<String>> {
    scale(hex, Rgb::WHITE)
}

/// Four progressively darker variants of `hex`, mixed toward black.
#[must_use]
pub fn shades(hex: &str) -> Option<Vec<String>> {
    scale(hex, Rgb::BLACK)
}

fn scale(hex: &str, target: Rgb) -> Option<Vec<String>> {
    let base = parse_hex_rgb(hex)?;
    Some(
        SCALE_STEPS
            .iter()
            .map(|amount| mix(base, target, *amount).to_hex())
            .collect(),
    )
}
