//! Color conversions and interpolation for keyframe colors.
//!
//! Base colors are `#rrggbb` strings; accents are `rgba(r, g, b, a)` strings
//! with channels in `0..=255` and alpha in `0..=1`. The string functions mirror
//! the typed [`Rgb`]/[`Rgba`] operations used by the keyframe table.

use std::fmt;

use glam::Vec3;

use crate::paint::parse_hex_rgb;

/// 8-bit sRGB color.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value; bits above 24 are ignored.
    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channels scaled to `0..=1`, still sRGB-encoded.
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    /// Linear-light channels, for shading on an sRGB surface.
    pub fn to_linear(self) -> Vec3 {
        let u = self.to_unit();
        Vec3::new(srgb_to_linear(u.x), srgb_to_linear(u.y), srgb_to_linear(u.z))
    }

    /// Channel-wise interpolation, rounded to the nearest integer.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let ch = |a: u8, b: u8| lerp(a as f32, b as f32, t).round().clamp(0.0, 255.0) as u8;
        Rgb::new(ch(self.r, other.r), ch(self.g, other.g), ch(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color with `0..=255` channels and a `0..=1` alpha, unclamped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const OPAQUE_BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// RGB channels rounded and clamped to bytes; alpha dropped.
    pub fn rgb(self) -> Rgb {
        let ch = |v: f64| v.round().clamp(0.0, 255.0) as u8;
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }

    /// Interpolates all four channels without rounding.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t as f64;
        let m = |a: f64, b: f64| a + (b - a) * t;
        Rgba::new(m(self.r, other.r), m(self.g, other.g), m(self.b, other.b), m(self.a, other.a))
    }
}

impl fmt::Display for Rgba {
    /// `rgba(r, g, b, a)` with rounded RGB and the alpha as-is.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({}, {}, {}, {})",
            self.r.round(),
            self.g.round(),
            self.b.round(),
            self.a
        )
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decodes `#rrggbb` (hash optional, any case). Anything else is black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex_rgb(hex).map_or(Rgb::BLACK, |[r, g, b]| Rgb::new(r, g, b))
}

/// Lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    rgb.to_string()
}

/// Parses the first `rgb(..)`/`rgba(..)` group in `s`.
///
/// Each channel reads its leading number, so `12px` is 12. Channels with no
/// leading number, or missing ones, read as 0; alpha reads as 1 instead. A
/// string with no non-empty group is opaque black.
pub fn parse_rgba(s: &str) -> Rgba {
    let Some(body) = rgba_group(s) else {
        return Rgba::OPAQUE_BLACK;
    };

    let values: Vec<Option<f64>> = body.split(',').map(|v| leading_number(v).filter(|v| v.is_finite())).collect();
    let channel = |i: usize| values.get(i).copied().flatten().unwrap_or(0.0);
    let alpha = values.get(3).copied().flatten().unwrap_or(1.0);

    Rgba::new(channel(0), channel(1), channel(2), alpha)
}

/// Body of the first `rgb(` or `rgba(` followed by at least one character
/// and a closing `)`.
fn rgba_group(s: &str) -> Option<&str> {
    s.match_indices("rgb").find_map(|(start, _)| {
        let rest = &s[start + 3..];
        let rest = rest.strip_prefix('a').unwrap_or(rest);
        let (body, _) = rest.strip_prefix('(')?.split_once(')')?;
        (!body.is_empty()).then_some(body)
    })
}

/// The longest decimal literal at the start of `v`, after leading
/// whitespace: sign, digits, fraction, exponent.
fn leading_number(v: &str) -> Option<f64> {
    let v = v.trim_start();
    let b = v.as_bytes();
    let digits_from = |mut i: usize| {
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digits = int_end - end;
    end = int_end;
    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if digits > 0 || frac_end > end + 1 {
            digits += frac_end - (end + 1);
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(b.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(b.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    v[..end].parse().ok()
}

/// Packs the RGB channels of an `rgba(..)` string into `0xRRGGBB`, rounded.
pub fn rgba_to_hex(s: &str) -> u32 {
    parse_rgba(s).rgb().to_hex()
}

pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}

/// Interpolates two hex colors in RGB space; result is `#rrggbb`.
pub fn lerp_color(a: &str, b: &str, factor: f32) -> String {
    rgb_to_hex(hex_to_rgb(a).lerp(hex_to_rgb(b), factor))
}

/// Interpolates two `rgba(..)` colors; RGB is rounded, alpha is not.
pub fn lerp_rgba_color(a: &str, b: &str, factor: f32) -> String {
    parse_rgba(a).lerp(parse_rgba(b), factor).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── hex ───────────────────────────────────────────────────────────────

    #[test]
    fn hex_round_trips() {
        for s in ["#000000", "#ffffff", "#1a1a2e", "#41d1ff", "#bd34fe", "#0f0f23"] {
            assert_eq!(rgb_to_hex(hex_to_rgb(s)), s);
        }
    }

    #[test]
    fn hex_accepts_missing_hash_and_upper_case() {
        assert_eq!(hex_to_rgb("41D1FF"), Rgb::new(0x41, 0xd1, 0xff));
    }

    #[test]
    fn malformed_hex_is_black() {
        assert_eq!(hex_to_rgb("#fff"), Rgb::BLACK);
        assert_eq!(hex_to_rgb("nope"), Rgb::BLACK);
        assert_eq!(hex_to_rgb(""), Rgb::BLACK);
    }

    #[test]
    fn packed_hex_round_trips() {
        assert_eq!(Rgb::from_hex(0x16213e).to_hex(), 0x16213e);
        assert_eq!(Rgb::from_hex(0x16213e), hex_to_rgb("#16213e"));
    }

    #[test]
    fn linear_conversion_endpoints() {
        assert_eq!(Rgb::BLACK.to_linear(), Vec3::ZERO);
        let w = Rgb::new(255, 255, 255).to_linear();
        assert!((w - Vec3::ONE).abs().max_element() < 1e-6);
        let mid = Rgb::new(128, 128, 128).to_linear().x;
        assert!(mid > 0.2 && mid < 0.23, "{mid}");
    }

    // ── rgba ──────────────────────────────────────────────────────────────

    #[test]
    fn parses_rgba_and_rgb() {
        assert_eq!(parse_rgba("rgba(41, 128, 185, 0.8)"), Rgba::new(41.0, 128.0, 185.0, 0.8));
        assert_eq!(parse_rgba("rgb(1,2,3)"), Rgba::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn missing_channels_default() {
        assert_eq!(parse_rgba("rgba(10)"), Rgba::new(10.0, 0.0, 0.0, 1.0));
        assert_eq!(parse_rgba("rgba(x, 5, 6, 0.5)"), Rgba::new(0.0, 5.0, 6.0, 0.5));
    }

    #[test]
    fn rgba_channels_read_leading_numbers() {
        assert_eq!(parse_rgba("rgba(12px, 3.5e1, .5, 0.25 alpha)"), Rgba::new(12.0, 35.0, 0.5, 0.25));
        assert_eq!(parse_rgba("rgb(-4, +7, 1e)"), Rgba::new(-4.0, 7.0, 1.0, 1.0));
        assert_eq!(parse_rgba("rgba(1, 2, 3, x)"), Rgba::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn rgba_group_is_found_past_earlier_mentions() {
        assert_eq!(parse_rgba("rgb is used: rgba(9, 8, 7, 0.5)"), Rgba::new(9.0, 8.0, 7.0, 0.5));
        assert_eq!(parse_rgba("rgb() then rgb(1, 2, 3)"), Rgba::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(parse_rgba("color: rgba(5,6,7)"), Rgba::new(5.0, 6.0, 7.0, 1.0));
    }

    #[test]
    fn malformed_rgba_is_opaque_black() {
        assert_eq!(parse_rgba("#ffffff"), Rgba::OPAQUE_BLACK);
        assert_eq!(parse_rgba("rgba 1 2 3"), Rgba::OPAQUE_BLACK);
        assert_eq!(parse_rgba("rgba(1, 2, 3"), Rgba::OPAQUE_BLACK);
    }

    #[test]
    fn rgba_to_hex_rounds_and_drops_alpha() {
        assert_eq!(rgba_to_hex("rgba(65, 209, 255, 0.2)"), 0x41d1ff);
        assert_eq!(rgba_to_hex("rgba(64.6, 0.4, 254.5, 1)"), 0x4100ff);
    }

    // ── lerp ──────────────────────────────────────────────────────────────

    #[test]
    fn lerp_endpoints_and_monotonic() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        let mut last = f32::MIN;
        for i in 0..=10 {
            let v = lerp(-1.0, 3.0, i as f32 / 10.0);
            assert!(v >= last);
            last = v;
        }
    }

    #[test]
    fn lerp_color_rounds_channels() {
        assert_eq!(lerp_color("#000000", "#ffffff", 0.5), "#808080");
        assert_eq!(lerp_color("#1a1a2e", "#1a1a2e", 0.3), "#1a1a2e");
        assert_eq!(lerp_color("#0f0f23", "#1a1a2e", 1.0), "#1a1a2e");
    }

    #[test]
    fn lerp_rgba_rounds_rgb_but_not_alpha() {
        assert_eq!(
            lerp_rgba_color("rgba(0, 0, 0, 0)", "rgba(255, 255, 255, 1)", 0.5),
            "rgba(128, 128, 128, 0.5)"
        );
        assert_eq!(
            lerp_rgba_color("rgba(41, 128, 185, 0.8)", "rgba(65, 209, 255, 1)", 0.0),
            "rgba(41, 128, 185, 0.8)"
        );
    }

    #[test]
    fn typed_and_string_rgba_agree() {
        let a = Rgba::new(41.0, 128.0, 185.0, 0.8);
        let b = Rgba::new(65.0, 209.0, 255.0, 1.0);
        assert_eq!(a.lerp(b, 0.25).to_string(), lerp_rgba_color(&a.to_string(), &b.to_string(), 0.25));
    }
}
