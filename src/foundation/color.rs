//! CSS-ish color strings as stored in documents.

use crate::foundation::core::Rgba8;

/// Keyword meaning "stroke only": the shape has no fill.
pub const TRANSPARENT_KEYWORD: &str = "transparent";

const NAMED: &[(&str, Rgba8)] = &[
    ("black", Rgba8::opaque(0, 0, 0)),
    ("white", Rgba8::opaque(255, 255, 255)),
    ("red", Rgba8::opaque(255, 0, 0)),
    ("green", Rgba8::opaque(0, 128, 0)),
    ("blue", Rgba8::opaque(0, 0, 255)),
    ("yellow", Rgba8::opaque(255, 255, 0)),
    ("orange", Rgba8::opaque(255, 165, 0)),
    ("purple", Rgba8::opaque(128, 0, 128)),
    ("gray", Rgba8::opaque(128, 128, 128)),
    ("grey", Rgba8::opaque(128, 128, 128)),
    ("pink", Rgba8::opaque(255, 192, 203)),
    ("cyan", Rgba8::opaque(0, 255, 255)),
    ("magenta", Rgba8::opaque(255, 0, 255)),
    ("brown", Rgba8::opaque(165, 42, 42)),
];

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)`, `transparent` and a
/// small named palette. Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Rgba8> {
    let s = s.trim();
    if s.eq_ignore_ascii_case(TRANSPARENT_KEYWORD) {
        return Some(Rgba8::TRANSPARENT);
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, c)| *c)
}

/// Whether a fill color string means "no fill".
pub fn is_transparent_keyword(s: &str) -> bool {
    s.trim().eq_ignore_ascii_case(TRANSPARENT_KEYWORD)
}

fn parse_hex(hex: &str) -> Option<Rgba8> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba8::opaque(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Rgba8::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
        6 => Some(Rgba8::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba8::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str) -> Option<Rgba8> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
    };
    match parts.as_slice() {
        [r, g, b] => Some(Rgba8::opaque(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha: f64 = a.parse().ok()?;
            if !alpha.is_finite() {
                return None;
            }
            Some(Rgba8::new(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
