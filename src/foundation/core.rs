pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, the fallback for unparseable colors.
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Color with full alpha.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether alpha is zero.
    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Premultiplied bytes in `[r, g, b, a]` order.
    pub fn to_premul_bytes(self) -> [u8; 4] {
        let premul = |c: u8| -> u8 { ((u16::from(c) * u16::from(self.a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
