//! Uniform fit of the authoring canvas into a render surface.

use crate::foundation::core::{Affine, Point, Size};

/// Uniform scale plus centering offset mapping canvas coordinates onto a surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ViewportFit {
    /// Canvas-to-surface scale.
    pub scale: f64,
    /// Horizontal centering offset in surface pixels.
    pub offset_x: f64,
    /// Vertical centering offset in surface pixels.
    pub offset_y: f64,
}

impl Default for ViewportFit {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewportFit {
    /// No scaling, no offset.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };

    /// Fits `canvas` into `surface`; no canvas (or a degenerate one) means identity.
    pub fn fit(canvas: Option<Size>, surface: Size) -> Self {
        match canvas {
            Some(c) => Self::fit_dims(c.width, c.height, surface.width, surface.height),
            None => Self::IDENTITY,
        }
    }

    /// `scale = min(tw / sw, th / sh)`, centered on both axes.
    pub fn fit_dims(sw: f64, sh: f64, tw: f64, th: f64) -> Self {
        let usable = |v: f64| v.is_finite() && v > 0.0;
        if !(usable(sw) && usable(sh) && usable(tw) && usable(th)) {
            return Self::IDENTITY;
        }
        let scale = (tw / sw).min(th / sh);
        Self {
            scale,
            offset_x: (tw - sw * scale) / 2.0,
            offset_y: (th - sh * scale) / 2.0,
        }
    }

    /// The fit as an affine transform.
    pub fn to_affine(self) -> Affine {
        Affine::translate((self.offset_x, self.offset_y)) * Affine::scale(self.scale)
    }

    /// Maps a canvas point onto the surface.
    pub fn canvas_to_surface(self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale + self.offset_y,
        )
    }

    /// Inverse of [`ViewportFit::canvas_to_surface`], used to map pointer input.
    pub fn surface_to_canvas(self, p: Point) -> Point {
        if self.scale == 0.0 {
            return p;
        }
        Point::new(
            (p.x - self.offset_x) / self.scale,
            (p.y - self.offset_y) / self.scale,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/viewport.rs"]
mod tests;
