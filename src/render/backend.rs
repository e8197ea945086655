use std::path::PathBuf;

use crate::{compile::plan::RenderPlan, foundation::error::AnimResult};

/// One rendered frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, row-major.
    pub data: Vec<u8>,
    /// Whether `data` holds premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data, as image encoders expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = self.data.clone();
        for px in out.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 {
                px[..3].fill(0);
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        out
    }

    /// Straight-alpha RGBA at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(i..i + 4)?;
        let a = u16::from(px[3]);
        if !self.premultiplied || a == 0 || a == 255 {
            return Some([px[0], px[1], px[2], px[3]]);
        }
        let c = |v: u8| ((u16::from(v) * 255 + a / 2) / a).min(255) as u8;
        Some([c(px[0]), c(px[1]), c(px[2]), px[3]])
    }
}

/// A rasterizer for render plans.
pub trait RenderBackend {
    /// Renders one plan into a frame.
    fn render_plan(&mut self, plan: &RenderPlan) -> AnimResult<FrameRGBA>;
}

/// Backend-independent raster options.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// Background fill; `None` leaves the surface transparent.
    pub clear_rgba: Option<[u8; 4]>,
    /// TrueType/OpenType face for labels; `None` uses the bundled face.
    pub font_path: Option<PathBuf>,
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
