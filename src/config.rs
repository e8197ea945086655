//! Engine-wide tunables. Document semantics (keyframe defaults) are constants in
//! [`crate::composition::model`], not configuration.

use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{AnimError, AnimResult},
    normalize::pass::NormalizeOptions,
    render::backend::RenderSettings,
};

/// Engine settings shared by the CLI, playback and the editor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timeline length used when a document has no motion.
    pub default_duration_secs: f64,
    /// Slide length used when a slide has none.
    pub default_slide_duration_secs: f64,
    /// Fade step seeded by create-object at a non-zero start offset.
    pub fade_in_secs: f64,
    /// Slide playback commits the authoritative cursor once per this many frames.
    pub commit_every_n_frames: u32,
    /// Raster background; alpha 0 leaves the surface transparent.
    pub clear_rgba: [u8; 4],
    /// Label face; unset uses the bundled DejaVu Sans Mono.
    pub font_path: Option<PathBuf>,
    /// Default render surface width.
    pub surface_width: u32,
    /// Default render surface height.
    pub surface_height: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: 5.0,
            default_slide_duration_secs: 1.0,
            fade_in_secs: 0.5,
            commit_every_n_frames: 6,
            clear_rgba: [255, 255, 255, 255],
            font_path: None,
            surface_width: 960,
            surface_height: 540,
        }
    }
}

impl EngineConfig {
    /// Reads a JSON config; absent fields keep their defaults.
    pub fn from_path(path: &Path) -> AnimResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnimError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Parses a JSON config; absent fields keep their defaults.
    pub fn from_json_str(s: &str) -> AnimResult<Self> {
        serde_json::from_str(s).map_err(|e| AnimError::serde(format!("config: {e}")))
    }

    /// Raster settings for the CPU backend.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: Some(self.clear_rgba),
            font_path: self.font_path.clone(),
        }
    }

    /// Normalizer fallbacks, with non-positive values replaced by the built-in defaults.
    pub fn normalize_options(&self) -> NormalizeOptions {
        let positive_or = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        let defaults = NormalizeOptions::default();
        NormalizeOptions {
            default_duration: positive_or(self.default_duration_secs, defaults.default_duration),
            default_slide_duration: positive_or(
                self.default_slide_duration_secs,
                defaults.default_slide_duration,
            ),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
