//! Label shaping for text ops.
//!
//! Labels are shaped with Parley against a single registered font. With no
//! font configured, the bundled DejaVu Sans Mono face is used.

use std::path::Path;

use crate::foundation::error::{AnimError, AnimResult};

/// Face used when [`RenderSettings::font_path`](super::backend::RenderSettings) is unset.
pub const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");

/// Straight-alpha brush carried through Parley styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrush {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// A shaped label with its extent, ready to be centered on the origin.
pub struct ShapedLabel {
    /// Parley layout in label-local pixels, top-left at the origin.
    pub layout: parley::Layout<TextBrush>,
    /// Advance width of the widest line.
    pub width: f64,
    /// Total line height.
    pub height: f64,
}

/// Parley contexts bound to one font face.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextLayoutEngine {
    /// Registers `font_bytes` as the only face available to labels.
    pub fn new(font_bytes: Vec<u8>) -> AnimResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| AnimError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| AnimError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0),
        })
    }

    /// Loads the face at `path`, or the bundled face when `path` is `None`.
    pub fn from_font_path(path: Option<&Path>) -> AnimResult<Self> {
        let bytes = match path {
            Some(path) => std::fs::read(path).map_err(|e| {
                AnimError::validation(format!("read font '{}': {e}", path.display()))
            })?,
            None => BUNDLED_FONT.to_vec(),
        };
        Self::new(bytes)
    }

    /// Family name of the registered face.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Font handle for glyph runs produced by [`Self::layout_label`].
    pub fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shapes `text` on unbounded lines at `size_px`.
    pub fn layout_label(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrush,
    ) -> AnimResult<ShapedLabel> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(AnimError::validation("font size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);

        let width = f64::from(layout.width());
        let height = f64::from(layout.height());
        Ok(ShapedLabel {
            layout,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
