//! Partial updates applied by property-panel edits.

use crate::{
    animation::ease::Easing,
    composition::model::{Keyframe, SlideObjectState},
};

/// Every keyframe field as an optional override. `fill_color`, `stroke_color`, `width`,
/// `height` and `easing` are themselves optional, so clearing them is `Some(None)`.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyframePatch {
    /// New start time.
    pub start_time: Option<f64>,
    /// New duration.
    pub duration: Option<f64>,
    /// New x.
    pub x: Option<f64>,
    /// New y.
    pub y: Option<f64>,
    /// New width or `Some(None)` to clear.
    pub width: Option<Option<f64>>,
    /// New height or `Some(None)` to clear.
    pub height: Option<Option<f64>>,
    /// New scale.
    pub scale: Option<f64>,
    /// New rotation in degrees.
    pub rotation: Option<f64>,
    /// New opacity.
    pub opacity: Option<f64>,
    /// New primary color.
    pub color: Option<String>,
    /// New fill or `Some(None)` to clear.
    pub fill_color: Option<Option<String>>,
    /// New outline color or `Some(None)` to clear.
    pub stroke_color: Option<Option<String>>,
    /// New outline width.
    pub border_width: Option<f64>,
    /// New open-top flag.
    pub open_top: Option<bool>,
    /// New label text.
    pub text: Option<String>,
    /// New easing or `Some(None)` to unset.
    pub easing: Option<Option<Easing>>,
}

impl KeyframePatch {
    /// Writes every set field into `k`.
    pub fn apply(&self, k: &mut Keyframe) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = &self.$field {
                    k.$field = v.clone();
                })*
            };
        }
        set!(
            start_time,
            duration,
            x,
            y,
            width,
            height,
            scale,
            rotation,
            opacity,
            color,
            fill_color,
            stroke_color,
            border_width,
            open_top,
            text,
            easing
        );
    }
}

/// Slide snapshot fields as optional overrides.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapshotPatch {
    /// New x.
    pub x: Option<f64>,
    /// New y.
    pub y: Option<f64>,
    /// New scale.
    pub scale: Option<f64>,
    /// New rotation in degrees.
    pub rotation: Option<f64>,
    /// New opacity.
    pub opacity: Option<f64>,
    /// New width or `Some(None)` to clear.
    pub width: Option<Option<f64>>,
    /// New height or `Some(None)` to clear.
    pub height: Option<Option<f64>>,
    /// New color.
    pub color: Option<String>,
    /// New label text.
    pub text: Option<String>,
    /// New visibility.
    pub visible: Option<bool>,
}

impl SnapshotPatch {
    /// Writes every set field into `s`.
    pub fn apply(&self, s: &mut SlideObjectState) {
        macro_rules! set {
            ($($field:ident),*) => {
                $(if let Some(v) = &self.$field {
                    s.$field = v.clone();
                })*
            };
        }
        set!(x, y, scale, rotation, opacity, width, height, color, text, visible);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/patch.rs"]
mod tests;
