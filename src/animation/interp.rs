//! Timeline-mode sampling: keyframes plus a time in seconds yield a visual state.

use crate::{
    animation::ease::Easing,
    composition::model::{
        DEFAULT_BORDER_WIDTH, DEFAULT_COLOR, DEFAULT_OPACITY, DEFAULT_ROTATION, DEFAULT_SCALE,
        Keyframe, SceneObject,
    },
    foundation::core::Point,
    foundation::math::lerp,
};

/// Fully resolved visual properties of one object at one instant.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualState {
    /// Center x in the parent frame.
    pub x: f64,
    /// Center y in the parent frame.
    pub y: f64,
    /// Explicit width; `None` uses the shape default.
    pub width: Option<f64>,
    /// Explicit height; for text this is the font size.
    pub height: Option<f64>,
    /// Uniform scale factor.
    pub scale: f64,
    /// Degrees.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Primary color string.
    pub color: String,
    /// Fill override; `"transparent"` means stroke only.
    pub fill_color: Option<String>,
    /// Outline color, if any.
    pub stroke_color: Option<String>,
    /// Outline width.
    pub border_width: f64,
    /// Rectangle drawn without its top edge.
    pub open_top: bool,
    /// Label text.
    pub text: String,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            scale: DEFAULT_SCALE,
            rotation: DEFAULT_ROTATION,
            opacity: DEFAULT_OPACITY,
            color: DEFAULT_COLOR.to_string(),
            fill_color: None,
            stroke_color: None,
            border_width: DEFAULT_BORDER_WIDTH,
            open_top: false,
            text: String::new(),
        }
    }
}

impl VisualState {
    /// Center as a point.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<&Keyframe> for VisualState {
    fn from(k: &Keyframe) -> Self {
        Self {
            x: k.x,
            y: k.y,
            width: k.width,
            height: k.height,
            scale: k.scale,
            rotation: k.rotation,
            opacity: k.opacity,
            color: k.color.clone(),
            fill_color: k.fill_color.clone(),
            stroke_color: k.stroke_color.clone(),
            border_width: k.border_width,
            open_top: k.open_top,
            text: k.text.clone(),
        }
    }
}

/// Linear blend between two values of a type.
pub trait Lerp: Sized {
    /// Blends `a` toward `b` by `t`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp(*a, *b, t)
    }
}

impl Lerp for Option<f64> {
    // Sizes only blend when both ends define them; otherwise the target wins.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Some(a), Some(b)) => Some(lerp(*a, *b, t)),
            _ => *b,
        }
    }
}

/// Blends numeric properties; discrete ones (colors, text, `open_top`) take the target's value.
fn blend(a: &Keyframe, b: &Keyframe, t: f64) -> VisualState {
    VisualState {
        x: <f64 as Lerp>::lerp(&a.x, &b.x, t),
        y: <f64 as Lerp>::lerp(&a.y, &b.y, t),
        width: <Option<f64> as Lerp>::lerp(&a.width, &b.width, t),
        height: <Option<f64> as Lerp>::lerp(&a.height, &b.height, t),
        scale: <f64 as Lerp>::lerp(&a.scale, &b.scale, t),
        rotation: <f64 as Lerp>::lerp(&a.rotation, &b.rotation, t),
        opacity: <f64 as Lerp>::lerp(&a.opacity, &b.opacity, t),
        border_width: <f64 as Lerp>::lerp(&a.border_width, &b.border_width, t),
        ..VisualState::from(b)
    }
}

/// Samples an object's own keyframes at time `t`. `None` only when it has no keyframes.
pub fn state_at_time(object: &SceneObject, t: f64) -> Option<VisualState> {
    sample_keyframes(&object.transitions, t)
}

/// Samples a keyframe list that is sorted by `start_time`.
///
/// - before the first keyframe: the first keyframe with opacity forced to 0
/// - at/after the last keyframe's end: the last keyframe (hold)
/// - inside `[k_i.start, k_i.start + k_i.duration]`: eased blend from `k_i` to `k_(i+1)`,
///   earliest-starting interval first when intervals overlap
/// - in a gap between intervals: `k_(i+1)`, the target already reached
pub fn sample_keyframes(keys: &[Keyframe], t: f64) -> Option<VisualState> {
    let first = keys.first()?;
    let last = keys.last()?;
    let t = if t.is_finite() { t } else { 0.0 };

    if t < first.start_time {
        let mut state = VisualState::from(first);
        state.opacity = 0.0;
        return Some(state);
    }
    if t >= last.end_time() {
        return Some(last.into());
    }

    for pair in keys.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t < a.start_time {
            continue;
        }
        if t <= a.end_time() {
            if a.duration <= 0.0 {
                return Some(a.into());
            }
            let progress = ((t - a.start_time) / a.duration).clamp(0.0, 1.0);
            let easing = a.easing.or(b.easing).unwrap_or(Easing::Linear);
            return Some(blend(a, b, easing.apply(progress)));
        }
        if t < b.start_time {
            return Some(b.into());
        }
    }

    Some(last.into())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
