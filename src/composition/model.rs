use crate::{
    animation::ease::Easing,
    composition::shape::ShapeKind,
    foundation::core::Size,
    foundation::ids::{ObjectId, SlideId},
};

/// Default x/y position of a keyframe or slide snapshot.
pub const DEFAULT_POSITION: f64 = 0.0;
/// Default uniform scale.
pub const DEFAULT_SCALE: f64 = 1.0;
/// Default rotation in degrees.
pub const DEFAULT_ROTATION: f64 = 0.0;
/// Default opacity.
pub const DEFAULT_OPACITY: f64 = 1.0;
/// Default outline width.
pub const DEFAULT_BORDER_WIDTH: f64 = 2.0;
/// Default keyframe interval length.
pub const DEFAULT_KEYFRAME_DURATION: f64 = 0.0;
/// Animation length used when a timeline document has no motion at all.
pub const DEFAULT_ANIMATION_DURATION: f64 = 5.0;
/// Length of a freshly created slide.
pub const DEFAULT_SLIDE_DURATION: f64 = 1.0;
/// Primary color of new objects.
pub const DEFAULT_COLOR: &str = "#000000";
/// Color of new connections.
pub const DEFAULT_CONNECTION_COLOR: &str = "#000000";
/// Line width of new connections.
pub const DEFAULT_CONNECTION_WIDTH: f64 = 2.0;

/// Authoring paradigm of a document. Fixed at creation; never converted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationMode {
    /// Keyframed objects on one timeline.
    #[default]
    Timeline,
    /// Discrete snapshots interpolated slide to slide.
    Slides,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Top-level persisted animation unit.
///
/// Documents are plain data: load them through [`crate::normalize_value`] (or
/// [`AnimationDocument::from_json_str`]) to get the canonical form the evaluator and editor
/// expect, and hand them to [`crate::compile_frame`] for playback.
pub struct AnimationDocument {
    /// Display title.
    pub title: String,
    /// Timeline or slides.
    pub mode: AnimationMode,
    /// Authoring canvas width; `None` disables fit-to-surface scaling.
    pub canvas_width: Option<f64>,
    /// Authoring canvas height; `None` disables fit-to-surface scaling.
    pub canvas_height: Option<f64>,
    /// Derived animation length in seconds (recomputed by the normalizer).
    pub duration: f64,
    /// Author-chosen length that wins over [`AnimationDocument::duration`].
    pub duration_override: Option<f64>,
    /// Timeline-mode objects in z-order (first is painted first).
    #[serde(default)]
    pub objects: Vec<SceneObject>,
    /// Timeline-mode connections.
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Slide-mode content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_data: Option<SlideData>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One animated primitive or group.
///
/// A group's own `transitions` drive its pivot, scale, rotation and opacity; each child's
/// transitions are expressed in the group's local coordinate frame.
pub struct SceneObject {
    /// Stable id, unique across the document.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Primitive drawn for this object.
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Keyframes sorted by `start_time`; never empty after normalization.
    #[serde(default)]
    pub transitions: Vec<Keyframe>,
    /// Members of a group, in the group's frame.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneObject>,
    /// Id of the saved library entry this object was instantiated from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A control point on an object's timeline.
pub struct Keyframe {
    /// Seconds from the start of the animation.
    pub start_time: f64,
    /// Time until the next keyframe; on the last keyframe this is the hold length.
    pub duration: f64,
    /// Center x in the parent frame.
    pub x: f64,
    /// Center y in the parent frame.
    pub y: f64,
    /// Explicit width; `None` uses the shape default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height; for text this is the font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Uniform scale factor.
    pub scale: f64,
    /// Degrees.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Primary color string.
    pub color: String,
    /// `"transparent"` means stroke only.
    pub fill_color: Option<String>,
    /// Outline color, if any.
    pub stroke_color: Option<String>,
    /// Outline width.
    pub border_width: f64,
    /// Rectangle drawn without its top edge (stack/queue visuals).
    #[serde(default)]
    pub open_top: bool,
    /// Label text.
    #[serde(default)]
    pub text: String,
    /// Easing of the interval starting here. Unset falls back to the next keyframe's easing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Directed arrow between two objects' live anchors.
pub struct Connection {
    /// Source object.
    pub from_id: ObjectId,
    /// Target object.
    pub to_id: ObjectId,
    /// Stroke color.
    pub color: String,
    /// Stroke width.
    pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Slide-mode content.
pub struct SlideData {
    /// Slides in play order.
    pub slides: Vec<Slide>,
    /// Canonical templates of every object used on any slide.
    #[serde(default)]
    pub object_library: Vec<SceneObjectTemplate>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// A discrete authored snapshot plus the timing used to interpolate into the next slide.
pub struct Slide {
    /// Stable slide id.
    pub id: SlideId,
    /// Accumulated start time (recomputed by the normalizer).
    pub time: f64,
    /// Seconds spent interpolating into the next slide.
    pub duration: f64,
    /// Curve of that interpolation.
    pub easing: Easing,
    /// Snapshots of the objects shown on this slide.
    #[serde(default)]
    pub objects: Vec<SlideObjectState>,
    /// Forward-inheriting: see [`crate::add_connection_forward`].
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Absolute property snapshot of one object on one slide.
pub struct SlideObjectState {
    /// Template id.
    pub id: ObjectId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Uniform scale factor.
    pub scale: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Explicit width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Primary color.
    pub color: String,
    /// Label text.
    #[serde(default)]
    pub text: String,
    /// Hidden snapshots are skipped by evaluation.
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Slide-mode object template: shape and the attributes slides do not snapshot.
pub struct SceneObjectTemplate {
    /// Object id shared by every slide snapshot.
    pub id: ObjectId,
    /// Display name.
    pub name: String,
    /// Primitive drawn for this object.
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Fill override.
    #[serde(default)]
    pub fill_color: Option<String>,
    /// Outline color, if any.
    #[serde(default)]
    pub stroke_color: Option<String>,
    /// Outline width.
    pub border_width: f64,
    /// Rectangle drawn without its top edge.
    #[serde(default)]
    pub open_top: bool,
    /// Group members in the template's local frame.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneObject>,
}

impl Default for Keyframe {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            duration: DEFAULT_KEYFRAME_DURATION,
            x: DEFAULT_POSITION,
            y: DEFAULT_POSITION,
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
            easing: None,
        }
    }
}

impl Keyframe {
    /// A zero-duration keyframe at `(x, y)` starting at `start_time`.
    pub fn at(start_time: f64, x: f64, y: f64) -> Self {
        Self {
            start_time,
            x,
            y,
            ..Self::default()
        }
    }

    /// End of the interval that starts at this keyframe.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

impl Connection {
    /// Connection with the default color and width.
    pub fn new(from_id: ObjectId, to_id: ObjectId) -> Self {
        Self {
            from_id,
            to_id,
            color: DEFAULT_CONNECTION_COLOR.to_string(),
            width: DEFAULT_CONNECTION_WIDTH,
        }
    }

    /// Whether `id` is either endpoint.
    pub fn touches(&self, id: &ObjectId) -> bool {
        &self.from_id == id || &self.to_id == id
    }

    /// Whether this is exactly the `from` to `to` link.
    pub fn links(&self, from: &ObjectId, to: &ObjectId) -> bool {
        &self.from_id == from && &self.to_id == to
    }
}

impl SceneObject {
    /// A leaf object with a single keyframe.
    pub fn leaf(id: ObjectId, kind: ShapeKind, keyframe: Keyframe) -> Self {
        Self {
            name: id.0.clone(),
            id,
            kind,
            transitions: vec![keyframe],
            children: Vec::new(),
            library_id: None,
        }
    }

    /// Whether this object has children.
    pub fn is_group(&self) -> bool {
        self.kind == ShapeKind::Group
    }

    /// Latest `start_time + duration` over this object and all of its descendants.
    pub fn motion_end(&self) -> f64 {
        let own = self
            .transitions
            .iter()
            .map(Keyframe::end_time)
            .fold(0.0, f64::max);
        self.children
            .iter()
            .map(SceneObject::motion_end)
            .fold(own, f64::max)
    }

    /// Depth-first search of this object and its descendants.
    pub fn find(&self, id: &ObjectId) -> Option<&SceneObject> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Visits this object and every descendant, parents first.
    pub fn visit_ids(&self, f: &mut impl FnMut(&ObjectId)) {
        f(&self.id);
        for child in &self.children {
            child.visit_ids(f);
        }
    }
}

impl SlideObjectState {
    /// Visible snapshot at `(x, y)` with default properties.
    pub fn at(id: ObjectId, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            scale: DEFAULT_SCALE,
            rotation: DEFAULT_ROTATION,
            opacity: DEFAULT_OPACITY,
            width: None,
            height: None,
            color: DEFAULT_COLOR.to_string(),
            text: String::new(),
            visible: true,
        }
    }
}

impl SceneObjectTemplate {
    /// Template with default styling.
    pub fn new(id: ObjectId, kind: ShapeKind) -> Self {
        Self {
            name: id.0.clone(),
            id,
            kind,
            fill_color: None,
            stroke_color: None,
            border_width: DEFAULT_BORDER_WIDTH,
            open_top: false,
            children: Vec::new(),
        }
    }
}

impl Slide {
    /// Slide with no objects and the default timing.
    pub fn empty(id: SlideId) -> Self {
        Self {
            id,
            time: 0.0,
            duration: DEFAULT_SLIDE_DURATION,
            easing: Easing::Linear,
            objects: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Snapshot of `id` on this slide.
    pub fn object(&self, id: &ObjectId) -> Option<&SlideObjectState> {
        self.objects.iter().find(|o| &o.id == id)
    }
}

impl SlideData {
    /// Template for `id`.
    pub fn template(&self, id: &ObjectId) -> Option<&SceneObjectTemplate> {
        self.object_library.iter().find(|t| &t.id == id)
    }
}

impl AnimationDocument {
    /// A fresh document: an empty timeline, or a slide deck holding one empty slide.
    pub fn empty(title: impl Into<String>, mode: AnimationMode) -> Self {
        let slide_data = match mode {
            AnimationMode::Timeline => None,
            AnimationMode::Slides => Some(SlideData {
                slides: vec![Slide::empty(SlideId::new("slide-1"))],
                object_library: Vec::new(),
            }),
        };
        let duration = match mode {
            AnimationMode::Timeline => DEFAULT_ANIMATION_DURATION,
            AnimationMode::Slides => DEFAULT_SLIDE_DURATION,
        };
        Self {
            title: title.into(),
            mode,
            canvas_width: None,
            canvas_height: None,
            duration,
            duration_override: None,
            objects: Vec::new(),
            connections: Vec::new(),
            slide_data,
        }
    }

    /// `duration_override` when set, otherwise the derived `duration`.
    pub fn effective_duration(&self) -> f64 {
        self.duration_override.unwrap_or(self.duration)
    }

    /// Cursor range covered by playback: effective duration or summed slide durations.
    pub fn playback_length(&self) -> f64 {
        match self.mode {
            AnimationMode::Timeline => self.effective_duration(),
            AnimationMode::Slides => self
                .slide_data
                .as_ref()
                .map(|d| crate::composition::slides::total_slide_duration(&d.slides))
                .unwrap_or(0.0),
        }
    }

    /// Authoring canvas size when both dimensions are set.
    pub fn canvas_size(&self) -> Option<Size> {
        match (self.canvas_width, self.canvas_height) {
            (Some(w), Some(h)) => Some(Size::new(w, h)),
            _ => None,
        }
    }

    /// Finds a timeline object (at any nesting depth) by id.
    pub fn find_object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find_map(|o| o.find(id))
    }

    /// Parses any JSON object and normalizes it.
    pub fn from_json_str(s: &str) -> crate::AnimResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(s).map_err(|e| crate::AnimError::serde(e.to_string()))?;
        Ok(crate::normalize::pass::normalize_value(&value))
    }

    /// Serializes with camelCase keys.
    pub fn to_json_string_pretty(&self) -> crate::AnimResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| crate::AnimError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
