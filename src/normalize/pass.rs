//! Canonicalization of persisted animation documents.
//!
//! Normalization is total and idempotent: any JSON value yields a document, every missing or
//! non-finite number is replaced by its documented default, keyframes are stably sorted by
//! start time, ids are made unique, and derived fields (`duration`, slide `time`) are
//! recomputed. Running it on its own output changes nothing.

use std::collections::HashSet;

use serde_json::Value;

use crate::{
    animation::ease::Easing,
    composition::model::{
        AnimationDocument, AnimationMode, Connection, DEFAULT_ANIMATION_DURATION,
        DEFAULT_BORDER_WIDTH, DEFAULT_COLOR, DEFAULT_CONNECTION_COLOR, DEFAULT_CONNECTION_WIDTH,
        DEFAULT_KEYFRAME_DURATION, DEFAULT_OPACITY, DEFAULT_POSITION, DEFAULT_ROTATION,
        DEFAULT_SCALE, DEFAULT_SLIDE_DURATION, Keyframe, SceneObject, SceneObjectTemplate, Slide,
        SlideData, SlideObjectState,
    },
    composition::shape::ShapeKind,
    foundation::ids::{IdGen, ObjectId, SlideId},
    foundation::math::finite_or,
};

/// Fallback lengths used where a document does not define one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizeOptions {
    /// Timeline length when no object has any motion.
    pub default_duration: f64,
    /// Length of slides whose duration is missing or not a number.
    pub default_slide_duration: f64,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_ANIMATION_DURATION,
            default_slide_duration: DEFAULT_SLIDE_DURATION,
        }
    }
}

/// Normalizes an untyped JSON document with default options.
pub fn normalize_value(raw: &Value) -> AnimationDocument {
    normalize_value_with(raw, &NormalizeOptions::default())
}

/// Normalizes an untyped JSON document. Never fails: non-objects yield an empty timeline.
pub fn normalize_value_with(raw: &Value, opts: &NormalizeOptions) -> AnimationDocument {
    let doc = read_document(raw, opts);
    normalize_document_with(&doc, opts)
}

/// Normalizes an already-typed document with default options.
pub fn normalize_document(doc: &AnimationDocument) -> AnimationDocument {
    normalize_document_with(doc, &NormalizeOptions::default())
}

/// Canonicalizes a typed document: defaults, sorted keyframes, unique ids, derived timing.
#[tracing::instrument(skip_all, fields(title = %doc.title, mode = ?doc.mode))]
pub fn normalize_document_with(
    doc: &AnimationDocument,
    opts: &NormalizeOptions,
) -> AnimationDocument {
    let mut ids = IdRegistry::new("obj");

    let (objects, connections, slide_data, duration) = match doc.mode {
        AnimationMode::Timeline => {
            for o in &doc.objects {
                o.visit_ids(&mut |id| ids.declare(id.as_str()));
            }
            let objects: Vec<SceneObject> = doc
                .objects
                .iter()
                .map(|o| normalize_object(o, &mut ids))
                .collect();
            let connections = doc.connections.iter().map(normalize_connection).collect();
            let derived = objects
                .iter()
                .map(SceneObject::motion_end)
                .fold(0.0, f64::max);
            let duration = if derived > 0.0 {
                derived
            } else {
                opts.default_duration
            };
            (objects, connections, None, duration)
        }
        AnimationMode::Slides => {
            let data = normalize_slide_data(doc.slide_data.as_ref(), opts, &mut ids);
            let duration = crate::composition::slides::total_slide_duration(&data.slides);
            (Vec::new(), Vec::new(), Some(data), duration)
        }
    };

    AnimationDocument {
        title: doc.title.clone(),
        mode: doc.mode,
        canvas_width: positive(doc.canvas_width),
        canvas_height: positive(doc.canvas_height),
        duration,
        duration_override: doc
            .duration_override
            .filter(|d| d.is_finite())
            .map(|d| d.max(0.0)),
        objects,
        connections,
        slide_data,
    }
}

fn positive(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite() && *v > 0.0)
}

fn non_negative(v: f64, default: f64) -> f64 {
    finite_or(v, default).max(0.0)
}

fn color_or_default(color: &str, default: &str) -> String {
    if color.trim().is_empty() {
        default.to_string()
    } else {
        color.to_string()
    }
}

/// Hands out unique object ids, keeping the first occurrence of each declared id.
struct IdRegistry {
    declared: HashSet<String>,
    used: HashSet<String>,
    generator: IdGen,
}

impl IdRegistry {
    fn new(prefix: &'static str) -> Self {
        Self {
            declared: HashSet::new(),
            used: HashSet::new(),
            generator: IdGen::new(prefix),
        }
    }

    fn declare(&mut self, id: &str) {
        if !id.is_empty() {
            self.declared.insert(id.to_string());
        }
    }

    fn claim(&mut self, id: &str) -> String {
        if !id.is_empty() && self.used.insert(id.to_string()) {
            return id.to_string();
        }
        let fresh = self
            .generator
            .fresh(|c| self.declared.contains(c) || self.used.contains(c));
        tracing::warn!(original = id, assigned = %fresh, "empty or duplicate id replaced");
        self.used.insert(fresh.clone());
        fresh
    }
}

pub(crate) fn normalize_keyframe(k: &Keyframe) -> Keyframe {
    Keyframe {
        start_time: non_negative(k.start_time, 0.0),
        duration: non_negative(k.duration, DEFAULT_KEYFRAME_DURATION),
        x: finite_or(k.x, DEFAULT_POSITION),
        y: finite_or(k.y, DEFAULT_POSITION),
        width: k.width.filter(|v| v.is_finite()).map(|v| v.max(0.0)),
        height: k.height.filter(|v| v.is_finite()).map(|v| v.max(0.0)),
        scale: non_negative(k.scale, DEFAULT_SCALE),
        rotation: finite_or(k.rotation, DEFAULT_ROTATION),
        opacity: finite_or(k.opacity, DEFAULT_OPACITY).clamp(0.0, 1.0),
        color: color_or_default(&k.color, DEFAULT_COLOR),
        fill_color: k.fill_color.clone(),
        stroke_color: k.stroke_color.clone(),
        border_width: non_negative(k.border_width, DEFAULT_BORDER_WIDTH),
        open_top: k.open_top,
        text: k.text.clone(),
        easing: k.easing,
    }
}

/// Stable sort by start time; ties keep their authored order.
pub(crate) fn sort_keyframes(keys: &mut [Keyframe]) {
    keys.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
}

fn normalize_object(o: &SceneObject, ids: &mut IdRegistry) -> SceneObject {
    let id = ids.claim(o.id.as_str());
    let mut transitions: Vec<Keyframe> = o.transitions.iter().map(normalize_keyframe).collect();
    if transitions.is_empty() {
        transitions.push(Keyframe::default());
    }
    sort_keyframes(&mut transitions);
    let children = o
        .children
        .iter()
        .map(|c| normalize_object(c, ids))
        .collect();
    SceneObject {
        name: if o.name.trim().is_empty() {
            id.clone()
        } else {
            o.name.clone()
        },
        id: ObjectId(id),
        kind: o.kind,
        transitions,
        children,
        library_id: o.library_id.clone().filter(|s| !s.is_empty()),
    }
}

fn normalize_connection(c: &Connection) -> Connection {
    Connection {
        from_id: c.from_id.clone(),
        to_id: c.to_id.clone(),
        color: color_or_default(&c.color, DEFAULT_CONNECTION_COLOR),
        width: non_negative(c.width, DEFAULT_CONNECTION_WIDTH),
    }
}

fn normalize_snapshot(s: &SlideObjectState) -> SlideObjectState {
    SlideObjectState {
        id: s.id.clone(),
        x: finite_or(s.x, DEFAULT_POSITION),
        y: finite_or(s.y, DEFAULT_POSITION),
        scale: non_negative(s.scale, DEFAULT_SCALE),
        rotation: finite_or(s.rotation, DEFAULT_ROTATION),
        opacity: finite_or(s.opacity, DEFAULT_OPACITY).clamp(0.0, 1.0),
        width: s.width.filter(|v| v.is_finite()).map(|v| v.max(0.0)),
        height: s.height.filter(|v| v.is_finite()).map(|v| v.max(0.0)),
        color: color_or_default(&s.color, DEFAULT_COLOR),
        text: s.text.clone(),
        visible: s.visible,
    }
}

fn normalize_slide_data(
    data: Option<&SlideData>,
    opts: &NormalizeOptions,
    ids: &mut IdRegistry,
) -> SlideData {
    let empty = SlideData::default();
    let data = data.unwrap_or(&empty);

    for t in &data.object_library {
        ids.declare(t.id.as_str());
        for c in &t.children {
            c.visit_ids(&mut |id| ids.declare(id.as_str()));
        }
    }
    let object_library = data
        .object_library
        .iter()
        .map(|t| SceneObjectTemplate {
            id: ObjectId(ids.claim(t.id.as_str())),
            name: t.name.clone(),
            kind: t.kind,
            fill_color: t.fill_color.clone(),
            stroke_color: t.stroke_color.clone(),
            border_width: non_negative(t.border_width, DEFAULT_BORDER_WIDTH),
            open_top: t.open_top,
            children: t.children.iter().map(|c| normalize_object(c, ids)).collect(),
        })
        .map(|mut t| {
            if t.name.trim().is_empty() {
                t.name = t.id.0.clone();
            }
            t
        })
        .collect();

    let mut slide_ids = IdRegistry::new("slide");
    for s in &data.slides {
        slide_ids.declare(s.id.as_str());
    }
    let mut slides: Vec<Slide> = data
        .slides
        .iter()
        .map(|s| {
            let mut seen = HashSet::new();
            Slide {
                id: SlideId(slide_ids.claim(s.id.as_str())),
                time: 0.0,
                duration: non_negative(s.duration, opts.default_slide_duration),
                easing: s.easing,
                objects: s
                    .objects
                    .iter()
                    .filter(|o| seen.insert(o.id.clone()))
                    .map(normalize_snapshot)
                    .collect(),
                connections: s.connections.iter().map(normalize_connection).collect(),
            }
        })
        .collect();
    if slides.is_empty() {
        slides.push(Slide {
            duration: opts.default_slide_duration,
            ..Slide::empty(SlideId(slide_ids.claim("")))
        });
    }

    let mut start = 0.0;
    for slide in &mut slides {
        slide.time = start;
        start += slide.duration;
    }

    SlideData {
        slides,
        object_library,
    }
}

// ---------------------------------------------------------------------------------------------
// Lenient reading of untyped JSON.

fn num(v: &Value, key: &str) -> Option<f64> {
    let n = match v.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn string(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn boolean(v: &Value, key: &str) -> Option<bool> {
    match v.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        _ => None,
    }
}

fn array<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    v.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn easing(v: &Value, key: &str) -> Option<Easing> {
    let name = string(v, key)?;
    let parsed = Easing::parse(&name);
    if parsed.is_none() {
        tracing::warn!(easing = %name, "unknown easing treated as unset");
    }
    parsed
}

fn shape_kind(v: &Value, has_children: bool) -> ShapeKind {
    let fallback = if has_children {
        ShapeKind::Group
    } else {
        ShapeKind::Circle
    };
    match string(v, "type") {
        Some(name) => ShapeKind::parse(&name).unwrap_or_else(|| {
            tracing::warn!(kind = %name, fallback = fallback.as_str(), "unknown object type");
            fallback
        }),
        None => fallback,
    }
}

fn read_document(raw: &Value, opts: &NormalizeOptions) -> AnimationDocument {
    let slide_value = raw.get("slideData").filter(|v| v.is_object());
    let mode = match string(raw, "mode").map(|m| m.trim().to_ascii_lowercase()) {
        Some(m) if m == "slides" || m == "slide" => AnimationMode::Slides,
        Some(m) if m == "timeline" => AnimationMode::Timeline,
        other => {
            if let Some(m) = other {
                tracing::warn!(mode = %m, "unknown mode");
            }
            if slide_value.is_some() {
                AnimationMode::Slides
            } else {
                AnimationMode::Timeline
            }
        }
    };

    AnimationDocument {
        title: string(raw, "title").unwrap_or_default(),
        mode,
        canvas_width: num(raw, "canvasWidth"),
        canvas_height: num(raw, "canvasHeight"),
        duration: num(raw, "duration").unwrap_or(0.0),
        duration_override: num(raw, "durationOverride"),
        objects: array(raw, "objects").iter().map(read_object).collect(),
        connections: array(raw, "connections")
            .iter()
            .filter_map(read_connection)
            .collect(),
        slide_data: slide_value.map(|v| read_slide_data(v, opts)),
    }
}

fn read_object(v: &Value) -> SceneObject {
    let children: Vec<SceneObject> = array(v, "children").iter().map(read_object).collect();
    let id = string(v, "id").unwrap_or_default();
    SceneObject {
        name: string(v, "name").unwrap_or_default(),
        id: ObjectId(id),
        kind: shape_kind(v, !children.is_empty()),
        transitions: array(v, "transitions").iter().map(read_keyframe).collect(),
        children,
        library_id: string(v, "libraryId"),
    }
}

fn read_keyframe(v: &Value) -> Keyframe {
    Keyframe {
        start_time: num(v, "startTime").unwrap_or(0.0),
        duration: num(v, "duration").unwrap_or(DEFAULT_KEYFRAME_DURATION),
        x: num(v, "x").unwrap_or(DEFAULT_POSITION),
        y: num(v, "y").unwrap_or(DEFAULT_POSITION),
        width: num(v, "width"),
        height: num(v, "height"),
        scale: num(v, "scale").unwrap_or(DEFAULT_SCALE),
        rotation: num(v, "rotation").unwrap_or(DEFAULT_ROTATION),
        opacity: num(v, "opacity").unwrap_or(DEFAULT_OPACITY),
        color: string(v, "color").unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        fill_color: string(v, "fillColor"),
        stroke_color: string(v, "strokeColor"),
        border_width: num(v, "borderWidth").unwrap_or(DEFAULT_BORDER_WIDTH),
        open_top: boolean(v, "openTop").unwrap_or(false),
        text: string(v, "text").unwrap_or_default(),
        easing: easing(v, "easing"),
    }
}

fn read_connection(v: &Value) -> Option<Connection> {
    let (Some(from), Some(to)) = (string(v, "fromId"), string(v, "toId")) else {
        tracing::warn!("connection without endpoints dropped");
        return None;
    };
    Some(Connection {
        from_id: ObjectId(from),
        to_id: ObjectId(to),
        color: string(v, "color").unwrap_or_else(|| DEFAULT_CONNECTION_COLOR.to_string()),
        width: num(v, "width").unwrap_or(DEFAULT_CONNECTION_WIDTH),
    })
}

fn read_slide_data(v: &Value, opts: &NormalizeOptions) -> SlideData {
    SlideData {
        slides: array(v, "slides")
            .iter()
            .map(|s| read_slide(s, opts))
            .collect(),
        object_library: array(v, "objectLibrary").iter().map(read_template).collect(),
    }
}

fn read_slide(v: &Value, opts: &NormalizeOptions) -> Slide {
    Slide {
        id: SlideId(string(v, "id").unwrap_or_default()),
        time: num(v, "time").unwrap_or(0.0),
        duration: num(v, "duration").unwrap_or(opts.default_slide_duration),
        easing: easing(v, "easing").unwrap_or_default(),
        objects: array(v, "objects").iter().map(read_snapshot).collect(),
        connections: array(v, "connections")
            .iter()
            .filter_map(read_connection)
            .collect(),
    }
}

fn read_snapshot(v: &Value) -> SlideObjectState {
    SlideObjectState {
        id: ObjectId(string(v, "id").unwrap_or_default()),
        x: num(v, "x").unwrap_or(DEFAULT_POSITION),
        y: num(v, "y").unwrap_or(DEFAULT_POSITION),
        scale: num(v, "scale").unwrap_or(DEFAULT_SCALE),
        rotation: num(v, "rotation").unwrap_or(DEFAULT_ROTATION),
        opacity: num(v, "opacity").unwrap_or(DEFAULT_OPACITY),
        width: num(v, "width"),
        height: num(v, "height"),
        color: string(v, "color").unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        text: string(v, "text").unwrap_or_default(),
        visible: boolean(v, "visible").unwrap_or(true),
    }
}

fn read_template(v: &Value) -> SceneObjectTemplate {
    let children: Vec<SceneObject> = array(v, "children").iter().map(read_object).collect();
    SceneObjectTemplate {
        id: ObjectId(string(v, "id").unwrap_or_default()),
        name: string(v, "name").unwrap_or_default(),
        kind: shape_kind(v, !children.is_empty()),
        fill_color: string(v, "fillColor"),
        stroke_color: string(v, "strokeColor"),
        border_width: num(v, "borderWidth").unwrap_or(DEFAULT_BORDER_WIDTH),
        open_top: boolean(v, "openTop").unwrap_or(false),
        children,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/normalize/pass.rs"]
mod tests;
