use std::collections::{HashMap, HashSet};

use crate::{
    animation::compound::collect_world_nodes,
    animation::ease::Easing,
    animation::interp::VisualState,
    composition::model::{
        AnimationDocument, AnimationMode, Connection, Keyframe, SceneObject, SlideData,
    },
    composition::shape::{ShapeKind, contains, local_size},
    composition::slides::{add_connection_forward, remove_connection_forward, snapshot_state},
    config::EngineConfig,
    editor::patch::KeyframePatch,
    editor::selection::Selection,
    foundation::core::{Point, Size, Vec2},
    foundation::error::{AnimError, AnimResult},
    foundation::ids::{IdGen, ObjectId},
    normalize::pass::{normalize_document_with, normalize_keyframe, sort_keyframes},
};

/// Pointer gesture in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    /// No pointer gesture.
    #[default]
    Idle,
    /// Selected objects follow the pointer.
    Dragging {
        /// Pointer position at the previous move, canvas units.
        last: Point,
        /// Total displacement since the drag started.
        moved: Vec2,
    },
}

/// Mutable authoring state for one open document.
///
/// Timeline objects live in an id-keyed arena with an explicit z-order list; slide decks keep
/// their slides and template library. Every mutation is synchronous and validated up front:
/// an operation that returns an error has changed nothing.
#[derive(Debug)]
pub struct EditorSession {
    pub(crate) title: String,
    pub(crate) mode: AnimationMode,
    pub(crate) canvas: Option<Size>,
    pub(crate) duration_override: Option<f64>,
    pub(crate) objects: HashMap<ObjectId, SceneObject>,
    pub(crate) order: Vec<ObjectId>,
    pub(crate) connections: Vec<Connection>,
    pub(crate) slide_data: SlideData,
    pub(crate) current_slide: usize,
    pub(crate) selection: Selection,
    pub(crate) gesture: Gesture,
    pub(crate) object_ids: IdGen,
    pub(crate) slide_ids: IdGen,
    pub(crate) config: EngineConfig,
}

impl EditorSession {
    /// A session over a fresh empty document.
    pub fn new(title: impl Into<String>, mode: AnimationMode, config: EngineConfig) -> Self {
        Self::from_document(&AnimationDocument::empty(title, mode), config)
    }

    /// Opens `doc` for editing; the input is normalized first.
    pub fn from_document(doc: &AnimationDocument, config: EngineConfig) -> Self {
        let doc = normalize_document_with(doc, &config.normalize_options());
        let order: Vec<ObjectId> = doc.objects.iter().map(|o| o.id.clone()).collect();
        let objects = doc
            .objects
            .into_iter()
            .map(|o| (o.id.clone(), o))
            .collect();
        Self {
            title: doc.title,
            mode: doc.mode,
            canvas: match (doc.canvas_width, doc.canvas_height) {
                (Some(w), Some(h)) => Some(Size::new(w, h)),
                _ => None,
            },
            duration_override: doc.duration_override,
            objects,
            order,
            connections: doc.connections,
            slide_data: doc.slide_data.unwrap_or_default(),
            current_slide: 0,
            selection: Selection::default(),
            gesture: Gesture::Idle,
            object_ids: IdGen::new("obj"),
            slide_ids: IdGen::new("slide"),
            config,
        }
    }

    /// Snapshot of the session as a normalized document, ready to persist.
    pub fn to_document(&self) -> AnimationDocument {
        let slides = self.mode == AnimationMode::Slides;
        let doc = AnimationDocument {
            title: self.title.clone(),
            mode: self.mode,
            canvas_width: self.canvas.map(|c| c.width),
            canvas_height: self.canvas.map(|c| c.height),
            duration: 0.0,
            duration_override: self.duration_override,
            objects: self.objects_in_order().cloned().collect(),
            connections: self.connections.clone(),
            slide_data: slides.then(|| self.slide_data.clone()),
        };
        normalize_document_with(&doc, &self.config.normalize_options())
    }

    /// Authoring paradigm of the open document.
    pub fn mode(&self) -> AnimationMode {
        self.mode
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Renames the document.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Sets the authoring canvas; degenerate sizes clear it.
    pub fn set_canvas_size(&mut self, canvas: Option<Size>) {
        self.canvas = canvas.filter(|c| c.width > 0.0 && c.height > 0.0);
    }

    /// Pins the timeline length; negative or non-finite values are rejected.
    pub fn set_duration_override(&mut self, duration: Option<f64>) -> AnimResult<()> {
        if let Some(d) = duration
            && !(d.is_finite() && d >= 0.0)
        {
            return Err(AnimError::validation(format!("invalid duration {d}")));
        }
        self.duration_override = duration;
        Ok(())
    }

    /// Timeline objects in paint order.
    pub fn objects_in_order(&self) -> impl Iterator<Item = &SceneObject> {
        self.order.iter().filter_map(|id| self.objects.get(id))
    }

    /// Top-level timeline object by id.
    pub fn object(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    /// Connections in effect: the timeline's, or the current slide's.
    pub fn connections(&self) -> &[Connection] {
        match self.mode {
            AnimationMode::Timeline => &self.connections,
            AnimationMode::Slides => self
                .slide_data
                .slides
                .get(self.current_slide)
                .map(|s| s.connections.as_slice())
                .unwrap_or(&[]),
        }
    }

    /// Current selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Pointer gesture in progress.
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub(crate) fn require_timeline(&self, op: &str) -> AnimResult<()> {
        match self.mode {
            AnimationMode::Timeline => Ok(()),
            AnimationMode::Slides => Err(AnimError::interaction(format!(
                "{op} is only available in timeline mode"
            ))),
        }
    }

    /// Every id in use: timeline objects with descendants, and slide templates.
    pub(crate) fn taken_ids(&self) -> HashSet<String> {
        let mut taken = HashSet::new();
        for o in self.objects.values() {
            o.visit_ids(&mut |id| {
                taken.insert(id.0.clone());
            });
        }
        for t in &self.slide_data.object_library {
            taken.insert(t.id.0.clone());
            for c in &t.children {
                c.visit_ids(&mut |id| {
                    taken.insert(id.0.clone());
                });
            }
        }
        taken
    }

    pub(crate) fn fresh_object_id(&mut self) -> ObjectId {
        let taken = self.taken_ids();
        ObjectId(self.object_ids.fresh(|c| taken.contains(c)))
    }

    /// Whether `id` names a timeline object at any depth, or a slide template.
    pub(crate) fn resolves(&self, id: &ObjectId) -> bool {
        match self.mode {
            AnimationMode::Timeline => self.objects.values().any(|o| o.find(id).is_some()),
            AnimationMode::Slides => self.slide_data.template(id).is_some(),
        }
    }

    // --- Creation -------------------------------------------------------------------------

    /// Creates a leaf object centered at `at` and selects it.
    ///
    /// Timeline: a single keyframe at t=0, or when `start_time > 0` a fade-in of three
    /// keyframes (hidden hold until `start_time`, fade over `fade_in_secs`, visible hold).
    /// Slides: a template plus a snapshot on the current slide.
    pub fn create_object(
        &mut self,
        kind: ShapeKind,
        at: Point,
        start_time: f64,
    ) -> AnimResult<ObjectId> {
        if kind == ShapeKind::Group {
            return Err(AnimError::interaction("groups are created by merging objects"));
        }
        if !(at.x.is_finite() && at.y.is_finite()) {
            return Err(AnimError::validation("object position must be finite"));
        }
        let start = if start_time.is_finite() {
            start_time.max(0.0)
        } else {
            0.0
        };
        let id = self.fresh_object_id();
        let text = if kind == ShapeKind::Text {
            "Text".to_string()
        } else {
            String::new()
        };

        match self.mode {
            AnimationMode::Timeline => {
                let base = Keyframe {
                    text,
                    ..Keyframe::at(0.0, at.x, at.y)
                };
                let transitions = if start > 0.0 {
                    let fade = self.config.fade_in_secs.max(0.0);
                    vec![
                        Keyframe {
                            duration: start,
                            opacity: 0.0,
                            ..base.clone()
                        },
                        Keyframe {
                            start_time: start,
                            duration: fade,
                            opacity: 0.0,
                            ..base.clone()
                        },
                        Keyframe {
                            start_time: start + fade,
                            ..base
                        },
                    ]
                } else {
                    vec![base]
                };
                let object = SceneObject {
                    transitions,
                    ..SceneObject::leaf(id.clone(), kind, Keyframe::default())
                };
                self.objects.insert(id.clone(), object);
                self.order.push(id.clone());
            }
            AnimationMode::Slides => {
                self.insert_slide_object(id.clone(), kind, at, text);
            }
        }
        tracing::debug!(id = %id, kind = kind.as_str(), "object created");
        self.selection.select_only(id.clone());
        Ok(id)
    }

    // --- Selection ------------------------------------------------------------------------

    /// Selects only `id`.
    pub fn select(&mut self, id: &ObjectId) -> AnimResult<()> {
        if !self.is_selectable(id) {
            return Err(AnimError::validation(format!("unknown object '{id}'")));
        }
        self.selection.select_only(id.clone());
        Ok(())
    }

    /// Toggles `id` in the selection; returns whether it is selected afterwards.
    pub fn toggle_select(&mut self, id: &ObjectId) -> AnimResult<bool> {
        if !self.is_selectable(id) {
            return Err(AnimError::validation(format!("unknown object '{id}'")));
        }
        Ok(self.selection.toggle(id.clone()))
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Chooses the keyframe index property edits apply to.
    pub fn set_active_keyframe(&mut self, index: usize) {
        self.selection.set_active_keyframe(index);
    }

    /// Selects the topmost object under `point` (canvas units). `additive` toggles it into the
    /// current selection instead of replacing it. A miss without `additive` clears.
    pub fn select_at(&mut self, point: Point, additive: bool) -> Option<ObjectId> {
        let hit = self.hit_test(point);
        match (&hit, additive) {
            (Some(id), false) => self.selection.select_only(id.clone()),
            (Some(id), true) => {
                self.selection.toggle(id.clone());
            }
            (None, false) => self.selection.clear(),
            (None, true) => {}
        }
        hit
    }

    fn is_selectable(&self, id: &ObjectId) -> bool {
        match self.mode {
            AnimationMode::Timeline => self.objects.contains_key(id),
            AnimationMode::Slides => self.slide_data.template(id).is_some(),
        }
    }

    /// Topmost top-level object containing `point`, at the active keyframe (or current slide).
    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        match self.mode {
            AnimationMode::Timeline => self
                .order
                .iter()
                .rev()
                .filter_map(|id| self.objects.get(id))
                .find(|o| self.object_hit(o, point))
                .map(|o| o.id.clone()),
            AnimationMode::Slides => {
                let slide = self.slide_data.slides.get(self.current_slide)?;
                slide
                    .objects
                    .iter()
                    .rev()
                    .filter(|s| s.visible)
                    .find(|s| {
                        self.slide_data.template(&s.id).is_some_and(|t| {
                            let state = snapshot_state(s, t);
                            if t.kind == ShapeKind::Group {
                                let mut nodes = Vec::new();
                                for child in &t.children {
                                    collect_world_nodes(child, 0.0, Some(&state), &mut nodes);
                                }
                                nodes.iter().any(|n| contains(n.kind, &n.state, point))
                            } else {
                                contains(t.kind, &state, point)
                            }
                        })
                    })
                    .map(|s| s.id.clone())
            }
        }
    }

    fn object_hit(&self, object: &SceneObject, point: Point) -> bool {
        let index = self.active_index(object);
        let Some(kf) = object.transitions.get(index) else {
            return false;
        };
        if !object.is_group() {
            return contains(object.kind, &VisualState::from(kf), point);
        }
        let mut nodes = Vec::new();
        collect_world_nodes(object, kf.start_time, None, &mut nodes);
        nodes.iter().any(|n| contains(n.kind, &n.state, point))
    }

    /// The active keyframe index clamped to `object`'s keyframes.
    pub(crate) fn active_index(&self, object: &SceneObject) -> usize {
        self.selection
            .active_keyframe()
            .min(object.transitions.len().saturating_sub(1))
    }

    // --- Keyframes ------------------------------------------------------------------------

    /// Appends a keyframe after the last one of every selected object.
    ///
    /// The previous last keyframe gets `duration` and `easing`; the new keyframe is a
    /// zero-duration clone starting where that interval ends. Returns the primary object's new
    /// keyframe index, which becomes active.
    pub fn add_transition(&mut self, duration: f64, easing: Easing) -> AnimResult<usize> {
        self.require_timeline("add transition")?;
        if !(duration.is_finite() && duration > 0.0) {
            return Err(AnimError::validation(format!(
                "transition duration must be positive, got {duration}"
            )));
        }
        if self.selection.is_empty() {
            return Err(AnimError::interaction("select an object first"));
        }

        let mut active = None;
        for id in self.selection.ids() {
            let Some(object) = self.objects.get_mut(id) else {
                continue;
            };
            let Some(last) = object.transitions.last_mut() else {
                continue;
            };
            last.duration = duration;
            last.easing = Some(easing);
            let next = Keyframe {
                start_time: last.start_time + duration,
                duration: 0.0,
                easing: None,
                ..last.clone()
            };
            object.transitions.push(next);
            active.get_or_insert(object.transitions.len() - 1);
        }

        let index = active.ok_or_else(|| AnimError::interaction("select an object first"))?;
        self.selection.set_active_keyframe(index);
        Ok(index)
    }

    /// Removes keyframe `index` of `id`. The first keyframe is the object's initial state and
    /// cannot be deleted.
    pub fn delete_keyframe(&mut self, id: &ObjectId, index: usize) -> AnimResult<()> {
        self.require_timeline("delete keyframe")?;
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| AnimError::validation(format!("unknown object '{id}'")))?;
        if index == 0 {
            return Err(AnimError::interaction(
                "the first keyframe is the object's initial state and cannot be deleted",
            ));
        }
        if index >= object.transitions.len() {
            return Err(AnimError::validation(format!(
                "object '{id}' has no keyframe {index}"
            )));
        }

        object.transitions.remove(index);
        let next_start = object.transitions.get(index).map(|k| k.start_time);
        let prev = &mut object.transitions[index - 1];
        prev.duration = match next_start {
            Some(start) => (start - prev.start_time).max(0.0),
            None => 0.0,
        };

        if self.selection.active_keyframe() >= index {
            self.selection
                .set_active_keyframe(self.selection.active_keyframe().saturating_sub(1));
        }
        Ok(())
    }

    /// Applies `patch` to keyframe `index` of `id`, then re-sorts the keyframes.
    ///
    /// Returns the keyframe's index after sorting; when `id` is selected the active keyframe
    /// follows it.
    pub fn update_keyframe(
        &mut self,
        id: &ObjectId,
        index: usize,
        patch: &KeyframePatch,
    ) -> AnimResult<usize> {
        self.require_timeline("update keyframe")?;
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| AnimError::validation(format!("unknown object '{id}'")))?;
        let Some(target) = object.transitions.get_mut(index) else {
            return Err(AnimError::validation(format!(
                "object '{id}' has no keyframe {index}"
            )));
        };
        patch.apply(target);
        *target = normalize_keyframe(target);

        let mut tagged: Vec<(usize, Keyframe)> =
            object.transitions.drain(..).enumerate().collect();
        tagged.sort_by(|a, b| a.1.start_time.total_cmp(&b.1.start_time));
        let new_index = tagged.iter().position(|(i, _)| *i == index).unwrap_or(index);
        object.transitions = tagged.into_iter().map(|(_, k)| k).collect();

        if self.selection.contains(id) {
            self.selection.set_active_keyframe(new_index);
        }
        Ok(new_index)
    }

    // --- Deletion -------------------------------------------------------------------------

    /// Deletes an object and every connection touching it (or any of its descendants).
    pub fn delete_object(&mut self, id: &ObjectId) -> AnimResult<()> {
        match self.mode {
            AnimationMode::Timeline => {
                let object = self
                    .objects
                    .remove(id)
                    .ok_or_else(|| AnimError::validation(format!("unknown object '{id}'")))?;
                self.order.retain(|o| o != id);
                let mut gone = HashSet::new();
                object.visit_ids(&mut |i| {
                    gone.insert(i.clone());
                });
                self.connections
                    .retain(|c| !gone.contains(&c.from_id) && !gone.contains(&c.to_id));
            }
            AnimationMode::Slides => self.delete_slide_object(id)?,
        }
        self.selection.remove(id);
        tracing::debug!(id = %id, "object deleted");
        Ok(())
    }

    /// Deletes every selected object; returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        ids.iter()
            .filter(|id| self.delete_object(id).is_ok())
            .count()
    }

    // --- Pointer gestures -----------------------------------------------------------------

    /// Starts dragging the selection from `at` (canvas units).
    pub fn begin_drag(&mut self, at: Point) -> AnimResult<()> {
        if self.selection.is_empty() {
            return Err(AnimError::interaction("nothing selected to drag"));
        }
        self.gesture = Gesture::Dragging {
            last: at,
            moved: Vec2::ZERO,
        };
        Ok(())
    }

    /// Moves every selected object by the pointer delta since the last event, on the active
    /// keyframe (or the current slide's snapshot). Relative offsets are preserved.
    pub fn drag_to(&mut self, at: Point) {
        let Gesture::Dragging { last, moved } = self.gesture else {
            return;
        };
        let delta = at - last;
        self.gesture = Gesture::Dragging {
            last: at,
            moved: moved + delta,
        };
        if delta == Vec2::ZERO {
            return;
        }

        let ids: Vec<ObjectId> = self.selection.ids().to_vec();
        match self.mode {
            AnimationMode::Timeline => {
                let active = self.selection.active_keyframe();
                for id in &ids {
                    if let Some(object) = self.objects.get_mut(id) {
                        let index = active.min(object.transitions.len().saturating_sub(1));
                        if let Some(k) = object.transitions.get_mut(index) {
                            k.x += delta.x;
                            k.y += delta.y;
                        }
                    }
                }
            }
            AnimationMode::Slides => {
                if let Some(slide) = self.slide_data.slides.get_mut(self.current_slide) {
                    for snapshot in slide.objects.iter_mut().filter(|s| ids.contains(&s.id)) {
                        snapshot.x += delta.x;
                        snapshot.y += delta.y;
                    }
                }
            }
        }
    }

    /// Ends the drag; returns the total offset applied.
    pub fn end_drag(&mut self) -> Option<Vec2> {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging { moved, .. } => Some(moved),
            Gesture::Idle => None,
        }
    }

    /// Resizes `id` to a target box in canvas units.
    ///
    /// Rectangles take the size as `width`/`height`; other shapes get a uniform scale blended
    /// from both axes.
    pub fn resize(&mut self, id: &ObjectId, size: Size) -> AnimResult<()> {
        if !(size.width.is_finite() && size.height.is_finite())
            || size.width <= 0.0
            || size.height <= 0.0
        {
            return Err(AnimError::validation("resize needs a positive, finite size"));
        }
        match self.mode {
            AnimationMode::Timeline => {
                let active = self.selection.active_keyframe();
                let object = self
                    .objects
                    .get_mut(id)
                    .ok_or_else(|| AnimError::validation(format!("unknown object '{id}'")))?;
                let index = active.min(object.transitions.len().saturating_sub(1));
                let kind = object.kind;
                let Some(k) = object.transitions.get_mut(index) else {
                    return Err(AnimError::validation(format!("object '{id}' has no keyframes")));
                };
                let local = local_size(kind, &VisualState::from(&*k));
                match resized(kind, local, size)? {
                    Resized::Box(w, h) => {
                        k.width = Some(w);
                        k.height = Some(h);
                    }
                    Resized::Scale(s) => k.scale = s,
                }
            }
            AnimationMode::Slides => self.resize_slide_object(id, size)?,
        }
        Ok(())
    }

    // --- Connections ----------------------------------------------------------------------

    /// Adds a `from -> to` connection (forward from the current slide in slides mode).
    pub fn connect(
        &mut self,
        from: &ObjectId,
        to: &ObjectId,
        color: Option<&str>,
        width: Option<f64>,
    ) -> AnimResult<()> {
        if from == to {
            return Err(AnimError::interaction("an object cannot connect to itself"));
        }
        for id in [from, to] {
            if !self.resolves(id) {
                return Err(AnimError::interaction(format!("unknown object '{id}'")));
            }
        }
        if self.connections().iter().any(|c| c.links(from, to)) {
            return Err(AnimError::interaction(format!(
                "'{from}' is already connected to '{to}'"
            )));
        }

        let mut connection = Connection::new(from.clone(), to.clone());
        if let Some(color) = color {
            connection.color = color.to_string();
        }
        if let Some(width) = width.filter(|w| w.is_finite() && *w > 0.0) {
            connection.width = width;
        }

        match self.mode {
            AnimationMode::Timeline => self.connections.push(connection),
            AnimationMode::Slides => {
                add_connection_forward(&mut self.slide_data.slides, self.current_slide, connection);
            }
        }
        Ok(())
    }

    /// Removes the `from -> to` connection (forward from the current slide in slides mode).
    pub fn disconnect(&mut self, from: &ObjectId, to: &ObjectId) -> AnimResult<()> {
        if !self.connections().iter().any(|c| c.links(from, to)) {
            return Err(AnimError::interaction(format!(
                "'{from}' is not connected to '{to}'"
            )));
        }
        match self.mode {
            AnimationMode::Timeline => self.connections.retain(|c| !c.links(from, to)),
            AnimationMode::Slides => {
                remove_connection_forward(
                    &mut self.slide_data.slides,
                    self.current_slide,
                    from,
                    to,
                );
            }
        }
        Ok(())
    }
}

pub(crate) enum Resized {
    Box(f64, f64),
    Scale(f64),
}

pub(crate) fn resized(kind: ShapeKind, local: Size, target: Size) -> AnimResult<Resized> {
    match kind {
        ShapeKind::Rectangle => Ok(Resized::Box(target.width, target.height)),
        ShapeKind::Group => Err(AnimError::interaction(
            "groups are scaled through their keyframes",
        )),
        _ if local.width <= 0.0 || local.height <= 0.0 => {
            Err(AnimError::interaction("object has no size to scale from"))
        }
        _ => Ok(Resized::Scale(
            (target.width / local.width + target.height / local.height) / 2.0,
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/session.rs"]
mod tests;
