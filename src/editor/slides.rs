//! Slide-deck authoring on [`EditorSession`].

use crate::{
    animation::ease::Easing,
    composition::model::{AnimationMode, SceneObjectTemplate, Slide, SlideObjectState},
    composition::shape::{ShapeKind, local_size},
    composition::slides::snapshot_state,
    editor::patch::SnapshotPatch,
    editor::session::{EditorSession, Resized, resized},
    foundation::core::{Point, Size},
    foundation::error::{AnimError, AnimResult},
    foundation::ids::{ObjectId, SlideId},
};

impl EditorSession {
    fn require_slides(&self, op: &str) -> AnimResult<()> {
        match self.mode {
            AnimationMode::Slides => Ok(()),
            AnimationMode::Timeline => Err(AnimError::interaction(format!(
                "{op} is only available in slides mode"
            ))),
        }
    }

    /// Slides in play order.
    pub fn slides(&self) -> &[Slide] {
        &self.slide_data.slides
    }

    /// Object templates of the deck.
    pub fn templates(&self) -> &[SceneObjectTemplate] {
        &self.slide_data.object_library
    }

    /// Index of the slide being edited.
    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    fn check_slide(&self, index: usize) -> AnimResult<()> {
        if index < self.slide_data.slides.len() {
            Ok(())
        } else {
            Err(AnimError::validation(format!("no slide {index}")))
        }
    }

    /// Inserts a copy of the current slide right after it and makes the copy current.
    pub fn add_slide(&mut self) -> AnimResult<SlideId> {
        self.require_slides("add slide")?;
        let taken: Vec<String> = self
            .slide_data
            .slides
            .iter()
            .map(|s| s.id.0.clone())
            .collect();
        let id = SlideId(self.slide_ids.fresh(|c| taken.iter().any(|t| t == c)));

        let slide = match self.slide_data.slides.get(self.current_slide) {
            Some(current) => Slide {
                id: id.clone(),
                ..current.clone()
            },
            None => Slide {
                duration: self.config.default_slide_duration_secs,
                ..Slide::empty(id.clone())
            },
        };
        let at = (self.current_slide + 1).min(self.slide_data.slides.len());
        self.slide_data.slides.insert(at, slide);
        self.current_slide = at;
        self.retime_slides();
        Ok(id)
    }

    /// Deletes slide `index`; the last remaining slide is kept.
    pub fn delete_slide(&mut self, index: usize) -> AnimResult<()> {
        self.require_slides("delete slide")?;
        self.check_slide(index)?;
        if self.slide_data.slides.len() == 1 {
            return Err(AnimError::interaction("a deck needs at least one slide"));
        }
        self.slide_data.slides.remove(index);
        if self.current_slide >= index && self.current_slide > 0 {
            self.current_slide -= 1;
        }
        self.retime_slides();
        Ok(())
    }

    /// Switches the slide being edited.
    pub fn go_to_slide(&mut self, index: usize) -> AnimResult<()> {
        self.require_slides("go to slide")?;
        self.check_slide(index)?;
        self.current_slide = index;
        Ok(())
    }

    /// Sets a slide's duration and easing and re-times the deck.
    pub fn set_slide_timing(
        &mut self,
        index: usize,
        duration: f64,
        easing: Easing,
    ) -> AnimResult<()> {
        self.require_slides("set slide timing")?;
        self.check_slide(index)?;
        if !(duration.is_finite() && duration >= 0.0) {
            return Err(AnimError::validation(format!(
                "slide duration must be non-negative, got {duration}"
            )));
        }
        let slide = &mut self.slide_data.slides[index];
        slide.duration = duration;
        slide.easing = easing;
        self.retime_slides();
        Ok(())
    }

    /// Shows or hides `id` on the current slide, adding a snapshot when the slide has none
    /// (copied from the nearest earlier slide, else at the origin).
    pub fn set_visible(&mut self, id: &ObjectId, visible: bool) -> AnimResult<()> {
        self.require_slides("set visibility")?;
        self.snapshot_mut(id)?.visible = visible;
        Ok(())
    }

    /// Patches `id`'s snapshot on the current slide, creating it if needed.
    pub fn update_snapshot(&mut self, id: &ObjectId, patch: &SnapshotPatch) -> AnimResult<()> {
        self.require_slides("update snapshot")?;
        let snapshot = self.snapshot_mut(id)?;
        patch.apply(snapshot);
        snapshot.scale = snapshot.scale.max(0.0);
        snapshot.opacity = snapshot.opacity.clamp(0.0, 1.0);
        Ok(())
    }

    pub(crate) fn insert_slide_object(
        &mut self,
        id: ObjectId,
        kind: ShapeKind,
        at: Point,
        text: String,
    ) {
        self.slide_data
            .object_library
            .push(SceneObjectTemplate::new(id.clone(), kind));
        if self.slide_data.slides.is_empty() {
            self.slide_data.slides.push(Slide::empty(SlideId(
                self.slide_ids.fresh(|_| false),
            )));
            self.current_slide = 0;
        }
        let current = self.current_slide.min(self.slide_data.slides.len() - 1);
        self.slide_data.slides[current]
            .objects
            .push(SlideObjectState {
                text,
                ..SlideObjectState::at(id, at.x, at.y)
            });
    }

    pub(crate) fn delete_slide_object(&mut self, id: &ObjectId) -> AnimResult<()> {
        let before = self.slide_data.object_library.len();
        self.slide_data.object_library.retain(|t| &t.id != id);
        if self.slide_data.object_library.len() == before {
            return Err(AnimError::validation(format!("unknown object '{id}'")));
        }
        for slide in &mut self.slide_data.slides {
            slide.objects.retain(|s| &s.id != id);
            slide.connections.retain(|c| !c.touches(id));
        }
        Ok(())
    }

    pub(crate) fn resize_slide_object(&mut self, id: &ObjectId, size: Size) -> AnimResult<()> {
        let template = self
            .slide_data
            .template(id)
            .ok_or_else(|| AnimError::validation(format!("unknown object '{id}'")))?
            .clone();
        let snapshot = self.snapshot_mut(id)?;
        let local = local_size(template.kind, &snapshot_state(snapshot, &template));
        match resized(template.kind, local, size)? {
            Resized::Box(w, h) => {
                snapshot.width = Some(w);
                snapshot.height = Some(h);
            }
            Resized::Scale(s) => snapshot.scale = s,
        }
        Ok(())
    }

    /// Snapshot of `id` on the current slide, created on demand for known templates.
    fn snapshot_mut(&mut self, id: &ObjectId) -> AnimResult<&mut SlideObjectState> {
        if self.slide_data.template(id).is_none() {
            return Err(AnimError::validation(format!("unknown object '{id}'")));
        }
        let current = self.current_slide;
        self.check_slide(current)?;

        let slides = &mut self.slide_data.slides;
        if slides[current].object(id).is_none() {
            let inherited = slides[..current]
                .iter()
                .rev()
                .find_map(|s| s.object(id).cloned())
                .unwrap_or_else(|| SlideObjectState::at(id.clone(), 0.0, 0.0));
            slides[current].objects.push(inherited);
        }
        slides[current]
            .objects
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| AnimError::validation(format!("unknown object '{id}'")))
    }

    fn retime_slides(&mut self) {
        let mut start = 0.0;
        for slide in &mut self.slide_data.slides {
            slide.time = start;
            start += slide.duration.max(0.0);
        }
    }
}
