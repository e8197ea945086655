//! Slide-deck rules: cursor resolution, snapshot interpolation and forward-inheriting
//! connections.
//!
//! Connection invariant: adding a connection on slide `i` puts it on slides `i..`; removing it
//! on slide `j` takes it off slides `j..`. Later slides therefore inherit whatever the
//! most recent edit at or before them decided, and editing slide `i` never touches earlier
//! slides.

use crate::{
    animation::ease::Easing,
    animation::interp::{Lerp, VisualState},
    composition::model::{Connection, SceneObjectTemplate, Slide, SlideObjectState},
    foundation::ids::ObjectId,
};

/// Active slide and normalized progress through it.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SlideCursor {
    /// Index of the active slide.
    pub index: usize,
    /// `[0, 1]` through the active slide's duration.
    pub progress: f64,
}

/// Sum of slide durations (negative durations count as zero).
pub fn total_slide_duration(slides: &[Slide]) -> f64 {
    slides.iter().map(|s| s.duration.max(0.0)).sum()
}

/// Maps a playback time onto a slide by accumulating durations.
///
/// Times past the end resolve to the last slide with progress 1. `None` for an empty deck.
pub fn resolve_slide_cursor(slides: &[Slide], time: f64) -> Option<SlideCursor> {
    let last = slides.len().checked_sub(1)?;
    let t = if time.is_finite() { time.max(0.0) } else { 0.0 };

    let mut start = 0.0;
    for (index, slide) in slides.iter().enumerate() {
        let d = slide.duration.max(0.0);
        if t < start + d {
            let progress = if d > 0.0 { (t - start) / d } else { 0.0 };
            return Some(SlideCursor {
                index,
                progress: progress.clamp(0.0, 1.0),
            });
        }
        start += d;
    }
    Some(SlideCursor {
        index: last,
        progress: 1.0,
    })
}

/// Accumulated start time of slide `index`.
pub fn slide_start_time(slides: &[Slide], index: usize) -> f64 {
    total_slide_duration(&slides[..index.min(slides.len())])
}

/// Combines a snapshot with its template's non-snapshotted attributes.
pub fn snapshot_state(snapshot: &SlideObjectState, template: &SceneObjectTemplate) -> VisualState {
    VisualState {
        x: snapshot.x,
        y: snapshot.y,
        width: snapshot.width,
        height: snapshot.height,
        scale: snapshot.scale,
        rotation: snapshot.rotation,
        opacity: snapshot.opacity,
        color: snapshot.color.clone(),
        fill_color: template.fill_color.clone(),
        stroke_color: template.stroke_color.clone(),
        border_width: template.border_width,
        open_top: template.open_top,
        text: snapshot.text.clone(),
    }
}

/// State of an object on the active slide.
///
/// Numeric fields blend toward the next slide only when the object is present and visible on
/// both; otherwise the active snapshot holds. Discrete fields always come from the active
/// slide.
pub fn interpolate_snapshot(
    current: &SlideObjectState,
    next: Option<&SlideObjectState>,
    template: &SceneObjectTemplate,
    easing: Easing,
    progress: f64,
) -> VisualState {
    let base = snapshot_state(current, template);
    let Some(next) = next.filter(|n| current.visible && n.visible) else {
        return base;
    };
    let t = easing.apply(progress);
    VisualState {
        x: <f64 as Lerp>::lerp(&current.x, &next.x, t),
        y: <f64 as Lerp>::lerp(&current.y, &next.y, t),
        width: <Option<f64> as Lerp>::lerp(&current.width, &next.width, t),
        height: <Option<f64> as Lerp>::lerp(&current.height, &next.height, t),
        scale: <f64 as Lerp>::lerp(&current.scale, &next.scale, t),
        rotation: <f64 as Lerp>::lerp(&current.rotation, &next.rotation, t),
        opacity: <f64 as Lerp>::lerp(&current.opacity, &next.opacity, t),
        ..base
    }
}

/// Adds `connection` to slide `from_index` and every later slide that lacks the same
/// `from -> to` link. Returns how many slides changed.
pub fn add_connection_forward(
    slides: &mut [Slide],
    from_index: usize,
    connection: Connection,
) -> usize {
    let mut changed = 0;
    for slide in slides.iter_mut().skip(from_index) {
        if slide
            .connections
            .iter()
            .any(|c| c.links(&connection.from_id, &connection.to_id))
        {
            continue;
        }
        slide.connections.push(connection.clone());
        changed += 1;
    }
    changed
}

/// Removes the `from -> to` link from slide `from_index` and every later slide. Returns how
/// many slides changed.
pub fn remove_connection_forward(
    slides: &mut [Slide],
    from_index: usize,
    from: &ObjectId,
    to: &ObjectId,
) -> usize {
    let mut changed = 0;
    for slide in slides.iter_mut().skip(from_index) {
        let before = slide.connections.len();
        slide.connections.retain(|c| !c.links(from, to));
        if slide.connections.len() != before {
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
#[path = "../../tests/unit/composition/slides.rs"]
mod tests;
