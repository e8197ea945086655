//! Grouping selected objects and reusing saved groups through the object library.

use std::collections::HashMap;

use crate::{
    animation::interp::VisualState,
    composition::model::{Keyframe, SceneObject},
    composition::shape::{ShapeKind, world_bounds},
    editor::session::EditorSession,
    foundation::core::{Point, Rect},
    foundation::error::{AnimError, AnimResult},
    foundation::ids::ObjectId,
    store::library::{ObjectLibrary, SavedId},
};

/// Options for [`EditorSession::merge_selected`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// Also delete the merged objects' own library entries after the group is saved.
    pub delete_originals_from_library: bool,
}

/// Result of a successful merge.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    /// Id of the new group in the document.
    pub group_id: ObjectId,
    /// Library entry the group was saved as.
    pub saved_id: SavedId,
    /// Original library entries that were removed.
    pub deleted_from_library: Vec<SavedId>,
    /// Library deletions that failed; the merge itself stands.
    pub failed_deletes: Vec<(SavedId, String)>,
}

impl EditorSession {
    /// Groups the selected leaf objects.
    ///
    /// The group's pivot is the center of the union of the objects' bounds at the active
    /// keyframe, and each original becomes a child re-expressed relative to that pivot. The
    /// group is saved to `library` before the scene changes, so a failed save leaves the
    /// session untouched.
    pub fn merge_selected(
        &mut self,
        library: &mut dyn ObjectLibrary,
        user: &str,
        options: MergeOptions,
    ) -> AnimResult<MergeOutcome> {
        self.require_timeline("merge")?;
        let ids: Vec<ObjectId> = self.selection().ids().to_vec();
        if ids.len() < 2 {
            return Err(AnimError::interaction("select at least two objects to merge"));
        }

        let mut union: Option<Rect> = None;
        for id in &ids {
            let object = self
                .objects
                .get(id)
                .ok_or_else(|| AnimError::interaction(format!("unknown object '{id}'")))?;
            if object.is_group() || !object.children.is_empty() {
                return Err(AnimError::interaction(format!(
                    "'{id}' is already a group; only leaf objects can be merged"
                )));
            }
            let Some(kf) = object.transitions.get(self.active_index(object)) else {
                continue;
            };
            let bounds = world_bounds(object.kind, &VisualState::from(kf));
            if bounds.is_finite() {
                union = Some(union.map_or(bounds, |u| u.union(bounds)));
            }
        }
        let union = union
            .filter(|u| u.width() > 0.0 || u.height() > 0.0)
            .ok_or_else(|| AnimError::interaction("selected objects have no resolvable bounds"))?;
        let center = union.center();

        // Children keep their ids so connections to them keep resolving.
        let children: Vec<SceneObject> = ids
            .iter()
            .filter_map(|id| self.objects.get(id))
            .map(|o| relative_to(o, center))
            .collect();
        let group_id = self.fresh_object_id();
        let group = SceneObject {
            name: "Group".to_string(),
            children,
            ..SceneObject::leaf(
                group_id.clone(),
                ShapeKind::Group,
                Keyframe::at(0.0, center.x, center.y),
            )
        };

        let saved_id = library.save_object(user, &group)?;

        let originals: Vec<SceneObject> = ids
            .iter()
            .filter_map(|id| self.objects.remove(id))
            .collect();
        let slot = self
            .order
            .iter()
            .position(|o| ids.contains(o))
            .unwrap_or(self.order.len());
        self.order.retain(|o| !ids.contains(o));
        self.order.insert(slot.min(self.order.len()), group_id.clone());
        self.objects.insert(
            group_id.clone(),
            SceneObject {
                library_id: Some(saved_id.0.clone()),
                ..group
            },
        );
        self.selection.select_only(group_id.clone());
        tracing::info!(
            group = %group_id,
            saved_id = %saved_id,
            merged = originals.len(),
            "objects merged"
        );

        let mut outcome = MergeOutcome {
            group_id,
            saved_id,
            deleted_from_library: Vec::new(),
            failed_deletes: Vec::new(),
        };
        if options.delete_originals_from_library {
            for entry in originals.iter().filter_map(|o| o.library_id.as_ref()) {
                let entry = SavedId(entry.clone());
                match library.delete_saved_object(user, &entry) {
                    Ok(()) => outcome.deleted_from_library.push(entry),
                    Err(e) => {
                        tracing::warn!(saved_id = %entry, error = %e, "library delete failed");
                        outcome.failed_deletes.push((entry, e.to_string()));
                    }
                }
            }
        }
        Ok(outcome)
    }

    /// Instantiates a saved object with fresh ids, its first keyframe moved to `at`.
    pub fn insert_saved_object(
        &mut self,
        library: &dyn ObjectLibrary,
        user: &str,
        saved_id: &SavedId,
        at: Point,
    ) -> AnimResult<ObjectId> {
        self.require_timeline("insert saved object")?;
        let saved = library
            .list_saved_objects(user)?
            .into_iter()
            .find(|s| &s.id == saved_id)
            .ok_or_else(|| AnimError::validation(format!("unknown saved object '{saved_id}'")))?;

        let mut object = saved.template;
        let mut renamed = HashMap::new();
        self.reassign_ids(&mut object, &mut renamed);
        if let Some(first) = object.transitions.first() {
            let (dx, dy) = (at.x - first.x, at.y - first.y);
            for k in &mut object.transitions {
                k.x += dx;
                k.y += dy;
            }
        }
        object.library_id = Some(saved_id.0.clone());

        let id = object.id.clone();
        self.objects.insert(id.clone(), object);
        self.order.push(id.clone());
        self.selection.select_only(id.clone());
        Ok(id)
    }

    fn reassign_ids(
        &mut self,
        object: &mut SceneObject,
        renamed: &mut HashMap<ObjectId, ObjectId>,
    ) {
        let fresh = self.fresh_object_id_avoiding(renamed);
        renamed.insert(object.id.clone(), fresh.clone());
        object.id = fresh;
        for child in &mut object.children {
            self.reassign_ids(child, renamed);
        }
    }

    fn fresh_object_id_avoiding(&mut self, pending: &HashMap<ObjectId, ObjectId>) -> ObjectId {
        let mut taken = self.taken_ids();
        taken.extend(pending.values().map(|id| id.0.clone()));
        ObjectId(self.object_ids.fresh(|c| taken.contains(c)))
    }
}

fn relative_to(object: &SceneObject, pivot: Point) -> SceneObject {
    let mut child = object.clone();
    for k in &mut child.transitions {
        k.x -= pivot.x;
        k.y -= pivot.y;
    }
    child
}

#[cfg(test)]
#[path = "../../tests/unit/editor/merge.rs"]
mod tests;
