use crate::foundation::ids::ObjectId;

/// Ordered multi-selection plus the keyframe index edits apply to.
///
/// The first selected id is the primary one; it decides the active keyframe after
/// operations that append keyframes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ObjectId>,
    active_keyframe: usize,
}

impl Selection {
    /// Selected ids in selection order.
    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    /// First selected id.
    pub fn primary(&self) -> Option<&ObjectId> {
        self.ids.first()
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.ids.contains(id)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Replaces the selection with `id` and resets the active keyframe.
    pub fn select_only(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.push(id);
        self.active_keyframe = 0;
    }

    /// Appends `id` unless already selected.
    pub fn add(&mut self, id: ObjectId) {
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    /// Adds or removes `id`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: ObjectId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Deselects `id`; returns whether it was selected.
    pub fn remove(&mut self, id: &ObjectId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|s| s != id);
        before != self.ids.len()
    }

    /// Keeps only the ids for which `keep` holds.
    pub fn retain(&mut self, keep: impl Fn(&ObjectId) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    /// Deselects everything and resets the active keyframe.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.active_keyframe = 0;
    }

    /// Keyframe index that edits apply to.
    pub fn active_keyframe(&self) -> usize {
        self.active_keyframe
    }

    /// Sets the keyframe index that edits apply to.
    pub fn set_active_keyframe(&mut self, index: usize) {
        self.active_keyframe = index;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/editor/selection.rs"]
mod tests;
