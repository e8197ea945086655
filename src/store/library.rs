use std::collections::HashMap;
use std::fmt;

use crate::{
    composition::model::SceneObject,
    foundation::error::{AnimError, AnimResult},
};

/// Id of a saved library entry, unique per user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SavedId(pub String);

impl fmt::Display for SavedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One saved object of a user's library.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedObject {
    /// Library entry id.
    pub id: SavedId,
    /// Display name.
    pub name: String,
    /// Object (usually a group) exactly as it was saved, ids included.
    pub template: SceneObject,
}

/// User-scoped library of reusable objects.
pub trait ObjectLibrary {
    /// Entries saved by `user`.
    fn list_saved_objects(&self, user: &str) -> AnimResult<Vec<SavedObject>>;
    /// Saves a copy of `template`; returns the new entry id.
    fn save_object(&mut self, user: &str, template: &SceneObject) -> AnimResult<SavedId>;
    /// Deletes one entry; unknown ids are a persistence error.
    fn delete_saved_object(&mut self, user: &str, saved_id: &SavedId) -> AnimResult<()>;
}

/// Library kept in memory, keyed by user.
#[derive(Debug, Default)]
pub struct MemoryObjectLibrary {
    by_user: HashMap<String, Vec<SavedObject>>,
    next: u64,
}

impl MemoryObjectLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectLibrary for MemoryObjectLibrary {
    fn list_saved_objects(&self, user: &str) -> AnimResult<Vec<SavedObject>> {
        Ok(self.by_user.get(user).cloned().unwrap_or_default())
    }

    fn save_object(&mut self, user: &str, template: &SceneObject) -> AnimResult<SavedId> {
        if user.is_empty() {
            return Err(AnimError::persistence("library writes need a user"));
        }
        self.next += 1;
        let id = SavedId(format!("saved-{}", self.next));
        self.by_user
            .entry(user.to_string())
            .or_default()
            .push(SavedObject {
                id: id.clone(),
                name: template.name.clone(),
                template: template.clone(),
            });
        tracing::info!(user, saved_id = %id, "object saved to library");
        Ok(id)
    }

    fn delete_saved_object(&mut self, user: &str, saved_id: &SavedId) -> AnimResult<()> {
        let entries = self.by_user.get_mut(user).ok_or_else(|| {
            AnimError::persistence(format!("user '{user}' has no saved objects"))
        })?;
        let before = entries.len();
        entries.retain(|e| &e.id != saved_id);
        if entries.len() == before {
            return Err(AnimError::persistence(format!(
                "saved object '{saved_id}' not found"
            )));
        }
        tracing::info!(user, saved_id = %saved_id, "object deleted from library");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/library.rs"]
mod tests;
