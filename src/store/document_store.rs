use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{
    composition::model::AnimationDocument,
    foundation::error::{AnimError, AnimResult},
    normalize::pass::{NormalizeOptions, normalize_document_with, normalize_value_with},
};

/// Durable home of animation documents. Saves replace the whole document.
pub trait DocumentStore {
    /// Loads and normalizes a document.
    fn load(&self, id: &str) -> AnimResult<AnimationDocument>;
    /// Replaces the stored document.
    fn save(&mut self, id: &str, doc: &AnimationDocument) -> AnimResult<()>;
    /// Stored document ids, sorted.
    fn list(&self) -> AnimResult<Vec<String>>;
}

/// In-memory store holding raw JSON per id.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: HashMap<String, serde_json::Value>,
    options: NormalizeOptions,
}

impl MemoryDocumentStore {
    /// Empty store with default normalization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with `options` applied on load and save.
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            docs: HashMap::new(),
            options,
        }
    }

    /// Stores raw JSON as-is, the way an external writer would.
    pub fn insert_raw(&mut self, id: impl Into<String>, raw: serde_json::Value) {
        self.docs.insert(id.into(), raw);
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load(&self, id: &str) -> AnimResult<AnimationDocument> {
        let raw = self
            .docs
            .get(id)
            .ok_or_else(|| AnimError::validation(format!("unknown document '{id}'")))?;
        Ok(normalize_value_with(raw, &self.options))
    }

    fn save(&mut self, id: &str, doc: &AnimationDocument) -> AnimResult<()> {
        let value = serde_json::to_value(normalize_document_with(doc, &self.options))
            .map_err(|e| AnimError::serde(e.to_string()))?;
        self.docs.insert(id.to_string(), value);
        tracing::info!(id, "document saved");
        Ok(())
    }

    fn list(&self) -> AnimResult<Vec<String>> {
        let mut ids: Vec<String> = self.docs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// One `<id>.json` file per document in a directory.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    options: NormalizeOptions,
}

impl JsonFileStore {
    /// Store rooted at `dir`; the directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            options: NormalizeOptions::default(),
        }
    }

    /// Uses `options` on load and save.
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> AnimResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AnimError::validation(format!("invalid document id '{id}'")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self, id: &str) -> AnimResult<AnimationDocument> {
        let path = self.path_for(id)?;
        let text = std::fs::read_to_string(&path).map_err(|e| {
            AnimError::persistence(format!("read '{}': {e}", path.display()))
        })?;
        let raw: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AnimError::serde(format!("'{}': {e}", path.display())))?;
        Ok(normalize_value_with(&raw, &self.options))
    }

    fn save(&mut self, id: &str, doc: &AnimationDocument) -> AnimResult<()> {
        let path = self.path_for(id)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AnimError::persistence(format!("create '{}': {e}", self.dir.display()))
        })?;
        let json = normalize_document_with(doc, &self.options).to_json_string_pretty()?;

        // Written to a sibling temp file, then renamed over the target.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| {
            AnimError::persistence(format!("write '{}': {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &path).map_err(|e| {
            AnimError::persistence(format!("replace '{}': {e}", path.display()))
        })?;
        tracing::info!(id, path = %path.display(), "document saved");
        Ok(())
    }

    fn list(&self) -> AnimResult<Vec<String>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AnimError::persistence(format!(
                    "list '{}': {e}",
                    self.dir.display()
                )));
            }
        };
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let path = entry.path();
                (path.extension()? == "json")
                    .then(|| path.file_stem()?.to_str().map(str::to_string))
                    .flatten()
            })
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/store/document_store.rs"]
mod tests;
