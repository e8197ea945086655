use std::fmt;

/// Stable identifier of a scene object, unique within a document for its whole lifetime.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ObjectId(pub String);

/// Identifier of a slide within a slide-mode document.
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct SlideId(pub String);

impl ObjectId {
    /// Wraps a string id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SlideId {
    /// Wraps a string id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Deterministic `<prefix>-<n>` id generator.
#[derive(Clone, Debug)]
pub(crate) struct IdGen {
    prefix: &'static str,
    next: u64,
}

impl IdGen {
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    /// Produces the next id for which `taken` returns false.
    pub(crate) fn fresh(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let candidate = format!("{}-{}", self.prefix, self.next);
            self.next += 1;
            if !taken(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/ids.rs"]
mod tests;
