/// Convenience result type used across algoanim.
pub type AnimResult<T> = Result<T, AnimError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Malformed documents and unresolved references never show up here: the normalizer absorbs
/// the former and the evaluator drops the latter. Only persistence and interaction failures
/// interrupt a user-initiated action.
#[derive(thiserror::Error, Debug)]
pub enum AnimError {
    /// Input that cannot be absorbed into defaults (unknown ids, bad CLI arguments).
    #[error("validation error: {0}")]
    Validation(String),

    /// An authoring operation was rejected before any mutation was applied.
    #[error("interaction error: {0}")]
    Interaction(String),

    /// The document store or object library failed or rejected a write.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnimError {
    /// Build an [`AnimError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`AnimError::Interaction`] value.
    pub fn interaction(msg: impl Into<String>) -> Self {
        Self::Interaction(msg.into())
    }

    /// Build an [`AnimError::Persistence`] value.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build an [`AnimError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether the authoring UI should show this error to the user.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::Interaction(_) | Self::Persistence(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
