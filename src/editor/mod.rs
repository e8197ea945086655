//! Authoring session: the only mutator of a document while it is being edited.

/// Merging objects into groups and reusing saved objects.
pub mod merge;
/// Partial updates for keyframes and slide snapshots.
pub mod patch;
/// Ordered object selection.
pub mod selection;
/// The editor session and timeline operations.
pub mod session;
/// Slide-mode editor operations.
pub mod slides;
