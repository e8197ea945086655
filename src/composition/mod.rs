//! The animation document and what it is made of.

/// Persisted document types and their defaults.
pub mod model;
/// Shape kinds and local geometry.
pub mod shape;
/// Slide cursor resolution and slide-scoped connections.
pub mod slides;
