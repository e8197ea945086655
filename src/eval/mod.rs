//! Evaluation of documents into drawable scenes.

/// Timeline and slide evaluation.
pub mod evaluator;
