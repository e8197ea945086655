//! Normalization of untrusted documents.

/// The normalization pass.
pub mod pass;
