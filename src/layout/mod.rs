//! Layout of the document canvas on a render surface.

/// Aspect-preserving viewport fit.
pub mod viewport;
