//! Shared building blocks.

/// Color string parsing.
pub mod color;
/// Geometry primitives and colors.
pub mod core;
/// Error type and result alias.
pub mod error;
/// Object and slide identifiers.
pub mod ids;
pub(crate) mod math;
