//! Compilation of evaluated scenes into render plans.

/// Render plans and the scene compiler.
pub mod plan;
