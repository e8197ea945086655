//! Motion primitives: easing, interpolation and compound transitions.

/// Multi-step transitions built from keyframe sequences.
pub mod compound;
/// Named easing curves.
pub mod ease;
/// Interpolated visual state between keyframes.
pub mod interp;
