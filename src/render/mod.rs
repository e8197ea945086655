//! Rasterization of render plans.

/// Backend trait, settings and frames.
pub mod backend;
/// CPU rasterizer built on vello_cpu.
pub mod cpu;
/// Text shaping for labels.
pub mod text;
