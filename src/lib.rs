//! algoanim is a keyframe and slide animation engine for algorithm and data-structure
//! visualizations.
//!
//! Documents flow through a fixed pipeline:
//!
//! - Normalize raw JSON into an [`AnimationDocument`] ([`normalize_value`])
//! - Evaluate it at a cursor into an [`EvaluatedScene`] ([`Evaluator::eval_at`])
//! - Compile the scene into a [`RenderPlan`] for a surface ([`compile_frame`])
//! - Rasterize the plan with a [`RenderBackend`] such as [`CpuRasterizer`]
//!
//! Authoring goes through [`EditorSession`]; playback through [`PlaybackSession`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Easing curves, keyframe interpolation and compound transitions.
pub mod animation;
/// Evaluated scenes to backend-agnostic draw ops.
pub mod compile;
/// Document model, shape geometry and slide composition.
pub mod composition;
/// Engine-wide tunables loaded from JSON.
pub mod config;
/// Authoring session and its operations.
pub mod editor;
/// Document evaluation at a cursor.
pub mod eval;
/// Geometry, colors, ids and the error type.
pub mod foundation;
/// Canvas-to-surface fitting.
pub mod layout;
/// Canonicalization of persisted documents.
pub mod normalize;
/// Frame-driven playback scheduling.
pub mod playback;
/// Rasterization backends.
pub mod render;
/// Document store and object library boundaries.
pub mod store;

pub use crate::foundation::core::{Affine, BezPath, Point, Rect, Rgba8, Size, Vec2};
pub use crate::foundation::error::{AnimError, AnimResult};
pub use crate::foundation::ids::{ObjectId, SlideId};

pub use crate::animation::ease::Easing;
pub use crate::animation::interp::VisualState;
pub use crate::compile::plan::{DrawOp, RenderPlan, SurfaceDesc, compile_frame, compile_scene};
pub use crate::composition::model::{
    AnimationDocument, AnimationMode, Connection, Keyframe, SceneObject, SceneObjectTemplate,
    Slide, SlideData, SlideObjectState,
};
pub use crate::composition::shape::ShapeKind;
pub use crate::composition::slides::{
    SlideCursor, add_connection_forward, remove_connection_forward, resolve_slide_cursor,
};
pub use crate::config::EngineConfig;
pub use crate::editor::merge::{MergeOptions, MergeOutcome};
pub use crate::editor::patch::{KeyframePatch, SnapshotPatch};
pub use crate::editor::session::{EditorSession, Gesture};
pub use crate::eval::evaluator::{EvaluatedConnection, EvaluatedNode, EvaluatedScene, Evaluator};
pub use crate::layout::viewport::ViewportFit;
pub use crate::normalize::pass::{
    NormalizeOptions, normalize_document, normalize_document_with, normalize_value,
    normalize_value_with,
};
pub use crate::playback::scheduler::{
    FrameDriver, FrameHandle, ManualFrameDriver, PlaybackState, Scheduler, TickOutcome,
};
pub use crate::playback::session::PlaybackSession;
pub use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
pub use crate::render::cpu::CpuRasterizer;
pub use crate::store::document_store::{DocumentStore, JsonFileStore, MemoryDocumentStore};
pub use crate::store::library::{MemoryObjectLibrary, ObjectLibrary, SavedId, SavedObject};
