use crate::{
    composition::model::AnimationDocument,
    composition::shape::{DEFAULT_FONT_SIZE, ShapeKind, local_path, object_affine, outline_path},
    eval::evaluator::{EvaluatedConnection, EvaluatedNode, EvaluatedScene, Evaluator},
    foundation::color::{is_transparent_keyword, parse_color},
    foundation::core::{Affine, BezPath, Point, Rgba8, Size, Vec2},
    layout::viewport::ViewportFit,
};

/// Smallest arrowhead length in canvas units.
const MIN_ARROW_HEAD: f64 = 8.0;
/// Arrowhead length relative to the connection's line width.
const ARROW_HEAD_PER_WIDTH: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Target surface dimensions in pixels.
pub struct SurfaceDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceDesc {
    /// Surface of `width` by `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Surface size as floats.
    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

#[derive(Clone, Debug, serde::Serialize)]
/// Backend-agnostic draw list for a single frame.
///
/// Ops are in paint order: every connection first, then shapes in object-list order. Each op's
/// transform already includes the viewport fit, so a backend only has to apply it.
pub struct RenderPlan {
    /// Target surface.
    pub surface: SurfaceDesc,
    /// Canvas-to-surface fit applied to every op.
    pub fit: ViewportFit,
    /// Ops in paint order.
    pub ops: Vec<DrawOp>,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
/// Draw operation emitted by the compiler.
pub enum DrawOp {
    /// Filled path.
    FillPath {
        /// Outline in the object's local frame.
        path: BezPath,
        /// Local frame to surface pixels.
        transform: Affine,
        /// Fill color.
        color: Rgba8,
        /// Layer opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Stroked path.
    StrokePath {
        /// Outline in the object's local frame.
        path: BezPath,
        /// Local frame to surface pixels.
        transform: Affine,
        /// Stroke color.
        color: Rgba8,
        /// Line width in the path's local units.
        width: f64,
        /// Layer opacity in `[0, 1]`.
        opacity: f32,
    },
    /// Centered label; the transform maps the label's center to the origin.
    Text {
        /// Label contents.
        text: String,
        /// Label center to surface pixels.
        transform: Affine,
        /// Glyph color.
        color: Rgba8,
        /// Font size in local units.
        font_size: f64,
        /// Layer opacity in `[0, 1]`.
        opacity: f32,
    },
}

impl DrawOp {
    /// Opacity of any op.
    pub fn opacity(&self) -> f32 {
        match self {
            DrawOp::FillPath { opacity, .. }
            | DrawOp::StrokePath { opacity, .. }
            | DrawOp::Text { opacity, .. } => *opacity,
        }
    }
}

/// Evaluates `doc` at `cursor` seconds and compiles the result for `surface`.
pub fn compile_frame(doc: &AnimationDocument, cursor: f64, surface: SurfaceDesc) -> RenderPlan {
    let scene = Evaluator::eval_at(doc, cursor);
    compile_scene(&scene, surface, doc.canvas_size())
}

/// Compiles an evaluated scene for `surface`, fitting `canvas` into it.
#[tracing::instrument(
    skip(scene),
    fields(nodes = scene.nodes.len(), connections = scene.connections.len())
)]
pub fn compile_scene(
    scene: &EvaluatedScene,
    surface: SurfaceDesc,
    canvas: Option<Size>,
) -> RenderPlan {
    let fit = ViewportFit::fit(canvas, surface.size());
    let view = fit.to_affine();

    let mut ops = Vec::with_capacity(scene.connections.len() * 2 + scene.nodes.len() * 2);
    for conn in &scene.connections {
        compile_connection(conn, view, &mut ops);
    }
    for node in &scene.nodes {
        compile_node(node, view, &mut ops);
    }

    RenderPlan { surface, fit, ops }
}

fn resolve_color(s: &str) -> Rgba8 {
    parse_color(s).unwrap_or_else(|| {
        tracing::debug!(color = s, "unparseable color; using black");
        Rgba8::BLACK
    })
}

fn op_opacity(opacity: f64) -> f32 {
    opacity.clamp(0.0, 1.0) as f32
}

fn compile_node(node: &EvaluatedNode, view: Affine, ops: &mut Vec<DrawOp>) {
    let state = &node.state;
    let opacity = op_opacity(state.opacity);
    if opacity <= 0.0 || state.scale <= 0.0 {
        return;
    }
    let transform = view * object_affine(state);

    match node.kind {
        ShapeKind::Group => {}
        ShapeKind::Text => {
            if state.text.is_empty() {
                return;
            }
            ops.push(DrawOp::Text {
                text: state.text.clone(),
                transform,
                color: resolve_color(&state.color),
                font_size: state.height.unwrap_or(DEFAULT_FONT_SIZE),
                opacity,
            });
        }
        ShapeKind::Circle | ShapeKind::Square | ShapeKind::Triangle | ShapeKind::Rectangle => {
            let fill = state.fill_color.as_deref().unwrap_or(&state.color);
            let stroke_only = is_transparent_keyword(fill);
            if !stroke_only && let Some(path) = local_path(node.kind, state) {
                ops.push(DrawOp::FillPath {
                    path,
                    transform,
                    color: resolve_color(fill),
                    opacity,
                });
            }

            // A stroke-only shape falls back to its primary color so it stays visible.
            let stroke = match (&state.stroke_color, stroke_only) {
                (Some(c), _) => Some(c.as_str()),
                (None, true) => Some(state.color.as_str()),
                (None, false) => None,
            };
            if let Some(stroke) = stroke.filter(|c| !is_transparent_keyword(c))
                && state.border_width > 0.0
                && let Some(path) = outline_path(node.kind, state)
            {
                ops.push(DrawOp::StrokePath {
                    path,
                    transform,
                    color: resolve_color(stroke),
                    width: state.border_width,
                    opacity,
                });
            }
        }
    }
}

fn compile_connection(conn: &EvaluatedConnection, view: Affine, ops: &mut Vec<DrawOp>) {
    let opacity = op_opacity(conn.opacity);
    if opacity <= 0.0 || conn.width <= 0.0 {
        return;
    }
    let delta = conn.to - conn.from;
    let len = delta.hypot();
    if len <= conn.from_radius + conn.to_radius {
        tracing::debug!(from = %conn.from_id, to = %conn.to_id, "endpoints overlap; arrow skipped");
        return;
    }
    let dir = delta / len;
    let start = conn.from + dir * conn.from_radius;
    let tip = conn.to - dir * conn.to_radius;
    let color = resolve_color(&conn.color);

    let head = (conn.width * ARROW_HEAD_PER_WIDTH)
        .max(MIN_ARROW_HEAD)
        .min((tip - start).hypot());
    let base = tip - dir * head;

    let mut line = BezPath::new();
    line.move_to(start);
    line.line_to(base);
    ops.push(DrawOp::StrokePath {
        path: line,
        transform: view,
        color,
        width: conn.width,
        opacity,
    });

    ops.push(DrawOp::FillPath {
        path: arrow_head(tip, base, dir, head),
        transform: view,
        color,
        opacity,
    });
}

fn arrow_head(tip: Point, base: Point, dir: Vec2, head: f64) -> BezPath {
    let normal = Vec2::new(-dir.y, dir.x) * (head / 2.0);
    let mut path = BezPath::new();
    path.move_to(tip);
    path.line_to(base + normal);
    path.line_to(base - normal);
    path.close_path();
    path
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
