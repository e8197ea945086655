use std::collections::HashMap;

use crate::{
    animation::compound::{WorldNode, collect_world_nodes},
    animation::interp::VisualState,
    composition::model::{AnimationDocument, AnimationMode, Connection, SlideData},
    composition::shape::{ShapeKind, bounding_radius},
    composition::slides::{SlideCursor, interpolate_snapshot, resolve_slide_cursor},
    foundation::core::{Point, Size},
    foundation::ids::ObjectId,
};

/// Everything visible at one cursor position, in canvas space and paint order.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedScene {
    /// Mode of the source document.
    pub mode: AnimationMode,
    /// Seconds.
    pub cursor: f64,
    /// Active slide, slides mode only.
    pub slide: Option<SlideCursor>,
    /// Authoring canvas, if the document has one.
    pub canvas: Option<Size>,
    /// Group pivots are included (they anchor connections) but draw nothing.
    pub nodes: Vec<EvaluatedNode>,
    /// Connections whose endpoints both resolved.
    pub connections: Vec<EvaluatedConnection>,
}

/// One object at its resolved canvas-space state.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedNode {
    /// Object id.
    pub id: ObjectId,
    /// Primitive to draw.
    pub kind: ShapeKind,
    /// Resolved state.
    pub state: VisualState,
}

/// A connection whose endpoints both resolved this frame.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatedConnection {
    /// Source object.
    pub from_id: ObjectId,
    /// Target object.
    pub to_id: ObjectId,
    /// Source center.
    pub from: Point,
    /// Target center.
    pub to: Point,
    /// Bounding radii used to trim the arrow so it starts and ends at the shapes' edges.
    pub from_radius: f64,
    /// Bounding radius of the target.
    pub to_radius: f64,
    /// Stroke color.
    pub color: String,
    /// Stroke width.
    pub width: f64,
    /// Lower of the two endpoints' opacities.
    pub opacity: f64,
}

impl EvaluatedScene {
    /// Node with id `id`.
    pub fn node(&self, id: &ObjectId) -> Option<&EvaluatedNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}

impl From<WorldNode> for EvaluatedNode {
    fn from(n: WorldNode) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            state: n.state,
        }
    }
}

/// Evaluates documents at a cursor position.
pub struct Evaluator;

impl Evaluator {
    /// Resolves `doc` at `cursor` seconds. Never fails: unresolved references are dropped.
    #[tracing::instrument(skip(doc), fields(mode = ?doc.mode))]
    pub fn eval_at(doc: &AnimationDocument, cursor: f64) -> EvaluatedScene {
        let (nodes, connections, slide) = match doc.mode {
            AnimationMode::Timeline => (
                eval_timeline(doc, cursor),
                doc.connections.as_slice(),
                None,
            ),
            AnimationMode::Slides => match doc.slide_data.as_ref() {
                Some(data) => match resolve_slide_cursor(&data.slides, cursor) {
                    Some(sc) => (
                        eval_slide(data, sc),
                        data.slides[sc.index].connections.as_slice(),
                        Some(sc),
                    ),
                    None => (Vec::new(), &[][..], None),
                },
                None => (Vec::new(), &[][..], None),
            },
        };

        let connections = resolve_connections(&nodes, connections);
        EvaluatedScene {
            mode: doc.mode,
            cursor,
            slide,
            canvas: doc.canvas_size(),
            nodes,
            connections,
        }
    }
}

fn eval_timeline(doc: &AnimationDocument, t: f64) -> Vec<EvaluatedNode> {
    let mut world = Vec::new();
    for object in &doc.objects {
        collect_world_nodes(object, t, None, &mut world);
    }
    world.into_iter().map(EvaluatedNode::from).collect()
}

// Template children are static local layout: they are sampled at their first keyframe and
// carried by the slide-interpolated pivot.
fn eval_slide(data: &SlideData, cursor: SlideCursor) -> Vec<EvaluatedNode> {
    let active = &data.slides[cursor.index];
    let next = data.slides.get(cursor.index + 1);

    let mut out = Vec::new();
    for snapshot in &active.objects {
        if !snapshot.visible {
            continue;
        }
        let Some(template) = data.template(&snapshot.id) else {
            tracing::debug!(id = %snapshot.id, "slide object has no template; dropped");
            continue;
        };
        let state = interpolate_snapshot(
            snapshot,
            next.and_then(|s| s.object(&snapshot.id)),
            template,
            active.easing,
            cursor.progress,
        );

        let mut world = Vec::new();
        for child in &template.children {
            collect_world_nodes(child, 0.0, Some(&state), &mut world);
        }
        out.push(EvaluatedNode {
            id: snapshot.id.clone(),
            kind: template.kind,
            state,
        });
        out.extend(world.into_iter().map(EvaluatedNode::from));
    }
    out
}

fn resolve_connections(
    nodes: &[EvaluatedNode],
    connections: &[Connection],
) -> Vec<EvaluatedConnection> {
    let anchors: HashMap<&ObjectId, &EvaluatedNode> = nodes.iter().map(|n| (&n.id, n)).collect();

    connections
        .iter()
        .filter_map(|c| {
            let (Some(from), Some(to)) = (anchors.get(&c.from_id), anchors.get(&c.to_id)) else {
                tracing::debug!(
                    from = %c.from_id,
                    to = %c.to_id,
                    "connection endpoint unresolved; skipped"
                );
                return None;
            };
            Some(EvaluatedConnection {
                from_id: c.from_id.clone(),
                to_id: c.to_id.clone(),
                from: from.state.position(),
                to: to.state.position(),
                from_radius: bounding_radius(from.kind, &from.state),
                to_radius: bounding_radius(to.kind, &to.state),
                color: c.color.clone(),
                width: c.width,
                opacity: from.state.opacity.min(to.state.opacity),
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
