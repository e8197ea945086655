//! Group composition: children are keyed in their group's local frame.

use crate::{
    animation::interp::{VisualState, state_at_time},
    composition::model::SceneObject,
    composition::shape::ShapeKind,
    foundation::core::Vec2,
    foundation::ids::ObjectId,
    foundation::math::rotate_deg,
};

/// A group's own state plus the world state of each direct child.
#[derive(Clone, Debug, PartialEq)]
pub struct CompoundState {
    /// State of the group itself.
    pub parent: VisualState,
    /// Direct children mapped into the group's parent frame.
    pub children: Vec<ChildState>,
}

/// World-space state of one direct child of a group.
#[derive(Clone, Debug, PartialEq)]
pub struct ChildState {
    /// Child id.
    pub id: ObjectId,
    /// Child shape.
    pub kind: ShapeKind,
    /// State in the parent's frame.
    pub state: VisualState,
}

/// One drawable leaf (or group pivot) in canvas space.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldNode {
    /// Object id.
    pub id: ObjectId,
    /// Shape of the node.
    pub kind: ShapeKind,
    /// Canvas-space state.
    pub state: VisualState,
}

/// Maps a child's local state into its parent's frame.
///
/// Position is scaled, rotated and offset by the parent; scale and opacity multiply; rotation
/// adds. Discrete attributes stay the child's own.
pub fn compose(parent: &VisualState, local: &VisualState) -> VisualState {
    let offset = rotate_deg(
        Vec2::new(local.x * parent.scale, local.y * parent.scale),
        parent.rotation,
    );
    VisualState {
        x: parent.x + offset.x,
        y: parent.y + offset.y,
        scale: local.scale * parent.scale,
        rotation: local.rotation + parent.rotation,
        opacity: local.opacity * parent.opacity,
        ..local.clone()
    }
}

/// Samples a group and its direct children at `t`, children in world space.
pub fn compound_state_at_time(group: &SceneObject, t: f64) -> Option<CompoundState> {
    let parent = state_at_time(group, t)?;
    let children = group
        .children
        .iter()
        .filter_map(|child| {
            let local = state_at_time(child, t)?;
            Some(ChildState {
                id: child.id.clone(),
                kind: child.kind,
                state: compose(&parent, &local),
            })
        })
        .collect();
    Some(CompoundState { parent, children })
}

/// Flattens `object` (recursively through nested groups) into world-space nodes.
///
/// Groups emit their own pivot node first, followed by their descendants in list order.
/// Objects without keyframes are skipped together with their children.
pub fn collect_world_nodes(
    object: &SceneObject,
    t: f64,
    parent: Option<&VisualState>,
    out: &mut Vec<WorldNode>,
) {
    let Some(local) = state_at_time(object, t) else {
        tracing::debug!(id = %object.id, "object has no keyframes; skipped");
        return;
    };
    let state = match parent {
        Some(p) => compose(p, &local),
        None => local,
    };
    let pivot = out.len();
    out.push(WorldNode {
        id: object.id.clone(),
        kind: object.kind,
        state,
    });
    for child in &object.children {
        let frame = out[pivot].state.clone();
        collect_world_nodes(child, t, Some(&frame), out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/compound.rs"]
mod tests;
