use super::*;
use crate::composition::model::Keyframe;

fn state(x: f64, y: f64) -> VisualState {
    VisualState {
        x,
        y,
        ..VisualState::default()
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn group_with_child() -> SceneObject {
    let pivot = Keyframe {
        rotation: 90.0,
        ..Keyframe::at(0.0, 100.0, 100.0)
    };
    let child = SceneObject::leaf(
        ObjectId::new("child"),
        ShapeKind::Circle,
        Keyframe::at(0.0, 50.0, 0.0),
    );
    SceneObject {
        children: vec![child],
        ..SceneObject::leaf(ObjectId::new("group"), ShapeKind::Group, pivot)
    }
}

#[test]
fn quarter_turn_parent_moves_child_onto_y_axis() {
    let c = compound_state_at_time(&group_with_child(), 0.0).unwrap();
    assert_eq!(c.children.len(), 1);
    let child = &c.children[0].state;
    assert!(close(child.x, 100.0));
    assert!(close(child.y, 150.0));
    assert!(close(child.rotation, 90.0));
}

#[test]
fn scale_and_opacity_multiply() {
    let parent = VisualState {
        scale: 2.0,
        opacity: 0.5,
        ..state(10.0, 10.0)
    };
    let local = VisualState {
        scale: 1.5,
        opacity: 0.5,
        ..state(5.0, 0.0)
    };
    let world = compose(&parent, &local);
    assert!(close(world.x, 20.0));
    assert!(close(world.scale, 3.0));
    assert!(close(world.opacity, 0.25));
}

#[test]
fn composition_is_associative() {
    let a = VisualState {
        rotation: 30.0,
        scale: 2.0,
        opacity: 0.9,
        ..state(10.0, -5.0)
    };
    let b = VisualState {
        rotation: -75.0,
        scale: 0.5,
        opacity: 0.8,
        ..state(3.0, 7.0)
    };
    let c = VisualState {
        rotation: 12.0,
        scale: 3.0,
        opacity: 0.5,
        ..state(-4.0, 2.0)
    };
    let left = compose(&compose(&a, &b), &c);
    let right = compose(&a, &compose(&b, &c));
    assert!(close(left.x, right.x));
    assert!(close(left.y, right.y));
    assert!(close(left.scale, right.scale));
    assert!(close(left.rotation, right.rotation));
    assert!(close(left.opacity, right.opacity));
}

#[test]
fn world_nodes_list_pivot_before_descendants() {
    let mut nested = group_with_child();
    nested.children[0].id = ObjectId::new("inner-child");
    let inner_group = SceneObject {
        children: nested.children.clone(),
        ..SceneObject::leaf(
            ObjectId::new("inner"),
            ShapeKind::Group,
            Keyframe::at(0.0, 10.0, 0.0),
        )
    };
    let outer = SceneObject {
        children: vec![inner_group],
        ..nested
    };

    let mut out = Vec::new();
    collect_world_nodes(&outer, 0.0, None, &mut out);
    let ids: Vec<&str> = out.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["group", "inner", "inner-child"]);
    // inner at local (10, 0) under a 90 degree pivot at (100, 100).
    assert!(close(out[1].state.x, 100.0));
    assert!(close(out[1].state.y, 110.0));
    // inner-child at (50, 0) relative to inner, rotated by the outer pivot only.
    assert!(close(out[2].state.x, 100.0));
    assert!(close(out[2].state.y, 160.0));
}
