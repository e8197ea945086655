use super::*;
use crate::animation::ease::Easing;
use crate::composition::model::{
    Keyframe, SceneObject, SceneObjectTemplate, Slide, SlideObjectState,
};
use crate::foundation::ids::SlideId;

fn mover(id: &str, x0: f64, x1: f64) -> SceneObject {
    SceneObject {
        transitions: vec![
            Keyframe {
                duration: 2.0,
                ..Keyframe::at(0.0, x0, 0.0)
            },
            Keyframe::at(2.0, x1, 0.0),
        ],
        ..SceneObject::leaf(ObjectId::new(id), ShapeKind::Circle, Keyframe::default())
    }
}

fn timeline() -> AnimationDocument {
    let mut doc = AnimationDocument::empty("t", AnimationMode::Timeline);
    doc.objects.push(mover("a", 0.0, 100.0));
    doc.objects.push(mover("b", 200.0, 200.0));
    doc.connections.push(Connection::new("a".into(), "b".into()));
    doc.connections.push(Connection::new("a".into(), "ghost".into()));
    doc
}

#[test]
fn timeline_nodes_follow_object_order() {
    let scene = Evaluator::eval_at(&timeline(), 1.0);
    let ids: Vec<&str> = scene.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(scene.nodes[0].state.x, 50.0);
    assert!(scene.slide.is_none());
}

#[test]
fn connections_track_live_anchors_and_drop_unresolved() {
    let scene = Evaluator::eval_at(&timeline(), 1.0);
    assert_eq!(scene.connections.len(), 1);
    let c = &scene.connections[0];
    assert_eq!(c.from, Point::new(50.0, 0.0));
    assert_eq!(c.to, Point::new(200.0, 0.0));
    assert_eq!(c.from_radius, 30.0);
    assert_eq!(c.opacity, 1.0);
}

#[test]
fn connection_opacity_is_the_dimmer_endpoint() {
    let mut doc = timeline();
    doc.objects[1].transitions[0].opacity = 0.25;
    doc.objects[1].transitions[1].opacity = 0.25;
    let scene = Evaluator::eval_at(&doc, 3.0);
    assert_eq!(scene.connections[0].opacity, 0.25);
}

#[test]
fn group_pivot_anchors_connections() {
    let mut doc = timeline();
    let child = SceneObject::leaf(
        ObjectId::new("inner"),
        ShapeKind::Square,
        Keyframe::at(0.0, 10.0, 0.0),
    );
    doc.objects.push(SceneObject {
        children: vec![child],
        ..SceneObject::leaf(
            ObjectId::new("g"),
            ShapeKind::Group,
            Keyframe::at(0.0, 300.0, 300.0),
        )
    });
    doc.connections.push(Connection::new("a".into(), "g".into()));

    let scene = Evaluator::eval_at(&doc, 0.0);
    assert_eq!(scene.node(&ObjectId::new("inner")).unwrap().state.x, 310.0);
    let to_group = scene
        .connections
        .iter()
        .find(|c| c.to_id.as_str() == "g")
        .unwrap();
    assert_eq!(to_group.to, Point::new(300.0, 300.0));
    assert_eq!(to_group.to_radius, 0.0);
}

fn deck(next_visible: bool) -> AnimationDocument {
    let mut doc = AnimationDocument::empty("s", AnimationMode::Slides);
    let data = doc.slide_data.as_mut().unwrap();
    data.object_library
        .push(SceneObjectTemplate::new(ObjectId::new("n"), ShapeKind::Circle));
    let mut first = Slide::empty(SlideId::new("s1"));
    first.duration = 2.0;
    first.objects.push(SlideObjectState::at(ObjectId::new("n"), 0.0, 0.0));
    first
        .objects
        .push(SlideObjectState::at(ObjectId::new("orphan"), 0.0, 0.0));
    let mut second = Slide::empty(SlideId::new("s2"));
    second.objects.push(SlideObjectState {
        visible: next_visible,
        ..SlideObjectState::at(ObjectId::new("n"), 100.0, 0.0)
    });
    data.slides = vec![first, second];
    doc
}

#[test]
fn slide_object_interpolates_into_next_slide() {
    let scene = Evaluator::eval_at(&deck(true), 1.0);
    assert_eq!(scene.slide.unwrap().index, 0);
    assert_eq!(scene.nodes.len(), 1);
    assert_eq!(scene.nodes[0].state.x, 50.0);
}

#[test]
fn slide_object_holds_when_hidden_next() {
    let scene = Evaluator::eval_at(&deck(false), 1.0);
    assert_eq!(scene.nodes[0].state.x, 0.0);

    let later = Evaluator::eval_at(&deck(false), 2.5);
    assert_eq!(later.slide.unwrap().index, 1);
    assert!(later.nodes.is_empty());
}

#[test]
fn slide_easing_comes_from_the_active_slide() {
    let mut doc = deck(true);
    doc.slide_data.as_mut().unwrap().slides[0].easing = Easing::EaseIn;
    let scene = Evaluator::eval_at(&doc, 1.0);
    assert_eq!(scene.nodes[0].state.x, 25.0);
}

#[test]
fn slides_document_without_slides_is_empty() {
    let mut doc = deck(true);
    doc.slide_data = None;
    let scene = Evaluator::eval_at(&doc, 0.0);
    assert!(scene.nodes.is_empty());
    assert!(scene.connections.is_empty());
}
