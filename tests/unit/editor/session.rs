use super::*;
use crate::composition::model::{SceneObjectTemplate, Slide};
use crate::editor::patch::SnapshotPatch;
use crate::foundation::ids::SlideId;

fn timeline() -> EditorSession {
    EditorSession::new("t", AnimationMode::Timeline, EngineConfig::default())
}

fn slides() -> EditorSession {
    EditorSession::new("deck", AnimationMode::Slides, EngineConfig::default())
}

fn is_interaction<T>(r: AnimResult<T>) -> bool {
    matches!(r, Err(AnimError::Interaction(_)))
}

#[test]
fn create_at_an_offset_seeds_a_fade_in() {
    let mut s = timeline();
    let id = s.create_object(ShapeKind::Circle, Point::new(10.0, 20.0), 2.0).unwrap();
    let o = s.object(&id).unwrap();
    let starts: Vec<f64> = o.transitions.iter().map(|k| k.start_time).collect();
    let opacities: Vec<f64> = o.transitions.iter().map(|k| k.opacity).collect();
    assert_eq!(starts, vec![0.0, 2.0, 2.5]);
    assert_eq!(opacities, vec![0.0, 0.0, 1.0]);
    assert!(o.transitions.iter().all(|k| k.x == 10.0 && k.y == 20.0));
    assert_eq!(s.selection().primary(), Some(&id));
}

#[test]
fn create_at_zero_is_a_single_keyframe() {
    let mut s = timeline();
    let id = s.create_object(ShapeKind::Text, Point::new(1.0, 2.0), 0.0).unwrap();
    let o = s.object(&id).unwrap();
    assert_eq!(o.transitions.len(), 1);
    assert_eq!(o.transitions[0].text, "Text");
}

#[test]
fn create_rejects_groups_and_non_finite_positions() {
    let mut s = timeline();
    assert!(is_interaction(s.create_object(ShapeKind::Group, Point::ZERO, 0.0)));
    assert!(matches!(
        s.create_object(ShapeKind::Circle, Point::new(f64::NAN, 0.0), 0.0),
        Err(AnimError::Validation(_))
    ));
    assert_eq!(s.objects_in_order().count(), 0);
}

#[test]
fn fresh_ids_skip_ids_loaded_from_the_document() {
    let mut doc = AnimationDocument::empty("t", AnimationMode::Timeline);
    doc.objects.push(SceneObject::leaf(
        ObjectId::new("obj-1"),
        ShapeKind::Square,
        Keyframe::default(),
    ));
    let mut s = EditorSession::from_document(&doc, EngineConfig::default());
    let id = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    assert_ne!(id.as_str(), "obj-1");
}

#[test]
fn add_transition_extends_every_selected_object() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    let b = s.create_object(ShapeKind::Square, Point::new(50.0, 0.0), 0.0).unwrap();
    s.select(&a).unwrap();
    s.toggle_select(&b).unwrap();

    let index = s.add_transition(1.5, Easing::EaseInOut).unwrap();
    assert_eq!(index, 1);
    assert_eq!(s.selection().active_keyframe(), 1);
    for id in [&a, &b] {
        let ks = &s.object(id).unwrap().transitions;
        assert_eq!(ks.len(), 2);
        assert_eq!(ks[0].duration, 1.5);
        assert_eq!(ks[0].easing, Some(Easing::EaseInOut));
        assert_eq!(ks[1].start_time, 1.5);
        assert_eq!(ks[1].duration, 0.0);
    }
}

#[test]
fn add_transition_validates_before_mutating() {
    let mut s = timeline();
    assert!(is_interaction(s.add_transition(1.0, Easing::Linear)));
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    assert!(matches!(
        s.add_transition(0.0, Easing::Linear),
        Err(AnimError::Validation(_))
    ));
    assert_eq!(s.object(&a).unwrap().transitions.len(), 1);
}

#[test]
fn first_keyframe_cannot_be_deleted() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    s.add_transition(1.0, Easing::Linear).unwrap();
    s.add_transition(1.0, Easing::Linear).unwrap();

    assert!(is_interaction(s.delete_keyframe(&a, 0)));
    s.delete_keyframe(&a, 1).unwrap();
    let ks = &s.object(&a).unwrap().transitions;
    assert_eq!(ks.len(), 2);
    assert_eq!(ks[1].start_time, 2.0);
    assert_eq!(ks[0].duration, 2.0);
    assert_eq!(s.selection().active_keyframe(), 1);
}

#[test]
fn update_keyframe_resorts_and_the_active_index_follows() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    s.add_transition(1.0, Easing::Linear).unwrap();
    s.add_transition(1.0, Easing::Linear).unwrap();

    let patch = KeyframePatch {
        start_time: Some(0.5),
        x: Some(99.0),
        ..KeyframePatch::default()
    };
    let index = s.update_keyframe(&a, 2, &patch).unwrap();
    assert_eq!(index, 1);
    assert_eq!(s.selection().active_keyframe(), 1);
    let ks = &s.object(&a).unwrap().transitions;
    let starts: Vec<f64> = ks.iter().map(|k| k.start_time).collect();
    assert_eq!(starts, vec![0.0, 0.5, 1.0]);
    assert_eq!(ks[1].x, 99.0);
}

#[test]
fn update_keyframe_clamps_patched_values() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    let patch = KeyframePatch {
        opacity: Some(3.0),
        scale: Some(-1.0),
        ..KeyframePatch::default()
    };
    s.update_keyframe(&a, 0, &patch).unwrap();
    let k = &s.object(&a).unwrap().transitions[0];
    assert_eq!(k.opacity, 1.0);
    assert_eq!(k.scale, 0.0);
}

#[test]
fn deleting_a_group_drops_connections_to_its_children() {
    let mut doc = AnimationDocument::empty("t", AnimationMode::Timeline);
    let child = SceneObject::leaf(ObjectId::new("c1"), ShapeKind::Circle, Keyframe::default());
    doc.objects.push(SceneObject {
        children: vec![child],
        ..SceneObject::leaf(ObjectId::new("g"), ShapeKind::Group, Keyframe::default())
    });
    doc.objects.push(SceneObject::leaf(
        ObjectId::new("b"),
        ShapeKind::Square,
        Keyframe::at(0.0, 100.0, 0.0),
    ));
    doc.connections
        .push(Connection::new(ObjectId::new("c1"), ObjectId::new("b")));
    doc.connections
        .push(Connection::new(ObjectId::new("b"), ObjectId::new("g")));

    let mut s = EditorSession::from_document(&doc, EngineConfig::default());
    assert_eq!(s.connections().len(), 2);
    s.delete_object(&ObjectId::new("g")).unwrap();
    assert!(s.connections().is_empty());
    assert_eq!(s.objects_in_order().count(), 1);
}

#[test]
fn multi_drag_preserves_relative_offsets() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    let b = s.create_object(ShapeKind::Circle, Point::new(100.0, 0.0), 0.0).unwrap();
    s.select(&a).unwrap();
    s.toggle_select(&b).unwrap();

    s.begin_drag(Point::new(10.0, 10.0)).unwrap();
    s.drag_to(Point::new(20.0, 15.0));
    s.drag_to(Point::new(30.0, 30.0));
    assert_eq!(s.end_drag(), Some(Vec2::new(20.0, 20.0)));
    assert_eq!(s.gesture(), Gesture::Idle);

    let pos = |id: &ObjectId| {
        let k = &s.object(id).unwrap().transitions[0];
        (k.x, k.y)
    };
    assert_eq!(pos(&a), (20.0, 20.0));
    assert_eq!(pos(&b), (120.0, 20.0));
}

#[test]
fn drag_needs_a_selection() {
    let mut s = timeline();
    assert!(is_interaction(s.begin_drag(Point::ZERO)));
    s.drag_to(Point::new(5.0, 5.0));
    assert_eq!(s.end_drag(), None);
}

#[test]
fn select_at_picks_the_topmost_hit() {
    let mut s = timeline();
    let _under = s.create_object(ShapeKind::Square, Point::ZERO, 0.0).unwrap();
    let over = s.create_object(ShapeKind::Circle, Point::new(10.0, 0.0), 0.0).unwrap();
    s.clear_selection();
    assert_eq!(s.select_at(Point::new(5.0, 0.0), false), Some(over.clone()));
    assert_eq!(s.selection().ids(), &[over]);
    assert_eq!(s.select_at(Point::new(500.0, 500.0), false), None);
    assert!(s.selection().is_empty());
}

#[test]
fn resize_sets_a_box_for_rectangles_and_a_scale_otherwise() {
    let mut s = timeline();
    let r = s.create_object(ShapeKind::Rectangle, Point::ZERO, 0.0).unwrap();
    let c = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();

    s.resize(&r, Size::new(200.0, 40.0)).unwrap();
    let k = &s.object(&r).unwrap().transitions[0];
    assert_eq!((k.width, k.height), (Some(200.0), Some(40.0)));

    s.resize(&c, Size::new(120.0, 60.0)).unwrap();
    let k = &s.object(&c).unwrap().transitions[0];
    assert!((k.scale - 1.5).abs() < 1e-12);

    assert!(matches!(
        s.resize(&c, Size::new(0.0, 10.0)),
        Err(AnimError::Validation(_))
    ));
}

#[test]
fn connect_rejects_self_loops_unknown_ids_and_duplicates() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    let b = s.create_object(ShapeKind::Circle, Point::new(100.0, 0.0), 0.0).unwrap();

    assert!(is_interaction(s.connect(&a, &a, None, None)));
    assert!(is_interaction(s.connect(&a, &ObjectId::new("ghost"), None, None)));
    s.connect(&a, &b, Some("#ff0000"), Some(4.0)).unwrap();
    assert!(is_interaction(s.connect(&a, &b, None, None)));
    s.connect(&b, &a, None, None).unwrap();

    assert_eq!(s.connections().len(), 2);
    assert_eq!(s.connections()[0].color, "#ff0000");
    assert_eq!(s.connections()[0].width, 4.0);

    s.disconnect(&a, &b).unwrap();
    assert!(is_interaction(s.disconnect(&a, &b)));
    assert_eq!(s.connections().len(), 1);
}

#[test]
fn timeline_only_operations_fail_in_slides_mode() {
    let mut s = slides();
    assert!(is_interaction(s.add_transition(1.0, Easing::Linear)));
    let mut t = timeline();
    assert!(is_interaction(t.add_slide()));
}

#[test]
fn slides_create_adds_a_template_and_a_snapshot() {
    let mut s = slides();
    assert_eq!(s.slides().len(), 1);
    let id = s.create_object(ShapeKind::Square, Point::new(5.0, 6.0), 0.0).unwrap();
    assert_eq!(s.templates().len(), 1);
    let snap = s.slides()[0].object(&id).unwrap();
    assert_eq!((snap.x, snap.y), (5.0, 6.0));
}

#[test]
fn add_slide_copies_the_current_slide_and_retimes() {
    let mut s = slides();
    let id = s.create_object(ShapeKind::Circle, Point::new(1.0, 1.0), 0.0).unwrap();
    let new_slide = s.add_slide().unwrap();
    assert_eq!(s.slides().len(), 2);
    assert_eq!(s.current_slide(), 1);
    assert_eq!(s.slides()[1].id, new_slide);
    assert_ne!(s.slides()[0].id, new_slide);
    assert!(s.slides()[1].object(&id).is_some());
    assert_eq!(s.slides()[1].time, s.slides()[0].duration);

    s.set_slide_timing(0, 2.0, Easing::EaseOut).unwrap();
    assert_eq!(s.slides()[1].time, 2.0);
}

#[test]
fn last_slide_is_protected() {
    let mut s = slides();
    assert!(is_interaction(s.delete_slide(0)));
    assert!(matches!(s.delete_slide(4), Err(AnimError::Validation(_))));
    s.add_slide().unwrap();
    s.delete_slide(1).unwrap();
    assert_eq!(s.slides().len(), 1);
    assert_eq!(s.current_slide(), 0);
}

#[test]
fn slide_connections_propagate_forward_only() {
    let mut s = slides();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    let b = s.create_object(ShapeKind::Circle, Point::new(100.0, 0.0), 0.0).unwrap();
    s.add_slide().unwrap();
    s.add_slide().unwrap();
    s.go_to_slide(1).unwrap();

    s.connect(&a, &b, None, None).unwrap();
    let counts: Vec<usize> = s.slides().iter().map(|sl| sl.connections.len()).collect();
    assert_eq!(counts, vec![0, 1, 1]);

    s.go_to_slide(2).unwrap();
    s.disconnect(&a, &b).unwrap();
    let counts: Vec<usize> = s.slides().iter().map(|sl| sl.connections.len()).collect();
    assert_eq!(counts, vec![0, 1, 0]);
}

#[test]
fn set_visible_inherits_the_nearest_earlier_snapshot() {
    let mut s = slides();
    let a = s.create_object(ShapeKind::Circle, Point::new(7.0, 8.0), 0.0).unwrap();
    s.add_slide().unwrap();
    s.update_snapshot(
        &a,
        &SnapshotPatch {
            x: Some(40.0),
            ..SnapshotPatch::default()
        },
    )
    .unwrap();
    s.go_to_slide(0).unwrap();
    s.set_visible(&a, false).unwrap();
    assert!(!s.slides()[0].object(&a).unwrap().visible);
    assert!(s.slides()[1].object(&a).unwrap().visible);
    assert_eq!(s.slides()[1].object(&a).unwrap().x, 40.0);
}

#[test]
fn snapshots_are_created_on_demand() {
    let mut doc = AnimationDocument::empty("deck", AnimationMode::Slides);
    let mut data = SlideData::default();
    data.object_library
        .push(SceneObjectTemplate::new(ObjectId::new("n"), ShapeKind::Circle));
    let mut first = Slide::empty(SlideId::new("s1"));
    first
        .objects
        .push(crate::composition::model::SlideObjectState::at(
            ObjectId::new("n"),
            3.0,
            4.0,
        ));
    data.slides = vec![first, Slide::empty(SlideId::new("s2"))];
    doc.slide_data = Some(data);

    let mut s = EditorSession::from_document(&doc, EngineConfig::default());
    s.go_to_slide(1).unwrap();
    s.set_visible(&ObjectId::new("n"), false).unwrap();
    let snap = s.slides()[1].object(&ObjectId::new("n")).unwrap();
    assert_eq!((snap.x, snap.y, snap.visible), (3.0, 4.0, false));
}

#[test]
fn deleting_a_slide_object_cascades_across_the_deck() {
    let mut s = slides();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    let b = s.create_object(ShapeKind::Circle, Point::new(100.0, 0.0), 0.0).unwrap();
    s.connect(&a, &b, None, None).unwrap();
    s.add_slide().unwrap();

    s.delete_object(&a).unwrap();
    assert_eq!(s.templates().len(), 1);
    for slide in s.slides() {
        assert!(slide.object(&a).is_none());
        assert!(slide.connections.is_empty());
    }
}

#[test]
fn to_document_is_normalized() {
    let mut s = timeline();
    let a = s.create_object(ShapeKind::Circle, Point::ZERO, 0.0).unwrap();
    s.add_transition(3.0, Easing::Linear).unwrap();
    let doc = s.to_document();
    assert_eq!(doc.objects.len(), 1);
    assert_eq!(doc.objects[0].id, a);
    assert_eq!(doc.duration, 3.0);
    assert!(doc.slide_data.is_none());

    let reopened = EditorSession::from_document(&doc, EngineConfig::default());
    assert_eq!(reopened.to_document(), doc);
}
