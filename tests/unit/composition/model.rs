use super::*;

fn circle(id: &str, keys: Vec<Keyframe>) -> SceneObject {
    SceneObject {
        transitions: keys,
        ..SceneObject::leaf(ObjectId::new(id), ShapeKind::Circle, Keyframe::default())
    }
}

#[test]
fn json_uses_camel_case_field_names() {
    let mut doc = AnimationDocument::empty("stack push", AnimationMode::Timeline);
    doc.canvas_width = Some(800.0);
    doc.canvas_height = Some(450.0);
    let mut kf = Keyframe::at(0.0, 10.0, 20.0);
    kf.fill_color = Some("transparent".to_string());
    kf.open_top = true;
    kf.easing = Some(Easing::EaseInOut);
    doc.objects.push(circle("a", vec![kf]));
    doc.connections
        .push(Connection::new(ObjectId::new("a"), ObjectId::new("a")));

    let v = serde_json::to_value(&doc).unwrap();
    assert_eq!(v["canvasWidth"], 800.0);
    assert_eq!(v["durationOverride"], serde_json::Value::Null);
    assert_eq!(v["objects"][0]["type"], "circle");
    let k = &v["objects"][0]["transitions"][0];
    assert_eq!(k["startTime"], 0.0);
    assert_eq!(k["fillColor"], "transparent");
    assert_eq!(k["openTop"], true);
    assert_eq!(k["easing"], "ease-in-out");
    assert_eq!(v["connections"][0]["fromId"], "a");
    assert!(v.get("slideData").is_none());

    let back: AnimationDocument = serde_json::from_value(v).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn effective_duration_prefers_override() {
    let mut doc = AnimationDocument::empty("d", AnimationMode::Timeline);
    doc.duration = 4.0;
    assert_eq!(doc.effective_duration(), 4.0);
    doc.duration_override = Some(9.0);
    assert_eq!(doc.effective_duration(), 9.0);
    assert_eq!(doc.playback_length(), 9.0);
}

#[test]
fn empty_slide_document_has_one_slide() {
    let doc = AnimationDocument::empty("s", AnimationMode::Slides);
    let data = doc.slide_data.as_ref().unwrap();
    assert_eq!(data.slides.len(), 1);
    assert_eq!(doc.playback_length(), DEFAULT_SLIDE_DURATION);
}

#[test]
fn nested_objects_are_found_and_contribute_motion() {
    let child = circle(
        "child",
        vec![Keyframe {
            duration: 3.0,
            ..Keyframe::at(4.0, 0.0, 0.0)
        }],
    );
    let group = SceneObject {
        kind: ShapeKind::Group,
        children: vec![child],
        ..circle("g", vec![Keyframe::at(0.0, 0.0, 0.0)])
    };
    let mut doc = AnimationDocument::empty("d", AnimationMode::Timeline);
    doc.objects.push(group);
    assert!(doc.find_object(&ObjectId::new("child")).is_some());
    assert_eq!(doc.objects[0].motion_end(), 7.0);
}

#[test]
fn canvas_size_requires_both_dimensions() {
    let mut doc = AnimationDocument::empty("d", AnimationMode::Timeline);
    doc.canvas_width = Some(100.0);
    assert!(doc.canvas_size().is_none());
    doc.canvas_height = Some(50.0);
    assert_eq!(doc.canvas_size(), Some(Size::new(100.0, 50.0)));
}
