use super::*;

const BLACK: TextBrush = TextBrush {
    r: 0,
    g: 0,
    b: 0,
    a: 255,
};

#[test]
fn bundled_face_registers_a_family() {
    let engine = TextLayoutEngine::from_font_path(None).unwrap();
    assert!(engine.family_name().contains("DejaVu"));
}

#[test]
fn label_extent_grows_with_text_and_size() {
    let mut engine = TextLayoutEngine::from_font_path(None).unwrap();
    let short = engine.layout_label("ab", 20.0, BLACK).unwrap();
    let long = engine.layout_label("abcd", 20.0, BLACK).unwrap();
    let big = engine.layout_label("ab", 40.0, BLACK).unwrap();

    assert!(short.width > 0.0 && short.height > 0.0);
    assert!(long.width > short.width * 1.5);
    assert!(big.height > short.height * 1.5);
}

#[test]
fn invalid_sizes_are_rejected() {
    let mut engine = TextLayoutEngine::from_font_path(None).unwrap();
    assert!(engine.layout_label("a", 0.0, BLACK).is_err());
    assert!(engine.layout_label("a", f32::NAN, BLACK).is_err());
}

#[test]
fn garbage_font_bytes_are_rejected() {
    assert!(TextLayoutEngine::new(b"not a font".to_vec()).is_err());
}
