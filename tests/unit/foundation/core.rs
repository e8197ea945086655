use super::*;

#[test]
fn premul_bytes_scale_color_by_alpha() {
    assert_eq!(Rgba8::opaque(10, 20, 30).to_premul_bytes(), [10, 20, 30, 255]);
    assert_eq!(Rgba8::new(255, 255, 255, 0).to_premul_bytes(), [0, 0, 0, 0]);
    assert_eq!(Rgba8::new(255, 0, 0, 128).to_premul_bytes(), [128, 0, 0, 128]);
}

#[test]
fn transparent_constant_is_transparent() {
    assert!(Rgba8::TRANSPARENT.is_transparent());
    assert!(!Rgba8::BLACK.is_transparent());
}
