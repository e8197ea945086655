use super::*;

#[test]
fn hex_forms_parse() {
    assert_eq!(parse_color("#fff"), Some(Rgba8::opaque(255, 255, 255)));
    assert_eq!(parse_color("#3b82f6"), Some(Rgba8::opaque(0x3b, 0x82, 0xf6)));
    assert_eq!(parse_color("#00000080"), Some(Rgba8::new(0, 0, 0, 0x80)));
    assert_eq!(parse_color("#f008"), Some(Rgba8::new(255, 0, 0, 0x88)));
}

#[test]
fn functional_and_named_forms_parse() {
    assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Rgba8::opaque(1, 2, 3)));
    assert_eq!(
        parse_color("rgba(10,20,30,0.5)"),
        Some(Rgba8::new(10, 20, 30, 128))
    );
    assert_eq!(parse_color("Red"), Some(Rgba8::opaque(255, 0, 0)));
    assert_eq!(parse_color("transparent"), Some(Rgba8::TRANSPARENT));
}

#[test]
fn garbage_is_rejected() {
    assert_eq!(parse_color(""), None);
    assert_eq!(parse_color("#12"), None);
    assert_eq!(parse_color("#zzzzzz"), None);
    assert_eq!(parse_color("rgb(1,2)"), None);
    assert_eq!(parse_color("chartreuse-ish"), None);
}

#[test]
fn transparent_keyword_is_case_insensitive() {
    assert!(is_transparent_keyword(" Transparent "));
    assert!(!is_transparent_keyword("#00000000"));
}
