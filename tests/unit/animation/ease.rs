use super::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn endpoints_are_stable() {
    for ease in Easing::ALL {
        assert!(close(ease.apply(0.0), 0.0), "{ease:?} at 0");
        assert!(close(ease.apply(1.0), 1.0), "{ease:?} at 1");
    }
}

#[test]
fn closed_forms_match_at_midpoint() {
    assert!(close(Easing::Linear.apply(0.5), 0.5));
    assert!(close(Easing::EaseIn.apply(0.5), 0.25));
    assert!(close(Easing::EaseOut.apply(0.5), 0.75));
    assert!(close(Easing::EaseInOut.apply(0.25), 0.125));
    assert!(close(Easing::EaseInOut.apply(0.75), 0.875));
}

#[test]
fn inputs_outside_unit_interval_are_clamped() {
    assert_eq!(Easing::EaseIn.apply(-3.0), 0.0);
    assert_eq!(Easing::EaseIn.apply(7.0), 1.0);
}

#[test]
fn bounce_stays_bounded_and_rebounds() {
    let mut prev = 0.0;
    let mut dips = 0;
    for i in 0..=1000 {
        let v = Easing::Bounce.apply(f64::from(i) / 1000.0);
        assert!((0.0..=1.0 + 1e-9).contains(&v));
        if v < prev {
            dips += 1;
        }
        prev = v;
    }
    assert!(dips > 0, "bounce should fall back between rebounds");
}

#[test]
fn names_parse_leniently_and_round_trip() {
    assert_eq!(Easing::parse("ease-in-out"), Some(Easing::EaseInOut));
    assert_eq!(Easing::parse("easeOut"), Some(Easing::EaseOut));
    assert_eq!(Easing::parse("EASE_IN"), Some(Easing::EaseIn));
    assert_eq!(Easing::parse("wobble"), None);
    for ease in Easing::ALL {
        assert_eq!(Easing::parse(ease.as_str()), Some(ease));
        let json = serde_json::to_string(&ease).unwrap();
        assert_eq!(json, format!("\"{}\"", ease.as_str()));
    }
}
