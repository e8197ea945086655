use super::*;

#[test]
fn partial_json_keeps_defaults() {
    let cfg = EngineConfig::from_json_str(r#"{ "fadeInSecs": 9.0, "commit_every_n_frames": 3 }"#)
        .unwrap();
    assert_eq!(cfg.commit_every_n_frames, 3);
    assert_eq!(cfg.fade_in_secs, 0.5);
    assert_eq!(cfg.surface_width, 960);
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = EngineConfig::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, AnimError::Serde(_)));
}

#[test]
fn missing_file_is_reported() {
    let err = EngineConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("here.json"));
}

#[test]
fn normalize_options_ignore_nonsense_lengths() {
    let cfg = EngineConfig {
        default_duration_secs: -1.0,
        default_slide_duration_secs: 2.5,
        ..EngineConfig::default()
    };
    let opts = cfg.normalize_options();
    assert_eq!(opts.default_duration, 5.0);
    assert_eq!(opts.default_slide_duration, 2.5);
}
