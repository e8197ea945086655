use super::*;
use crate::composition::model::AnimationMode;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "algoanim_{}_{}_{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

#[test]
fn memory_store_normalizes_on_load() {
    let mut store = MemoryDocumentStore::new();
    store.insert_raw("raw", serde_json::json!({ "title": "x", "duration": "NaN" }));
    let doc = store.load("raw").unwrap();
    assert_eq!(doc.title, "x");
    assert_eq!(doc.duration, 5.0);
    assert!(matches!(store.load("missing"), Err(AnimError::Validation(_))));
}

#[test]
fn memory_store_saves_replace_previous_versions() {
    let mut store = MemoryDocumentStore::new();
    let mut doc = AnimationDocument::empty("one", AnimationMode::Timeline);
    store.save("d", &doc).unwrap();
    doc.title = "two".into();
    store.save("d", &doc).unwrap();
    assert_eq!(store.load("d").unwrap().title, "two");
    assert_eq!(store.list().unwrap(), ["d"]);
}

#[test]
fn file_store_round_trips_documents() {
    let dir = temp_dir("file_store_round_trip");
    let mut store = JsonFileStore::new(&dir);
    let mut doc = AnimationDocument::empty("deck", AnimationMode::Slides);
    doc.duration_override = Some(12.0);
    store.save("lesson-1", &doc).unwrap();

    assert_eq!(store.list().unwrap(), ["lesson-1"]);
    let loaded = store.load("lesson-1").unwrap();
    assert_eq!(loaded.mode, AnimationMode::Slides);
    assert_eq!(loaded.effective_duration(), 12.0);
    assert!(!dir.join("lesson-1.json.tmp").exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn file_store_rejects_path_like_ids() {
    let mut store = JsonFileStore::new(temp_dir("file_store_ids"));
    let doc = AnimationDocument::empty("x", AnimationMode::Timeline);
    assert!(matches!(store.save("../escape", &doc), Err(AnimError::Validation(_))));
    assert!(matches!(store.load("a/b"), Err(AnimError::Validation(_))));
}

#[test]
fn file_store_reports_missing_documents_as_persistence_errors() {
    let store = JsonFileStore::new(temp_dir("file_store_missing"));
    assert!(store.list().unwrap().is_empty());
    let err = store.load("nothing").unwrap_err();
    assert!(err.is_user_facing());
}
