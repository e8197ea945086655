use super::*;
use crate::composition::model::Keyframe;
use crate::composition::shape::ShapeKind;
use crate::foundation::ids::ObjectId;

fn widget() -> SceneObject {
    SceneObject::leaf(ObjectId::new("w"), ShapeKind::Square, Keyframe::default())
}

#[test]
fn entries_are_scoped_per_user() {
    let mut lib = MemoryObjectLibrary::new();
    let id = lib.save_object("ana", &widget()).unwrap();
    assert_eq!(lib.list_saved_objects("ana").unwrap().len(), 1);
    assert!(lib.list_saved_objects("bo").unwrap().is_empty());
    assert!(lib.delete_saved_object("bo", &id).is_err());

    lib.delete_saved_object("ana", &id).unwrap();
    assert!(lib.list_saved_objects("ana").unwrap().is_empty());
}

#[test]
fn deleting_twice_is_a_persistence_error() {
    let mut lib = MemoryObjectLibrary::new();
    let id = lib.save_object("ana", &widget()).unwrap();
    lib.delete_saved_object("ana", &id).unwrap();
    let err = lib.delete_saved_object("ana", &id).unwrap_err();
    assert!(err.is_user_facing());
    assert!(matches!(err, AnimError::Persistence(_)));
}

#[test]
fn anonymous_saves_are_rejected() {
    let mut lib = MemoryObjectLibrary::new();
    assert!(lib.save_object("", &widget()).is_err());
}
