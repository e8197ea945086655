use super::*;

#[test]
fn fresh_skips_taken_ids() {
    let mut ids = IdGen::new("obj");
    let taken = ["obj-1", "obj-2"];
    assert_eq!(ids.fresh(|c| taken.contains(&c)), "obj-3");
    assert_eq!(ids.fresh(|c| taken.contains(&c)), "obj-4");
}

#[test]
fn ids_serialize_as_plain_strings() {
    let id = ObjectId::new("node-7");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"node-7\"");
    let back: ObjectId = serde_json::from_str("\"node-7\"").unwrap();
    assert_eq!(back, id);
}
