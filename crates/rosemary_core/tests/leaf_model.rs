use rosemary_core::{Leaf, LeafId};

#[test]
fn new_leaf_sets_defaults() {
    let leaf = Leaf::new(LeafId::from("leaf-1"), "hello", ["a", "b"]);

    assert_eq!(leaf.id().as_str(), "leaf-1");
    assert_eq!(leaf.content(), "hello");
    assert_eq!(leaf.tags(), ["a", "b"]);
    assert_eq!(leaf.created_at(), leaf.last_modified());
    assert!(leaf.created_at() > 0);
}

#[test]
fn tag_mutations_report_presence_and_touch_last_modified() {
    let mut leaf = Leaf::new(LeafId::from("leaf-1"), "hello", Vec::<String>::new());
    let created = leaf.last_modified();

    assert!(leaf.add_tag("rust"));
    assert!(!leaf.add_tag("rust"));
    assert!(leaf.has_tag("rust"));
    assert!(leaf.last_modified() >= created);

    assert!(leaf.remove_tag("rust"));
    assert!(!leaf.remove_tag("rust"));
    assert!(!leaf.has_tag("rust"));
    assert!(leaf.tags().is_empty());
}

#[test]
fn blank_tags_are_ignored() {
    let mut leaf = Leaf::new(LeafId::from("leaf-1"), "hello", Vec::<String>::new());
    assert!(!leaf.add_tag("   "));
    assert!(leaf.tags().is_empty());
}

#[test]
fn update_content_never_moves_last_modified_backwards() {
    let mut leaf = Leaf::new(LeafId::from("leaf-1"), "draft", Vec::<String>::new());
    let before = leaf.last_modified();

    leaf.update_content("final");
    assert_eq!(leaf.content(), "final");
    assert!(leaf.last_modified() >= before);
    assert_eq!(leaf.id().as_str(), "leaf-1");
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let value = serde_json::json!({
        "id": "n-42",
        "content": "Rosemary likes dry soil",
        "tags": ["garden", "herbs", "garden"],
        "createdAt": 1_700_000_000_000_i64,
        "lastModified": 1_700_000_360_000_i64
    });

    let leaf: Leaf = serde_json::from_value(value).unwrap();
    assert_eq!(leaf.id().as_str(), "n-42");
    assert_eq!(leaf.tags(), ["garden", "herbs"]);
    assert_eq!(leaf.created_at(), 1_700_000_000_000);
    assert_eq!(leaf.last_modified(), 1_700_000_360_000);

    let json = serde_json::to_value(&leaf).unwrap();
    assert_eq!(json["id"], "n-42");
    assert_eq!(json["tags"], serde_json::json!(["garden", "herbs"]));
    assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
    assert_eq!(json["lastModified"], 1_700_000_360_000_i64);

    let decoded: Leaf = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, leaf);
}

#[test]
fn deserialize_accepts_missing_tags() {
    let value = serde_json::json!({
        "id": "n-1",
        "content": "untagged",
        "createdAt": 1,
        "lastModified": 2
    });

    let leaf: Leaf = serde_json::from_value(value).unwrap();
    assert!(leaf.tags().is_empty());
}

#[test]
fn wall_clock_ages_are_non_negative() {
    let leaf = Leaf::new(LeafId::from("leaf-1"), "hello", Vec::<String>::new());
    assert!(leaf.age_ms() >= 0);
    assert!(leaf.time_since_last_modified_ms() >= 0);

    let record: Leaf = serde_json::from_value(serde_json::json!({
        "id": "n-1",
        "content": "old",
        "createdAt": 1_000,
        "lastModified": 5_000
    }))
    .unwrap();
    assert_eq!(record.age_at(6_000), 5_000);
    assert_eq!(record.time_since_last_modified_at(6_000), 1_000);
}
