use rosemary_core::{
    export_csv, export_csv_file, export_json, import_csv, import_csv_file, import_json,
    load_from_file, save_to_file, ExchangeError, LeafId, Rosemary, SkipReason, SkippedRow,
};
use tempfile::TempDir;

fn sample_store() -> Rosemary {
    let mut store = Rosemary::seeded(41);
    let a = store.add_leaf("Rosemary likes dry soil", ["herbs", "garden"]);
    let b = store.add_leaf("Basil wants water, \"daily\"", ["herbs"]);
    let c = store.add_leaf("Compost notes", Vec::<String>::new());
    store.connect_leaves(&a, &b, "companion").unwrap();
    store.connect_leaves(&b, &c, "").unwrap();
    store
}

#[test]
fn json_roundtrip_restores_leaves_edges_and_registry() {
    let store = sample_store();
    let json = export_json(&store).unwrap();

    let mut restored = Rosemary::seeded(42);
    let summary = import_json(&mut restored, &json).unwrap();

    assert_eq!(summary.leaves, 3);
    assert_eq!(summary.connections, 2);
    assert_eq!(summary.tags, 2);
    assert!(summary.dropped_tags.is_empty());
    assert_eq!(restored.stem().edges(), store.stem().edges());
    assert_eq!(restored.export_data(), store.export_data());
}

#[test]
fn json_import_replaces_previous_state() {
    let mut store = Rosemary::seeded(43);
    store.add_leaf("stale", ["old"]);

    import_json(&mut store, &export_json(&sample_store()).unwrap()).unwrap();
    assert_eq!(store.leaf_count(), 3);
    assert!(!store.has_tag("old"));
}

#[test]
fn json_import_tolerates_missing_sections() {
    let json = r#"{
        "leaves": [
            {"id": "a", "content": "x", "tags": ["t"], "createdAt": 1, "lastModified": 2}
        ]
    }"#;
    let mut store = Rosemary::seeded(44);
    let summary = import_json(&mut store, json).unwrap();

    assert_eq!(summary.leaves, 1);
    assert_eq!(summary.connections, 0);
    assert!(store.has_tag("t"));
    assert_eq!(store.leaf(&LeafId::from("a")).unwrap().created_at(), 1);
}

#[test]
fn json_import_drops_dangling_edges_and_unused_tags() {
    let json = r#"{
        "leaves": [
            {"id": "a", "content": "x", "tags": [], "createdAt": 1, "lastModified": 1}
        ],
        "connections": [
            {"leafId": "a", "connections": [["ghost", "x"]]}
        ],
        "tags": ["orphan"]
    }"#;
    let mut store = Rosemary::seeded(45);
    let summary = import_json(&mut store, json).unwrap();

    assert_eq!(summary.dropped_connections, 1);
    assert_eq!(summary.dropped_tags, vec!["orphan".to_string()]);
    assert!(store.stem().is_empty());
    assert!(!store.has_tag("orphan"));
}

#[test]
fn invalid_json_is_rejected_without_touching_the_store() {
    let mut store = sample_store();
    let err = import_json(&mut store, "{not json").unwrap_err();

    assert!(matches!(err, ExchangeError::Serialization { .. }));
    assert_eq!(store.leaf_count(), 3);
}

#[test]
fn csv_import_skips_bad_rows_and_keeps_good_ones() {
    let csv = "ID,Content,Tags\n\
               n1,First note,\"a, b\"\n\
               ,no id,x\n\
               n2,,y\n\
               n3,Third note,c;d\n";
    let mut store = Rosemary::seeded(46);
    let report = import_csv(&mut store, csv.as_bytes()).unwrap();

    assert_eq!(report.imported, vec![LeafId::from("n1"), LeafId::from("n3")]);
    assert_eq!(
        report.skipped,
        vec![
            SkippedRow {
                line: 3,
                reason: SkipReason::MissingId
            },
            SkippedRow {
                line: 4,
                reason: SkipReason::MissingContent
            },
        ]
    );
    assert_eq!(store.leaf(&LeafId::from("n1")).unwrap().tags(), ["a", "b"]);
    assert_eq!(store.leaf(&LeafId::from("n3")).unwrap().tags(), ["c", "d"]);
    assert!(!store.has_tag("x"));
}

#[test]
fn csv_import_without_tag_column_and_with_replacement() {
    let mut store = Rosemary::seeded(47);
    store.upsert_leaf(rosemary_core::Leaf::new(
        LeafId::from("n1"),
        "old",
        ["legacy"],
    ));

    let report = import_csv(&mut store, "content,id\nnew text,n1\n".as_bytes()).unwrap();
    assert_eq!(report.replaced, 1);
    assert_eq!(store.leaf_count(), 1);
    assert_eq!(store.leaf(&LeafId::from("n1")).unwrap().content(), "new text");
    assert!(!store.has_tag("legacy"));
}

#[test]
fn unreadable_csv_leaves_store_untouched() {
    let mut store = Rosemary::seeded(48);
    store.add_leaf("kept", Vec::<String>::new());

    let input: &[u8] = b"id,content\nn1,ok\nn2,\xff\xfe\n";
    let err = import_csv(&mut store, input).unwrap_err();

    assert!(matches!(err, ExchangeError::Csv { .. }));
    assert_eq!(store.leaf_count(), 1);
    assert!(!store.contains_leaf(&LeafId::from("n1")));
}

#[test]
fn csv_export_writes_header_and_reimports() {
    let store = sample_store();
    let mut buffer = Vec::new();
    export_csv(&store, &mut buffer).unwrap();

    let text = String::from_utf8(buffer.clone()).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("id,content,tags,createdAt,lastModified")
    );
    assert!(text.contains("herbs;garden"));

    let mut restored = Rosemary::seeded(49);
    let report = import_csv(&mut restored, buffer.as_slice()).unwrap();
    assert_eq!(report.imported.len(), 3);
    assert!(report.skipped.is_empty());
    for leaf in store.leaves() {
        let copy = restored.leaf(leaf.id()).unwrap();
        assert_eq!(copy.content(), leaf.content());
        assert_eq!(copy.tags(), leaf.tags());
    }
}

#[test]
fn file_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("rosemary-data.json");
    let store = sample_store();

    save_to_file(&store, &path).unwrap();

    let mut restored = Rosemary::seeded(50);
    assert!(load_from_file(&mut restored, &path).unwrap());
    assert_eq!(restored.export_data(), store.export_data());
}

#[test]
fn loading_missing_or_blank_files() {
    let dir = TempDir::new().unwrap();
    let mut store = Rosemary::seeded(51);
    store.add_leaf("kept", Vec::<String>::new());

    assert!(!load_from_file(&mut store, &dir.path().join("absent.json")).unwrap());
    assert_eq!(store.leaf_count(), 1);

    let blank = dir.path().join("blank.json");
    std::fs::write(&blank, "  \n").unwrap();
    assert!(load_from_file(&mut store, &blank).unwrap());
    assert!(store.is_empty());
}

#[test]
fn csv_file_helpers_roundtrip_and_report_io_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("leaves.csv");
    let store = sample_store();

    export_csv_file(&store, &path).unwrap();
    let mut restored = Rosemary::seeded(52);
    let report = import_csv_file(&mut restored, &path).unwrap();
    assert_eq!(report.imported.len(), store.leaf_count());

    let err = import_csv_file(&mut restored, &dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, ExchangeError::Io { .. }));
}

#[test]
fn csv_import_keeps_content_whitespace() {
    let mut store = Rosemary::seeded(53);
    store.upsert_leaf(rosemary_core::Leaf::new(
        LeafId::from("n1"),
        "  indented note\n",
        ["md"],
    ));
    let mut buffer = Vec::new();
    export_csv(&store, &mut buffer).unwrap();

    let mut restored = Rosemary::seeded(54);
    import_csv(&mut restored, buffer.as_slice()).unwrap();
    assert_eq!(
        restored.leaf(&LeafId::from("n1")).unwrap().content(),
        "  indented note\n"
    );

    let report = import_csv(&mut restored, "id,content\n  n2  ,   \n".as_bytes()).unwrap();
    assert_eq!(report.skipped[0].reason, SkipReason::MissingContent);

    import_csv(&mut restored, "id,content\n  n3 ,  body\n".as_bytes()).unwrap();
    assert_eq!(restored.leaf(&LeafId::from("n3")).unwrap().content(), "  body");
}
