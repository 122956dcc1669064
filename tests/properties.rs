//! Property tests for the edit protocol's core contracts.
//!
//! Generated documents use folder keys from `a`-`c` and file keys with an
//! extension, while generated write paths use fresh segment names from
//! `x`-`z`, so a generated path never collides with a generated file and
//! every write is expected to succeed.

use proptest::prelude::*;
use remold::tree::{Document, NodeKind};
use serde_json::{json, Value};

fn file_value() -> impl Strategy<Value = Value> {
    (
        "[a-z]{0,12}",
        prop::collection::vec("[a-z]{1,8}\\.js", 0..3),
    )
        .prop_map(|(description, source_files)| {
            json!({
                "description": description,
                "file_type": "js",
                "namespace": "",
                "source_files": source_files,
            })
        })
}

fn folder_value(depth: u32) -> BoxedStrategy<Value> {
    let files = prop::collection::btree_map("f[0-9]\\.js", file_value(), 0..3);
    if depth == 0 {
        files
            .prop_map(|files| json!({"files": files, "folders": {}}))
            .boxed()
    } else {
        (
            files,
            prop::collection::btree_map("[a-c]", folder_value(depth - 1), 0..3),
        )
            .prop_map(|(files, folders)| json!({"files": files, "folders": folders}))
            .boxed()
    }
}

fn document() -> impl Strategy<Value = Document> {
    (
        prop::collection::btree_map("r[0-9]\\.md", file_value(), 0..3),
        prop::collection::btree_map("[a-c]", folder_value(2), 0..3),
    )
        .prop_map(|(root, folders)| {
            Document::from_value(json!({"root": root, "folders": folders}))
        })
}

/// Parent paths of fresh folder segments, ending in a `files` container.
fn fresh_parent() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[x-z]", 0..3).prop_map(|segments| {
        let mut path = Vec::new();
        for segment in segments {
            path.push("folders".to_string());
            path.push(segment);
        }
        path.push("files".to_string());
        path
    })
}

fn key() -> impl Strategy<Value = String> {
    "[x-z]{1,6}\\.jsx"
}

proptest! {
    #[test]
    fn write_then_read_returns_the_written_value(
        doc in document(),
        parent in fresh_parent(),
        key in key(),
        value in file_value(),
    ) {
        let updated = doc.set_node(&parent, &key, Some(value.clone())).unwrap();
        let mut full = parent.clone();
        full.push(key);
        prop_assert_eq!(updated.resolve(&full), Some(&value));
    }

    #[test]
    fn write_of_the_sentinel_deletes(
        doc in document(),
        parent in fresh_parent(),
        key in key(),
        value in file_value(),
    ) {
        let written = doc.set_node(&parent, &key, Some(value)).unwrap();
        let deleted = written.set_node(&parent, &key, None).unwrap();
        let mut full = parent.clone();
        full.push(key);
        prop_assert_eq!(deleted.resolve(&full), None);
    }

    #[test]
    fn set_node_never_mutates_its_input(
        doc in document(),
        parent in fresh_parent(),
        key in key(),
        value in file_value(),
    ) {
        let before = doc.clone();
        let _ = doc.set_node(&parent, &key, Some(value)).unwrap();
        let _ = doc.set_node(&parent, &key, None).unwrap();
        prop_assert_eq!(doc, before);
    }

    #[test]
    fn set_node_is_idempotent(
        doc in document(),
        parent in fresh_parent(),
        key in key(),
        value in file_value(),
    ) {
        let once = doc.set_node(&parent, &key, Some(value.clone())).unwrap();
        let twice = once.set_node(&parent, &key, Some(value)).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn blank_add_is_a_no_op(
        doc in document(),
        blank in "[ \t]{0,4}",
        kind in prop_oneof![Just(NodeKind::File), Just(NodeKind::Folder)],
    ) {
        let updated = doc.add_node(&[], &blank, kind, None).unwrap();
        prop_assert_eq!(updated, doc);
    }

    #[test]
    fn render_order_lists_files_before_folders_per_level(doc in document()) {
        // For each folder in the walk, every file child appears before
        // every folder child in the remainder of the walk at that depth.
        let rendered: Vec<_> = doc.render_order().collect();
        for (index, item) in rendered.iter().enumerate() {
            if let remold::tree::StructureNode::Folder(_) = item.node {
                for later in &rendered[index + 1..] {
                    if later.depth < item.depth {
                        break;
                    }
                    if later.depth == item.depth {
                        // A sibling after a folder must be a folder too.
                        prop_assert!(!later.node.is_file());
                    }
                }
            }
        }
    }

    #[test]
    fn every_rendered_path_resolves(doc in document()) {
        for item in doc.render_order() {
            prop_assert!(doc.resolve(&item.path).is_some());
        }
    }
}
