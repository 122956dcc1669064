//! Edit protocol over [`Document`].
//!
//! Every operation takes the current document by reference and returns a new
//! one; the input is never mutated. Reads are strict (a missing segment is
//! `None`), writes are permissive (missing intermediate folders are created).
//! The single failure mode is writing through a File node.

use crate::error::TreeError;
use crate::tree::node::{
    self, FileRecord, NodeKind, StructureNode, FILES_KEY, FOLDERS_KEY, ROOT_KEY,
};
use crate::tree::Document;
use serde_json::{Map, Value};

/// Parse a comma-separated free-text field: split on `,`, trim, drop empty
/// segments, preserve order, allow duplicates.
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Document {
    /// Walk `path` segment by segment through nested mappings. Strict: any
    /// absent segment or non-object intermediate yields `None`. Never
    /// creates anything.
    pub fn resolve(&self, path: &[String]) -> Option<&Value> {
        let mut current = &self.0;
        for segment in path {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Resolve and classify the node at `path`.
    pub fn node_at(&self, path: &[String]) -> Option<StructureNode> {
        let value = self.resolve(path)?;
        let key = path.last().map(String::as_str).unwrap_or_default();
        Some(node::classify(key, value, path.is_empty()))
    }

    /// Resolve `path` to a File record, or `None` when it is absent or a
    /// Folder.
    pub fn file_at(&self, path: &[String]) -> Option<FileRecord> {
        match self.node_at(path)? {
            StructureNode::File(record) => Some(*record),
            StructureNode::Folder(_) => None,
        }
    }

    /// Single write entry point: bind `key` in the folder at `parent_path`,
    /// or remove it when `value` is `None` (the delete sentinel). Missing
    /// intermediate folders are created along the way; an intermediate that
    /// holds a File fails with [`TreeError::InvalidPath`].
    pub fn set_node(
        &self,
        parent_path: &[String],
        key: &str,
        value: Option<Value>,
    ) -> Result<Document, TreeError> {
        let mut root = self.0.clone();
        if let Some(parent) = descend_mut(&mut root, parent_path, true)? {
            match value {
                Some(v) => {
                    parent.insert(key.to_string(), v);
                }
                None => {
                    parent.remove(key);
                }
            }
        }
        Ok(Document(root))
    }

    /// Add a file or folder under `parent_path`. A blank name is a no-op.
    /// Files land in the parent's file container (`root` at the top level)
    /// seeded from `seed` or editor defaults; folders land in its `folders`
    /// container as an empty canonical folder. An existing key is silently
    /// overwritten.
    pub fn add_node(
        &self,
        parent_path: &[String],
        name: &str,
        kind: NodeKind,
        seed: Option<FileRecord>,
    ) -> Result<Document, TreeError> {
        if name.trim().is_empty() {
            return Ok(self.clone());
        }

        let container = match kind {
            NodeKind::File if parent_path.is_empty() => ROOT_KEY,
            NodeKind::File => FILES_KEY,
            NodeKind::Folder => FOLDERS_KEY,
        };
        let mut target: Vec<String> = parent_path.to_vec();
        target.push(container.to_string());

        let value = match kind {
            NodeKind::File => {
                let mut record = seed.unwrap_or_default();
                record.file_name = name.to_string();
                record.to_value()
            }
            NodeKind::Folder => empty_folder(),
        };
        self.set_node(&target, name, Some(value))
    }

    /// Remove the node at `path` from its parent container. A missing parent
    /// is a no-op; writing through a File intermediate is `InvalidPath`.
    /// Top-level paths remove directly from the document root.
    pub fn delete_node(&self, path: &[String]) -> Result<Document, TreeError> {
        let (key, parent_path) = match path.split_last() {
            Some(split) => split,
            None => return Ok(self.clone()),
        };

        let mut root = self.0.clone();
        if let Some(parent) = descend_mut(&mut root, parent_path, false)? {
            parent.remove(key);
        }
        Ok(Document(root))
    }

    /// Apply `mutate` to the File record at `path` and write the result
    /// back, refreshing `file_name` from the key. A path that does not
    /// resolve to a File is a no-op.
    pub fn update_file(
        &self,
        path: &[String],
        mutate: impl FnOnce(&mut FileRecord),
    ) -> Result<Document, TreeError> {
        let (key, parent_path) = match path.split_last() {
            Some(split) => split,
            None => return Ok(self.clone()),
        };
        let mut record = match self.file_at(path) {
            Some(record) => record,
            None => return Ok(self.clone()),
        };
        mutate(&mut record);
        record.file_name = key.to_string();
        self.set_node(parent_path, key, Some(record.to_value()))
    }
}

fn empty_folder() -> Value {
    let mut folder = Map::new();
    folder.insert(FILES_KEY.to_string(), Value::Object(Map::new()));
    folder.insert(FOLDERS_KEY.to_string(), Value::Object(Map::new()));
    Value::Object(folder)
}

/// Walk `path` mutably. With `create`, absent segments become empty objects
/// and the final mapping is always returned; without it, an absent segment
/// stops the walk with `Ok(None)`. Either way, descending into a File (or
/// any non-object) is `InvalidPath`.
fn descend_mut<'a>(
    root: &'a mut Value,
    path: &[String],
    create: bool,
) -> Result<Option<&'a mut Map<String, Value>>, TreeError> {
    let mut current = match root.as_object_mut() {
        Some(map) => map,
        None => return Ok(None),
    };
    for (depth, segment) in path.iter().enumerate() {
        if !current.contains_key(segment) {
            if !create {
                return Ok(None);
            }
            current.insert(segment.clone(), Value::Object(Map::new()));
        }
        let child = match current.get_mut(segment) {
            Some(child) => child,
            None => return Ok(None),
        };
        if node::is_file_shaped(child) {
            return Err(TreeError::InvalidPath {
                path: Document::display_path(&path[..=depth]),
                segment: segment.clone(),
            });
        }
        current = match child.as_object_mut() {
            Some(map) => map,
            None => {
                return Err(TreeError::InvalidPath {
                    path: Document::display_path(&path[..=depth]),
                    segment: segment.clone(),
                })
            }
        };
    }
    Ok(Some(current))
}
