//! Display-ordered traversal of a [`Document`].
//!
//! The walk yields every node depth-first with all File children of a level
//! before its Folder children; within each class, ascending key order. The
//! ordering is a display convention, not a structural invariant, but it is
//! deterministic and part of the module's contract.

use crate::tree::node::{
    self, StructureNode, FILES_KEY, FOLDERS_KEY, ROOT_KEY,
};
use crate::tree::{Document, Path};
use serde_json::Value;

/// One step of the display walk.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    /// Raw path of the node, usable with resolve/set/delete.
    pub path: Path,
    /// Folder nesting depth; top-level children are depth 0.
    pub depth: usize,
    pub node: StructureNode,
}

impl RenderedNode {
    /// The node's key within its parent.
    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }
}

enum Slot<'a> {
    File(Path, String, &'a Value),
    Folder(Path, String, &'a Value),
}

/// Lazy iterator over a document in display order.
pub struct RenderWalk<'a> {
    stack: Vec<std::vec::IntoIter<Slot<'a>>>,
}

impl<'a> Iterator for RenderWalk<'a> {
    type Item = RenderedNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(Slot::File(path, key, value)) => {
                    let depth = self.stack.len() - 1;
                    return Some(RenderedNode {
                        path,
                        depth,
                        node: node::classify(&key, value, false),
                    });
                }
                Some(Slot::Folder(path, key, value)) => {
                    let depth = self.stack.len() - 1;
                    let rendered = RenderedNode {
                        path: path.clone(),
                        depth,
                        node: node::classify(&key, value, false),
                    };
                    self.stack.push(level_slots(&path, value, false));
                    return Some(rendered);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Collect one level's children: files first, then folders, each sorted by
/// key. Paths keep the container segments so every yielded path resolves.
fn level_slots<'a>(prefix: &[String], value: &'a Value, at_root: bool) -> std::vec::IntoIter<Slot<'a>> {
    let mut files: Vec<(String, Path, &Value)> = Vec::new();
    let mut folders: Vec<(String, Path, &Value)> = Vec::new();

    let map = match value.as_object() {
        Some(map) => map,
        None => return Vec::new().into_iter(),
    };

    let collect_container = |container: &str, out: &mut Vec<(String, Path, &'a Value)>| {
        if let Some(children) = map.get(container).and_then(Value::as_object) {
            for (key, child) in children {
                let mut path = prefix.to_vec();
                path.push(container.to_string());
                path.push(key.clone());
                out.push((key.clone(), path, child));
            }
        }
    };

    collect_container(if at_root { ROOT_KEY } else { FILES_KEY }, &mut files);
    if at_root {
        collect_container(FILES_KEY, &mut files);
    }
    collect_container(FOLDERS_KEY, &mut folders);

    for (key, child) in map {
        if key == FILES_KEY || key == FOLDERS_KEY || (at_root && key == ROOT_KEY) {
            continue;
        }
        let mut path = prefix.to_vec();
        path.push(key.clone());
        if node::is_file_shaped(child) {
            files.push((key.clone(), path, child));
        } else if child.is_object() {
            folders.push((key.clone(), path, child));
        }
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    folders.sort_by(|a, b| a.0.cmp(&b.0));

    files
        .into_iter()
        .map(|(key, path, value)| Slot::File(path, key, value))
        .chain(
            folders
                .into_iter()
                .map(|(key, path, value)| Slot::Folder(path, key, value)),
        )
        .collect::<Vec<_>>()
        .into_iter()
}

/// Node totals, for status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeCounts {
    pub files: usize,
    pub folders: usize,
}

impl Document {
    /// Lazy display-order traversal: files before folders at each level,
    /// ascending key order within each class, depth-first.
    pub fn render_order(&self) -> RenderWalk<'_> {
        RenderWalk {
            stack: vec![level_slots(&[], &self.0, true)],
        }
    }

    /// Count files and folders across the whole document.
    pub fn count_nodes(&self) -> NodeCounts {
        let mut counts = NodeCounts::default();
        for rendered in self.render_order() {
            match rendered.node {
                StructureNode::File(_) => counts.files += 1,
                StructureNode::Folder(_) => counts.folders += 1,
            }
        }
        counts
    }

    /// Map a user-facing path (no container segments, e.g. `src/App.jsx`)
    /// to the raw path of the node it names. Folder containers are searched
    /// before flat-form keys.
    pub fn locate(&self, display: &[String]) -> Option<Path> {
        let mut raw: Path = Vec::new();
        let mut current = &self.0;

        for (index, segment) in display.iter().enumerate() {
            let at_root = index == 0;
            let last = index + 1 == display.len();
            let map = current.as_object()?;

            if last {
                let file_container = if at_root { ROOT_KEY } else { FILES_KEY };
                if let Some(files) = map.get(file_container).and_then(Value::as_object) {
                    if files.contains_key(segment) {
                        raw.push(file_container.to_string());
                        raw.push(segment.clone());
                        return Some(raw);
                    }
                }
                if at_root {
                    if let Some(files) = map.get(FILES_KEY).and_then(Value::as_object) {
                        if files.contains_key(segment) {
                            raw.push(FILES_KEY.to_string());
                            raw.push(segment.clone());
                            return Some(raw);
                        }
                    }
                }
            }

            if let Some(folders) = map.get(FOLDERS_KEY).and_then(Value::as_object) {
                if let Some(child) = folders.get(segment) {
                    raw.push(FOLDERS_KEY.to_string());
                    raw.push(segment.clone());
                    current = child;
                    continue;
                }
            }
            if let Some(child) = map.get(segment) {
                if segment != FILES_KEY && segment != FOLDERS_KEY && !(at_root && segment == ROOT_KEY)
                {
                    raw.push(segment.clone());
                    current = child;
                    continue;
                }
            }
            return None;
        }

        if raw.is_empty() {
            None
        } else {
            Some(raw)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::testdata;
    use serde_json::json;

    fn names(doc: &Document) -> Vec<String> {
        doc.render_order().map(|n| n.name().to_string()).collect()
    }

    #[test]
    fn test_files_listed_before_folders_at_each_level() {
        // Two files and one folder at the same level; insertion order in the
        // JSON puts the folder between them.
        let doc = Document::from_value(json!({
            "root": {
                "b.md": {"description": ""},
                "a.md": {"description": ""}
            },
            "folders": {
                "docs": {"files": {}, "folders": {}}
            }
        }));
        assert_eq!(names(&doc), vec!["a.md", "b.md", "docs"]);
    }

    #[test]
    fn test_walk_is_depth_first_with_container_paths() {
        let doc = testdata::sample();
        let walked: Vec<(String, usize)> = doc
            .render_order()
            .map(|n| (n.name().to_string(), n.depth))
            .collect();
        assert_eq!(
            walked,
            vec![
                ("package.json".to_string(), 0),
                ("src".to_string(), 0),
                ("App.jsx".to_string(), 1),
                ("main.jsx".to_string(), 1),
                ("hooks".to_string(), 1),
                ("useApi.js".to_string(), 2),
            ]
        );

        // Every yielded path resolves back into the document.
        for rendered in doc.render_order() {
            assert!(doc.resolve(&rendered.path).is_some(), "path must resolve");
        }
    }

    #[test]
    fn test_flat_form_children_are_walked() {
        let doc = Document::from_value(json!({
            "folders": {
                "src": {
                    "inline.css": {"file_type": "css"},
                    "files": {"App.jsx": {"description": ""}},
                    "folders": {}
                }
            }
        }));
        let walked = names(&doc);
        assert_eq!(walked, vec!["src", "App.jsx", "inline.css"]);
    }

    #[test]
    fn test_count_nodes() {
        let doc = testdata::sample();
        let counts = doc.count_nodes();
        assert_eq!(counts.files, 4);
        assert_eq!(counts.folders, 2);
    }

    #[test]
    fn test_locate_file_and_folder() {
        let doc = testdata::sample();
        assert_eq!(
            doc.locate(&["src".to_string(), "App.jsx".to_string()]),
            Some(vec![
                "folders".to_string(),
                "src".to_string(),
                "files".to_string(),
                "App.jsx".to_string()
            ])
        );
        assert_eq!(
            doc.locate(&["src".to_string(), "hooks".to_string()]),
            Some(vec![
                "folders".to_string(),
                "src".to_string(),
                "folders".to_string(),
                "hooks".to_string()
            ])
        );
        assert_eq!(
            doc.locate(&["package.json".to_string()]),
            Some(vec!["root".to_string(), "package.json".to_string()])
        );
        assert!(doc.locate(&["src".to_string(), "Gone.jsx".to_string()]).is_none());
        assert!(doc.locate(&[]).is_none());
    }
}
