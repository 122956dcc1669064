//! Node types and the File/Folder classification rule.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields that mark a JSON object as a File node. The backend document has
/// no explicit type tag; this list is the whole discrimination contract.
const FILE_MARKER_FIELDS: [&str; 4] = ["description", "file_type", "namespace", "source_files"];

/// Container keys that hold children rather than node metadata.
pub(crate) const FILES_KEY: &str = "files";
pub(crate) const FOLDERS_KEY: &str = "folders";
pub(crate) const ROOT_KEY: &str = "root";

/// File categories the assistant recognizes, beyond plain extension tags
/// like "jsx" or "css".
pub const RECOGNIZED_FILE_TYPES: [&str; 11] = [
    "controller",
    "directive",
    "service",
    "filter",
    "factory",
    "module",
    "component",
    "pipe",
    "guard",
    "resolver",
    "interceptor",
];

/// A node is a File iff it carries at least one File-only field. Applied
/// here and nowhere else.
pub fn is_file_shaped(value: &Value) -> bool {
    match value.as_object() {
        Some(map) => FILE_MARKER_FIELDS.iter().any(|f| map.contains_key(*f)),
        None => false,
    }
}

/// Node kind selector for [`crate::tree::Document::add_node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder,
}

/// Estimated effort to migrate a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationComplexity {
    Low,
    Medium,
    High,
}

impl std::str::FromStr for MigrationComplexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(MigrationComplexity::Low),
            "medium" => Ok(MigrationComplexity::Medium),
            "high" => Ok(MigrationComplexity::High),
            other => Err(format!(
                "unknown complexity '{}' (expected low, medium, or high)",
                other
            )),
        }
    }
}

/// Backend guidance attached to a file during analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct MigrationSuggestions {
    #[serde(default)]
    pub code_transformation: String,
    #[serde(default)]
    pub potential_challenges: Vec<String>,
    #[serde(default)]
    pub manual_review_required: bool,
    #[serde(default)]
    pub performance_considerations: String,
}

/// Metadata record of a File node.
///
/// The four marker fields always serialize (even when empty) so a written
/// record stays file-shaped. Fields this model does not know about are kept
/// in `extra` and round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FileRecord {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub source_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_complexity: Option<MigrationComplexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_suggestions: Option<MigrationSuggestions>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileRecord {
    /// Default record for a freshly added file, as the editor seeds it.
    pub fn named(name: &str) -> Self {
        FileRecord {
            file_name: name.to_string(),
            ..FileRecord::default()
        }
    }

    /// Parse a file-shaped JSON value, deriving `file_name` from the node's
    /// key when the field is absent or empty.
    pub fn from_value(key: &str, value: &Value) -> Option<Self> {
        let mut record: FileRecord = serde_json::from_value(value.clone()).ok()?;
        if record.file_name.is_empty() {
            record.file_name = key.to_string();
        }
        Some(record)
    }

    pub fn to_value(&self) -> Value {
        // FileRecord serializes to a map; only maps come back out.
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

/// Read-only summary of a Folder's children, split by class.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FolderView {
    /// Keys of file children, canonical container entries and flat-form
    /// entries alike.
    pub files: Vec<String>,
    /// Keys of folder children.
    pub folders: Vec<String>,
}

/// A classified node: either a File with its metadata or a Folder with its
/// child listing.
#[derive(Debug, Clone, PartialEq)]
pub enum StructureNode {
    File(Box<FileRecord>),
    Folder(FolderView),
}

impl StructureNode {
    pub fn is_file(&self) -> bool {
        matches!(self, StructureNode::File(_))
    }
}

/// Classify a JSON value under `key`. This is the single place the
/// duck-typing rule turns raw JSON into the tagged variant.
///
/// `at_root` widens the file container set: the document root keeps its
/// top-level files under `root`, folders keep theirs under `files`.
pub fn classify(key: &str, value: &Value, at_root: bool) -> StructureNode {
    if is_file_shaped(value) {
        let record =
            FileRecord::from_value(key, value).unwrap_or_else(|| FileRecord::named(key));
        return StructureNode::File(Box::new(record));
    }
    StructureNode::Folder(folder_view(value, at_root))
}

/// Split a folder-shaped value's children into files and folders, each in
/// ascending key order.
pub(crate) fn folder_view(value: &Value, at_root: bool) -> FolderView {
    let mut view = FolderView::default();
    let map = match value.as_object() {
        Some(map) => map,
        None => return view,
    };

    let file_container = if at_root { ROOT_KEY } else { FILES_KEY };
    if let Some(files) = map.get(file_container).and_then(Value::as_object) {
        view.files.extend(files.keys().cloned());
    }
    if at_root {
        // Tolerate `files` at the top level too.
        if let Some(files) = map.get(FILES_KEY).and_then(Value::as_object) {
            view.files.extend(files.keys().cloned());
        }
    }
    if let Some(folders) = map.get(FOLDERS_KEY).and_then(Value::as_object) {
        view.folders.extend(folders.keys().cloned());
    }

    // Flat-form children bound directly under the node.
    for (key, child) in map {
        if key == FILES_KEY || key == FOLDERS_KEY || (at_root && key == ROOT_KEY) {
            continue;
        }
        if is_file_shaped(child) {
            view.files.push(key.clone());
        } else if child.is_object() {
            view.folders.push(key.clone());
        }
    }

    view.files.sort();
    view.folders.sort();
    view
}
