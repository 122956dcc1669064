//! Structure tree model
//!
//! An in-memory representation of a target project layout as exchanged with
//! the migrator backend. The backing value is schema-less JSON; nodes carry
//! no type tag, so a single duck-typing rule classifies them (see
//! [`node::is_file_shaped`]). Every mutation takes the current [`Document`]
//! and returns a new one; callers own persistence and submission.

pub mod edit;
pub mod node;
pub mod render;

pub use edit::parse_list;
pub use node::{
    classify, is_file_shaped, FileRecord, FolderView, MigrationComplexity, MigrationSuggestions,
    NodeKind, StructureNode, RECOGNIZED_FILE_TYPES,
};
pub use render::{NodeCounts, RenderWalk, RenderedNode};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Location of a node, as raw JSON keys from the Document root. Container
/// keywords (`root`, `folders`, `files`) are ordinary segments.
pub type Path = Vec<String>;

/// The full JSON tree describing a target project layout.
///
/// Canonical schema is the explicit-container form: the top level holds an
/// optional `root` mapping of files and an optional `folders` mapping of
/// folders; each folder holds optional `files` and `folders` mappings. The
/// flat form (a file or folder bound directly under any other key) is
/// tolerated when reading; writes always target the canonical containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(pub(crate) Value);

impl Default for Document {
    fn default() -> Self {
        Document(Value::Object(Map::new()))
    }
}

impl Document {
    /// Wrap a JSON value handed over by the analysis backend. Non-object
    /// values are normalized to an empty document.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Document(Value::Object(map)),
            _ => Document(Value::Object(Map::new())),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_object().map(|m| m.is_empty()).unwrap_or(true)
    }

    /// Render a raw path for error messages and display.
    pub fn display_path(path: &[String]) -> String {
        path.join("/")
    }
}
