//! Migrator backend client
//!
//! Everything computationally hard lives behind this boundary: repository
//! analysis, structure inference, and the code transformation itself are all
//! performed by the external migrator service. This module only shapes
//! requests and responses.

pub mod http;

pub use http::HttpMigratorClient;

use crate::error::ApiError;
use crate::tree::Document;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Result of analyzing a source project: the inferred target structure, the
/// raw analysis report, and the backend's handle for later migration calls.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub project_id: String,
    pub target_structure: Document,
    pub analysis_results: Value,
}

/// Generated metadata for a single file, from the recommendation endpoint.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub description: String,
    pub file_type: String,
}

/// Async seam to the migrator service. The CLI and session code hold a
/// `Box<dyn MigratorApi>` so tests can script the backend.
#[async_trait]
pub trait MigratorApi: Send + Sync {
    /// Analyze a repository by URL.
    async fn analyze_repo(&self, repo_url: &str) -> Result<AnalysisOutcome, ApiError>;

    /// Analyze an uploaded project archive.
    async fn analyze_archive(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisOutcome, ApiError>;

    /// Run the migration for an analyzed project, submitting the (possibly
    /// edited) target structure. Returns the migrated project archive.
    async fn migrate(
        &self,
        project_id: &str,
        target_structure: &Document,
        changes: bool,
    ) -> Result<Vec<u8>, ApiError>;

    /// One-shot migration of a repository by URL, no prior analysis.
    async fn migrate_repo(&self, repo_url: &str) -> Result<Vec<u8>, ApiError>;

    /// One-shot migration of an uploaded archive.
    async fn migrate_archive(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<Vec<u8>, ApiError>;

    /// Generate description and file type for a target file.
    async fn recommend(&self, file_name: &str) -> Result<Recommendation, ApiError>;

    /// Convert a single code snippet, returning the converted source.
    async fn convert_snippet(
        &self,
        source_code: &str,
        file_types: &[String],
    ) -> Result<String, ApiError>;
}

/// Flatten the analyzed *source* tree from an analysis report into the
/// selectable source-file paths. Leaves are marked with the literal string
/// `"file"`; stylesheet, script, and sourcemap artifacts are skipped since
/// they are never useful as migration sources.
pub fn source_file_candidates(analysis_results: &Value) -> Vec<String> {
    let mut files = Vec::new();
    if let Some(structure) = analysis_results.get("structure") {
        flatten_structure(structure, String::new(), &mut files);
    }
    files
}

fn flatten_structure(value: &Value, prefix: String, out: &mut Vec<String>) {
    let map = match value.as_object() {
        Some(map) => map,
        None => return,
    };
    for (key, child) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}/{}", prefix, key)
        };
        if child.as_str() == Some("file") {
            let lower = key.to_lowercase();
            if !(lower.ends_with(".css") || lower.ends_with(".js") || lower.ends_with(".map")) {
                out.push(path);
            }
        } else if child.is_object() {
            flatten_structure(child, path, out);
        }
    }
}
