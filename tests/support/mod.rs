//! Shared test support: a scripted migrator backend.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use remold::error::ApiError;
use remold::migrator::{AnalysisOutcome, MigratorApi, Recommendation};
use remold::tree::Document;
use serde_json::{json, Value};

/// One recorded `migrate` call.
#[derive(Debug, Clone)]
pub struct MigrateCall {
    pub project_id: String,
    pub target_structure: Value,
    pub changes: bool,
}

/// Scripted backend: returns canned responses and records migrate calls.
pub struct MockMigrator {
    pub outcome: AnalysisOutcome,
    pub archive: Vec<u8>,
    pub migrate_calls: Mutex<Vec<MigrateCall>>,
}

impl MockMigrator {
    pub fn new() -> Self {
        MockMigrator {
            outcome: AnalysisOutcome {
                project_id: "proj-42".to_string(),
                target_structure: sample_structure(),
                analysis_results: json!({
                    "structure": {
                        "app": {"main.html": "file", "app.js": "file"},
                        "index.html": "file"
                    },
                    "summary": {
                        "total_files": 3,
                        "analyzed_files": 3,
                        "migration_ready": 2,
                        "needs_attention": 1
                    }
                }),
            },
            archive: b"PK\x03\x04 not a real zip".to_vec(),
            migrate_calls: Mutex::new(Vec::new()),
        }
    }
}

pub fn sample_structure() -> Document {
    Document::from_value(json!({
        "root": {
            "package.json": {
                "description": "Project dependencies and scripts",
                "namespace": "root",
                "file_type": "json",
                "source_files": ["package.json"]
            }
        },
        "folders": {
            "src": {
                "files": {
                    "App.jsx": {
                        "description": "Main application component",
                        "namespace": "components",
                        "file_type": "jsx",
                        "source_files": ["app.js"]
                    }
                },
                "folders": {}
            }
        }
    }))
}

#[async_trait]
impl MigratorApi for MockMigrator {
    async fn analyze_repo(&self, _repo_url: &str) -> Result<AnalysisOutcome, ApiError> {
        Ok(self.outcome.clone())
    }

    async fn analyze_archive(
        &self,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<AnalysisOutcome, ApiError> {
        Ok(self.outcome.clone())
    }

    async fn migrate(
        &self,
        project_id: &str,
        target_structure: &Document,
        changes: bool,
    ) -> Result<Vec<u8>, ApiError> {
        self.migrate_calls.lock().push(MigrateCall {
            project_id: project_id.to_string(),
            target_structure: target_structure.as_value().clone(),
            changes,
        });
        Ok(self.archive.clone())
    }

    async fn migrate_repo(&self, _repo_url: &str) -> Result<Vec<u8>, ApiError> {
        Ok(self.archive.clone())
    }

    async fn migrate_archive(
        &self,
        _file_name: &str,
        _bytes: Vec<u8>,
    ) -> Result<Vec<u8>, ApiError> {
        Ok(self.archive.clone())
    }

    async fn recommend(&self, file_name: &str) -> Result<Recommendation, ApiError> {
        Ok(Recommendation {
            description: format!("Generated description for {}", file_name),
            file_type: "component".to_string(),
        })
    }

    async fn convert_snippet(
        &self,
        source_code: &str,
        file_types: &[String],
    ) -> Result<String, ApiError> {
        Ok(format!(
            "// converted ({})\n{}",
            file_types.join(","),
            source_code
        ))
    }
}
