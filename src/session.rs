//! Edit Session
//!
//! Coordinates the working Document between analysis and migration: applies
//! tree edits, persists after every mutation (fire-and-forget), tracks
//! whether the structure diverged from the analysis result, and submits to
//! the migrator on explicit save. The tree model stays pure; this is the
//! single owner of document state.

use crate::error::ApiError;
use crate::migrator::{self, AnalysisOutcome, MigratorApi, Recommendation};
use crate::store::{DocumentStore, SessionRecord};
use crate::tree::{Document, FileRecord, MigrationComplexity, NodeKind, Path};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single user edit, addressed by raw document paths.
#[derive(Debug, Clone)]
pub enum SessionEdit {
    AddFile {
        parent: Path,
        name: String,
        seed: Option<FileRecord>,
    },
    AddFolder {
        parent: Path,
        name: String,
    },
    Delete {
        path: Path,
    },
    SetField {
        path: Path,
        field: FileField,
    },
    /// Write a backend recommendation into a file's description and type.
    ApplyRecommendation {
        path: Path,
        recommendation: Recommendation,
    },
}

/// Editable fields of a File node.
#[derive(Debug, Clone)]
pub enum FileField {
    Description(String),
    Namespace(String),
    FileType(String),
    SourceFiles(Vec<String>),
    Dependencies(Vec<String>),
    Complexity(MigrationComplexity),
}

/// The session state machine: a saved Document plus an optional working copy
/// while an edit pass is open.
pub struct EditSession {
    store: Arc<dyn DocumentStore>,
    record: SessionRecord,
    saved: Document,
    working: Option<Document>,
}

impl EditSession {
    /// Start a session from a fresh analysis result and persist it.
    pub fn from_analysis(
        outcome: AnalysisOutcome,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, ApiError> {
        let record = SessionRecord::new(
            outcome.project_id,
            if outcome.analysis_results.is_null() {
                None
            } else {
                Some(outcome.analysis_results)
            },
        );
        let session = EditSession {
            store,
            record,
            saved: outcome.target_structure,
            working: None,
        };
        session.store.save_document(&session.saved)?;
        session.store.save_session(&session.record)?;
        info!(project_id = %session.record.project_id, "analysis session started");
        Ok(session)
    }

    /// Restore the persisted session, if any.
    pub fn restore(store: Arc<dyn DocumentStore>) -> Result<Option<Self>, ApiError> {
        let record = match store.load_session()? {
            Some(record) => record,
            None => return Ok(None),
        };
        let saved = store.load_document()?.unwrap_or_default();
        Ok(Some(EditSession {
            store,
            record,
            saved,
            working: None,
        }))
    }

    pub fn project_id(&self) -> &str {
        &self.record.project_id
    }

    pub fn changes(&self) -> bool {
        self.record.changes
    }

    /// The Document edits and rendering operate on: the working copy while
    /// an edit pass is open, the saved Document otherwise.
    pub fn document(&self) -> &Document {
        self.working.as_ref().unwrap_or(&self.saved)
    }

    /// Open an edit pass over a copy of the saved Document. Idempotent.
    pub fn begin_edit(&mut self) {
        if self.working.is_none() {
            self.working = Some(self.saved.clone());
        }
    }

    /// Drop the working copy, discarding unsaved edits.
    pub fn cancel_edit(&mut self) {
        self.working = None;
    }

    /// Apply one edit to the current Document. A no-op edit (blank name,
    /// missing target) leaves the `changes` flag alone. The result is
    /// persisted fire-and-forget: a store failure is logged, never fatal.
    pub fn apply(&mut self, edit: SessionEdit) -> Result<(), ApiError> {
        let current = self.document();
        let updated = match edit {
            SessionEdit::AddFile { parent, name, seed } => {
                current.add_node(&parent, &name, NodeKind::File, seed)?
            }
            SessionEdit::AddFolder { parent, name } => {
                current.add_node(&parent, &name, NodeKind::Folder, None)?
            }
            SessionEdit::Delete { path } => current.delete_node(&path)?,
            SessionEdit::SetField { path, field } => current.update_file(&path, |record| {
                apply_field(record, field);
            })?,
            SessionEdit::ApplyRecommendation {
                path,
                recommendation,
            } => current.update_file(&path, |record| {
                record.description = recommendation.description;
                record.file_type = recommendation.file_type;
            })?,
        };

        if &updated != self.document() {
            self.record.changes = true;
        }
        match self.working {
            Some(ref mut working) => *working = updated,
            None => self.saved = updated,
        }
        self.persist_quietly();
        Ok(())
    }

    /// Submit the Document to the migrator and return the archive bytes.
    /// An open edit pass is committed first.
    pub async fn save(&mut self, migrator: &dyn MigratorApi) -> Result<Vec<u8>, ApiError> {
        if let Some(working) = self.working.take() {
            self.saved = working;
        }
        self.persist_quietly();
        debug!(project_id = %self.record.project_id, changes = self.record.changes, "submitting structure");
        migrator
            .migrate(&self.record.project_id, &self.saved, self.record.changes)
            .await
    }

    /// Selectable source files from the stored analysis report.
    pub fn source_candidates(&self) -> Vec<String> {
        self.record
            .analysis_results
            .as_ref()
            .map(migrator::source_file_candidates)
            .unwrap_or_default()
    }

    pub fn analysis_results(&self) -> Option<&serde_json::Value> {
        self.record.analysis_results.as_ref()
    }

    fn persist_quietly(&mut self) {
        self.record.updated_at = Utc::now();
        if let Err(err) = self.store.save_document(self.document()) {
            warn!(error = %err, "failed to persist document");
        }
        if let Err(err) = self.store.save_session(&self.record) {
            warn!(error = %err, "failed to persist session");
        }
    }
}

fn apply_field(record: &mut FileRecord, field: FileField) {
    match field {
        FileField::Description(value) => record.description = value,
        FileField::Namespace(value) => record.namespace = value,
        FileField::FileType(value) => record.file_type = value,
        FileField::SourceFiles(value) => record.source_files = value,
        FileField::Dependencies(value) => record.dependencies = Some(value),
        FileField::Complexity(value) => record.migration_complexity = Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use crate::tree::testdata;
    use serde_json::json;

    fn outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            project_id: "proj-1".to_string(),
            target_structure: testdata::sample(),
            analysis_results: json!({"structure": {"legacy.html": "file"}}),
        }
    }

    fn session() -> (EditSession, Arc<MemoryDocumentStore>) {
        let store = Arc::new(MemoryDocumentStore::new());
        let session = EditSession::from_analysis(outcome(), store.clone()).unwrap();
        (session, store)
    }

    fn path(segments: &[&str]) -> Path {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_analysis_persists_document_and_session() {
        let (_, store) = session();
        assert_eq!(store.load_document().unwrap(), Some(testdata::sample()));
        let record = store.load_session().unwrap().unwrap();
        assert_eq!(record.project_id, "proj-1");
        assert!(!record.changes);
    }

    #[test]
    fn test_apply_sets_changes_and_persists() {
        let (mut session, store) = session();
        session
            .apply(SessionEdit::AddFolder {
                parent: path(&["folders", "src"]),
                name: "components".to_string(),
            })
            .unwrap();
        assert!(session.changes());
        let stored = store.load_document().unwrap().unwrap();
        assert!(stored
            .resolve(&path(&["folders", "src", "folders", "components"]))
            .is_some());
        assert!(store.load_session().unwrap().unwrap().changes);
    }

    #[test]
    fn test_blank_add_leaves_changes_untouched() {
        let (mut session, _) = session();
        session
            .apply(SessionEdit::AddFile {
                parent: path(&["folders", "src"]),
                name: "   ".to_string(),
                seed: None,
            })
            .unwrap();
        assert!(!session.changes());
        assert_eq!(session.document(), &testdata::sample());
    }

    #[test]
    fn test_cancel_edit_discards_working_copy() {
        let (mut session, _) = session();
        session.begin_edit();
        session
            .apply(SessionEdit::Delete {
                path: path(&["folders", "src"]),
            })
            .unwrap();
        assert!(session
            .document()
            .resolve(&path(&["folders", "src"]))
            .is_none());

        session.cancel_edit();
        assert_eq!(session.document(), &testdata::sample());
    }

    #[test]
    fn test_set_field_edits_the_file_record() {
        let (mut session, _) = session();
        let target = path(&["folders", "src", "files", "App.jsx"]);
        session
            .apply(SessionEdit::SetField {
                path: target.clone(),
                field: FileField::Dependencies(vec!["react".to_string()]),
            })
            .unwrap();
        let record = session.document().file_at(&target).unwrap();
        assert_eq!(record.dependencies.as_deref(), Some(["react".to_string()].as_slice()));
    }

    #[test]
    fn test_apply_recommendation() {
        let (mut session, _) = session();
        let target = path(&["folders", "src", "files", "App.jsx"]);
        session
            .apply(SessionEdit::ApplyRecommendation {
                path: target.clone(),
                recommendation: Recommendation {
                    description: "Entry component".to_string(),
                    file_type: "component".to_string(),
                },
            })
            .unwrap();
        let record = session.document().file_at(&target).unwrap();
        assert_eq!(record.description, "Entry component");
        assert_eq!(record.file_type, "component");
    }

    #[test]
    fn test_restore_round_trip() {
        let (mut session, store) = session();
        session
            .apply(SessionEdit::Delete {
                path: path(&["root", "package.json"]),
            })
            .unwrap();

        let restored = EditSession::restore(store).unwrap().unwrap();
        assert_eq!(restored.project_id(), "proj-1");
        assert!(restored.changes());
        assert!(restored
            .document()
            .resolve(&path(&["root", "package.json"]))
            .is_none());
    }

    #[test]
    fn test_restore_empty_store_is_none() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
        assert!(EditSession::restore(store).unwrap().is_none());
    }

    #[test]
    fn test_source_candidates_come_from_analysis_report() {
        let (session, _) = session();
        assert_eq!(session.source_candidates(), vec!["legacy.html"]);
    }

    #[test]
    fn test_invalid_path_edit_propagates() {
        let (mut session, _) = session();
        let result = session.apply(SessionEdit::AddFile {
            parent: path(&["root", "package.json", "files"]),
            name: "x.js".to_string(),
            seed: None,
        });
        assert!(result.is_err());
        // Document unchanged after the failed edit.
        assert_eq!(session.document(), &testdata::sample());
    }
}
