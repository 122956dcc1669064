//! Document Store
//!
//! Durable key-value persistence for the working Document and the session
//! envelope. The tree model never touches storage; the edit session writes
//! through this port after every mutation.

pub mod persistence;

use crate::error::StorageError;
use crate::tree::Document;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed key the working Document is stored under.
pub const DOCUMENT_KEY: &str = "edited_structure";

/// Fixed key for the session envelope.
pub const SESSION_KEY: &str = "session";

/// Session state persisted alongside the Document: which backend project the
/// Document belongs to, whether it diverged from the analysis result, and the
/// raw analysis report for source-file lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub project_id: String,
    /// True once any edit has been applied; submitted with the migration
    /// request so the backend re-plans around user changes.
    #[serde(default)]
    pub changes: bool,
    #[serde(default)]
    pub analysis_results: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(project_id: String, analysis_results: Option<Value>) -> Self {
        SessionRecord {
            project_id,
            changes: false,
            analysis_results,
            updated_at: Utc::now(),
        }
    }
}

/// Document store interface.
pub trait DocumentStore: Send + Sync {
    fn load_document(&self) -> Result<Option<Document>, StorageError>;
    fn save_document(&self, document: &Document) -> Result<(), StorageError>;
    fn load_session(&self) -> Result<Option<SessionRecord>, StorageError>;
    fn save_session(&self, session: &SessionRecord) -> Result<(), StorageError>;
    /// Drop both the Document and the session envelope.
    fn clear(&self) -> Result<(), StorageError>;
}

#[derive(Default)]
struct MemoryInner {
    document: Option<Document>,
    session: Option<SessionRecord>,
}

/// In-memory store, used by tests and as a fallback when no durable path is
/// configured.
#[derive(Default)]
pub struct MemoryDocumentStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load_document(&self) -> Result<Option<Document>, StorageError> {
        Ok(self.inner.read().document.clone())
    }

    fn save_document(&self, document: &Document) -> Result<(), StorageError> {
        self.inner.write().document = Some(document.clone());
        Ok(())
    }

    fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        Ok(self.inner.read().session.clone())
    }

    fn save_session(&self, session: &SessionRecord) -> Result<(), StorageError> {
        self.inner.write().session = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut inner = self.inner.write();
        inner.document = None;
        inner.session = None;
        Ok(())
    }
}
