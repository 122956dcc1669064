//! Sled-backed document store.

use crate::error::StorageError;
use crate::store::{DocumentStore, SessionRecord, DOCUMENT_KEY, SESSION_KEY};
use crate::tree::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Durable store over a sled database. Values are serialized as JSON under
/// fixed keys; each write flushes before returning so the next read observes
/// it even across processes.
pub struct SledDocumentStore {
    db: sled::Db,
}

impl SledDocumentStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(SledDocumentStore { db })
    }

    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.db.get(key)? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|source| {
                    StorageError::Decode {
                        key: key.to_string(),
                        source,
                    }
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value).map_err(StorageError::Encode)?;
        self.db.insert(key, bytes)?;
        self.db.flush()?;
        Ok(())
    }
}

impl DocumentStore for SledDocumentStore {
    fn load_document(&self) -> Result<Option<Document>, StorageError> {
        self.get(DOCUMENT_KEY)
    }

    fn save_document(&self, document: &Document) -> Result<(), StorageError> {
        self.put(DOCUMENT_KEY, document)
    }

    fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        self.get(SESSION_KEY)
    }

    fn save_session(&self, session: &SessionRecord) -> Result<(), StorageError> {
        self.put(SESSION_KEY, session)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.db.remove(DOCUMENT_KEY)?;
        self.db.remove(SESSION_KEY)?;
        self.db.flush()?;
        Ok(())
    }
}
