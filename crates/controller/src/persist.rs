//! Document persistence seam. Saves are fire-and-forget from the
//! controller's point of view; failures are logged, never surfaced.

use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    Unavailable,
    Rejected(String),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Unavailable => write!(f, "document store unavailable"),
            PersistError::Rejected(msg) => write!(f, "save rejected: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {}

/// Stores document payloads keyed by document id.
pub trait DocumentStore {
    fn save(&mut self, doc_id: &str, payload: &str) -> Result<(), PersistError>;
    fn load(&mut self, doc_id: &str) -> Result<Option<String>, PersistError>;
}

/// In-memory store. Records every save so callers can count them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub documents: HashMap<String, String>,
    pub save_count: usize,
    pub fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc_id: &str, payload: &str) -> Self {
        let mut store = Self::default();
        store.documents.insert(doc_id.to_string(), payload.to_string());
        store
    }

    pub fn document(&self, doc_id: &str) -> Option<&str> {
        self.documents.get(doc_id).map(String::as_str)
    }
}

impl DocumentStore for MemoryStore {
    fn save(&mut self, doc_id: &str, payload: &str) -> Result<(), PersistError> {
        if self.fail {
            return Err(PersistError::Unavailable);
        }
        self.documents.insert(doc_id.to_string(), payload.to_string());
        self.save_count += 1;
        Ok(())
    }

    fn load(&mut self, doc_id: &str) -> Result<Option<String>, PersistError> {
        if self.fail {
            return Err(PersistError::Unavailable);
        }
        Ok(self.documents.get(doc_id).cloned())
    }
}
