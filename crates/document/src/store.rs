//! In-memory document store — used by the CLI and in tests.

use std::sync::{PoisonError, RwLock};

use quill_core::document::{Document, DocumentId, DocumentStore};

/// Holds at most one open document behind a lock.
///
/// Commits addressed to a document other than the open one are ignored.
pub struct InMemoryDocumentStore {
    current: RwLock<Option<Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    /// A store with `text` already open under `id`.
    pub fn with_text(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        let store = Self::new();
        store.open(Document::new(id.into(), text));
        store
    }

    /// Open `document`, replacing whatever was open.
    pub fn open(&self, document: Document) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(document);
    }

    /// Close the open document and return its final state.
    pub fn close(&self) -> Option<Document> {
        self.current.write().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Clear the dirty flag, e.g. after the caller persisted the text.
    pub fn mark_saved(&self) {
        if let Some(doc) = self.current.write().unwrap_or_else(PoisonError::into_inner).as_mut() {
            doc.dirty = false;
        }
    }

    fn update(&self, id: &DocumentId, f: impl FnOnce(&mut Document)) {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(doc) if &doc.id == id => f(doc),
            _ => tracing::warn!(document_id = %id, "Commit for a document that is not open"),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn current(&self) -> Option<Document> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn commit_text(&self, id: &DocumentId, text: &str) {
        self.update(id, |doc| doc.text = text.to_string());
    }

    fn commit_word_count(&self, id: &DocumentId, count: usize) {
        self.update(id, |doc| doc.word_count = count);
    }

    fn commit_dirty(&self, id: &DocumentId, dirty: bool) {
        self.update(id, |doc| doc.dirty = dirty);
    }
}
