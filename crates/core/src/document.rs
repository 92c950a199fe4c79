//! The open document and the two ports the mutation engine writes through.
//!
//! The document itself is owned by a [`DocumentStore`]. Quill reads a
//! snapshot at the start of each operation, builds new text from it, and
//! commits the result back one step at a time. After every commit a
//! [`DocumentChange`] goes to the [`ChangeNotifier`] so a live view can
//! refresh.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A snapshot of the open document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,

    /// Full markdown text. Lines are separated by `\n`.
    pub text: String,

    /// Whitespace-delimited word count of `text`.
    pub word_count: usize,

    /// Whether the text has changed since it was last saved.
    pub dirty: bool,
}

impl Document {
    /// A clean document with its word count derived from `text`.
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id,
            word_count: word_count(&text),
            text,
            dirty: false,
        }
    }
}

/// Count whitespace-delimited words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The store that owns the open document.
///
/// The mutation engine calls the three commit methods once per commit step,
/// in the order text, word count, dirty flag.
pub trait DocumentStore: Send + Sync {
    /// The currently open document, or `None` when nothing is open.
    fn current(&self) -> Option<Document>;

    fn commit_text(&self, id: &DocumentId, text: &str);

    fn commit_word_count(&self, id: &DocumentId, count: usize);

    fn commit_dirty(&self, id: &DocumentId, dirty: bool);
}

/// Payload published after every committed document state.
///
/// `cursor` and `history` are always `None` and `render_cursor` is always
/// false: edits made by the agent never move the user's cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChange {
    pub id: DocumentId,
    pub text: String,
    pub cursor: Option<serde_json::Value>,
    pub render_cursor: bool,
    pub history: Option<serde_json::Value>,
}

impl DocumentChange {
    pub fn new(id: DocumentId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            cursor: None,
            render_cursor: false,
            history: None,
        }
    }
}

/// Receives one notification per committed document state.
pub trait ChangeNotifier: Send + Sync {
    fn publish_change(&self, change: DocumentChange);
}
