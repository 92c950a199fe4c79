//! The mutation engine — the single writer for the open document.
//!
//! Every edit follows the same path: read the store's snapshot, split it
//! into lines, apply the [`EditOperation`] to a copy, rejoin, then commit
//! text, word count, and dirty flag and publish one [`DocumentChange`].
//!
//! With streaming enabled, operations that write text are committed once per
//! growing word prefix of that text. Each step re-applies the operation to
//! the original lines, so every intermediate commit is complete document
//! text, and the final step is exactly the one-shot result. Consecutive
//! commits are separated by one [`Pacer::tick`].

use std::sync::Arc;

use quill_core::document::{
    ChangeNotifier, Document, DocumentChange, DocumentStore, word_count,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::edit::{EditOperation, word_prefixes};
use crate::error::DocumentError;
use crate::lines::Lines;
use crate::pacer::{ImmediatePacer, Pacer};

/// What an applied edit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Final committed text.
    pub text: String,
    pub line_count: usize,
    pub word_count: usize,
    /// Number of commits (and notifications) issued.
    pub commits: usize,
}

pub struct MutationEngine {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn ChangeNotifier>,
    pacer: Arc<dyn Pacer>,
    streaming: bool,
    /// Held for a whole apply so two commit streams never interleave.
    writer: Mutex<()>,
}

impl MutationEngine {
    /// An engine that streams text edits with no delay between commits.
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self {
            store,
            notifier,
            pacer: Arc::new(ImmediatePacer),
            streaming: true,
            writer: Mutex::new(()),
        }
    }

    pub fn with_pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    /// Enable or disable word-by-word commits.
    pub fn with_streaming(mut self, enabled: bool) -> Self {
        self.streaming = enabled;
        self
    }

    /// The store's current document.
    pub fn snapshot(&self) -> Result<Document, DocumentError> {
        self.store.current().ok_or(DocumentError::NoDocument)
    }

    /// The current document as lines.
    pub fn lines(&self) -> Result<Lines, DocumentError> {
        self.snapshot().map(|doc| Lines::parse(&doc.text))
    }

    /// Validate and apply `op`, streaming it when it writes text.
    ///
    /// On error nothing is committed.
    pub async fn apply(&self, op: &EditOperation) -> Result<EditOutcome, DocumentError> {
        let _writer = self.writer.lock().await;

        let base = self.snapshot()?;
        let base_lines = Lines::parse(&base.text);

        let mut final_lines = base_lines.clone();
        op.apply(&mut final_lines)?;
        let final_text = final_lines.join();

        let prefixes = match op.inserted_text() {
            Some(text) if self.streaming => word_prefixes(text),
            _ => Vec::new(),
        };

        let mut commits = 0;
        // The last prefix is covered by the final commit of the full text.
        for prefix in prefixes.iter().take(prefixes.len().saturating_sub(1)) {
            let mut step = base_lines.clone();
            op.with_inserted_text(prefix).apply(&mut step)?;
            self.commit(&base, &step.join());
            commits += 1;
            self.pacer.tick().await;
        }

        self.commit(&base, &final_text);
        commits += 1;

        debug!(
            document_id = %base.id,
            op = op.kind(),
            commits,
            "Applied edit"
        );

        Ok(EditOutcome {
            line_count: final_lines.count(),
            word_count: word_count(&final_text),
            text: final_text,
            commits,
        })
    }

    fn commit(&self, base: &Document, text: &str) {
        let id = &base.id;
        self.store.commit_text(id, text);
        self.store.commit_word_count(id, word_count(text));
        self.store.commit_dirty(id, base.dirty || text != base.text);
        self.notifier.publish_change(DocumentChange::new(id.clone(), text));
    }
}
