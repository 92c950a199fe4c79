//! # Quill Document
//!
//! The line-addressed view of the open document and the engine that
//! mutates it.
//!
//! - [`Lines`] — split/join of document text into 1-based lines
//! - [`EditOperation`] — pure, validated edits over [`Lines`]
//! - [`outline`] — headings, paragraphs, search, and structure statistics
//! - [`MutationEngine`] — commits edits to a `DocumentStore`, word by word
//! - [`InMemoryDocumentStore`] — the store used by the CLI and tests

pub mod edit;
pub mod engine;
pub mod error;
pub mod lines;
pub mod outline;
pub mod pacer;
pub mod store;

pub use edit::{EditOperation, word_prefixes};
pub use engine::{EditOutcome, MutationEngine};
pub use error::DocumentError;
pub use lines::Lines;
pub use outline::{DocumentStructure, Heading, Paragraph};
pub use pacer::{ImmediatePacer, IntervalPacer, Pacer};
pub use store::InMemoryDocumentStore;
