//! # Quill Core
//!
//! Domain types, ports, and error definitions for the Quill document agent.
//! This crate has no framework dependencies beyond serde and tokio's sync
//! primitives. It defines the model every other crate builds against.
//!
//! ## Ports
//!
//! The pieces Quill does not own are traits here:
//! - [`Provider`] is the reasoning service
//! - [`DocumentStore`] owns the open document
//! - [`ChangeNotifier`] receives one event per committed document state
//!
//! Implementations live in their own crates, and tests swap in stubs.

pub mod document;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use document::{ChangeNotifier, Document, DocumentChange, DocumentId, DocumentStore};
pub use error::{Error, Result};
pub use event::{DomainEvent, EventBus};
pub use message::{Conversation, ConversationId, Message, MessageToolCall, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
