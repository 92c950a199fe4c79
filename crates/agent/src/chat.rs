//! Request-level front door to the orchestrator.
//!
//! Callers may share one `ChatService` across tasks; requests are queued on
//! an internal mutex so only one `invoke` runs against the document at a
//! time. Every request gets an id, and its outcome is published on the
//! event bus under that id.

use std::sync::Arc;

use quill_core::error::Result;
use quill_core::event::{DomainEvent, EventBus};
use quill_document::MutationEngine;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::orchestrator::Orchestrator;

/// A completed chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub request_id: String,
    pub content: String,
}

pub struct ChatService {
    orchestrator: Mutex<Orchestrator>,
    engine: Arc<MutationEngine>,
    event_bus: Arc<EventBus>,
}

impl ChatService {
    pub fn new(
        orchestrator: Orchestrator,
        engine: Arc<MutationEngine>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            orchestrator: Mutex::new(orchestrator),
            engine,
            event_bus,
        }
    }

    /// Send one user message and wait for the assistant's reply.
    ///
    /// `request_id` defaults to a fresh `chat_<uuid>` id.
    pub async fn send_message(&self, text: &str, request_id: Option<String>) -> Result<ChatReply> {
        let request_id = request_id.unwrap_or_else(new_request_id);
        let mut orchestrator = self.orchestrator.lock().await;

        match orchestrator.invoke(text).await {
            Ok(content) => {
                info!(request_id = %request_id, "Chat request completed");
                self.event_bus.publish(DomainEvent::ChatResponse {
                    request_id: request_id.clone(),
                    content: content.clone(),
                });
                Ok(ChatReply {
                    request_id,
                    content,
                })
            }
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Chat request failed");
                self.event_bus.publish(DomainEvent::ChatError {
                    request_id,
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub async fn reset_conversation(&self) {
        self.orchestrator.lock().await.reset_conversation();
    }

    /// Number of messages in the history, system prompt included.
    pub async fn message_count(&self) -> usize {
        self.orchestrator.lock().await.conversation().messages.len()
    }

    /// The open document's text, or a placeholder when nothing is open.
    pub fn document_context(&self) -> String {
        match self.engine.snapshot() {
            Ok(doc) => doc.text,
            Err(_) => "No document is currently open".to_string(),
        }
    }
}

fn new_request_id() -> String {
    format!("chat_{}", Uuid::new_v4().simple())
}
