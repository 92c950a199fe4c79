//! Domain event system — decoupled notification of document and agent activity.
//!
//! Document commits, tool executions, and chat outcomes are published here.
//! A UI (or the CLI's debug logger) subscribes and reacts without the
//! producers knowing who is listening.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::document::{ChangeNotifier, DocumentChange};

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A new document state was committed
    DocumentChanged(DocumentChange),

    /// The reasoning service produced a message
    ResponseGenerated {
        conversation_id: String,
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The tool-calling round cap was hit and the conversation was reset
    RecursionLimitReached {
        conversation_id: String,
        rounds: u32,
        timestamp: DateTime<Utc>,
    },

    /// A chat request completed
    ChatResponse {
        request_id: String,
        content: String,
    },

    /// A chat request failed
    ChatError {
        request_id: String,
        error: String,
    },

    /// An error occurred
    ErrorOccurred {
        context: String,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
/// Components can subscribe to receive all events and filter for what they care about.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // Ignore send errors (no subscribers = that's fine)
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl ChangeNotifier for EventBus {
    fn publish_change(&self, change: DocumentChange) {
        self.publish(DomainEvent::DocumentChanged(change));
    }
}
