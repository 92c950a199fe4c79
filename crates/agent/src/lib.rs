//! The conversation loop at the heart of Quill.
//!
//! The orchestrator alternates between two stages:
//!
//! 1. **Agent**: send the whole history plus the tool schemas to the
//!    reasoning service and append its reply
//! 2. **Tools**: run every tool call in that reply, in order, and append
//!    one result message per call
//!
//! It stops when a reply carries no tool calls, or falls back and resets
//! the conversation when the tool-round cap is exceeded.

pub mod chat;
pub mod orchestrator;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use chat::{ChatReply, ChatService};
pub use orchestrator::{AgentStep, LoopState, Orchestrator, RECURSION_FALLBACK};
pub use prompt::system_prompt;
