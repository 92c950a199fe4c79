//! The Agent/Tools loop that drives one conversation.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use quill_core::error::{ProviderError, Result};
use quill_core::event::{DomainEvent, EventBus};
use quill_core::message::{Conversation, Message, MessageToolCall};
use quill_core::provider::{Provider, ProviderRequest, ToolDefinition};
use quill_core::tool::{ToolCall, ToolRegistry};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::prompt::system_prompt;

/// Returned to the user when a request needs more tool rounds than allowed.
pub const RECURSION_FALLBACK: &str = "I apologize, but I encountered an issue while processing your request. \
The task may have been too complex or required too many steps. \
Please try breaking your request into smaller, more specific tasks.";

/// Where the loop is between stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Ask the reasoning service for the next message.
    Agent,
    /// Run the tool calls on the latest message.
    Tools,
    /// The latest message is the final reply.
    End,
}

/// Outcome of one Agent stage.
#[derive(Debug)]
pub enum AgentStep {
    /// The service replied; the message may carry tool calls.
    Reply(Message),
    /// The service asked for another tool round after the cap was spent.
    RecursionLimit,
    /// The service call itself failed.
    ServiceError(ProviderError),
}

/// Alternates between the reasoning service and the tool registry for one
/// conversation.
pub struct Orchestrator {
    /// The reasoning service
    provider: Arc<dyn Provider>,

    /// The model to request
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Max tokens per response
    max_tokens: Option<u32>,

    /// Tool registry
    tools: Arc<ToolRegistry>,

    /// Tool rounds allowed per `invoke`
    max_tool_iterations: u32,

    /// Event bus for domain events
    event_bus: Arc<EventBus>,

    /// System message plus every turn since the last reset
    conversation: Conversation,
}

impl Orchestrator {
    /// Create an orchestrator whose system prompt lists the registry's tools.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let prompt = system_prompt(&tools.definitions());
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            tools,
            max_tool_iterations: 15,
            event_bus,
            conversation: Conversation::with_system(prompt),
        }
    }

    /// Replace the system prompt. Starts a fresh conversation.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.conversation = Conversation::with_system(prompt);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set how many tool rounds one `invoke` may run.
    pub fn with_max_tool_iterations(mut self, max: u32) -> Self {
        self.max_tool_iterations = max;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Drop everything but the system message.
    pub fn reset_conversation(&mut self) {
        self.conversation.reset();
        debug!(conversation_id = %self.conversation.id, "Conversation reset");
    }

    /// Run one user turn to completion and return the assistant's reply.
    ///
    /// Tool failures are fed back to the model as result text. Only a
    /// failing reasoning service surfaces here, as `Error::Provider`; the
    /// history then keeps the user message but none of this turn's rounds.
    pub async fn invoke(&mut self, user_text: &str) -> Result<String> {
        let span = info_span!("invoke", conversation_id = %self.conversation.id);
        self.run(user_text).instrument(span).await
    }

    async fn run(&mut self, user_text: &str) -> Result<String> {
        self.conversation.push(Message::user(user_text));
        let checkpoint = self.conversation.messages.len();
        let definitions = self.tools.definitions();

        let mut state = LoopState::Agent;
        let mut rounds: u32 = 0;
        loop {
            state = match state {
                LoopState::Agent => match self.agent_step(&definitions, rounds).await {
                    AgentStep::Reply(message) => {
                        let next = if message.has_tool_calls() {
                            LoopState::Tools
                        } else {
                            LoopState::End
                        };
                        self.conversation.push(message);
                        next
                    }
                    AgentStep::RecursionLimit => return Ok(self.recover_from_limit(rounds)),
                    AgentStep::ServiceError(e) => {
                        self.conversation.messages.truncate(checkpoint);
                        self.event_bus.publish(DomainEvent::ErrorOccurred {
                            context: "reasoning service".into(),
                            error_message: e.to_string(),
                            timestamp: Utc::now(),
                        });
                        return Err(e.into());
                    }
                },
                LoopState::Tools => {
                    rounds += 1;
                    self.tools_step(rounds).await;
                    LoopState::Agent
                }
                LoopState::End => break,
            };
        }

        info!(rounds, "Turn complete");
        Ok(self
            .conversation
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default())
    }

    /// Ask the reasoning service for the next message.
    async fn agent_step(&self, definitions: &[ToolDefinition], rounds: u32) -> AgentStep {
        debug!(
            iteration = rounds,
            messages = self.conversation.messages.len(),
            "Calling reasoning service"
        );

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: self.conversation.messages.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: definitions.to_vec(),
        };

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(provider = self.provider.name(), error = %e, "Reasoning service call failed");
                return AgentStep::ServiceError(e);
            }
        };

        if let Some(usage) = &response.usage {
            self.event_bus.publish(DomainEvent::ResponseGenerated {
                conversation_id: self.conversation.id.to_string(),
                model: response.model.clone(),
                tokens_used: usage.total_tokens,
                timestamp: Utc::now(),
            });
        }

        if response.message.has_tool_calls() && rounds >= self.max_tool_iterations {
            return AgentStep::RecursionLimit;
        }
        AgentStep::Reply(response.message)
    }

    /// Run every tool call on the latest message, in order.
    async fn tools_step(&mut self, iteration: u32) {
        let calls = match self.conversation.last() {
            Some(message) => message.tool_calls.clone(),
            None => return,
        };
        debug!(iteration, tool_count = calls.len(), "Executing tool calls");

        for tc in &calls {
            let output = self.run_tool(tc).await;
            self.conversation
                .push(Message::tool_result(&tc.id, &tc.name, output));
        }
    }

    /// Execute one call and return the text the model will see.
    async fn run_tool(&self, tc: &MessageToolCall) -> String {
        let start = Instant::now();
        let (success, output) = match parse_arguments(&tc.arguments) {
            Err(e) => {
                warn!(tool = %tc.name, error = %e, "Tool arguments are not valid JSON");
                (false, format!("Error: invalid JSON arguments for {}: {e}", tc.name))
            }
            Ok(arguments) => {
                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tc.name.clone(),
                    arguments,
                };
                match self.tools.execute(&call).await {
                    Ok(result) => (result.success, result.output),
                    Err(e) => {
                        warn!(tool = %tc.name, error = %e, "Tool execution failed");
                        (false, format!("Error: {e}"))
                    }
                }
            }
        };
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(tool = %tc.name, success, duration_ms, "Tool finished");
        self.event_bus.publish(DomainEvent::ToolExecuted {
            tool_name: tc.name.clone(),
            success,
            duration_ms,
            timestamp: Utc::now(),
        });
        output
    }

    fn recover_from_limit(&mut self, rounds: u32) -> String {
        warn!(
            rounds,
            max = self.max_tool_iterations,
            "Tool round limit reached, resetting conversation"
        );
        self.event_bus.publish(DomainEvent::RecursionLimitReached {
            conversation_id: self.conversation.id.to_string(),
            rounds,
            timestamp: Utc::now(),
        });
        self.conversation.reset();
        RECURSION_FALLBACK.to_string()
    }
}

/// Blank argument strings mean "no arguments".
fn parse_arguments(raw: &str) -> serde_json::Result<serde_json::Value> {
    if raw.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str(raw)
}
