//! End-to-end integration tests for Quill.
//!
//! These tests wire the real store, event bus, mutation engine, tool
//! registry, orchestrator and chat service together, with a scripted
//! provider standing in for the reasoning service.

use std::sync::Arc;
use std::time::Duration;

use quill_agent::{ChatService, Orchestrator, RECURSION_FALLBACK};
use quill_config::AppConfig;
use quill_core::document::DocumentStore;
use quill_core::error::{Error, ProviderError};
use quill_core::event::{DomainEvent, EventBus};
use quill_core::message::{Message, MessageToolCall, Role};
use quill_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use quill_document::{InMemoryDocumentStore, IntervalPacer, MutationEngine};
use quill_tools::default_registry;
use tokio::sync::broadcast;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted responses in sequence.
///
/// An empty script means "always ask for `repeat`".
struct ScriptedProvider {
    responses: std::sync::Mutex<Vec<ProviderResponse>>,
    repeat: Option<MessageToolCall>,
    requests: std::sync::Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<ProviderResponse>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            repeat: None,
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn looping(call: MessageToolCall) -> Self {
        Self {
            repeat: Some(call),
            ..Self::new(Vec::new())
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> ProviderRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let count = requests.len();
        requests.push(request);

        if let Some(call) = &self.repeat {
            return Ok(tool_response(vec![call.clone()], ""));
        }
        let responses = self.responses.lock().unwrap();
        if count >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                count,
                responses.len()
            );
        }
        Ok(responses[count].clone())
    }
}

struct DownProvider;

#[async_trait::async_trait]
impl Provider for DownProvider {
    fn name(&self) -> &str {
        "down"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

fn usage() -> Option<Usage> {
    Some(Usage {
        prompt_tokens: 10,
        completion_tokens: 5,
        total_tokens: 15,
    })
}

fn text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: usage(),
        model: "mock".into(),
    }
}

fn tool_response(tool_calls: Vec<MessageToolCall>, thought: &str) -> ProviderResponse {
    let mut msg = Message::assistant(thought);
    msg.tool_calls = tool_calls;
    ProviderResponse {
        message: msg,
        usage: usage(),
        model: "mock".into(),
    }
}

fn make_tool_call(name: &str, args: serde_json::Value) -> MessageToolCall {
    MessageToolCall {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments: serde_json::to_string(&args).unwrap(),
    }
}

// ── Wiring ───────────────────────────────────────────────────────────────

struct Stack {
    store: Arc<InMemoryDocumentStore>,
    events: broadcast::Receiver<Arc<DomainEvent>>,
    chat: ChatService,
}

/// Wire a full stack the way `quill chat` does, from `config`.
fn stack(text: &str, provider: Arc<dyn Provider>, config: &AppConfig) -> Stack {
    let store = Arc::new(InMemoryDocumentStore::with_text("notes.md", text));
    let event_bus = Arc::new(EventBus::new(config.events.capacity));
    let events = event_bus.subscribe();

    let engine = Arc::new(
        MutationEngine::new(store.clone(), event_bus.clone())
            .with_streaming(config.editor.streaming)
            .with_pacer(Arc::new(IntervalPacer::from_millis(
                config.editor.pacing_delay_ms,
            ))),
    );
    let tools = Arc::new(default_registry(engine.clone()));
    let orchestrator = Orchestrator::new(provider, &config.default_model, tools, event_bus.clone())
        .with_temperature(config.default_temperature)
        .with_max_tool_iterations(config.agent.max_tool_iterations);

    Stack {
        store,
        events,
        chat: ChatService::new(orchestrator, engine, event_bus),
    }
}

fn drain(events: &mut broadcast::Receiver<Arc<DomainEvent>>) -> Vec<Arc<DomainEvent>> {
    std::iter::from_fn(|| events.try_recv().ok()).collect()
}

fn document_texts(events: &[Arc<DomainEvent>]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e.as_ref() {
            DomainEvent::DocumentChanged(change) => Some(change.text.clone()),
            _ => None,
        })
        .collect()
}

fn instant_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.editor.pacing_delay_ms = 0;
    config
}

// ── E2E: Read then write ─────────────────────────────────────────────────

#[tokio::test]
async fn e2e_read_headings_then_append_streams_into_the_store() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(vec![make_tool_call("get_headings", serde_json::json!({}))], ""),
        tool_response(
            vec![make_tool_call(
                "append_to_document",
                serde_json::json!({"text": "- eggs and bread"}),
            )],
            "",
        ),
        text_response("Added eggs and bread to the list."),
    ]));
    let mut s = stack("# Groceries\n\n- milk", provider.clone(), &instant_config());

    let reply = s.chat.send_message("add eggs and bread", None).await.unwrap();
    assert_eq!(reply.content, "Added eggs and bread to the list.");

    let final_text = "# Groceries\n\n- milk\n\n- eggs and bread";
    let doc = s.store.current().unwrap();
    assert_eq!(doc.text, final_text);
    assert_eq!(doc.word_count, 8);
    assert!(doc.dirty);

    let events = drain(&mut s.events);
    let texts = document_texts(&events);
    assert_eq!(texts.len(), 4);
    assert_eq!(texts.last().map(String::as_str), Some(final_text));
    for step in &texts {
        assert!(final_text.starts_with(step.as_str()));
    }

    // The heading lookup reached the model before the write.
    let second = provider.request(1);
    let headings = second
        .messages
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    assert_eq!(headings.content, "# Groceries (line 1)");

    let tool_runs = events
        .iter()
        .filter(|e| matches!(e.as_ref(), DomainEvent::ToolExecuted { success: true, .. }))
        .count();
    assert_eq!(tool_runs, 2);
    assert!(events
        .iter()
        .any(|e| matches!(e.as_ref(), DomainEvent::ChatResponse { .. })));
}

#[tokio::test]
async fn e2e_delete_line_commits_once() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(
            vec![make_tool_call("delete_line", serde_json::json!({"lineNumber": 2}))],
            "",
        ),
        text_response("Removed line 2."),
    ]));
    let mut s = stack("Line1\nLine2\nLine3", provider, &instant_config());

    s.chat.send_message("delete the second line", None).await.unwrap();

    assert_eq!(s.store.current().unwrap().text, "Line1\nLine3");
    assert_eq!(document_texts(&drain(&mut s.events)), vec!["Line1\nLine3"]);
}

#[tokio::test]
async fn e2e_bad_arguments_are_reported_back_and_corrected() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(
            vec![make_tool_call(
                "get_line_content",
                serde_json::json!({"lineNumber": 10}),
            )],
            "",
        ),
        tool_response(
            vec![make_tool_call("get_line_content", serde_json::json!({"lineNumber": 2}))],
            "",
        ),
        text_response("Line 2 says beta."),
    ]));
    let mut s = stack("alpha\nbeta", provider.clone(), &instant_config());

    let reply = s.chat.send_message("what is on line 10?", None).await.unwrap();
    assert_eq!(reply.content, "Line 2 says beta.");

    let results: Vec<String> = provider
        .request(2)
        .messages
        .iter()
        .filter(|m| m.role == Role::Tool)
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(
        results,
        vec![
            "Line 10 does not exist. The document has 2 lines.".to_string(),
            "beta".to_string(),
        ]
    );
    assert!(document_texts(&drain(&mut s.events)).is_empty());
}

// ── E2E: Limits and failures ─────────────────────────────────────────────

#[tokio::test]
async fn e2e_runaway_tool_loop_falls_back_after_configured_rounds() {
    let config = instant_config();
    assert_eq!(config.agent.max_tool_iterations, 15);

    let provider = Arc::new(ScriptedProvider::looping(make_tool_call(
        "get_line_content",
        serde_json::json!({"lineNumber": 1}),
    )));
    let mut s = stack("only line", provider.clone(), &config);

    let reply = s.chat.send_message("keep reading", None).await.unwrap();
    assert_eq!(reply.content, RECURSION_FALLBACK);
    assert_eq!(provider.calls(), 16);
    assert_eq!(s.chat.message_count().await, 1);

    let events = drain(&mut s.events);
    assert!(events.iter().any(|e| matches!(
        e.as_ref(),
        DomainEvent::RecursionLimitReached { rounds: 15, .. }
    )));
    assert_eq!(s.store.current().unwrap().text, "only line");
}

#[tokio::test]
async fn e2e_provider_failure_surfaces_and_is_published() {
    let mut s = stack("text", Arc::new(DownProvider), &instant_config());

    let err = s
        .chat
        .send_message("hello", Some("req-42".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider(ProviderError::Network(_))));

    let events = drain(&mut s.events);
    assert!(events.iter().any(|e| matches!(
        e.as_ref(),
        DomainEvent::ChatError { request_id, .. } if request_id == "req-42"
    )));
    // System + the user message that failed
    assert_eq!(s.chat.message_count().await, 2);
}

// ── E2E: Pacing ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn e2e_streaming_append_is_paced_per_word() {
    let mut config = AppConfig::default();
    config.editor.pacing_delay_ms = 50;

    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(
            vec![make_tool_call(
                "append_to_document",
                serde_json::json!({"text": "one two three four five"}),
            )],
            "",
        ),
        text_response("Done."),
    ]));
    let mut s = stack("", provider, &config);

    let start = tokio::time::Instant::now();
    s.chat.send_message("count to five", None).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(200));
    assert_eq!(document_texts(&drain(&mut s.events)).len(), 5);
}

#[tokio::test]
async fn e2e_streaming_disabled_commits_once() {
    let mut config = instant_config();
    config.editor.streaming = false;

    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_response(
            vec![make_tool_call(
                "append_to_document",
                serde_json::json!({"text": "several words at once"}),
            )],
            "",
        ),
        text_response("Done."),
    ]));
    let mut s = stack("# Title", provider, &config);

    s.chat.send_message("append", None).await.unwrap();
    assert_eq!(
        document_texts(&drain(&mut s.events)),
        vec!["# Title\n\nseveral words at once"]
    );
}
