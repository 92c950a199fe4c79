//! `quill chat` — Edit a document through the assistant.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quill_agent::{ChatService, Orchestrator};
use quill_config::AppConfig;
use quill_core::document::DocumentStore;
use quill_core::error::ProviderError;
use quill_core::event::{DomainEvent, EventBus};
use quill_document::{InMemoryDocumentStore, IntervalPacer, MutationEngine};
use quill_providers::{build_from_config, model_for};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info};

pub async fn run(
    file: PathBuf,
    message: Option<String>,
    save: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if !config.has_api_key() && config.default_provider != "ollama" {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set QUILL_API_KEY or OPENAI_API_KEY, or add api_key to:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let text = read_document(&file)?;
    let store = Arc::new(InMemoryDocumentStore::with_text(
        file.display().to_string(),
        text,
    ));
    let event_bus = Arc::new(EventBus::new(config.events.capacity));
    let logger = spawn_event_logger(event_bus.subscribe());

    let engine = Arc::new(
        MutationEngine::new(store.clone(), event_bus.clone())
            .with_streaming(config.editor.streaming)
            .with_pacer(Arc::new(IntervalPacer::from_millis(
                config.editor.pacing_delay_ms,
            ))),
    );
    let tools = Arc::new(quill_tools::default_registry(engine.clone()));

    let router = build_from_config(&config);
    let provider = router
        .default_provider()
        .ok_or_else(|| ProviderError::NotConfigured(config.default_provider.clone()))?;
    let model = model_for(&config, &config.default_provider);

    let mut orchestrator = Orchestrator::new(provider, &model, tools, event_bus.clone())
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens)
        .with_max_tool_iterations(config.agent.max_tool_iterations);
    if let Some(prompt) = &config.agent.system_prompt_override {
        orchestrator = orchestrator.with_system_prompt(prompt.clone());
    }
    let chat = ChatService::new(orchestrator, engine, event_bus);

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = chat.send_message(&msg, None).await;
        eprint!("\r              \r");
        println!("{}", reply?.content);
    } else {
        interactive(&chat, &config, &model, &file).await?;
    }

    if save {
        save_if_dirty(&store, &file)?;
    }
    logger.abort();
    Ok(())
}

async fn interactive(
    chat: &ChatService,
    config: &AppConfig,
    model: &str,
    file: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("  Quill — Interactive Mode");
    println!();
    println!("  Document:  {}", file.display());
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {model}");
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type '/reset' to start over, 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        match input {
            "" => continue,
            "exit" | "quit" => break,
            "/reset" => {
                chat.reset_conversation().await;
                println!("  Conversation cleared.");
                println!();
                continue;
            }
            _ => {}
        }

        eprint!("  ...");
        match chat.send_message(input, None).await {
            Ok(reply) => {
                eprint!("\r     \r");
                println!();
                for line in reply.content.lines() {
                    println!("  Assistant > {line}");
                }
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    Ok(())
}

/// A missing file opens as an empty document.
fn read_document(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if !path.exists() {
        info!("{} does not exist, starting with an empty document", path.display());
        return Ok(String::new());
    }
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()).into())
}

fn save_if_dirty(store: &InMemoryDocumentStore, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let Some(doc) = store.current() else {
        return Ok(());
    };
    if !doc.dirty {
        info!("No changes to save");
        return Ok(());
    }
    std::fs::write(path, &doc.text)
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
    store.mark_saved();
    info!(words = doc.word_count, "Saved {}", path.display());
    Ok(())
}

/// Log document commits and tool runs until the bus closes.
fn spawn_event_logger(
    mut events: broadcast::Receiver<Arc<DomainEvent>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match event.as_ref() {
                    DomainEvent::DocumentChanged(change) => {
                        debug!(
                            document_id = %change.id,
                            chars = change.text.chars().count(),
                            "Document changed"
                        );
                    }
                    DomainEvent::ToolExecuted {
                        tool_name,
                        success,
                        duration_ms,
                        ..
                    } => {
                        debug!(tool = %tool_name, success, duration_ms, "Tool executed");
                    }
                    _ => {}
                },
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event logger lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}
