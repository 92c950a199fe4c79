//! `quill structure` — Print a document's outline without calling a provider.

use std::path::Path;
use std::sync::Arc;

use quill_core::event::EventBus;
use quill_document::{InMemoryDocumentStore, MutationEngine};

pub fn run(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;
    println!("{}", report(file, text, json)?);
    Ok(())
}

/// Run the `get_document_structure` tool against `text`.
fn report(file: &Path, text: String, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    let store = Arc::new(InMemoryDocumentStore::with_text(
        file.display().to_string(),
        text,
    ));
    let engine = MutationEngine::new(store, Arc::new(EventBus::new(1)));
    let result = quill_tools::read::structure(&engine)?;

    if json {
        let data = result.data.unwrap_or_default();
        return Ok(serde_json::to_string_pretty(&data)?);
    }
    Ok(format!("{}\n{}", file.display(), result.output))
}
