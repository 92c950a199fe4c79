//! Document tools for Quill.
//!
//! The assistant reads and edits the open document only through these
//! tools. Each tool is a [`ToolKind`] variant wrapped in a [`DocumentTool`]
//! and registered by name in the core `ToolRegistry`.
//!
//! Tool failures never escape as errors once the arguments have parsed:
//! bounds violations and missing targets come back as a failed
//! [`ToolResult`] whose text the model can read and correct on its next
//! turn.

pub mod args;
pub mod kind;
pub mod read;
pub mod write;

use std::sync::Arc;

use async_trait::async_trait;
use quill_core::error::ToolError;
use quill_core::tool::{Tool, ToolRegistry, ToolResult};
use quill_document::{DocumentError, MutationEngine};
use tracing::debug;

pub use args::{ArgumentError, ToolInvocation};
pub use kind::ToolKind;

/// One document tool bound to the engine it reads and writes through.
pub struct DocumentTool {
    kind: ToolKind,
    engine: Arc<MutationEngine>,
}

impl DocumentTool {
    pub fn new(kind: ToolKind, engine: Arc<MutationEngine>) -> Self {
        Self { kind, engine }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolResult, DocumentError> {
        let engine = self.engine.as_ref();
        match invocation {
            ToolInvocation::GetEntireDocumentContent => read::entire_document(engine),
            ToolInvocation::GetLineContent(a) => read::line_content(engine, a),
            ToolInvocation::GetLineRange(a) => read::line_range(engine, a),
            ToolInvocation::SearchForText(a) => read::search(engine, a),
            ToolInvocation::GetHeadings(a) => read::headings(engine, a),
            ToolInvocation::GetParagraph(a) => read::paragraph(engine, a),
            ToolInvocation::GetDocumentStructure => read::structure(engine),
            ToolInvocation::GetTextRange(a) => read::text_range(engine, a),
            ToolInvocation::AppendToDocument(a) => write::append_to_document(engine, a).await,
            ToolInvocation::ReplaceLine(a) => write::replace_line(engine, a).await,
            ToolInvocation::InsertLineBefore(a) => write::insert_line_before(engine, a).await,
            ToolInvocation::InsertLineAfter(a) => write::insert_line_after(engine, a).await,
            ToolInvocation::AppendToLine(a) => write::append_to_line(engine, a).await,
            ToolInvocation::DeleteLine(a) => write::delete_line(engine, a).await,
            ToolInvocation::DeleteInRange(a) => write::delete_in_range(engine, a).await,
            ToolInvocation::ReplaceTextInLine(a) => write::replace_text_in_line(engine, a).await,
            ToolInvocation::InsertTextAtPosition(a) => {
                write::insert_text_at_position(engine, a).await
            }
        }
    }
}

#[async_trait]
impl Tool for DocumentTool {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn description(&self) -> &str {
        self.kind.description()
    }

    fn parameters_schema(&self) -> serde_json::Value {
        self.kind.parameters_schema()
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let invocation = ToolInvocation::parse(self.kind, arguments)?;
        if let Err(e) = invocation.validate() {
            return Ok(ToolResult::failed(e.to_string()));
        }

        let result = match self.run(&invocation).await {
            Ok(result) => result,
            Err(e) => {
                debug!(tool = self.kind.name(), error = %e, "Document tool rejected call");
                ToolResult::failed(e.to_string())
            }
        };
        Ok(result)
    }
}

/// A registry holding every document tool, bound to `engine`.
pub fn default_registry(engine: Arc<MutationEngine>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for kind in ToolKind::ALL {
        registry.register(Box::new(DocumentTool::new(kind, engine.clone())));
    }
    registry
}
