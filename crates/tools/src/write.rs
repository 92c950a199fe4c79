//! Write tools. Each one builds an [`EditOperation`] and hands it to the
//! mutation engine; the result text reports what changed.

use quill_core::tool::ToolResult;
use quill_document::error::{line_number, position};
use quill_document::{DocumentError, EditOperation, EditOutcome, MutationEngine};
use serde_json::json;

use crate::args::{LineArgs, LineRangeArgs, LineTextArgs, PositionTextArgs, ReplaceTextArgs, TextArgs};

pub async fn append_to_document(
    engine: &MutationEngine,
    args: &TextArgs,
) -> Result<ToolResult, DocumentError> {
    let op = EditOperation::Append {
        text: args.text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report("Text appended to the document.".into(), &outcome))
}

pub async fn replace_line(
    engine: &MutationEngine,
    args: &LineTextArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let op = EditOperation::ReplaceLine {
        line,
        text: args.text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report(format!("Replaced line {line}."), &outcome))
}

pub async fn insert_line_before(
    engine: &MutationEngine,
    args: &LineTextArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let op = EditOperation::InsertBefore {
        line,
        text: args.text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report(
        format!("Inserted a new line before line {line}. The new text is line {line}."),
        &outcome,
    ))
}

pub async fn insert_line_after(
    engine: &MutationEngine,
    args: &LineTextArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let op = EditOperation::InsertAfter {
        line,
        text: args.text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report(
        format!(
            "Inserted a new line after line {line}. The new text is line {}.",
            line + 1
        ),
        &outcome,
    ))
}

pub async fn append_to_line(
    engine: &MutationEngine,
    args: &LineTextArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let op = EditOperation::AppendToLine {
        line,
        text: args.text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report(format!("Appended text to line {line}."), &outcome))
}

pub async fn delete_line(
    engine: &MutationEngine,
    args: &LineArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let outcome = engine.apply(&EditOperation::DeleteLine { line }).await?;
    Ok(report(format!("Deleted line {line}."), &outcome))
}

pub async fn delete_in_range(
    engine: &MutationEngine,
    args: &LineRangeArgs,
) -> Result<ToolResult, DocumentError> {
    let start = line_number(args.start_line)?;
    let end = line_number(args.end_line)?;
    let outcome = engine.apply(&EditOperation::DeleteRange { start, end }).await?;
    let removed = end - start + 1;
    let noun = if removed == 1 { "line" } else { "lines" };
    Ok(report(
        format!("Deleted lines {start}-{end} ({removed} {noun})."),
        &outcome,
    ))
}

pub async fn replace_text_in_line(
    engine: &MutationEngine,
    args: &ReplaceTextArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let op = EditOperation::ReplaceSubstringInLine {
        line,
        old_text: args.old_text.clone(),
        new_text: args.new_text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report(
        format!(
            "Replaced \"{}\" with \"{}\" in line {line}.",
            args.old_text, args.new_text
        ),
        &outcome,
    ))
}

pub async fn insert_text_at_position(
    engine: &MutationEngine,
    args: &PositionTextArgs,
) -> Result<ToolResult, DocumentError> {
    let line = line_number(args.line_number)?;
    let at = position(args.position)?;
    let op = EditOperation::InsertAtPosition {
        line,
        position: at,
        text: args.text.clone(),
    };
    let outcome = engine.apply(&op).await?;
    Ok(report(
        format!("Inserted text at position {at} in line {line}."),
        &outcome,
    ))
}

fn report(summary: String, outcome: &EditOutcome) -> ToolResult {
    let noun = if outcome.line_count == 1 { "line" } else { "lines" };
    ToolResult::ok(format!(
        "{summary} The document now has {} {noun}.",
        outcome.line_count
    ))
    .with_data(json!({
        "commits": outcome.commits,
        "lineCount": outcome.line_count,
        "wordCount": outcome.word_count,
    }))
}
