//! Read tools. None of these touch the store beyond reading the current
//! snapshot, and every call re-derives what it reports from that snapshot.

use quill_core::document::word_count;
use quill_core::tool::ToolResult;
use quill_document::error::{line_number, position};
use quill_document::lines::{char_len, char_slice};
use quill_document::{DocumentError, Lines, MutationEngine, outline};

use crate::args::{
    HeadingsArgs, LineArgs, LineRangeArgs, ParagraphArgs, SearchArgs, TextRangeArgs,
};

pub fn entire_document(engine: &MutationEngine) -> Result<ToolResult, DocumentError> {
    let doc = engine.snapshot()?;
    Ok(ToolResult::ok(doc.text))
}

pub fn line_content(engine: &MutationEngine, args: &LineArgs) -> Result<ToolResult, DocumentError> {
    let lines = engine.lines()?;
    let number = existing(&lines, args.line_number)?;
    let text = lines.get(number).unwrap_or_default();
    Ok(ToolResult::ok(text))
}

pub fn line_range(
    engine: &MutationEngine,
    args: &LineRangeArgs,
) -> Result<ToolResult, DocumentError> {
    let lines = engine.lines()?;
    let start = existing(&lines, args.start_line)?;
    let end = line_number(args.end_line)?;
    if end < start {
        return Err(DocumentError::InvalidLineRange { start, end });
    }
    existing(&lines, args.end_line)?;

    let body = lines
        .range(start, end)
        .map(|(number, text)| format!("{number}: {text}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(ToolResult::ok(body))
}

pub fn search(engine: &MutationEngine, args: &SearchArgs) -> Result<ToolResult, DocumentError> {
    let lines = engine.lines()?;
    let matches = outline::find_lines(&lines, &args.search_term);
    if matches.is_empty() {
        return Err(DocumentError::NoMatches {
            term: args.search_term.clone(),
        });
    }

    let context = usize::try_from(args.context_lines).unwrap_or(0);
    let blocks: Vec<String> = matches
        .iter()
        .map(|&hit| {
            let from = hit.saturating_sub(context).max(1);
            let to = (hit + context).min(lines.count());
            lines
                .range(from, to)
                .map(|(number, text)| {
                    let marker = if number == hit { ">" } else { " " };
                    if args.include_line_numbers {
                        format!("{marker} {number}: {text}")
                    } else {
                        format!("{marker} {text}")
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();

    let noun = if matches.len() == 1 { "match" } else { "matches" };
    let output = format!(
        "Found {} {noun} for \"{}\":\n\n{}",
        matches.len(),
        args.search_term,
        blocks.join("\n---\n")
    );
    Ok(ToolResult::ok(output).with_data(serde_json::json!({ "lines": matches })))
}

pub fn headings(engine: &MutationEngine, args: &HeadingsArgs) -> Result<ToolResult, DocumentError> {
    let lines = engine.lines()?;
    let max_level = u8::try_from(args.max_level).unwrap_or(6);
    let found = outline::headings(&lines, max_level);
    if found.is_empty() {
        return Ok(ToolResult::ok("No headings found in the document."));
    }

    let listing = found
        .iter()
        .map(|h| {
            let indent = "  ".repeat(usize::from(h.level.saturating_sub(1)));
            format!("{indent}{} {} (line {})", "#".repeat(usize::from(h.level)), h.text, h.line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    let data = serde_json::to_value(&found).unwrap_or_default();
    Ok(ToolResult::ok(listing).with_data(data))
}

pub fn paragraph(engine: &MutationEngine, args: &ParagraphArgs) -> Result<ToolResult, DocumentError> {
    if args.paragraph_number < 1 {
        return Err(DocumentError::InvalidParagraphNumber {
            number: args.paragraph_number,
        });
    }
    let lines = engine.lines()?;
    let paragraphs = outline::paragraphs(&lines);
    let number = usize::try_from(args.paragraph_number).unwrap_or(usize::MAX);
    let Some(para) = paragraphs.get(number - 1) else {
        return Err(DocumentError::ParagraphOutOfRange {
            number,
            paragraph_count: paragraphs.len(),
        });
    };

    let span = if para.start_line == para.end_line {
        format!("line {}", para.start_line)
    } else {
        format!("lines {}-{}", para.start_line, para.end_line)
    };
    Ok(ToolResult::ok(format!("Paragraph {} ({span}):\n{}", para.number, para.text)))
}

pub fn structure(engine: &MutationEngine) -> Result<ToolResult, DocumentError> {
    let doc = engine.snapshot()?;
    let lines = Lines::parse(&doc.text);
    let report = outline::structure(&lines, word_count(&doc.text));
    let data = serde_json::to_value(&report).unwrap_or_default();
    Ok(ToolResult::ok(render_structure(&report)).with_data(data))
}

/// Human-readable form of a structure report.
pub fn render_structure(report: &outline::DocumentStructure) -> String {
    let mut out = format!(
        "Lines: {}\nWords: {}\nParagraphs: {}\nCode blocks: {}\nList items: {}\n",
        report.line_count,
        report.word_count,
        report.paragraph_count,
        report.code_block_count,
        report.list_item_count,
    );
    if report.headings.is_empty() {
        out.push_str("Headings: none");
    } else {
        out.push_str("Headings:");
        for h in &report.headings {
            let indent = "  ".repeat(usize::from(h.level));
            out.push_str(&format!("\n{indent}{} (line {})", h.text, h.line));
        }
    }
    out
}

pub fn text_range(engine: &MutationEngine, args: &TextRangeArgs) -> Result<ToolResult, DocumentError> {
    let lines = engine.lines()?;
    let number = existing(&lines, args.line_number)?;
    let start = position(args.start_position)?;
    let end = position(args.end_position)?;
    if end < start {
        return Err(DocumentError::InvalidPositionRange { start, end });
    }

    let text = lines.get(number).unwrap_or_default();
    let length = char_len(text);
    let slice = char_slice(text, start, end).ok_or(DocumentError::PositionOutOfRange {
        line: number,
        position: end,
        length,
    })?;
    Ok(ToolResult::ok(slice))
}

/// Validate a raw line number and require the line to exist.
fn existing(lines: &Lines, raw: i64) -> Result<usize, DocumentError> {
    let number = line_number(raw)?;
    if number > lines.count() {
        return Err(DocumentError::LineOutOfRange {
            line: number,
            line_count: lines.count(),
        });
    }
    Ok(number)
}
