//! Edit operations and their pure application to a [`Lines`] value.
//!
//! `apply` validates before it touches anything: on error the lines are
//! left exactly as they were. Writes addressed past the end of the document
//! pad it with empty lines first, so inserting at line 10 of a 3-line
//! document is not an error, up to [`MAX_PADDING_LINES`] past the end.
//! Deletes and substring replacement require the line to exist.

use crate::error::DocumentError;
use crate::lines::{Lines, byte_offset, char_len};

/// How many empty lines a single write may add past the end of the document.
pub const MAX_PADDING_LINES: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Append `text` after the document's trimmed content and one blank line.
    Append { text: String },
    ReplaceLine { line: usize, text: String },
    InsertBefore { line: usize, text: String },
    InsertAfter { line: usize, text: String },
    AppendToLine { line: usize, text: String },
    DeleteLine { line: usize },
    DeleteRange { start: usize, end: usize },
    /// Replace the first literal occurrence of `old_text` in the line.
    ReplaceSubstringInLine {
        line: usize,
        old_text: String,
        new_text: String,
    },
    /// Insert `text` before character `position` (0-based).
    InsertAtPosition {
        line: usize,
        position: usize,
        text: String,
    },
}

impl EditOperation {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Append { .. } => "append",
            Self::ReplaceLine { .. } => "replace_line",
            Self::InsertBefore { .. } => "insert_before",
            Self::InsertAfter { .. } => "insert_after",
            Self::AppendToLine { .. } => "append_to_line",
            Self::DeleteLine { .. } => "delete_line",
            Self::DeleteRange { .. } => "delete_range",
            Self::ReplaceSubstringInLine { .. } => "replace_substring",
            Self::InsertAtPosition { .. } => "insert_at_position",
        }
    }

    /// The text this operation writes, if it writes any. Only these
    /// operations are applied incrementally.
    pub fn inserted_text(&self) -> Option<&str> {
        match self {
            Self::Append { text }
            | Self::ReplaceLine { text, .. }
            | Self::InsertBefore { text, .. }
            | Self::InsertAfter { text, .. }
            | Self::AppendToLine { text, .. }
            | Self::InsertAtPosition { text, .. } => Some(text.as_str()),
            Self::ReplaceSubstringInLine { new_text, .. } => Some(new_text.as_str()),
            Self::DeleteLine { .. } | Self::DeleteRange { .. } => None,
        }
    }

    /// The same operation writing `partial` instead of its own text.
    pub fn with_inserted_text(&self, partial: &str) -> Self {
        let mut op = self.clone();
        match &mut op {
            Self::Append { text }
            | Self::ReplaceLine { text, .. }
            | Self::InsertBefore { text, .. }
            | Self::InsertAfter { text, .. }
            | Self::AppendToLine { text, .. }
            | Self::InsertAtPosition { text, .. } => *text = partial.to_string(),
            Self::ReplaceSubstringInLine { new_text, .. } => *new_text = partial.to_string(),
            Self::DeleteLine { .. } | Self::DeleteRange { .. } => {}
        }
        op
    }

    /// Apply to `lines` in place. On error `lines` is unchanged.
    pub fn apply(&self, lines: &mut Lines) -> Result<(), DocumentError> {
        match self {
            Self::Append { text } => {
                let base = lines.join();
                *lines = Lines::parse(&format!("{}\n\n{}", base.trim_end(), text));
            }
            Self::ReplaceLine { line, text } => {
                let target = padded_line(lines, *line)?;
                *target = text.clone();
            }
            Self::InsertBefore { line, text } => {
                require_reachable(lines, *line)?;
                lines.pad_to(line - 1);
                lines.insert(*line, text);
            }
            Self::InsertAfter { line, text } => {
                require_reachable(lines, *line)?;
                lines.pad_to(*line);
                lines.insert(line + 1, text);
            }
            Self::AppendToLine { line, text } => {
                let target = padded_line(lines, *line)?;
                target.push_str(text);
            }
            Self::DeleteLine { line } => {
                existing_line(lines, *line)?;
                lines.remove_range(*line, *line);
            }
            Self::DeleteRange { start, end } => {
                require_positive(*start)?;
                if end < start {
                    return Err(DocumentError::InvalidLineRange {
                        start: *start,
                        end: *end,
                    });
                }
                existing_line(lines, *end)?;
                lines.remove_range(*start, *end);
            }
            Self::ReplaceSubstringInLine {
                line,
                old_text,
                new_text,
            } => {
                if old_text.is_empty() {
                    return Err(DocumentError::EmptySearchText);
                }
                let current = existing_line(lines, *line)?;
                let Some(at) = current.find(old_text.as_str()) else {
                    return Err(DocumentError::TextNotFound {
                        line: *line,
                        text: old_text.clone(),
                    });
                };
                let replaced = format!(
                    "{}{}{}",
                    &current[..at],
                    new_text,
                    &current[at + old_text.len()..]
                );
                if let Some(target) = lines.line_mut(*line) {
                    *target = replaced;
                }
            }
            Self::InsertAtPosition {
                line,
                position,
                text,
            } => {
                require_positive(*line)?;
                let current = lines.get(*line).unwrap_or("");
                let at = byte_offset(current, *position).ok_or(
                    DocumentError::PositionOutOfRange {
                        line: *line,
                        position: *position,
                        length: char_len(current),
                    },
                )?;
                let target = padded_line(lines, *line)?;
                target.insert_str(at, text);
            }
        }
        Ok(())
    }
}

fn require_positive(line: usize) -> Result<(), DocumentError> {
    if line == 0 {
        return Err(DocumentError::InvalidLineNumber { line: 0 });
    }
    Ok(())
}

/// `line` is positive and within padding distance of the end.
fn require_reachable(lines: &Lines, line: usize) -> Result<(), DocumentError> {
    require_positive(line)?;
    let limit = lines.count().saturating_add(MAX_PADDING_LINES);
    if line > limit {
        return Err(DocumentError::LineTooFarPastEnd {
            line,
            line_count: lines.count(),
            limit,
        });
    }
    Ok(())
}

fn existing_line(lines: &Lines, line: usize) -> Result<&str, DocumentError> {
    require_positive(line)?;
    lines.get(line).ok_or(DocumentError::LineOutOfRange {
        line,
        line_count: lines.count(),
    })
}

fn padded_line(lines: &mut Lines, line: usize) -> Result<&mut String, DocumentError> {
    require_reachable(lines, line)?;
    lines.pad_to(line);
    lines.line_mut(line).ok_or(DocumentError::InvalidLineNumber { line: line as i64 })
}

/// Prefixes of `text` ending at the end of each whitespace-delimited word.
///
/// Every prefix is a literal slice of `text`, so it never splits a word.
/// The last prefix ends at the last word; trailing whitespace is not
/// included.
pub fn word_prefixes(text: &str) -> Vec<&str> {
    let mut ends = Vec::new();
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_word {
                ends.push(i);
            }
            in_word = false;
        } else {
            in_word = true;
        }
    }
    if in_word {
        ends.push(text.len());
    }
    ends.into_iter().map(|end| &text[..end]).collect()
}
