//! Validation and lookup failures for document reads and edits.
//!
//! The display strings are written for the model: tools return them as
//! result text so the next reasoning turn can correct the call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("No document is currently open.")]
    NoDocument,

    #[error("Invalid line number {line}. Line numbers start at 1.")]
    InvalidLineNumber { line: i64 },

    #[error("Line {line} does not exist. The document has {line_count} lines.")]
    LineOutOfRange { line: usize, line_count: usize },

    #[error(
        "Line {line} is too far past the end. The document has {line_count} lines, so the last line you can write is {limit}."
    )]
    LineTooFarPastEnd {
        line: usize,
        line_count: usize,
        limit: usize,
    },

    #[error("Invalid range: end line {end} is before start line {start}.")]
    InvalidLineRange { start: usize, end: usize },

    #[error("Invalid position {position}. Positions start at 0.")]
    InvalidPosition { position: i64 },

    #[error("Position {position} does not exist in line {line}. The line has {length} characters.")]
    PositionOutOfRange {
        line: usize,
        position: usize,
        length: usize,
    },

    #[error("Invalid range: end position {end} is before start position {start}.")]
    InvalidPositionRange { start: usize, end: usize },

    #[error("Text \"{text}\" was not found in line {line}.")]
    TextNotFound { line: usize, text: String },

    #[error("The text to search for must not be empty.")]
    EmptySearchText,

    #[error("No matches found for \"{term}\".")]
    NoMatches { term: String },

    #[error("Invalid paragraph number {number}. Paragraph numbers start at 1.")]
    InvalidParagraphNumber { number: i64 },

    #[error("Paragraph {number} does not exist. The document has {paragraph_count} paragraphs.")]
    ParagraphOutOfRange {
        number: usize,
        paragraph_count: usize,
    },
}

impl DocumentError {
    /// True for the "addressed thing is missing" family, as opposed to a
    /// malformed argument.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoDocument
                | Self::TextNotFound { .. }
                | Self::NoMatches { .. }
                | Self::ParagraphOutOfRange { .. }
        )
    }
}

/// Convert a model-supplied line number into a validated 1-based index.
pub fn line_number(raw: i64) -> Result<usize, DocumentError> {
    if raw < 1 {
        return Err(DocumentError::InvalidLineNumber { line: raw });
    }
    usize::try_from(raw).map_err(|_| DocumentError::InvalidLineNumber { line: raw })
}

/// Convert a model-supplied character position into a validated 0-based index.
pub fn position(raw: i64) -> Result<usize, DocumentError> {
    usize::try_from(raw).map_err(|_| DocumentError::InvalidPosition { position: raw })
}
