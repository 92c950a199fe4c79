//! Typed tool arguments.
//!
//! Arguments arrive as a JSON object from the model. They are first
//! deserialized into the variant's argument struct (which applies defaults
//! and rejects missing or mistyped fields), then checked against the
//! schema's bounds. Numbers are taken as `i64` so that a negative line
//! number reaches the document layer and comes back as a readable bounds
//! error instead of a deserialization failure.

use quill_core::error::ToolError;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::kind::ToolKind;

pub const MAX_CONTEXT_LINES: i64 = 10;
pub const MAX_HEADING_LEVEL: i64 = 6;

/// A schema constraint the arguments violate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("{field} must be between {min} and {max}, got {value}.")]
    OutOfBounds {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },

    #[error("{field} must not be empty.")]
    Empty { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineArgs {
    pub line_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRangeArgs {
    pub start_line: i64,
    pub end_line: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchArgs {
    pub search_term: String,
    #[serde(default = "default_true")]
    pub include_line_numbers: bool,
    #[serde(default = "default_context_lines")]
    pub context_lines: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingsArgs {
    #[serde(default = "default_max_level")]
    pub max_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphArgs {
    pub paragraph_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRangeArgs {
    pub line_number: i64,
    pub start_position: i64,
    pub end_position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TextArgs {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineTextArgs {
    pub line_number: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTextArgs {
    pub line_number: i64,
    pub old_text: String,
    pub new_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionTextArgs {
    pub line_number: i64,
    pub position: i64,
    pub text: String,
}

fn default_true() -> bool {
    true
}

fn default_context_lines() -> i64 {
    2
}

fn default_max_level() -> i64 {
    MAX_HEADING_LEVEL
}

/// A tool call with its arguments parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    GetEntireDocumentContent,
    GetLineContent(LineArgs),
    GetLineRange(LineRangeArgs),
    SearchForText(SearchArgs),
    GetHeadings(HeadingsArgs),
    GetParagraph(ParagraphArgs),
    GetDocumentStructure,
    GetTextRange(TextRangeArgs),
    AppendToDocument(TextArgs),
    ReplaceLine(LineTextArgs),
    InsertLineBefore(LineTextArgs),
    InsertLineAfter(LineTextArgs),
    AppendToLine(LineTextArgs),
    DeleteLine(LineArgs),
    DeleteInRange(LineRangeArgs),
    ReplaceTextInLine(ReplaceTextArgs),
    InsertTextAtPosition(PositionTextArgs),
}

impl ToolInvocation {
    /// Deserialize `arguments` for `kind`. `null` counts as an empty object.
    pub fn parse(kind: ToolKind, arguments: Value) -> Result<Self, ToolError> {
        let args = if arguments.is_null() {
            Value::Object(Default::default())
        } else {
            arguments
        };

        Ok(match kind {
            ToolKind::GetEntireDocumentContent => Self::GetEntireDocumentContent,
            ToolKind::GetDocumentStructure => Self::GetDocumentStructure,
            ToolKind::GetLineContent => Self::GetLineContent(typed(kind, args)?),
            ToolKind::GetLineRange => Self::GetLineRange(typed(kind, args)?),
            ToolKind::SearchForText => Self::SearchForText(typed(kind, args)?),
            ToolKind::GetHeadings => Self::GetHeadings(typed(kind, args)?),
            ToolKind::GetParagraph => Self::GetParagraph(typed(kind, args)?),
            ToolKind::GetTextRange => Self::GetTextRange(typed(kind, args)?),
            ToolKind::AppendToDocument => Self::AppendToDocument(typed(kind, args)?),
            ToolKind::ReplaceLine => Self::ReplaceLine(typed(kind, args)?),
            ToolKind::InsertLineBefore => Self::InsertLineBefore(typed(kind, args)?),
            ToolKind::InsertLineAfter => Self::InsertLineAfter(typed(kind, args)?),
            ToolKind::AppendToLine => Self::AppendToLine(typed(kind, args)?),
            ToolKind::DeleteLine => Self::DeleteLine(typed(kind, args)?),
            ToolKind::DeleteInRange => Self::DeleteInRange(typed(kind, args)?),
            ToolKind::ReplaceTextInLine => Self::ReplaceTextInLine(typed(kind, args)?),
            ToolKind::InsertTextAtPosition => Self::InsertTextAtPosition(typed(kind, args)?),
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::GetEntireDocumentContent => ToolKind::GetEntireDocumentContent,
            Self::GetLineContent(_) => ToolKind::GetLineContent,
            Self::GetLineRange(_) => ToolKind::GetLineRange,
            Self::SearchForText(_) => ToolKind::SearchForText,
            Self::GetHeadings(_) => ToolKind::GetHeadings,
            Self::GetParagraph(_) => ToolKind::GetParagraph,
            Self::GetDocumentStructure => ToolKind::GetDocumentStructure,
            Self::GetTextRange(_) => ToolKind::GetTextRange,
            Self::AppendToDocument(_) => ToolKind::AppendToDocument,
            Self::ReplaceLine(_) => ToolKind::ReplaceLine,
            Self::InsertLineBefore(_) => ToolKind::InsertLineBefore,
            Self::InsertLineAfter(_) => ToolKind::InsertLineAfter,
            Self::AppendToLine(_) => ToolKind::AppendToLine,
            Self::DeleteLine(_) => ToolKind::DeleteLine,
            Self::DeleteInRange(_) => ToolKind::DeleteInRange,
            Self::ReplaceTextInLine(_) => ToolKind::ReplaceTextInLine,
            Self::InsertTextAtPosition(_) => ToolKind::InsertTextAtPosition,
        }
    }

    /// Check the bounds and non-empty constraints the schema declares.
    ///
    /// Line numbers and positions are checked by the document layer, which
    /// can also name the actual line or character count.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        match self {
            Self::SearchForText(args) => {
                if args.search_term.is_empty() {
                    return Err(ArgumentError::Empty { field: "searchTerm" });
                }
                within("contextLines", args.context_lines, 0, MAX_CONTEXT_LINES)
            }
            Self::GetHeadings(args) => within("maxLevel", args.max_level, 1, MAX_HEADING_LEVEL),
            _ => Ok(()),
        }
    }
}

fn typed<T: DeserializeOwned>(kind: ToolKind, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args)
        .map_err(|e| ToolError::InvalidArguments(format!("{kind}: {e}")))
}

fn within(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ArgumentError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ArgumentError::OutOfBounds {
            field,
            min,
            max,
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_defaults_are_applied() {
        let inv = ToolInvocation::parse(ToolKind::SearchForText, json!({"searchTerm": "x"})).unwrap();
        let ToolInvocation::SearchForText(args) = inv else {
            panic!("wrong variant");
        };
        assert!(args.include_line_numbers);
        assert_eq!(args.context_lines, 2);
    }

    #[test]
    fn headings_accept_null_arguments() {
        let inv = ToolInvocation::parse(ToolKind::GetHeadings, Value::Null).unwrap();
        assert_eq!(inv, ToolInvocation::GetHeadings(HeadingsArgs { max_level: 6 }));
        assert_eq!(inv.kind(), ToolKind::GetHeadings);
    }

    #[test]
    fn missing_field_is_invalid_arguments() {
        let err = ToolInvocation::parse(ToolKind::ReplaceLine, json!({"lineNumber": 1})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(msg) if msg.contains("text")));
    }

    #[test]
    fn mistyped_field_is_invalid_arguments() {
        let err = ToolInvocation::parse(ToolKind::DeleteLine, json!({"lineNumber": "two"})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn negative_numbers_parse_and_are_left_to_the_document_layer() {
        let inv = ToolInvocation::parse(ToolKind::GetLineContent, json!({"lineNumber": -3})).unwrap();
        assert_eq!(inv, ToolInvocation::GetLineContent(LineArgs { line_number: -3 }));
        assert!(inv.validate().is_ok());
    }

    #[test]
    fn context_lines_bounds_are_enforced() {
        let inv = ToolInvocation::parse(
            ToolKind::SearchForText,
            json!({"searchTerm": "x", "contextLines": 11}),
        )
        .unwrap();
        assert_eq!(
            inv.validate().unwrap_err().to_string(),
            "contextLines must be between 0 and 10, got 11."
        );
    }

    #[test]
    fn max_level_bounds_are_enforced() {
        let inv = ToolInvocation::parse(ToolKind::GetHeadings, json!({"maxLevel": 0})).unwrap();
        assert!(matches!(
            inv.validate(),
            Err(ArgumentError::OutOfBounds { field: "maxLevel", .. })
        ));
    }

    #[test]
    fn empty_search_term_is_rejected() {
        let inv = ToolInvocation::parse(ToolKind::SearchForText, json!({"searchTerm": ""})).unwrap();
        assert_eq!(inv.validate(), Err(ArgumentError::Empty { field: "searchTerm" }));
    }
}
