//! The closed set of document tools and their schemas.

use serde_json::{Value, json};

/// Every tool the assistant can call against the open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetEntireDocumentContent,
    GetLineContent,
    GetLineRange,
    SearchForText,
    GetHeadings,
    GetParagraph,
    GetDocumentStructure,
    GetTextRange,
    AppendToDocument,
    ReplaceLine,
    InsertLineBefore,
    InsertLineAfter,
    AppendToLine,
    DeleteLine,
    DeleteInRange,
    ReplaceTextInLine,
    InsertTextAtPosition,
}

impl ToolKind {
    pub const ALL: [ToolKind; 17] = [
        Self::GetEntireDocumentContent,
        Self::GetLineContent,
        Self::GetLineRange,
        Self::SearchForText,
        Self::GetHeadings,
        Self::GetParagraph,
        Self::GetDocumentStructure,
        Self::GetTextRange,
        Self::AppendToDocument,
        Self::ReplaceLine,
        Self::InsertLineBefore,
        Self::InsertLineAfter,
        Self::AppendToLine,
        Self::DeleteLine,
        Self::DeleteInRange,
        Self::ReplaceTextInLine,
        Self::InsertTextAtPosition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::GetEntireDocumentContent => "get_entire_document_content",
            Self::GetLineContent => "get_line_content",
            Self::GetLineRange => "get_line_range",
            Self::SearchForText => "search_for_text",
            Self::GetHeadings => "get_headings",
            Self::GetParagraph => "get_paragraph",
            Self::GetDocumentStructure => "get_document_structure",
            Self::GetTextRange => "get_text_range",
            Self::AppendToDocument => "append_to_document",
            Self::ReplaceLine => "replace_line",
            Self::InsertLineBefore => "insert_line_before",
            Self::InsertLineAfter => "insert_line_after",
            Self::AppendToLine => "append_to_line",
            Self::DeleteLine => "delete_line",
            Self::DeleteInRange => "delete_in_range",
            Self::ReplaceTextInLine => "replace_text_in_line",
            Self::InsertTextAtPosition => "insert_text_at_position",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether the tool goes through the mutation engine.
    pub fn is_write(self) -> bool {
        matches!(
            self,
            Self::AppendToDocument
                | Self::ReplaceLine
                | Self::InsertLineBefore
                | Self::InsertLineAfter
                | Self::AppendToLine
                | Self::DeleteLine
                | Self::DeleteInRange
                | Self::ReplaceTextInLine
                | Self::InsertTextAtPosition
        )
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::GetEntireDocumentContent => "Get the entire content of the document.",
            Self::GetLineContent => "Get the content of a specific line (1-based).",
            Self::GetLineRange => "Get the content of lines startLine through endLine (inclusive), numbered.",
            Self::SearchForText => {
                "Search the document for text (case-insensitive) and return each matching line with surrounding context. Match lines are marked with '>'."
            }
            Self::GetHeadings => "List the markdown headings in the document, in order, up to maxLevel.",
            Self::GetParagraph => "Get a paragraph by number. Paragraphs are separated by blank lines.",
            Self::GetDocumentStructure => {
                "Get an overview of the document: line, word, paragraph, code block and list item counts plus the heading outline."
            }
            Self::GetTextRange => {
                "Get the characters from startPosition (inclusive) to endPosition (exclusive) within a line. Positions are 0-based."
            }
            Self::AppendToDocument => "Append text to the end of the document, separated by a blank line.",
            Self::ReplaceLine => "Replace the content of a line with new text.",
            Self::InsertLineBefore => "Insert a new line of text before the given line number.",
            Self::InsertLineAfter => "Insert a new line of text after the given line number.",
            Self::AppendToLine => "Append text to the end of a line.",
            Self::DeleteLine => "Delete a line from the document.",
            Self::DeleteInRange => "Delete all lines from startLine to endLine (inclusive).",
            Self::ReplaceTextInLine => {
                "Replace the first occurrence of oldText with newText within a line. Fails without changes if oldText is not in the line."
            }
            Self::InsertTextAtPosition => {
                "Insert text at a 0-based character position within a line."
            }
        }
    }

    pub fn parameters_schema(self) -> Value {
        match self {
            Self::GetEntireDocumentContent | Self::GetDocumentStructure => object(json!({}), &[]),
            Self::GetLineContent | Self::DeleteLine => object(
                json!({ "lineNumber": line("The line number (1-based)") }),
                &["lineNumber"],
            ),
            Self::GetLineRange | Self::DeleteInRange => object(
                json!({
                    "startLine": line("First line of the range (1-based)"),
                    "endLine": line("Last line of the range (inclusive)")
                }),
                &["startLine", "endLine"],
            ),
            Self::SearchForText => object(
                json!({
                    "searchTerm": string("The text to search for"),
                    "includeLineNumbers": {
                        "type": "boolean",
                        "description": "Prefix each returned line with its number",
                        "default": true
                    },
                    "contextLines": {
                        "type": "integer",
                        "description": "Lines of context to include before and after each match",
                        "minimum": 0,
                        "maximum": 10,
                        "default": 2
                    }
                }),
                &["searchTerm"],
            ),
            Self::GetHeadings => object(
                json!({
                    "maxLevel": {
                        "type": "integer",
                        "description": "Deepest heading level to include",
                        "minimum": 1,
                        "maximum": 6,
                        "default": 6
                    }
                }),
                &[],
            ),
            Self::GetParagraph => object(
                json!({
                    "paragraphNumber": {
                        "type": "integer",
                        "description": "The paragraph number (1-based)",
                        "minimum": 1
                    }
                }),
                &["paragraphNumber"],
            ),
            Self::GetTextRange => object(
                json!({
                    "lineNumber": line("The line number (1-based)"),
                    "startPosition": position("Start character position (0-based, inclusive)"),
                    "endPosition": position("End character position (exclusive)")
                }),
                &["lineNumber", "startPosition", "endPosition"],
            ),
            Self::AppendToDocument => object(
                json!({ "text": string("The markdown text to append") }),
                &["text"],
            ),
            Self::ReplaceLine
            | Self::InsertLineBefore
            | Self::InsertLineAfter
            | Self::AppendToLine => object(
                json!({
                    "lineNumber": line("The line number (1-based)"),
                    "text": string("The text to write")
                }),
                &["lineNumber", "text"],
            ),
            Self::ReplaceTextInLine => object(
                json!({
                    "lineNumber": line("The line number (1-based)"),
                    "oldText": string("The exact text to replace"),
                    "newText": string("The replacement text")
                }),
                &["lineNumber", "oldText", "newText"],
            ),
            Self::InsertTextAtPosition => object(
                json!({
                    "lineNumber": line("The line number (1-based)"),
                    "position": position("Character position to insert at (0-based)"),
                    "text": string("The text to insert")
                }),
                &["lineNumber", "position", "text"],
            ),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn object(properties: Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn line(description: &str) -> Value {
    json!({ "type": "integer", "description": description, "minimum": 1 })
}

fn position(description: &str) -> Value {
    json!({ "type": "integer", "description": description, "minimum": 0 })
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}
