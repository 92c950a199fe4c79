//! The system prompt that opens every conversation.

use quill_core::provider::ToolDefinition;
use quill_tools::ToolKind;

const PREAMBLE: &str = "\
You are the writing assistant built into a markdown note editor. The user \
has one document open, and you can read and change it only through the \
tools listed below. Line numbers start at 1 and character positions start \
at 0.";

const GUIDELINES: &str = "\
How to work:
1. Finish every part of a multi-step request before replying. Do not stop \
to ask for confirmation between steps.
2. Gather only the context you need. Prefer get_headings, search_for_text \
or get_line_range over reading the whole document.
3. For small edits inside a line, use replace_text_in_line or \
insert_text_at_position rather than rewriting the line.
4. Keep the document's existing structure. Extend a section in place \
instead of starting a new one.
5. If a tool reports an error, read it, correct the arguments and try again.
6. Once the request is done, stop calling tools and tell the user in plain \
text what you changed.

Everything you write into the document is markdown. Replies to the user \
are plain text.";

/// Build the system prompt, listing each tool as `name: description`.
///
/// Document tools that edit are listed under editing; everything else is
/// listed under reading.
pub fn system_prompt(tools: &[ToolDefinition]) -> String {
    let (writes, reads): (Vec<_>, Vec<_>) = tools.iter().partition(|t| edits_document(&t.name));

    let mut out = String::from(PREAMBLE);
    push_section(&mut out, "Tools for reading the document:", &reads);
    push_section(&mut out, "Tools for editing the document:", &writes);
    out.push_str("\n\n");
    out.push_str(GUIDELINES);
    out
}

fn edits_document(name: &str) -> bool {
    ToolKind::from_name(name).is_some_and(ToolKind::is_write)
}

fn push_section(out: &mut String, title: &str, tools: &[&ToolDefinition]) {
    if tools.is_empty() {
        return;
    }
    out.push_str("\n\n");
    out.push_str(title);
    for tool in tools {
        out.push_str(&format!("\n- {}: {}", tool.name, tool.description));
    }
}
