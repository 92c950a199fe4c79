//! Structure derived from document text: headings, paragraphs, search hits,
//! and the aggregate counts behind `get_document_structure`.
//!
//! Nothing here is cached. Every accessor rescans the lines it is given, so
//! results always match the latest committed text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::lines::Lines;

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(\S.*)$").expect("heading pattern is valid"));

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+").expect("list pattern is valid"));

const FENCE: &str = "```";

/// An ATX heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub line: usize,
    pub level: u8,
    pub text: String,
}

/// A blank-line-delimited block of non-blank lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paragraph {
    pub number: usize,
    pub start_line: usize,
    pub end_line: usize,
    pub text: String,
}

/// Aggregate document statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStructure {
    pub line_count: usize,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub code_block_count: usize,
    pub list_item_count: usize,
    pub headings: Vec<Heading>,
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_fence(line: &str) -> bool {
    line.trim_start().starts_with(FENCE)
}

/// Parse a single line as an ATX heading.
pub fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let text = caps.get(2)?.as_str().trim_end();
    Some((level, text))
}

/// Headings of level `1..=max_level`, in document order.
pub fn headings(lines: &Lines, max_level: u8) -> Vec<Heading> {
    lines
        .numbered()
        .filter_map(|(number, line)| {
            let (level, text) = parse_heading(line)?;
            (level <= max_level).then(|| Heading {
                line: number,
                level,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Blank-line-delimited paragraphs, numbered from 1.
pub fn paragraphs(lines: &Lines) -> Vec<Paragraph> {
    fn flush(block: &mut Vec<(usize, &str)>, out: &mut Vec<Paragraph>) {
        if let (Some(first), Some(last)) = (block.first(), block.last()) {
            out.push(Paragraph {
                number: out.len() + 1,
                start_line: first.0,
                end_line: last.0,
                text: block.iter().map(|(_, l)| *l).collect::<Vec<_>>().join("\n"),
            });
        }
        block.clear();
    }

    let mut out = Vec::new();
    let mut current: Vec<(usize, &str)> = Vec::new();

    for (number, line) in lines.numbered() {
        if is_blank(line) {
            flush(&mut current, &mut out);
        } else {
            current.push((number, line));
        }
    }
    flush(&mut current, &mut out);
    out
}

/// Numbers of the lines containing `term`, compared case-insensitively.
pub fn find_lines(lines: &Lines, term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();
    lines
        .numbered()
        .filter(|(_, line)| line.to_lowercase().contains(&needle))
        .map(|(number, _)| number)
        .collect()
}

/// Scan the whole document once and aggregate its structure.
///
/// Paragraphs are counted by a line scan that closes the open paragraph on
/// a blank line or a fence line and ignores everything inside a fenced
/// block. Code blocks are counted when a fence opens.
pub fn structure(lines: &Lines, word_count: usize) -> DocumentStructure {
    let mut paragraph_count = 0;
    let mut code_block_count = 0;
    let mut list_item_count = 0;
    let mut in_paragraph = false;
    let mut in_code = false;

    for (_, line) in lines.numbered() {
        if LIST_ITEM.is_match(line) {
            list_item_count += 1;
        }

        if is_fence(line) {
            in_paragraph = false;
            in_code = !in_code;
            if in_code {
                code_block_count += 1;
            }
            continue;
        }

        if in_code || is_blank(line) {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            paragraph_count += 1;
        }
    }

    DocumentStructure {
        line_count: lines.count(),
        word_count,
        paragraph_count,
        code_block_count,
        list_item_count,
        headings: headings(lines, 6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> DocumentStructure {
        structure(&Lines::parse(text), quill_core::document::word_count(text))
    }

    #[test]
    fn headings_keep_order_and_filter_by_level() {
        let lines = Lines::parse("# Top\ntext\n### Deep\n## Mid\n####### not a heading\n#nospace");
        let all = headings(&lines, 6);
        assert_eq!(
            all.iter().map(|h| (h.line, h.level)).collect::<Vec<_>>(),
            vec![(1, 1), (3, 3), (4, 2)]
        );
        let shallow = headings(&lines, 2);
        assert_eq!(shallow.len(), 2);
        assert_eq!(shallow[1].text, "Mid");
    }

    #[test]
    fn whitespace_only_heading_text_is_not_a_heading() {
        assert_eq!(parse_heading("#   "), None);
        assert_eq!(parse_heading("##\t "), None);
        assert_eq!(parse_heading("##  Title  "), Some((2, "Title")));

        let lines = Lines::parse("# Real\n#   \n## Also real");
        let found: Vec<_> = headings(&lines, 6).into_iter().map(|h| h.line).collect();
        assert_eq!(found, vec![1, 3]);
    }

    #[test]
    fn no_headings_in_plain_text() {
        assert!(headings(&Lines::parse("just\nprose"), 6).is_empty());
    }

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let lines = Lines::parse("one\ntwo\n\n  \nthree\n\nfour\n");
        let paras = paragraphs(&lines);
        assert_eq!(paras.len(), 3);
        assert_eq!(paras[0].text, "one\ntwo");
        assert_eq!((paras[0].start_line, paras[0].end_line), (1, 2));
        assert_eq!(paras[1].number, 2);
        assert_eq!(paras[1].start_line, 5);
        assert_eq!(paras[2].text, "four");
    }

    #[test]
    fn find_lines_is_case_insensitive() {
        let lines = Lines::parse("Rust\nrusty\nGo\nTRUST");
        assert_eq!(find_lines(&lines, "rust"), vec![1, 2, 4]);
    }

    #[test]
    fn code_blocks_are_half_the_fence_count() {
        let text = "intro\n```rust\nfn a() {}\n```\n\n```\nplain\n```\n```\n```";
        let s = scan(text);
        assert_eq!(s.code_block_count, 3);
    }

    #[test]
    fn paragraphs_close_at_fences_and_skip_code() {
        let text = "para one\nstill one\n```\ncode\n\nmore code\n```\npara two\n\npara three";
        let s = scan(text);
        assert_eq!(s.paragraph_count, 3);
        assert_eq!(s.code_block_count, 1);
    }

    #[test]
    fn list_items_cover_bullets_and_ordered() {
        let text = "- a\n* b\n+ c\n1. d\n2) e\n-not a list\n  - nested";
        assert_eq!(scan(text).list_item_count, 6);
    }

    #[test]
    fn structure_counts_lines_and_words() {
        let s = scan("# Title\n\nHello world");
        assert_eq!(s.line_count, 3);
        assert_eq!(s.word_count, 4);
        assert_eq!(s.headings.len(), 1);
    }
}
