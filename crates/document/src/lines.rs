//! Line view over document text.
//!
//! Text is split on `\n` into 1-based lines and rejoined with `\n`, so
//! `Lines::parse(text).join() == text` for every input. The empty text is a
//! single empty line. Character positions within a line count Unicode scalar
//! values, not bytes.

/// An ordered, gap-free sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lines {
    lines: Vec<String>,
}

impl Lines {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn join(&self) -> String {
        self.lines.join("\n")
    }

    /// Number of lines. Never zero for parsed text.
    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Line `number` (1-based).
    pub fn get(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    /// Lines `start..=end` (1-based, inclusive) with their numbers.
    pub fn range(&self, start: usize, end: usize) -> impl Iterator<Item = (usize, &str)> {
        self.numbered()
            .skip(start.saturating_sub(1))
            .take((end + 1).saturating_sub(start))
    }

    /// All lines with their 1-based numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().enumerate().map(|(i, l)| (i + 1, l.as_str()))
    }

    /// Pad with empty lines until there are at least `count` lines.
    pub(crate) fn pad_to(&mut self, count: usize) {
        if self.lines.len() < count {
            self.lines.resize(count, String::new());
        }
    }

    pub(crate) fn line_mut(&mut self, number: usize) -> Option<&mut String> {
        number.checked_sub(1).and_then(|idx| self.lines.get_mut(idx))
    }

    /// Insert so the new line ends up with number `number`.
    pub(crate) fn insert(&mut self, number: usize, text: &str) {
        self.lines.insert(number - 1, text.to_string());
    }

    /// Remove lines `start..=end`. Both must be valid line numbers.
    pub(crate) fn remove_range(&mut self, start: usize, end: usize) {
        self.lines.drain(start - 1..end);
    }
}

/// Length of `s` in characters.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte offset of character position `pos`; `pos == char_len(s)` maps to `s.len()`.
pub fn byte_offset(s: &str, pos: usize) -> Option<usize> {
    if pos == 0 {
        return Some(0);
    }
    s.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .nth(pos)
}

/// Characters `start..end` of `s`.
pub fn char_slice(s: &str, start: usize, end: usize) -> Option<&str> {
    let from = byte_offset(s, start)?;
    let to = byte_offset(s, end)?;
    s.get(from..to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_join_is_lossless() {
        for text in ["", "a", "a\nb", "a\n\nb\n", "\n\n", "héllo\nwörld"] {
            assert_eq!(Lines::parse(text).join(), text);
        }
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let lines = Lines::parse("");
        assert_eq!(lines.count(), 1);
        assert_eq!(lines.get(1), Some(""));
    }

    #[test]
    fn get_is_one_based() {
        let lines = Lines::parse("Line1\nLine2\nLine3");
        assert_eq!(lines.get(0), None);
        assert_eq!(lines.get(1), Some("Line1"));
        assert_eq!(lines.get(3), Some("Line3"));
        assert_eq!(lines.get(4), None);
    }

    #[test]
    fn range_is_inclusive() {
        let lines = Lines::parse("a\nb\nc\nd");
        let picked: Vec<_> = lines.range(2, 3).collect();
        assert_eq!(picked, vec![(2, "b"), (3, "c")]);
    }

    #[test]
    fn pad_then_insert() {
        let mut lines = Lines::parse("a");
        lines.pad_to(3);
        lines.insert(4, "d");
        assert_eq!(lines.join(), "a\n\n\nd");
    }

    #[test]
    fn char_helpers_count_scalars() {
        let s = "héllo";
        assert_eq!(char_len(s), 5);
        assert_eq!(byte_offset(s, 2), Some(3));
        assert_eq!(byte_offset(s, 5), Some(s.len()));
        assert_eq!(byte_offset(s, 6), None);
        assert_eq!(char_slice(s, 1, 3), Some("él"));
    }
}
