//! Character cursor over a source buffer
//!
//! The scanner owns the only mutable position for a scan. Lookahead never
//! consumes; every consuming operation goes through [`Position::advance`] so
//! line and column stay in step with the byte offset.

use crate::utils::{Position, Span};

/// How a block comment ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentClose {
    /// Closed by `*/`
    Terminated,
    /// Ran to the end of the buffer; closed implicitly
    AtEndOfBuffer,
}

#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    cursor: Position,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: Position::start(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> Position {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor.offset >= self.source.len()
    }

    /// Unconsumed text from the cursor to the end of the buffer
    pub fn remaining(&self) -> &'a str {
        self.source.get(self.cursor.offset..).unwrap_or("")
    }

    /// Character `n` places past the cursor; `None` past the end of the buffer
    pub fn peek(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    /// Consume one character
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek(0)?;
        self.cursor = self.cursor.advance(ch);
        Some(ch)
    }

    /// Consume characters until the cursor reaches `offset` (clamped to the buffer)
    pub fn advance_to(&mut self, offset: usize) {
        let target = offset.min(self.source.len());
        while self.cursor.offset < target {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consume characters while `predicate` holds; returns the consumed text
    pub fn advance_while<F>(&mut self, predicate: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.cursor.offset;
        while let Some(ch) = self.peek(0) {
            if !predicate(ch) {
                break;
            }
            self.advance();
        }
        self.source.get(start..self.cursor.offset).unwrap_or("")
    }

    /// Span from `start` to the current cursor
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.cursor)
    }

    /// Consume a maximal run of whitespace
    pub fn skip_whitespace(&mut self) -> bool {
        !self.advance_while(|ch| ch.is_ascii_whitespace()).is_empty()
    }

    /// On `//`, consume up to but not including the next newline
    pub fn skip_line_comment(&mut self) -> bool {
        if !self.remaining().starts_with("//") {
            return false;
        }
        self.advance_while(|ch| ch != '\n');
        true
    }

    /// On `/*`, consume through the matching `*/`, or to the end of the buffer
    pub fn skip_block_comment(&mut self) -> Option<CommentClose> {
        let rest = self.remaining();
        if !rest.starts_with("/*") {
            return None;
        }

        match rest[2..].find("*/") {
            Some(close) => {
                self.advance_to(self.cursor.offset + 2 + close + 2);
                Some(CommentClose::Terminated)
            }
            None => {
                self.advance_to(self.source.len());
                Some(CommentClose::AtEndOfBuffer)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let scanner = Scanner::new("ab");
        assert_eq!(scanner.peek(0), Some('a'));
        assert_eq!(scanner.peek(1), Some('b'));
        assert_eq!(scanner.peek(2), None);
        assert_eq!(scanner.position(), Position::start());
    }

    #[test]
    fn test_advance_tracks_lines_and_columns() {
        let mut scanner = Scanner::new("a\nb");
        assert_eq!(scanner.advance(), Some('a'));
        assert_eq!(scanner.position(), Position::new(1, 1, 2));
        assert_eq!(scanner.advance(), Some('\n'));
        assert_eq!(scanner.position(), Position::new(2, 2, 1));
        assert_eq!(scanner.advance(), Some('b'));
        assert_eq!(scanner.advance(), None);
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_skip_whitespace_consumes_maximal_run() {
        let mut scanner = Scanner::new(" \t\r\n  int");
        assert!(scanner.skip_whitespace());
        assert_eq!(scanner.peek(0), Some('i'));
        assert_eq!(scanner.position().line, 2);
        assert_eq!(scanner.position().column, 3);
        assert!(!scanner.skip_whitespace());
    }

    #[test]
    fn test_line_comment_stops_before_newline() {
        let mut scanner = Scanner::new("// note\nint");
        assert!(scanner.skip_line_comment());
        assert_eq!(scanner.peek(0), Some('\n'));
        assert_eq!(scanner.position().line, 1);
    }

    #[test]
    fn test_line_comment_at_end_of_buffer() {
        let mut scanner = Scanner::new("// trailing");
        assert!(scanner.skip_line_comment());
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_single_slash_is_not_a_comment() {
        let mut scanner = Scanner::new("/ 2");
        assert!(!scanner.skip_line_comment());
        assert_eq!(scanner.skip_block_comment(), None);
        assert_eq!(scanner.position(), Position::start());
    }

    #[test]
    fn test_block_comment_tracks_newlines() {
        let mut scanner = Scanner::new("/* a\n b */x");
        assert_eq!(scanner.skip_block_comment(), Some(CommentClose::Terminated));
        assert_eq!(scanner.peek(0), Some('x'));
        assert_eq!(scanner.position().line, 2);
        assert_eq!(scanner.position().column, 6);
    }

    #[test]
    fn test_unterminated_block_comment_closes_at_end() {
        let mut scanner = Scanner::new("/* never closed\n int x;");
        assert_eq!(
            scanner.skip_block_comment(),
            Some(CommentClose::AtEndOfBuffer)
        );
        assert!(scanner.is_at_end());
    }

    #[test]
    fn test_block_comment_opener_is_not_its_own_closer() {
        let mut scanner = Scanner::new("/*/ x */y");
        assert_eq!(scanner.skip_block_comment(), Some(CommentClose::Terminated));
        assert_eq!(scanner.peek(0), Some('y'));
    }

    #[test]
    fn test_advance_while_returns_consumed_text() {
        let mut scanner = Scanner::new("const_1 = 2");
        let word = scanner.advance_while(|ch| ch.is_ascii_alphanumeric() || ch == '_');
        assert_eq!(word, "const_1");
        assert_eq!(scanner.position().column, 8);
    }

    #[test]
    fn test_advance_to_clamps_to_buffer() {
        let mut scanner = Scanner::new("abc");
        scanner.advance_to(100);
        assert!(scanner.is_at_end());
        assert_eq!(scanner.position().column, 4);
    }
}
