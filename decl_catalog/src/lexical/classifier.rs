//! Declaration classifier
//!
//! Walks a [`Scanner`] over the buffer, skipping whitespace and comments, and
//! decides at each identifier lead whether a constant, variable or function
//! declaration starts there. Matched declarations are appended to the caller's
//! [`DeclarationStore`]; everything else is stepped over.

use super::scanner::{CommentClose, Scanner};
use crate::config::compile_time::scanning::{
    LARGE_CATALOG_THRESHOLD, MAX_REPORTED_SKIPPED_CONSTRUCTS,
};
use crate::config::runtime::ScanPreferences;
use crate::logging::codes;
use crate::logging::Code;
use crate::store::{DeclarationKind, DeclarationRecord, DeclarationStore};
use crate::utils::{Position, Span};
use crate::{log_debug, log_success, log_warning};
use serde::Serialize;

pub const CONST_KEYWORD: &str = "const";

pub const BASE_TYPE_KEYWORDS: [&str; 5] = ["int", "void", "char", "double", "float"];

pub fn is_lead_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

pub fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

pub fn is_base_type(word: &str) -> bool {
    BASE_TYPE_KEYWORDS.contains(&word)
}

/// What follows a base-type lead word, decided by the first `;`, `=` or `{`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLeadShape {
    /// `;` or `=` at byte offset `mark`
    Variable { mark: usize },
    /// `{` at byte offset `open_brace`
    Function { open_brace: usize },
    /// No classification mark before the end of the buffer
    Truncated,
}

/// Look ahead from the cursor for the first classification mark without consuming
pub fn lookahead_type_lead(scanner: &Scanner<'_>) -> TypeLeadShape {
    let base = scanner.position().offset;

    for (index, ch) in scanner.remaining().char_indices() {
        match ch {
            ';' | '=' => return TypeLeadShape::Variable { mark: base + index },
            '{' => {
                return TypeLeadShape::Function {
                    open_brace: base + index,
                }
            }
            _ => {}
        }
    }

    TypeLeadShape::Truncated
}

/// Byte offset of the `}` that returns depth to zero, counting from the `{` at `open`.
/// Braces are counted naively; string and comment contents are not special.
pub fn find_matching_brace(source: &str, open: usize) -> Option<usize> {
    let body = source.get(open..)?;
    let mut depth: usize = 0;

    for (index, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + index);
                }
            }
            _ => {}
        }
    }

    None
}

/// Whether every `}` closes an earlier `{` and nothing is left open
pub fn braces_balanced(text: &str) -> bool {
    let mut depth: i64 = 0;
    for ch in text.chars() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

fn line_end(source: &str, from: usize) -> usize {
    source
        .get(from..)
        .and_then(|rest| rest.find('\n'))
        .map(|index| from + index)
        .unwrap_or(source.len())
}

/// Counters for one scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanMetrics {
    pub constants: usize,
    pub variables: usize,
    pub functions: usize,
    pub skipped_words: usize,
    pub line_comments: usize,
    pub block_comments: usize,
    pub unterminated_block_comments: usize,
    pub truncated_declarations: usize,
    pub unterminated_function_bodies: usize,
    pub other_characters: usize,
}

impl ScanMetrics {
    pub fn records(&self) -> usize {
        self.constants + self.variables + self.functions
    }

    /// Malformed constructs that produced no record
    pub fn skipped_constructs(&self) -> usize {
        self.unterminated_block_comments
            + self.truncated_declarations
            + self.unterminated_function_bodies
    }

    fn record(&mut self, kind: DeclarationKind) {
        match kind {
            DeclarationKind::Constant => self.constants += 1,
            DeclarationKind::Variable => self.variables += 1,
            DeclarationKind::Function => self.functions += 1,
        }
    }
}

pub struct DeclarationClassifier {
    metrics: ScanMetrics,
    preferences: ScanPreferences,
    reported_skipped: usize,
}

impl DeclarationClassifier {
    pub fn new() -> Self {
        Self::with_preferences(ScanPreferences::default())
    }

    pub fn with_preferences(preferences: ScanPreferences) -> Self {
        Self {
            metrics: ScanMetrics::default(),
            preferences,
            reported_skipped: 0,
        }
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    pub fn preferences(&self) -> &ScanPreferences {
        &self.preferences
    }

    /// Scan `source` to the end, appending every classified declaration to `store`.
    /// Never fails; malformed constructs are counted in the returned metrics.
    pub fn scan(&mut self, source: &str, store: &mut DeclarationStore) -> ScanMetrics {
        self.metrics = ScanMetrics::default();
        self.reported_skipped = 0;

        let mut scanner = Scanner::new(source);

        loop {
            self.skip_trivia(&mut scanner);

            match scanner.peek(0) {
                None => break,
                Some(ch) if is_lead_char(ch) => self.classify_at(&mut scanner, store),
                Some(_) => {
                    scanner.advance();
                    self.metrics.other_characters += 1;
                }
            }
        }

        let records = self.metrics.records();

        log_success!(codes::success::SCAN_COMPLETE, "Declaration scan complete",
            "constants" => self.metrics.constants,
            "variables" => self.metrics.variables,
            "functions" => self.metrics.functions,
            "skipped_constructs" => self.metrics.skipped_constructs()
        );

        if records > LARGE_CATALOG_THRESHOLD {
            log_warning!(codes::scanning::LARGE_CATALOG, "Catalog exceeds the large catalog threshold",
                "records" => records,
                "threshold" => LARGE_CATALOG_THRESHOLD
            );
        }

        self.metrics.clone()
    }

    /// Whitespace, then line comments, then block comments, until none applies
    fn skip_trivia(&mut self, scanner: &mut Scanner<'_>) {
        loop {
            if scanner.skip_whitespace() {
                continue;
            }

            if scanner.skip_line_comment() {
                self.metrics.line_comments += 1;
                continue;
            }

            let start = scanner.position();
            match scanner.skip_block_comment() {
                Some(CommentClose::Terminated) => {
                    self.metrics.block_comments += 1;
                }
                Some(CommentClose::AtEndOfBuffer) => {
                    self.metrics.block_comments += 1;
                    self.metrics.unterminated_block_comments += 1;
                    self.report_skipped(
                        codes::scanning::UNTERMINATED_BLOCK_COMMENT,
                        "Block comment runs to end of input",
                        scanner.span_from(start),
                        "/*",
                    );
                }
                None => break,
            }
        }
    }

    fn classify_at(&mut self, scanner: &mut Scanner<'_>, store: &mut DeclarationStore) {
        let start = scanner.position();
        let word = scanner.advance_while(is_word_char);

        if word == CONST_KEYWORD {
            let from = scanner.position().offset;
            self.capture_line(scanner, store, DeclarationKind::Constant, start, from);
            return;
        }

        if !is_base_type(word) {
            self.metrics.skipped_words += 1;
            return;
        }

        match lookahead_type_lead(scanner) {
            TypeLeadShape::Variable { mark } => {
                self.capture_line(scanner, store, DeclarationKind::Variable, start, mark);
            }
            TypeLeadShape::Function { open_brace } => {
                self.capture_function(scanner, store, start, open_brace, word);
            }
            TypeLeadShape::Truncated => {
                self.metrics.truncated_declarations += 1;
                let end = scanner.source().len();
                scanner.advance_to(end);
                self.report_skipped(
                    codes::scanning::TRUNCATED_DECLARATION,
                    "Type keyword without ';', '=' or '{' before end of input",
                    scanner.span_from(start),
                    word,
                );
            }
        }
    }

    /// Capture from `start` to the end of the line containing `from`, trailing whitespace trimmed
    fn capture_line(
        &mut self,
        scanner: &mut Scanner<'_>,
        store: &mut DeclarationStore,
        kind: DeclarationKind,
        start: Position,
        from: usize,
    ) {
        let source = scanner.source();
        let end = line_end(source, from);
        let text = source.get(start.offset..end).unwrap_or("").trim_end();

        scanner.advance_to(start.offset + text.len());
        self.emit(store, kind, text, scanner.span_from(start));
    }

    fn capture_function(
        &mut self,
        scanner: &mut Scanner<'_>,
        store: &mut DeclarationStore,
        start: Position,
        open_brace: usize,
        lead_word: &str,
    ) {
        let source = scanner.source();

        match find_matching_brace(source, open_brace) {
            Some(close) => {
                scanner.advance_to(close + 1);
                if let Some(text) = source.get(start.offset..close + 1) {
                    self.emit(store, DeclarationKind::Function, text, scanner.span_from(start));
                }
            }
            None => {
                self.metrics.unterminated_function_bodies += 1;
                scanner.advance_to(source.len());
                self.report_skipped(
                    codes::scanning::UNTERMINATED_FUNCTION_BODY,
                    "Function body not closed before end of input",
                    scanner.span_from(start),
                    lead_word,
                );
            }
        }
    }

    fn emit(&mut self, store: &mut DeclarationStore, kind: DeclarationKind, text: &str, span: Span) {
        if text.is_empty() {
            return;
        }

        log_debug!("Declaration classified",
            "kind" => kind,
            "line" => span.start.line,
            "column" => span.start.column
        );

        self.metrics.record(kind);
        store.append(DeclarationRecord::new(kind, text, span));
    }

    fn report_skipped(&mut self, code: Code, message: &str, span: Span, lead: &str) {
        let surface = self.preferences.report_skipped_constructs
            && self.reported_skipped < MAX_REPORTED_SKIPPED_CONSTRUCTS;

        if !surface {
            log_debug!(message,
                "code" => code,
                "line" => span.start.line,
                "column" => span.start.column,
                "lead" => lead
            );
            return;
        }

        self.reported_skipped += 1;
        if self.preferences.include_positions_in_logs {
            log_warning!(code, message, span = span, "lead" => lead);
        } else {
            log_warning!(code, message, "lead" => lead);
        }
    }
}

impl Default for DeclarationClassifier {
    fn default() -> Self {
        Self::new()
    }
}
