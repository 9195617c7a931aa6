use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three declaration shapes the classifier recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Constant,
    Variable,
    Function,
}

impl DeclarationKind {
    pub const ALL: [DeclarationKind; 3] = [
        DeclarationKind::Constant,
        DeclarationKind::Variable,
        DeclarationKind::Function,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Constant => "constant",
            DeclarationKind::Variable => "variable",
            DeclarationKind::Function => "function",
        }
    }

    /// Fixed name of the output destination for this kind
    pub fn logical_name(&self) -> &'static str {
        match self {
            DeclarationKind::Constant => "constants",
            DeclarationKind::Variable => "variables",
            DeclarationKind::Function => "functions",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified declaration: its kind, the exact source text and where it starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub kind: DeclarationKind,
    pub text: String,
    /// 1-based line of the first character
    pub line: u32,
    /// 1-based column of the first character
    pub column: u32,
    pub span: Span,
}

impl DeclarationRecord {
    pub fn new(kind: DeclarationKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            line: span.start.line,
            column: span.start.column,
            span,
        }
    }
}

impl fmt::Display for DeclarationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}", self.kind, self.line, self.column)
    }
}
