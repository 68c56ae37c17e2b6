//! Diagnostic model shared by the structural validator and the schema rules
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of problem a diagnostic reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Reported verbatim by the tag tokenizer
    LexError,
    /// A closing tag for an element that never takes one (`</br>`)
    SuperfluousVoidClose,
    /// A closing tag while no element is open
    UnmatchedClose,
    /// A closing tag that does not match the innermost open element
    MismatchedClose,
    /// An element still open at end of input
    UnclosedElement,
    /// The XML tree builder rejected the document; nothing else was checked
    TreeParseError,
    /// A schema rule found a target element without a required child
    MissingRequiredChild,
}

impl DiagnosticKind {
    /// Stable identifier used in machine-readable output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LexError => "lex_error",
            Self::SuperfluousVoidClose => "superfluous_void_close",
            Self::UnmatchedClose => "unmatched_close",
            Self::MismatchedClose => "mismatched_close",
            Self::UnclosedElement => "unclosed_element",
            Self::TreeParseError => "tree_parse_error",
            Self::MissingRequiredChild => "missing_required_child",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One positioned structural problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Line of the triggering event (1-based, 0 when unknown)
    pub line: usize,
    /// Column of the triggering event (1-based, 0 when unknown)
    pub column: usize,
    /// Human-readable message
    pub message: String,
    /// What kind of problem this is
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error at line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new<M>(kind: DiagnosticKind, position: Position, message: M) -> Self
    where
        M: Into<String>,
    {
        Self {
            line: position.line,
            column: position.column,
            message: message.into(),
            kind,
        }
    }

    /// The position this diagnostic points at
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn lex_error(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::LexError, position, message)
    }

    pub fn superfluous_void_close(name: &str, position: Position) -> Self {
        Self::new(
            DiagnosticKind::SuperfluousVoidClose,
            position,
            format!("Superfluous closing tag for void element: </{}>", name),
        )
    }

    pub fn unmatched_close(name: &str, position: Position) -> Self {
        Self::new(
            DiagnosticKind::UnmatchedClose,
            position,
            format!("Unmatched closing tag: {} (stack is empty)", name),
        )
    }

    pub fn mismatched_close(expected: &str, actual: &str, position: Position) -> Self {
        Self::new(
            DiagnosticKind::MismatchedClose,
            position,
            format!(
                "Mismatched closing tag: expected </{}> but got </{}>",
                expected, actual
            ),
        )
    }

    /// Unclosed elements are only discovered at end of input, so they carry
    /// the sentinel position
    pub fn unclosed_element(name: &str) -> Self {
        Self::new(
            DiagnosticKind::UnclosedElement,
            Position::UNKNOWN,
            format!("Unclosed tag: {}", name),
        )
    }

    pub fn tree_parse_error(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::TreeParseError, position, message)
    }

    pub fn missing_required_child(position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::MissingRequiredChild, position, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_report_line() {
        let diagnostic = Diagnostic::mismatched_close("span", "div", Position::new(3, 7));
        assert_eq!(
            diagnostic.to_string(),
            "Error at line 3, column 7: Mismatched closing tag: expected </span> but got </div>"
        );
    }

    #[test]
    fn test_unclosed_element_uses_sentinel() {
        let diagnostic = Diagnostic::unclosed_element("div");
        assert_eq!(diagnostic.position(), Position::UNKNOWN);
        assert_eq!(diagnostic.to_string(), "Error at line 0, column 0: Unclosed tag: div");
    }

    #[test]
    fn test_serializes_flat_with_snake_case_kind() {
        let diagnostic = Diagnostic::superfluous_void_close("br", Position::new(1, 4));
        let value = serde_json::to_value(&diagnostic).unwrap();

        assert_eq!(value["line"], 1);
        assert_eq!(value["column"], 4);
        assert_eq!(value["kind"], "superfluous_void_close");
        assert_eq!(value["message"], "Superfluous closing tag for void element: </br>");
    }
}
