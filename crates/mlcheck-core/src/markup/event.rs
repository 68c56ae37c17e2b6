//! Tag events produced by the tokenizer

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// One event of the tag stream, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagEvent {
    /// An opening tag `<name ...>`
    Open { name: String, position: Position },
    /// A closing tag `</name>`
    Close { name: String, position: Position },
    /// A lexical problem the tokenizer could not turn into a tag
    LexError { message: String, position: Position },
}

impl TagEvent {
    pub fn open(name: impl Into<String>, position: Position) -> Self {
        Self::Open {
            name: name.into(),
            position,
        }
    }

    pub fn close(name: impl Into<String>, position: Position) -> Self {
        Self::Close {
            name: name.into(),
            position,
        }
    }

    pub fn lex_error(message: impl Into<String>, position: Position) -> Self {
        Self::LexError {
            message: message.into(),
            position,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Open { position, .. }
            | Self::Close { position, .. }
            | Self::LexError { position, .. } => *position,
        }
    }

    /// The element name for open/close events
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Open { name, .. } | Self::Close { name, .. } => Some(name),
            Self::LexError { .. } => None,
        }
    }
}
