//! Stack-based structural validator for tag event streams
//!
//! The validator keeps a stack of open ordinary elements and a raw-content
//! context. Void and raw-content elements are never pushed: void elements
//! close themselves, and raw-content elements are tracked only through the
//! raw context. A mismatched close is reported without popping, so later
//! closes are still judged against the real nesting.
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use super::classify::{classify, ElementKind};
use super::event::TagEvent;
use crate::diagnostic::Diagnostic;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Result of validating one tag stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralReport {
    /// Diagnostics in document order, unclosed elements last
    pub diagnostics: Vec<Diagnostic>,
    /// Number of open-tag events seen, whatever their classification
    pub tag_count: usize,
}

impl StructuralReport {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Incremental structural validator
///
/// Feed events in document order with [`feed`](Self::feed), then call
/// [`finish`](Self::finish) to account for elements left open.
#[derive(Debug, Default)]
pub struct StructuralValidator {
    stack: Vec<String>,
    /// Name of the element that opened the active raw context, if any
    raw_opener: Option<String>,
    tag_count: usize,
    diagnostics: Vec<Diagnostic>,
}

impl StructuralValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one event
    pub fn feed(&mut self, event: &TagEvent) {
        match event {
            TagEvent::LexError { message, position } => {
                self.diagnostics
                    .push(Diagnostic::lex_error(*position, message.clone()));
            }
            TagEvent::Open { name, .. } => self.open(name),
            TagEvent::Close { name, position } => self.close(name, *position),
        }
    }

    fn open(&mut self, name: &str) {
        self.tag_count += 1;

        if self.in_raw_context() {
            return;
        }

        match classify(name) {
            ElementKind::RawContent => {
                trace!(element = name, "entering raw content");
                self.raw_opener = Some(name.to_string());
            }
            ElementKind::Void => {}
            ElementKind::Ordinary => self.stack.push(name.to_string()),
        }
    }

    fn close(&mut self, name: &str, position: Position) {
        let kind = classify(name);

        if self.in_raw_context() {
            if !kind.is_raw_content() {
                return;
            }
            // The opener name is not compared: any raw-content close ends
            // the span, and raw-content elements were never pushed.
            trace!(element = name, opener = ?self.raw_opener, "leaving raw content");
            self.raw_opener = None;
            return;
        }

        if kind.is_void() {
            self.diagnostics
                .push(Diagnostic::superfluous_void_close(name, position));
            return;
        }

        match self.stack.last() {
            None => self
                .diagnostics
                .push(Diagnostic::unmatched_close(name, position)),
            Some(top) if top == name => {
                self.stack.pop();
            }
            Some(top) => {
                let diagnostic = Diagnostic::mismatched_close(top, name, position);
                self.diagnostics.push(diagnostic);
            }
        }
    }

    /// Whether a raw-content span is currently open
    pub fn in_raw_context(&self) -> bool {
        self.raw_opener.is_some()
    }

    /// Currently open ordinary elements, innermost last
    pub fn open_elements(&self) -> &[String] {
        &self.stack
    }

    pub fn tag_count(&self) -> usize {
        self.tag_count
    }

    /// Close out the document: every element still on the stack is reported,
    /// innermost first
    pub fn finish(mut self) -> StructuralReport {
        while let Some(name) = self.stack.pop() {
            self.diagnostics.push(Diagnostic::unclosed_element(&name));
        }

        StructuralReport {
            diagnostics: self.diagnostics,
            tag_count: self.tag_count,
        }
    }
}

/// Validate a complete event stream
pub fn validate<'a, I>(events: I) -> StructuralReport
where
    I: IntoIterator<Item = &'a TagEvent>,
{
    let mut validator = StructuralValidator::new();
    for event in events {
        validator.feed(event);
    }
    validator.finish()
}
