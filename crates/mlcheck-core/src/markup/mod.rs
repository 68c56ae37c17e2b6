//! Tag-stream checking for the HTML dialect
//!
//! The pipeline is `text -> tokenize -> [TagEvent] -> validate`. The
//! validator never looks at text, so it can be driven directly from a
//! hand-built event list in tests.

pub mod classify;
pub mod event;
pub mod tokenizer;
pub mod validator;

pub use classify::{classify, ElementKind, RAW_CONTENT_ELEMENTS, VOID_ELEMENTS};
pub use event::TagEvent;
pub use tokenizer::tokenize;
pub use validator::{validate, StructuralReport, StructuralValidator};
