//! mlcheck core - structural well-formedness checks for markup documents
//!
//! This crate checks whether HTML and XML documents are *structurally*
//! well-formed, and optionally applies a required-structure schema rule to
//! parsed XML trees:
//! - **HTML**: a tag tokenizer feeds a stack-based [`StructuralValidator`]
//!   that knows about void elements and raw-content elements
//! - **XML**: a tree builder produces a [`TreeNode`] root; parse failures
//!   become a single positioned diagnostic and a [`SchemaRule`] can demand
//!   required children on a designated element kind
//!
//! ## Quick Start
//!
//! ```rust
//! use mlcheck_core::{Dialect, DiagnosticKind, ValidationSession};
//!
//! let session = ValidationSession::new();
//! let outcome = session.validate_text("<div><span>text</div>", Dialect::Html);
//!
//! assert_eq!(outcome.stats.tag_or_node_count, 2);
//! let kinds: Vec<_> = outcome.diagnostics.iter().map(|d| d.kind).collect();
//! assert_eq!(
//!     kinds,
//!     vec![
//!         DiagnosticKind::MismatchedClose,
//!         DiagnosticKind::UnclosedElement,
//!         DiagnosticKind::UnclosedElement,
//!     ]
//! );
//! ```
//!
//! ## Schema Rules
//!
//! ```rust
//! use mlcheck_core::{Dialect, SchemaRule, ValidationSession};
//!
//! let rule = SchemaRule::builtin("moodlemc").unwrap();
//! let session = ValidationSession::new().with_schema(rule);
//! let quiz = r#"<quiz><question type="multichoice"><name/></question></quiz>"#;
//!
//! let outcome = session.validate_text(quiz, Dialect::Xml);
//! assert_eq!(outcome.stats.error_count, 2);
//! ```
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

pub mod batch;
pub mod decode;
pub mod diagnostic;
pub mod discovery;
pub mod error;
pub mod markup;
pub mod position;
pub mod schema;
pub mod session;
pub mod sniff;
pub mod stats;
pub mod tree;

// Re-export commonly used types for convenience
pub use batch::{BatchEvent, BatchReport, BatchScan, DirectoryReport, FileOutcome};
pub use decode::{decode_bytes, read_document, DecodedText, TextEncoding};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use discovery::{DirectoryBatch, Discovery};
pub use error::{Error, Result};
pub use markup::{classify, tokenize, validate, ElementKind, StructuralReport, StructuralValidator, TagEvent};
pub use position::{LineIndex, Position};
pub use schema::{check_required_structure, AttributeFilter, SchemaRule};
pub use session::{
    Dialect, DialectChoice, DialectSource, DocumentReport, ValidationOutcome, ValidationSession,
};
pub use sniff::sniff;
pub use stats::{BatchSummary, ValidationStats};
pub use tree::{parse_tree, TreeNode, TreeParseError};
