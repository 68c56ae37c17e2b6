//! Validation session: dialect selection and per-document orchestration
//!
//! A [`ValidationSession`] holds only configuration (the optional schema
//! rule). Every call builds fresh per-document state, so one session can
//! validate any number of documents in sequence.
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use crate::decode::{read_document, TextEncoding};
use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::markup::{tokenize, validate};
use crate::schema::SchemaRule;
use crate::sniff::sniff;
use crate::stats::ValidationStats;
use crate::tree::parse_tree;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, instrument, warn};

/// The two supported markup dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dialect {
    /// Tag dialect with void and raw-content elements
    Html,
    /// Tree dialect, checked by building the element tree
    Xml,
}

impl Dialect {
    /// Lowercase file extensions (without the dot) belonging to the dialect
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Html => &["html", "htm"],
            Self::Xml => &["xml"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Xml => "XML",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "h" => Ok(Self::Html),
            "xml" | "x" => Ok(Self::Xml),
            other => Err(format!("unknown dialect '{}' (expected html or xml)", other)),
        }
    }
}

/// How the dialect of a document is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectChoice {
    /// Use this dialect regardless of content
    Fixed(Dialect),
    /// Sniff the content, using `fallback` when nothing is recognised
    Sniff { fallback: Dialect },
}

impl Default for DialectChoice {
    fn default() -> Self {
        Self::Sniff {
            fallback: Dialect::Xml,
        }
    }
}

impl DialectChoice {
    pub fn resolve(&self, text: &str) -> (Dialect, DialectSource) {
        match *self {
            Self::Fixed(dialect) => (dialect, DialectSource::Forced),
            Self::Sniff { fallback } => match sniff(text) {
                Some(dialect) => (dialect, DialectSource::Detected),
                None => (fallback, DialectSource::Fallback),
            },
        }
    }
}

/// Where the dialect of a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialectSource {
    Forced,
    Detected,
    /// Sniffing found nothing and the fallback was used
    Fallback,
}

/// Diagnostics and counts for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub dialect: Dialect,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ValidationStats,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// A validated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub path: PathBuf,
    pub encoding: TextEncoding,
    pub dialect_source: DialectSource,
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
}

/// Per-run validation settings
#[derive(Debug, Clone, Default)]
pub struct ValidationSession {
    schema: Option<SchemaRule>,
}

impl ValidationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `rule` to every successfully parsed XML document
    pub fn with_schema(mut self, rule: SchemaRule) -> Self {
        self.schema = Some(rule);
        self
    }

    pub fn schema(&self) -> Option<&SchemaRule> {
        self.schema.as_ref()
    }

    /// Validate already decoded text in the given dialect
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn validate_text(&self, text: &str, dialect: Dialect) -> ValidationOutcome {
        let (diagnostics, count) = match dialect {
            Dialect::Html => self.validate_html(text),
            Dialect::Xml => self.validate_xml(text),
        };

        let stats = ValidationStats::new(count, diagnostics.len());
        debug!(tags = stats.tag_or_node_count, errors = stats.error_count, "document validated");

        ValidationOutcome {
            dialect,
            diagnostics,
            stats,
        }
    }

    /// Read, decode and validate a file
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn validate_file(&self, path: &Path, choice: DialectChoice) -> Result<DocumentReport> {
        let decoded = read_document(path)?;
        let (dialect, dialect_source) = choice.resolve(&decoded.text);

        if dialect_source == DialectSource::Fallback {
            warn!(%dialect, "could not determine document dialect, using fallback");
        }

        Ok(DocumentReport {
            path: path.to_path_buf(),
            encoding: decoded.encoding,
            dialect_source,
            outcome: self.validate_text(&decoded.text, dialect),
        })
    }

    fn validate_html(&self, text: &str) -> (Vec<Diagnostic>, usize) {
        if let Some(rule) = &self.schema {
            debug!(rule = %rule.name, "schema rules apply to XML only, ignoring");
        }

        let events = tokenize(text);
        let report = validate(&events);
        (report.diagnostics, report.tag_count)
    }

    fn validate_xml(&self, text: &str) -> (Vec<Diagnostic>, usize) {
        match parse_tree(text) {
            Ok(root) => {
                let diagnostics = self
                    .schema
                    .as_ref()
                    .map(|rule| rule.check(&root))
                    .unwrap_or_default();
                (diagnostics, root.node_count())
            }
            Err(error) => {
                debug!(%error, "tree parse failed");
                (
                    vec![Diagnostic::tree_parse_error(error.position, error.message)],
                    0,
                )
            }
        }
    }
}
