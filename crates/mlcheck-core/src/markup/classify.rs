//! Static element classification

use serde::{Deserialize, Serialize};

/// HTML elements that never take a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose interior is not checked for structure until their close
pub const RAW_CONTENT_ELEMENTS: &[&str] = &["pre", "code", "script", "style"];

/// How the structural validator treats an element name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Self-closing; never pushed, closing it is an error
    Void,
    /// Opens a span whose nested tags are not structural
    RawContent,
    /// Regular element tracked on the open-element stack
    Ordinary,
}

/// Classify an element name (ASCII case-insensitive)
pub fn classify(name: &str) -> ElementKind {
    if VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name)) {
        ElementKind::Void
    } else if RAW_CONTENT_ELEMENTS.iter().any(|r| r.eq_ignore_ascii_case(name)) {
        ElementKind::RawContent
    } else {
        ElementKind::Ordinary
    }
}

impl ElementKind {
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn is_raw_content(&self) -> bool {
        matches!(self, Self::RawContent)
    }
}
