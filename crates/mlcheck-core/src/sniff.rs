//! Dialect detection from the start of a document

use crate::session::Dialect;

/// How many characters of the document are inspected
pub const SNIFF_WINDOW: usize = 200;

/// Guess the dialect from the first [`SNIFF_WINDOW`] characters
///
/// An `<html` marker wins over the quiz markers; `None` means the caller has
/// to pick a fallback.
pub fn sniff(text: &str) -> Option<Dialect> {
    let head: String = text.chars().take(SNIFF_WINDOW).collect::<String>().to_lowercase();

    if head.contains("<html") {
        Some(Dialect::Html)
    } else if head.contains("<quiz") || head.contains("<question") {
        Some(Dialect::Xml)
    } else {
        None
    }
}
