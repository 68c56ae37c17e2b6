//! XML tree builder on top of the `quick-xml` event reader
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use super::node::TreeNode;
use crate::position::{LineIndex, Position};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// A fatal, positioned XML parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (line {}, column {})", position.line, position.column)]
pub struct TreeParseError {
    /// Where the parser gave up
    pub position: Position,
    /// What the parser reported
    pub message: String,
}

impl TreeParseError {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parse `text` into an element tree
///
/// The document must contain exactly one root element, every element must be
/// closed by a matching end tag, and no text may appear outside the root.
pub fn parse_tree(text: &str) -> Result<TreeNode, TreeParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut index = LineIndex::new(text);
    let mut reader = Reader::from_str(text);
    // end tags are matched against our own stack
    reader.config_mut().check_end_names = false;

    let mut stack: Vec<TreeNode> = Vec::new();
    let mut root: Option<TreeNode> = None;

    loop {
        let offset = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| {
            TreeParseError::new(index.position(reader.error_position() as usize), e.to_string())
        })?;
        let position = index.position(offset);

        match event {
            Event::Start(start) => {
                ensure_single_root(&stack, &root, position)?;
                stack.push(element(&start, position)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&stack, &root, position)?;
                let node = element(&start, position)?;
                attach(&mut stack, &mut root, node);
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                let Some(node) = stack.pop() else {
                    return Err(TreeParseError::new(
                        position,
                        format!("unexpected end tag </{}>", name),
                    ));
                };
                if node.kind != name {
                    return Err(TreeParseError::new(
                        position,
                        format!("mismatched tag: expected </{}> but got </{}>", node.kind, name),
                    ));
                }
                attach(&mut stack, &mut root, node);
            }
            Event::Text(content)
                if stack.is_empty() && !content.iter().all(u8::is_ascii_whitespace) =>
            {
                return Err(TreeParseError::new(
                    position,
                    "text outside the root element",
                ));
            }
            Event::Text(content) => {
                if let Some(i) = content.windows(3).position(|w| w == b"]]>") {
                    return Err(TreeParseError::new(
                        index.position(offset + i),
                        "']]>' is not allowed in character data",
                    ));
                }
                content.unescape().map_err(|e| {
                    TreeParseError::new(position, format!("invalid reference in text: {}", e))
                })?;
            }
            Event::CData(_) if stack.is_empty() => {
                return Err(TreeParseError::new(
                    position,
                    "CDATA section outside the root element",
                ));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let end = index.position(text.len());

    if let Some(open) = stack.last() {
        return Err(TreeParseError::new(
            end,
            format!("unclosed element <{}> at end of input", open.kind),
        ));
    }

    let root = root.ok_or_else(|| TreeParseError::new(end, "no element found"))?;
    debug!(root = %root.kind, nodes = root.node_count(), "parsed XML tree");
    Ok(root)
}

fn element(start: &BytesStart<'_>, position: Position) -> Result<TreeNode, TreeParseError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    if name.is_empty() {
        return Err(TreeParseError::new(position, "element name expected after '<'"));
    }
    if !is_xml_name(&name) {
        return Err(TreeParseError::new(
            position,
            format!("invalid element name '{}'", name),
        ));
    }

    let mut node = TreeNode::new(name, position);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| {
            TreeParseError::new(position, format!("invalid attribute in <{}>: {}", node.kind, e))
        })?;

        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        if !is_xml_name(&key) {
            return Err(TreeParseError::new(
                position,
                format!("invalid attribute name '{}' in <{}>", key, node.kind),
            ));
        }

        let value = attribute.unescape_value().map_err(|e| {
            TreeParseError::new(
                position,
                format!("invalid attribute value in <{}>: {}", node.kind, e),
            )
        })?;
        node.attributes.push((key, value.into_owned()));
    }

    Ok(node)
}

/// XML `Name` production, with every letter and number class accepted
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    let is_start = |c: char| c == '_' || c == ':' || c.is_alphabetic();
    is_start(first)
        && chars.all(|c| {
            is_start(c)
                || c.is_numeric()
                || matches!(c, '-' | '.' | '\u{B7}' | '\u{0300}'..='\u{036F}' | '\u{203F}' | '\u{2040}')
        })
}

fn ensure_single_root(
    stack: &[TreeNode],
    root: &Option<TreeNode>,
    position: Position,
) -> Result<(), TreeParseError> {
    if stack.is_empty() && root.is_some() {
        return Err(TreeParseError::new(
            position,
            "junk after document element",
        ));
    }
    Ok(())
}

fn attach(stack: &mut [TreeNode], root: &mut Option<TreeNode>, node: TreeNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_nested_elements_with_positions() {
        let text = "<?xml version=\"1.0\"?>\n<quiz>\n  <question type=\"multichoice\">\n    <name><text>Q1</text></name>\n  </question>\n</quiz>\n";
        let root = parse_tree(text).unwrap();

        assert_eq!(root.kind, "quiz");
        assert_eq!(root.position, Position::new(2, 1));
        assert_eq!(root.node_count(), 4);

        let question = root.child("question").unwrap();
        assert_eq!(question.position, Position::new(3, 3));
        assert_eq!(question.attribute("type"), Some("multichoice"));
        assert!(question.child("name").unwrap().child("text").is_some());
    }

    #[test]
    fn test_empty_elements_become_children() {
        let root = parse_tree("<a><b/><c x='1'/></a>").unwrap();
        let kinds: Vec<_> = root.children.iter().map(|c| c.kind.as_str()).collect();

        assert_eq!(kinds, vec!["b", "c"]);
        assert_eq!(root.children[1].attribute("x"), Some("1"));
    }

    #[test]
    fn test_self_closed_root() {
        let root = parse_tree("<quiz/>").unwrap();
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn test_mismatched_end_tag_fails() {
        let error = parse_tree("<a>\n<b></a>").unwrap_err();
        assert_eq!(error.message, "mismatched tag: expected </b> but got </a>");
        assert_eq!(error.position, Position::new(2, 4));
    }

    #[test]
    fn test_end_tag_without_start_fails() {
        let error = parse_tree("</a>").unwrap_err();
        assert_eq!(error.message, "unexpected end tag </a>");
        assert_eq!(error.position, Position::new(1, 1));
    }

    #[test]
    fn test_unclosed_root_fails() {
        assert!(parse_tree("<quiz><question></question>").is_err());
    }

    #[test]
    fn test_empty_document_fails() {
        let error = parse_tree("   \n").unwrap_err();
        assert_eq!(error.message, "no element found");
    }

    #[test]
    fn test_second_root_fails() {
        let error = parse_tree("<a/>\n<b/>").unwrap_err();
        assert_eq!(error.message, "junk after document element");
        assert_eq!(error.position, Position::new(2, 1));
    }

    #[test]
    fn test_text_outside_root_fails() {
        let error = parse_tree("hello <a/>").unwrap_err();
        assert_eq!(error.message, "text outside the root element");
    }

    #[test]
    fn test_comments_and_doctype_outside_root_are_fine() {
        assert!(parse_tree("<!-- header -->\n<!DOCTYPE quiz>\n<quiz/>\n<!-- footer -->").is_ok());
    }

    #[test]
    fn test_bare_ampersand_in_text_fails() {
        let error = parse_tree("<a>fish & chips</a>").unwrap_err();
        assert!(error.message.starts_with("invalid reference in text"), "{}", error.message);
        assert_eq!(error.position, Position::new(1, 4));
    }

    #[test]
    fn test_predefined_and_character_references_are_fine() {
        let root = parse_tree("<a t=\"x &amp; y\">1 &lt; 2 &#233;</a>").unwrap();
        assert_eq!(root.attribute("t"), Some("x & y"));
    }

    #[test]
    fn test_undeclared_entity_fails() {
        assert!(parse_tree("<a>&nbsp;</a>").is_err());
        assert!(parse_tree("<a b='&bogus;'/>").is_err());
    }

    #[test]
    fn test_cdata_terminator_in_text_fails() {
        let error = parse_tree("<a>\n  x ]]> y</a>").unwrap_err();
        assert_eq!(error.message, "']]>' is not allowed in character data");
        assert_eq!(error.position, Position::new(2, 5));
    }

    #[test]
    fn test_invalid_element_names_fail() {
        let error = parse_tree("<1a/>").unwrap_err();
        assert_eq!(error.message, "invalid element name '1a'");

        let error = parse_tree("<a<b>x</a>").unwrap_err();
        assert_eq!(error.message, "invalid element name 'a<b'");

        assert!(parse_tree("<ns:q-1.x _y='1'/>").is_ok());
        assert!(parse_tree("<zażółć/>").is_ok());
    }

    #[test]
    fn test_stray_angle_bracket_in_text_fails() {
        let error = parse_tree("<a>1 < 2</a>").unwrap_err();
        assert!(!error.message.contains("<>"), "{}", error.message);
        assert_eq!(error.position.line, 1);
    }

    #[test]
    fn test_invalid_attribute_name_fails() {
        let error = parse_tree("<a 1x='y'/>").unwrap_err();
        assert_eq!(error.message, "invalid attribute name '1x' in <a>");
    }

    #[test]
    fn test_error_display_includes_position() {
        let error = TreeParseError::new(Position::new(4, 2), "boom");
        assert_eq!(error.to_string(), "boom (line 4, column 2)");
    }
}
