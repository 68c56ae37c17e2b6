//! Parsed XML element tree

use crate::position::Position;
use serde::{Deserialize, Serialize};

/// One element of a parsed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Element name as written (including any namespace prefix)
    pub kind: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<TreeNode>,
    /// Position of the element's start tag
    pub position: Position,
}

impl TreeNode {
    pub fn new(kind: impl Into<String>, position: Position) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            position,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Value of the first attribute called `name`
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First direct child of the given kind
    pub fn child(&self, kind: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// Direct children of the given kind
    pub fn children_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a TreeNode> + 'a {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    /// All descendants in document (pre-)order, not including `self`
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Descendants of the given kind, optionally restricted to those carrying
    /// an attribute with an exact value
    pub fn find_descendants<'a>(
        &'a self,
        kind: &'a str,
        attribute: Option<(&'a str, &'a str)>,
    ) -> impl Iterator<Item = &'a TreeNode> + 'a {
        self.descendants().filter(move |node| {
            node.kind == kind
                && attribute.map_or(true, |(name, value)| node.attribute(name) == Some(value))
        })
    }

    /// Number of elements in this subtree, `self` included
    pub fn node_count(&self) -> usize {
        1 + self.descendants().count()
    }
}

// Dropped iteratively: descendants are unlinked into a worklist, so no
// node is dropped while it still owns children.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator over the descendants of a node
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> TreeNode {
        TreeNode::new("quiz", Position::new(1, 1))
            .with_child(
                TreeNode::new("question", Position::new(2, 3))
                    .with_attribute("type", "category")
                    .with_child(TreeNode::new("category", Position::new(3, 5))),
            )
            .with_child(
                TreeNode::new("question", Position::new(5, 3))
                    .with_attribute("type", "multichoice")
                    .with_child(TreeNode::new("name", Position::new(6, 5)))
                    .with_child(TreeNode::new("answer", Position::new(7, 5)))
                    .with_child(TreeNode::new("answer", Position::new(8, 5))),
            )
    }

    #[test]
    fn test_descendants_are_pre_order_without_root() {
        let root = quiz();
        let kinds: Vec<_> = root.descendants().map(|n| n.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec!["question", "category", "question", "name", "answer", "answer"]
        );
    }

    #[test]
    fn test_node_count_includes_root() {
        assert_eq!(quiz().node_count(), 7);
        assert_eq!(TreeNode::new("a", Position::UNKNOWN).node_count(), 1);
    }

    #[test]
    fn test_attribute_filtered_search() {
        let root = quiz();
        let found: Vec<_> = root
            .find_descendants("question", Some(("type", "multichoice")))
            .collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].position, Position::new(5, 3));
        assert_eq!(root.find_descendants("question", None).count(), 2);
    }

    #[test]
    fn test_deep_chain_drops_without_recursion() {
        let mut node = TreeNode::new("leaf", Position::UNKNOWN);
        for _ in 0..200_000 {
            node = TreeNode::new("a", Position::UNKNOWN).with_child(node);
        }

        assert_eq!(node.descendants().count(), 200_000);
        drop(node);
    }

    #[test]
    fn test_child_lookup_is_direct_only() {
        let root = quiz();
        assert!(root.child("name").is_none());

        let question = root.child("question").unwrap();
        assert_eq!(question.attribute("type"), Some("category"));
        assert!(question.child("category").is_some());
        assert_eq!(root.children_of_kind("question").count(), 2);
    }
}
