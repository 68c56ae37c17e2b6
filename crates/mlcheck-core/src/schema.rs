//! Required-structure schema rules for parsed XML trees
//!
//! A rule names one element kind (optionally narrowed by an attribute
//! value), the direct children every such element must carry, and one child
//! kind that must occur at least once. Rules are plain data: the built-in
//! registry is a table, not a set of hand-written checkers.
//!
//! Copyright (c) 2025 Igor Brzezek
//! Licensed under the MIT license

use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::tree::TreeNode;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Registry of built-in rule names, in the order they are listed to users
const BUILTIN_RULES: &[&str] = &["moodlemc"];

/// An exact-value attribute restriction on target elements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub name: String,
    pub value: String,
}

impl AttributeFilter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A required-structure rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRule {
    /// Name the rule is selected by
    pub name: String,
    /// How target elements are referred to in messages
    pub label: String,
    pub target_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributeFilter>,
    pub required_children: Vec<String>,
    pub repeatable_child: String,
}

impl SchemaRule {
    /// Multiple-choice questions of a Moodle XML quiz export
    pub fn moodle_multichoice() -> Self {
        Self {
            name: "moodlemc".to_string(),
            label: "multichoice question".to_string(),
            target_kind: "question".to_string(),
            attribute: Some(AttributeFilter::new("type", "multichoice")),
            required_children: vec!["name".to_string(), "questiontext".to_string()],
            repeatable_child: "answer".to_string(),
        }
    }

    /// Look up a built-in rule by name (ASCII case-insensitive)
    pub fn builtin(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "moodlemc" => Ok(Self::moodle_multichoice()),
            _ => Err(Error::UnknownSchemaRule {
                name: name.to_string(),
                available: Self::builtin_names().join(", "),
            }),
        }
    }

    /// Names accepted by [`builtin`](Self::builtin)
    pub fn builtin_names() -> &'static [&'static str] {
        BUILTIN_RULES
    }

    /// Check every target element below `root`
    pub fn check(&self, root: &TreeNode) -> Vec<Diagnostic> {
        let filter = self
            .attribute
            .as_ref()
            .map(|f| (f.name.as_str(), f.value.as_str()));
        let targets = root.find_descendants(&self.target_kind, filter);

        let mut diagnostics = Vec::new();
        for target in targets {
            diagnostics.extend(self.check_target(target));
        }

        debug!(rule = %self.name, diagnostics = diagnostics.len(), "schema rule applied");
        diagnostics
    }

    fn check_target(&self, target: &TreeNode) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .required_children
            .iter()
            .filter(|kind| target.child(kind).is_none())
            .map(|kind| {
                Diagnostic::missing_required_child(
                    target.position,
                    format!("Missing <{}> tag in {}", kind, self.label),
                )
            })
            .collect();

        let repeated = target.children_of_kind(&self.repeatable_child).count();
        trace!(kind = %target.kind, line = target.position.line, repeated, "checking target");
        if repeated == 0 {
            diagnostics.push(Diagnostic::missing_required_child(
                target.position,
                format!("No <{}> tags found in {}", self.repeatable_child, self.label),
            ));
        }

        diagnostics
    }
}

/// Check required structure for an ad-hoc rule without an attribute filter
///
/// Every descendant of `root` whose kind is `target_kind` must carry each of
/// `required_children` as a direct child and at least one `repeatable_child`.
pub fn check_required_structure(
    root: &TreeNode,
    target_kind: &str,
    required_children: &[&str],
    repeatable_child: &str,
) -> Vec<Diagnostic> {
    let rule = SchemaRule {
        name: target_kind.to_string(),
        label: format!("{} element", target_kind),
        target_kind: target_kind.to_string(),
        attribute: None,
        required_children: required_children.iter().map(|s| s.to_string()).collect(),
        repeatable_child: repeatable_child.to_string(),
    };
    rule.check(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;
    use crate::position::Position;
    use pretty_assertions::assert_eq;

    fn question(kind: &str, line: usize) -> TreeNode {
        TreeNode::new("question", Position::new(line, 3)).with_attribute("type", kind)
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_complete_question_passes() {
        let root = TreeNode::new("quiz", Position::new(1, 1)).with_child(
            question("multichoice", 2)
                .with_child(TreeNode::new("name", Position::new(3, 5)))
                .with_child(TreeNode::new("questiontext", Position::new(4, 5)))
                .with_child(TreeNode::new("answer", Position::new(5, 5))),
        );

        assert!(SchemaRule::moodle_multichoice().check(&root).is_empty());
    }

    #[test]
    fn test_missing_children_in_declared_order() {
        let root = TreeNode::new("quiz", Position::new(1, 1)).with_child(question("multichoice", 2));
        let diagnostics = SchemaRule::moodle_multichoice().check(&root);

        assert_eq!(
            messages(&diagnostics),
            vec![
                "Missing <name> tag in multichoice question",
                "Missing <questiontext> tag in multichoice question",
                "No <answer> tags found in multichoice question",
            ]
        );
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::MissingRequiredChild && d.position() == Position::new(2, 3)));
    }

    #[test]
    fn test_other_question_types_are_ignored() {
        let root = TreeNode::new("quiz", Position::new(1, 1))
            .with_child(question("category", 2))
            .with_child(question("truefalse", 5));

        assert!(SchemaRule::moodle_multichoice().check(&root).is_empty());
    }

    #[test]
    fn test_root_is_never_a_target() {
        let root = question("multichoice", 1);
        assert!(SchemaRule::moodle_multichoice().check(&root).is_empty());
    }

    #[test]
    fn test_children_must_be_direct() {
        let root = TreeNode::new("quiz", Position::new(1, 1)).with_child(
            question("multichoice", 2)
                .with_child(TreeNode::new("name", Position::new(3, 5)))
                .with_child(TreeNode::new("questiontext", Position::new(4, 5)))
                .with_child(
                    TreeNode::new("answers", Position::new(5, 5))
                        .with_child(TreeNode::new("answer", Position::new(6, 7))),
                ),
        );

        assert_eq!(
            messages(&SchemaRule::moodle_multichoice().check(&root)),
            vec!["No <answer> tags found in multichoice question"]
        );
    }

    #[test]
    fn test_ad_hoc_rule_without_filter() {
        let root = TreeNode::new("library", Position::new(1, 1))
            .with_child(TreeNode::new("book", Position::new(2, 3)))
            .with_child(
                TreeNode::new("book", Position::new(3, 3))
                    .with_child(TreeNode::new("title", Position::new(3, 9)))
                    .with_child(TreeNode::new("author", Position::new(3, 25))),
            );
        let diagnostics = check_required_structure(&root, "book", &["title"], "author");

        assert_eq!(
            messages(&diagnostics),
            vec!["Missing <title> tag in book element", "No <author> tags found in book element"]
        );
    }

    #[test]
    fn test_builtin_lookup() {
        assert_eq!(SchemaRule::builtin("MoodleMC").unwrap(), SchemaRule::moodle_multichoice());
        assert_eq!(SchemaRule::builtin_names(), ["moodlemc"]);

        let error = SchemaRule::builtin("docbook").unwrap_err();
        assert_eq!(
            error.to_string(),
            "Unknown schema rule 'docbook' (available: moodlemc)"
        );
    }
}
