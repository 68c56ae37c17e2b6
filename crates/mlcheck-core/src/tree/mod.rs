//! Tree building for the XML dialect
//!
//! The builder enforces XML well-formedness itself; anything it rejects is a
//! single positioned [`TreeParseError`]. Successful parses yield a
//! [`TreeNode`] root the schema rules can walk.

pub mod builder;
pub mod node;

pub use builder::{parse_tree, TreeParseError};
pub use node::{Descendants, TreeNode};
