//! [`CstNode`] for tree-sitter nodes, so a tree-sitter Lyra grammar feeds
//! the analyzer directly.

use std::ops::Range;

use crate::cst::{CstNode, Point};

impl<'tree> CstNode for ::tree_sitter::Node<'tree> {
    fn kind(&self) -> &str {
        ::tree_sitter::Node::kind(self)
    }

    fn is_named(&self) -> bool {
        ::tree_sitter::Node::is_named(self)
    }

    fn children(&self) -> Vec<Self> {
        let mut cursor = self.walk();
        let children: Vec<Self> = ::tree_sitter::Node::children(self, &mut cursor).collect();
        children
    }

    fn child_by_field_name(&self, field: &str) -> Option<Self> {
        ::tree_sitter::Node::child_by_field_name(self, field)
    }

    fn byte_range(&self) -> Range<usize> {
        ::tree_sitter::Node::byte_range(self)
    }

    fn start_point(&self) -> Point {
        let p = self.start_position();
        Point::new(p.row, p.column)
    }

    fn end_point(&self) -> Point {
        let p = self.end_position();
        Point::new(p.row, p.column)
    }
}
