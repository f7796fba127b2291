//! Read-only view of a CST node.

use std::ops::Range;

use lyra_common::{Location, Position};
use rowan::{TextRange, TextSize};

use crate::kinds::SyntaxKind;

/// A 0-based row/column position as reported by the parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Point { row, column }
    }

    /// The 1-based position used in locations and messages.
    pub fn to_position(self) -> Position {
        Position::new(self.row as u32 + 1, self.column as u32 + 1)
    }
}

/// A node of a concrete syntax tree.
///
/// Nodes are cheap handles (`Copy`) into a tree owned elsewhere. Named
/// nodes are grammar rules and named tokens; anonymous nodes are
/// punctuation and keywords whose kind is their own text.
pub trait CstNode: Copy {
    /// The grammar tag, e.g. `"function_definition"`.
    fn kind(&self) -> &str;
    fn is_named(&self) -> bool;
    /// All children, named and anonymous, in source order.
    fn children(&self) -> Vec<Self>;
    fn child_by_field_name(&self, field: &str) -> Option<Self>;
    fn byte_range(&self) -> Range<usize>;
    fn start_point(&self) -> Point;
    fn end_point(&self) -> Point;

    fn named_children(&self) -> Vec<Self> {
        self.children().into_iter().filter(|c| c.is_named()).collect()
    }

    fn first_named_child(&self) -> Option<Self> {
        self.children().into_iter().find(|c| c.is_named())
    }

    /// The closed kind for this node, `None` for tags the analyzer does not know.
    fn syntax_kind(&self) -> Option<SyntaxKind> {
        SyntaxKind::from_name(self.kind())
    }

    /// The node's source text. Out-of-range or non-boundary offsets give `""`.
    fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.byte_range()).unwrap_or("")
    }

    fn location(&self, file: Option<&str>) -> Location {
        let range = self.byte_range();
        Location::new(
            file.map(str::to_owned),
            TextRange::new(
                TextSize::from(range.start as u32),
                TextSize::from(range.end as u32),
            ),
            self.start_point().to_position(),
            self.end_point().to_position(),
        )
    }
}
