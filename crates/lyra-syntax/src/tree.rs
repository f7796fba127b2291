//! Owned, arena-backed syntax trees.
//!
//! [`TreeBuilder`] assembles a tree from start/finish/token events, in the
//! manner of rowan's green-node builder. Leaf texts are laid out into a
//! source text as they arrive (separated by a space, or by a newline when
//! [`TreeBuilder::newline`] is called), so every node gets byte ranges and
//! row/column points consistent with that text.

use std::fmt;
use std::ops::Range;

use lyra_common::LineIndex;

use crate::cst::{CstNode, Point};

#[derive(Debug, Clone)]
struct NodeData {
    kind: String,
    named: bool,
    field: Option<String>,
    start: Option<u32>,
    end: u32,
    start_point: Point,
    end_point: Point,
    children: Vec<usize>,
}

/// An immutable syntax tree together with its source text.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<NodeData>,
    root: usize,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            index: self.root,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// A handle to one node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct Node<'a> {
    tree: &'a SyntaxTree,
    index: usize,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.index]
    }

    /// The field name this node is attached under in its parent, if any.
    pub fn field_name(&self) -> Option<&'a str> {
        self.data().field.as_deref()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.byte_range();
        write!(f, "{}@{}..{}", self.data().kind, range.start, range.end)
    }
}

impl<'a> CstNode for Node<'a> {
    fn kind(&self) -> &str {
        &self.data().kind
    }

    fn is_named(&self) -> bool {
        self.data().named
    }

    fn children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .map(|&index| Node {
                tree: self.tree,
                index,
            })
            .collect()
    }

    fn child_by_field_name(&self, field: &str) -> Option<Self> {
        self.children()
            .into_iter()
            .find(|c| c.field_name() == Some(field))
    }

    fn byte_range(&self) -> Range<usize> {
        let data = self.data();
        let start = data.start.unwrap_or(data.end);
        start as usize..data.end as usize
    }

    fn start_point(&self) -> Point {
        self.data().start_point
    }

    fn end_point(&self) -> Point {
        self.data().end_point
    }
}

/// Misuse of the [`TreeBuilder`] event protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// No node or token was ever added.
    Empty,
    /// A second top-level node was started after the root was finished.
    MultipleRoots,
    /// `finish_node` was called with no open node.
    UnbalancedFinish,
    /// `finish` was called while the named node was still open.
    UnclosedNode(String),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::Empty => write!(f, "tree has no root node"),
            TreeError::MultipleRoots => write!(f, "tree has more than one root node"),
            TreeError::UnbalancedFinish => write!(f, "finish_node called with no open node"),
            TreeError::UnclosedNode(kind) => write!(f, "node `{}` was never finished", kind),
        }
    }
}

impl std::error::Error for TreeError {}

/// Builds a [`SyntaxTree`] from a stream of node and token events.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    source: String,
    nodes: Vec<NodeData>,
    stack: Vec<usize>,
    root: Option<usize>,
    pending_field: Option<String>,
    error: Option<TreeError>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the next node or token to its parent under `name`.
    pub fn field(&mut self, name: impl Into<String>) -> &mut Self {
        self.pending_field = Some(name.into());
        self
    }

    /// Open a named interior node.
    pub fn start_node(&mut self, kind: impl Into<String>) -> &mut Self {
        let index = self.push(kind.into(), true, None);
        self.stack.push(index);
        self
    }

    /// Close the most recently opened node.
    pub fn finish_node(&mut self) -> &mut Self {
        match self.stack.pop() {
            Some(index) => {
                let end = self.source.len() as u32;
                let node = &mut self.nodes[index];
                node.start.get_or_insert(end);
                node.end = end;
            }
            None => self.fail(TreeError::UnbalancedFinish),
        }
        self
    }

    /// Add a named leaf, e.g. an `identifier` with its text.
    pub fn token(&mut self, kind: impl Into<String>, text: &str) -> &mut Self {
        self.leaf(kind.into(), true, text);
        self
    }

    /// Add an anonymous leaf (keyword or punctuation); its kind is its text.
    pub fn anonymous(&mut self, text: &str) -> &mut Self {
        self.leaf(text.to_owned(), false, text);
        self
    }

    /// Start the next leaf on a new line.
    pub fn newline(&mut self) -> &mut Self {
        self.source.push('\n');
        self
    }

    pub fn finish(self) -> Result<SyntaxTree, TreeError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if let Some(&open) = self.stack.last() {
            return Err(TreeError::UnclosedNode(self.nodes[open].kind.clone()));
        }
        let root = self.root.ok_or(TreeError::Empty)?;

        let index = LineIndex::new(&self.source);
        let to_point = |offset: u32| {
            let (line, col) = index.line_col(offset);
            Point::new(line as usize - 1, col as usize - 1)
        };
        let mut nodes = self.nodes;
        for node in &mut nodes {
            let start = node.start.unwrap_or(node.end);
            node.start = Some(start);
            node.start_point = to_point(start);
            node.end_point = to_point(node.end);
        }

        Ok(SyntaxTree {
            source: self.source,
            nodes,
            root,
        })
    }

    fn leaf(&mut self, kind: String, named: bool, text: &str) {
        if !self.source.is_empty() && !self.source.ends_with('\n') {
            self.source.push(' ');
        }
        let start = self.source.len() as u32;
        self.source.push_str(text);
        let end = self.source.len() as u32;

        for &open in &self.stack {
            self.nodes[open].start.get_or_insert(start);
        }
        let index = self.push(kind, named, Some(start));
        self.nodes[index].end = end;
    }

    fn push(&mut self, kind: String, named: bool, start: Option<u32>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            named,
            field: self.pending_field.take(),
            start,
            end: start.unwrap_or(0),
            start_point: Point::default(),
            end_point: Point::default(),
            children: Vec::new(),
        });
        match self.stack.last() {
            Some(&parent) => self.nodes[parent].children.push(index),
            None if self.root.is_none() => self.root = Some(index),
            None => self.fail(TreeError::MultipleRoots),
        }
        index
    }

    fn fail(&mut self, err: TreeError) {
        self.error.get_or_insert(err);
    }
}
