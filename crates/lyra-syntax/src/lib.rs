//! Lyra concrete syntax trees.
//!
//! Lyra source is parsed by an external grammar-driven parser; this crate is
//! the boundary the analyzer reads it through.
//!
//! - [`cst`]: the [`CstNode`] trait, the only node API the analyzer uses
//! - [`kinds`]: the closed [`SyntaxKind`] vocabulary and field names
//! - [`tree`]: an owned, arena-backed tree and its builder
//! - [`sexp`]: a reader for trees written as S-expressions
//! - `tree_sitter` (feature `tree-sitter`): `CstNode` for tree-sitter nodes

mod cursor;
pub mod cst;
pub mod kinds;
pub mod sexp;
pub mod tree;
#[cfg(feature = "tree-sitter")]
pub mod tree_sitter;

pub use cst::{CstNode, Point};
pub use kinds::{field, SyntaxKind};
pub use sexp::SexpError;
pub use tree::{Node, SyntaxTree, TreeBuilder, TreeError};
