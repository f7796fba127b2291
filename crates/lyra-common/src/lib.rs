//! Shared types for the Lyra front end.
//!
//! Every AST node, symbol and diagnostic carries a [`span::Location`];
//! [`span::LineIndex`] converts byte offsets into line/column pairs.

pub mod span;

pub use span::{LineIndex, Location, Position};
