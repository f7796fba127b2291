//! Lyra abstract syntax tree and symbol table.
//!
//! The AST is the semantic source of truth after collection: every node owns
//! its [`Location`], and annotated types are already [`lyra_types::Ty`]
//! values. The [`symbols`] table indexes top-level declarations by
//! [`StmtId`] rather than copying them.
//!
//! # Architecture
//!
//! - [`stmt`]: `Program`, statements, function clauses
//! - [`expr`]: expressions and operators
//! - [`pat`]: parameter patterns
//! - [`symbols`]: scope tree, symbol registries, trait bookkeeping

pub mod expr;
pub mod pat;
pub mod stmt;
pub mod symbols;

pub use expr::{BinaryOp, Expr, ExprKind, UnaryOp};
pub use lyra_common::Location;
pub use pat::{Pattern, PatternKind};
pub use stmt::{Clause, FunctionDef, Program, Stmt, StmtId, StmtKind, TypeDecl, VarDecl, VarKeyword};
