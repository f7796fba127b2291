//! Lyra semantic analysis: collection, type checking and diagnostics.
//!
//! Analysis runs in two phases over a concrete syntax tree supplied by an
//! external parser:
//!
//! 1. [`collect`] lowers the CST into a [`Program`] and fills a
//!    [`SymbolTable`] with every top-level declaration.
//! 2. [`check`] walks the program against the table, derives a type for
//!    every expression it can, and reports type errors.
//!
//! Neither phase stops at the first problem. Both return every error they
//! found next to their best-effort output, so editor tooling keeps working
//! on files that do not type-check.
//!
//! # Architecture
//!
//! - `collect`: CST → AST lowering and symbol registration
//! - `check`: AST type checking against the symbol table
//! - [`error`]: collection and type error taxonomies
//! - [`diagnostics`]: ariadne and JSON rendering of both

mod check;
mod collect;
pub mod diagnostics;
pub mod error;

use lyra_ast::symbols::SymbolTable;
use lyra_ast::Program;
use lyra_syntax::CstNode;
use lyra_types::Ty;
use rowan::TextRange;
use rustc_hash::FxHashMap;

pub use crate::check::TypeckResult;
pub use crate::collect::Collected;
pub use crate::diagnostics::DiagnosticOptions;
pub use crate::error::{CollectionError, MemberKind, MismatchContext, TypeError};

/// Settings for one analysis run.
#[derive(Clone, Debug, Default)]
pub struct AnalysisOptions {
    /// Source file name recorded in every [`lyra_common::Location`].
    pub file: Option<String>,
}

impl AnalysisOptions {
    pub fn with_file(file: impl Into<String>) -> Self {
        AnalysisOptions {
            file: Some(file.into()),
        }
    }
}

/// Build the AST and symbol table for the tree rooted at `root`.
///
/// `source` is the text the tree's byte ranges index into.
#[tracing::instrument(skip_all, fields(file = ?options.file))]
pub fn collect<N: CstNode>(root: N, source: &str, options: &AnalysisOptions) -> Collected {
    let mut collector = collect::Collector::new(source, options);
    collector.collect_program(root);
    collector.finish()
}

/// Type-check a collected program.
///
/// The table gains a scope for every function clause, lambda and block
/// that was checked.
#[tracing::instrument(skip_all, fields(statements = program.statements.len()))]
pub fn check(program: &Program, table: &mut SymbolTable) -> TypeckResult {
    let mut checker = check::Checker::new(program, table);
    checker.check_program();
    checker.finish()
}

impl TypeckResult {
    /// The derived type of the expression spanning `range`, if known.
    pub fn type_at(&self, range: TextRange) -> Option<&Ty> {
        self.types.get(&range)
    }

    pub fn render_errors(&self, source: &str, filename: &str, options: &DiagnosticOptions) -> Vec<String> {
        self.errors
            .iter()
            .map(|err| diagnostics::render_type_error(err, source, filename, options))
            .collect()
    }
}

/// The output of both analysis phases.
#[derive(Debug)]
pub struct Analysis {
    pub program: Program,
    pub table: SymbolTable,
    pub collection_errors: Vec<CollectionError>,
    pub types: FxHashMap<TextRange, Ty>,
    pub type_errors: Vec<TypeError>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.collection_errors.is_empty() || !self.type_errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.collection_errors.len() + self.type_errors.len()
    }

    /// Render every error, collection errors first.
    pub fn render_errors(&self, source: &str, filename: &str, options: &DiagnosticOptions) -> Vec<String> {
        let collection = self
            .collection_errors
            .iter()
            .map(|err| diagnostics::render_collection_error(err, source, filename, options));
        let types = self
            .type_errors
            .iter()
            .map(|err| diagnostics::render_type_error(err, source, filename, options));
        collection.chain(types).collect()
    }
}

/// Collect and check in one call. Checking runs even when collection
/// reported errors.
pub fn analyze<N: CstNode>(root: N, source: &str, options: &AnalysisOptions) -> Analysis {
    let Collected {
        program,
        mut table,
        errors: collection_errors,
    } = collect(root, source, options);
    let TypeckResult {
        types,
        errors: type_errors,
    } = check(&program, &mut table);
    tracing::debug!(
        collection_errors = collection_errors.len(),
        type_errors = type_errors.len(),
        "analysis finished"
    );
    Analysis {
        program,
        table,
        collection_errors,
        types,
        type_errors,
    }
}
