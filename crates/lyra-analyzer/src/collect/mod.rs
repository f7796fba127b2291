//! CST → AST collection.
//!
//! A single top-down walk over the concrete tree. Every top-level node is
//! visited exactly once; declarations are pushed onto the [`Program`] and
//! then registered in the [`SymbolTable`]. Malformed input never stops the
//! walk: absent required nodes and unknown node kinds become
//! [`CollectionError`]s and the affected construct is skipped or left
//! partially empty.

mod expressions;
mod functions;
mod traits;
mod types;

use lyra_ast::symbols::SymbolTable;
use lyra_ast::{Program, Stmt, StmtId, StmtKind, VarDecl, VarKeyword};
use lyra_common::Location;
use lyra_syntax::{field, CstNode, SyntaxKind};
use tracing::{debug, trace};

use crate::error::CollectionError;
use crate::AnalysisOptions;

/// Output of [`crate::collect`].
#[derive(Debug)]
pub struct Collected {
    pub program: Program,
    pub table: SymbolTable,
    pub errors: Vec<CollectionError>,
}

pub(crate) struct Collector<'s> {
    source: &'s str,
    file: Option<String>,
    program: Program,
    table: SymbolTable,
    errors: Vec<CollectionError>,
}

impl<'s> Collector<'s> {
    pub(crate) fn new(source: &'s str, options: &AnalysisOptions) -> Self {
        Collector {
            source,
            file: options.file.clone(),
            program: Program::new(),
            table: SymbolTable::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Collected {
        Collected {
            program: self.program,
            table: self.table,
            errors: self.errors,
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn location<N: CstNode>(&self, node: N) -> Location {
        node.location(self.file.as_deref())
    }

    fn text<N: CstNode>(&self, node: N) -> &'s str {
        node.text(self.source).trim()
    }

    fn error(&mut self, err: CollectionError) {
        debug!(%err, "collection error");
        self.errors.push(err);
    }

    fn missing<N: CstNode>(&mut self, expected: &'static str, parent: N) {
        let location = self.location(parent);
        self.error(CollectionError::MissingNode {
            expected,
            parent: parent.kind().to_owned(),
            location,
        });
    }

    fn malformed<N: CstNode>(&mut self, context: &'static str, node: N) {
        let location = self.location(node);
        self.error(CollectionError::MalformedNode {
            context,
            kind: node.kind().to_owned(),
            location,
        });
    }

    /// The `field` child of `node`, recording a missing-node error if absent.
    fn required_field<N: CstNode>(&mut self, node: N, name: &'static str) -> Option<N> {
        let child = node.child_by_field_name(name);
        if child.is_none() {
            self.missing(name, node);
        }
        child
    }

    fn child_of_kind<N: CstNode>(node: N, kind: SyntaxKind) -> Option<N> {
        node.named_children()
            .into_iter()
            .find(|c| c.syntax_kind() == Some(kind))
    }

    fn children_of_kind<N: CstNode>(node: N, kind: SyntaxKind) -> Vec<N> {
        node.named_children()
            .into_iter()
            .filter(|c| c.syntax_kind() == Some(kind))
            .collect()
    }

    fn has_visibility<N: CstNode>(node: N) -> bool {
        Self::child_of_kind(node, SyntaxKind::VISIBILITY).is_some()
    }

    // ── Program ────────────────────────────────────────────────────────

    pub(crate) fn collect_program<N: CstNode>(&mut self, root: N) {
        for child in root.named_children() {
            self.collect_top_level(child);
        }
        debug!(
            statements = self.program.statements.len(),
            errors = self.errors.len(),
            "collection finished"
        );
    }

    fn collect_top_level<N: CstNode>(&mut self, node: N) {
        match node.syntax_kind() {
            Some(SyntaxKind::STATEMENT) => {
                for child in node.named_children() {
                    self.collect_top_level(child);
                }
            }
            Some(SyntaxKind::TRAIT_DECLARATION) => self.collect_trait(node),
            Some(SyntaxKind::TRAIT_IMPLEMENTATION) => self.collect_trait_impl(node),
            Some(SyntaxKind::TYPE_DECLARATION) if Self::trait_child(node).is_some() => {
                if let Some(inner) = Self::trait_child(node) {
                    self.collect_top_level(inner);
                }
            }
            Some(
                SyntaxKind::TYPE_DECLARATION
                | SyntaxKind::STRUCT_TYPE
                | SyntaxKind::DATA_TYPE
                | SyntaxKind::FUNCTION_DEFINITION
                | SyntaxKind::DECLARATION
                | SyntaxKind::CONST_DECLARATION
                | SyntaxKind::EXPRESSION_STATEMENT
                | SyntaxKind::RETURN_STATEMENT,
            ) => {
                if let Some(stmt) = self.collect_statement(node) {
                    let id = self.program.push(stmt);
                    self.register(id);
                }
            }
            Some(SyntaxKind::COMMENT) => {}
            Some(SyntaxKind::ERROR) => self.malformed("top-level", node),
            _ => trace!(kind = node.kind(), "skipping top-level node"),
        }
    }

    fn trait_child<N: CstNode>(node: N) -> Option<N> {
        node.named_children().into_iter().find(|c| {
            matches!(
                c.syntax_kind(),
                Some(SyntaxKind::TRAIT_DECLARATION | SyntaxKind::TRAIT_IMPLEMENTATION)
            )
        })
    }

    /// Bind a freshly pushed top-level statement in the global scope.
    fn register(&mut self, id: StmtId) {
        let Some(stmt) = self.program.get(id) else {
            return;
        };
        let location = stmt.location.clone();
        let result = match &stmt.kind {
            StmtKind::TypeDecl(decl) => {
                let name = decl.name.clone();
                self.table.register_type(&name, id, location)
            }
            StmtKind::FunctionDef(def) => {
                let name = def.name.clone();
                self.table.register_function(&name, id, location)
            }
            StmtKind::VarDecl(decl) => {
                let name = decl.name.clone();
                self.table.register_variable(&name, id, location)
            }
            StmtKind::Expr(_) | StmtKind::Return(_) => Ok(()),
        };
        if let Err(dup) = result {
            self.error(dup.into());
        }
    }

    // ── Statements ─────────────────────────────────────────────────────

    /// Build the statement for `node`, at top level or inside a block.
    /// Returns `None` for nodes that are not statements.
    fn collect_statement<N: CstNode>(&mut self, node: N) -> Option<Stmt> {
        let location = self.location(node);
        match node.syntax_kind()? {
            SyntaxKind::STATEMENT => {
                let inner = node.first_named_child()?;
                self.collect_statement(inner)
            }
            SyntaxKind::TYPE_DECLARATION | SyntaxKind::STRUCT_TYPE | SyntaxKind::DATA_TYPE => {
                self.collect_type_decl(node)
            }
            SyntaxKind::FUNCTION_DEFINITION => self.collect_function(node),
            SyntaxKind::DECLARATION | SyntaxKind::CONST_DECLARATION => self.collect_var_decl(node),
            SyntaxKind::EXPRESSION_STATEMENT => {
                let Some(inner) = node.first_named_child() else {
                    self.missing("expression", node);
                    return None;
                };
                let expr = self.collect_expression(inner)?;
                Some(Stmt::new(StmtKind::Expr(expr), location))
            }
            SyntaxKind::RETURN_STATEMENT => {
                let value = node
                    .child_by_field_name(field::VALUE)
                    .or_else(|| node.first_named_child())
                    .and_then(|v| self.collect_expression(v));
                Some(Stmt::new(StmtKind::Return(value), location))
            }
            SyntaxKind::TRAIT_DECLARATION | SyntaxKind::TRAIT_IMPLEMENTATION => {
                debug!(kind = node.kind(), "trait outside top level ignored");
                None
            }
            _ => None,
        }
    }

    /// `let x: Int = 1`, `var y = 2`, `const z = 3`.
    fn collect_var_decl<N: CstNode>(&mut self, node: N) -> Option<Stmt> {
        let location = self.location(node);
        let keyword = match node.child_by_field_name(field::KEYWORD) {
            Some(kw) => {
                let text = self.text(kw);
                match VarKeyword::from_keyword(text) {
                    Some(keyword) => keyword,
                    None => {
                        self.malformed("keyword", kw);
                        VarKeyword::Let
                    }
                }
            }
            None if node.syntax_kind() == Some(SyntaxKind::CONST_DECLARATION) => VarKeyword::Const,
            None => {
                self.missing(field::KEYWORD, node);
                VarKeyword::Let
            }
        };

        let name = self.required_field(node, field::NAME)?;
        let name = self.text(name).to_owned();

        let ty = node.child_by_field_name(field::TYPE_ANNOTATION).and_then(|ann| {
            let inner = ann.child_by_field_name(field::TYPE).or_else(|| ann.first_named_child());
            match inner {
                Some(inner) => self.parse_type(inner),
                None => {
                    self.missing(field::TYPE, ann);
                    None
                }
            }
        });

        let value = self
            .required_field(node, field::VALUE)
            .and_then(|v| self.collect_expression(v));

        Some(Stmt::new(
            StmtKind::VarDecl(VarDecl {
                keyword,
                name,
                ty,
                value,
            }),
            location,
        ))
    }
}
