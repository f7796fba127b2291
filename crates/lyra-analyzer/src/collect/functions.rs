//! Function definitions, clauses and parameter patterns.

use lyra_ast::{Clause, Expr, ExprKind, FunctionDef, Pattern, Stmt, StmtKind};
use lyra_syntax::{field, CstNode, SyntaxKind};

use super::Collector;

impl Collector<'_> {
    /// `def fib: (Int) -> Int = { (n) if n < 2 => n, (n) => ... }`
    pub(super) fn collect_function<N: CstNode>(&mut self, node: N) -> Option<Stmt> {
        let location = self.location(node);
        let Some(signature) = Self::child_of_kind(node, SyntaxKind::FUNCTION_SIGNATURE) else {
            self.missing("function_signature", node);
            return None;
        };

        let name = signature
            .child_by_field_name(field::NAME)
            .or_else(|| Self::child_of_kind(signature, SyntaxKind::IDENTIFIER));
        let Some(name) = name else {
            self.missing(field::NAME, signature);
            return None;
        };
        let name = self.text(name).to_owned();
        let generic_params = self.collect_generic_params(signature);

        let mut is_pure = false;
        let mut is_async = false;
        for child in signature.children() {
            if child.is_named() {
                continue;
            }
            match self.text(child) {
                "pure" => is_pure = true,
                "async" => is_async = true,
                _ => {}
            }
        }

        let signature_ty = match Self::child_of_kind(signature, SyntaxKind::FUNCTION_TYPE) {
            Some(fn_type) => self.parse_function_type(fn_type),
            None => {
                self.missing("function_type", signature);
                None
            }
        };

        let mut clauses = Vec::new();
        for child in node.named_children() {
            match child.syntax_kind() {
                Some(SyntaxKind::FUNCTION_CLAUSE) => clauses.push(self.collect_clause(child)),
                Some(SyntaxKind::FUNCTION_CLAUSE_LIST) => {
                    for clause in Self::children_of_kind(child, SyntaxKind::FUNCTION_CLAUSE) {
                        clauses.push(self.collect_clause(clause));
                    }
                }
                _ => {}
            }
        }
        if clauses.is_empty() {
            self.missing("function_clause", node);
        }

        Some(Stmt::new(
            StmtKind::FunctionDef(FunctionDef {
                name,
                generic_params,
                signature: signature_ty,
                clauses,
                is_public: Self::has_visibility(node) || Self::has_visibility(signature),
                is_pure,
                is_async,
            }),
            location,
        ))
    }

    /// `(n) if n < 2 => n`
    pub(super) fn collect_clause<N: CstNode>(&mut self, node: N) -> Clause {
        let location = self.location(node);
        let params = self.collect_parameters(node);

        let guard = node
            .child_by_field_name(field::GUARD)
            .or_else(|| Self::child_of_kind(node, SyntaxKind::GUARD))
            .map(|g| self.collect_guard(g));

        let body = self
            .required_field(node, field::BODY)
            .and_then(|b| self.collect_expression(b));

        Clause {
            params,
            guard,
            body,
            location,
        }
    }

    /// Parameter patterns of a clause or lambda. The `parameters` field may
    /// hold a list node or be repeated on each `parameter`.
    pub(super) fn collect_parameters<N: CstNode>(&mut self, owner: N) -> Vec<Pattern> {
        let params: Vec<N> = match owner.child_by_field_name(field::PARAMETERS) {
            Some(p) if p.syntax_kind() == Some(SyntaxKind::PARAMETER) => {
                Self::children_of_kind(owner, SyntaxKind::PARAMETER)
            }
            Some(list) => list.named_children(),
            None => match Self::child_of_kind(owner, SyntaxKind::PARAMETER_LIST) {
                Some(list) => list.named_children(),
                None => Self::children_of_kind(owner, SyntaxKind::PARAMETER),
            },
        };
        params
            .into_iter()
            .filter_map(|p| self.collect_pattern(p))
            .collect()
    }

    /// An identifier-binding or literal-matching pattern, optionally wrapped
    /// in a `parameter` node.
    fn collect_pattern<N: CstNode>(&mut self, node: N) -> Option<Pattern> {
        let target = if node.syntax_kind() == Some(SyntaxKind::PARAMETER) {
            match node
                .child_by_field_name(field::PATTERN)
                .or_else(|| node.first_named_child())
            {
                Some(target) => target,
                None => {
                    self.missing(field::PATTERN, node);
                    return None;
                }
            }
        } else {
            node
        };

        let location = self.location(target);
        match target.syntax_kind() {
            Some(SyntaxKind::IDENTIFIER) => Some(Pattern::identifier(self.text(target), location)),
            Some(SyntaxKind::LITERAL_PATTERN) => Some(Pattern::literal(self.text(target), location)),
            Some(kind) if kind.is_literal() => Some(Pattern::literal(self.text(target), location)),
            _ => {
                self.malformed("pattern", target);
                None
            }
        }
    }

    /// A clause guard; the `guard` node's expression is wrapped in
    /// [`ExprKind::Guard`] so the checker can require it to be Bool.
    fn collect_guard<N: CstNode>(&mut self, node: N) -> Expr {
        let location = self.location(node);
        let inner = if node.syntax_kind() == Some(SyntaxKind::GUARD) {
            node.first_named_child()
        } else {
            Some(node)
        };
        let condition = inner.and_then(|c| self.collect_expression(c));
        Expr::new(ExprKind::Guard(condition.map(Box::new)), location)
    }
}
