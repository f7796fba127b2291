//! Expressions and literals.
//!
//! Recognized kinds are lowered explicitly. Any other node is treated as a
//! wrapper and collection continues with its first named child, so grammar
//! changes that add wrapper layers do not break the walk; a node with no
//! named children yields no expression.

use lyra_ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use lyra_syntax::{field, CstNode, SyntaxKind};
use lyra_types::Literal;
use tracing::trace;

use super::Collector;
use crate::error::CollectionError;

impl<'s> Collector<'s> {
    pub(super) fn collect_expression<N: CstNode>(&mut self, node: N) -> Option<Expr> {
        let Some(kind) = node.syntax_kind() else {
            return self.unwrap_expression(node);
        };
        let location = self.location(node);
        let expr = match kind {
            k if k.is_literal() => ExprKind::Literal(self.literal(node)?),
            SyntaxKind::IDENTIFIER => ExprKind::Identifier(self.text(node).to_owned()),
            SyntaxKind::BINARY_EXPRESSION => self.collect_binary(node)?,
            SyntaxKind::UNARY_EXPRESSION => {
                let Some(op) = self.operator(node) else {
                    self.missing(field::OPERATOR, node);
                    return None;
                };
                let operand = node
                    .child_by_field_name(field::OPERAND)
                    .or_else(|| Self::operands(node).into_iter().next())
                    .and_then(|o| self.collect_expression(o));
                ExprKind::Unary {
                    op: UnaryOp::from_symbol(op),
                    operand: operand.map(Box::new),
                }
            }
            SyntaxKind::IF_EXPRESSION => {
                let condition = self.required_field(node, field::CONDITION);
                let consequence = self.required_field(node, field::CONSEQUENCE);
                let alternative = node.child_by_field_name(field::ALTERNATIVE);
                ExprKind::If {
                    condition: self.boxed(condition),
                    then_branch: self.boxed(consequence),
                    else_branch: self.boxed(alternative),
                }
            }
            SyntaxKind::GUARD => {
                let inner = node.first_named_child();
                ExprKind::Guard(self.boxed(inner))
            }
            SyntaxKind::ARRAY_LITERAL => ExprKind::Array(
                node.named_children()
                    .into_iter()
                    .filter_map(|e| self.collect_expression(e))
                    .collect(),
            ),
            SyntaxKind::TUPLE_LITERAL => ExprKind::Tuple(
                node.named_children()
                    .into_iter()
                    .map(|e| self.collect_expression(e))
                    .collect(),
            ),
            SyntaxKind::CALL_EXPRESSION => {
                let callee = node
                    .child_by_field_name(field::FUNCTION)
                    .or_else(|| node.first_named_child());
                let args = node
                    .child_by_field_name(field::ARGUMENTS)
                    .or_else(|| Self::child_of_kind(node, SyntaxKind::ARGUMENT_LIST))
                    .map(|list| list.named_children())
                    .unwrap_or_default();
                ExprKind::Call {
                    callee: self.boxed(callee),
                    args: args
                        .into_iter()
                        .filter_map(|a| self.collect_expression(a))
                        .collect(),
                }
            }
            SyntaxKind::MEMBER_EXPRESSION => {
                let object = node
                    .child_by_field_name(field::OBJECT)
                    .or_else(|| node.first_named_child());
                let property = node
                    .child_by_field_name(field::PROPERTY)
                    .or_else(|| node.named_children().into_iter().nth(1));
                let Some(property) = property else {
                    self.missing(field::PROPERTY, node);
                    return None;
                };
                ExprKind::Member {
                    object: self.boxed(object),
                    property: self.text(property).to_owned(),
                }
            }
            SyntaxKind::INDEX_EXPRESSION => {
                let mut named = node.named_children().into_iter();
                let object = node.child_by_field_name(field::OBJECT).or_else(|| named.next());
                let index = node.child_by_field_name(field::INDEX).or_else(|| named.next());
                ExprKind::Index {
                    object: self.boxed(object),
                    index: self.boxed(index),
                }
            }
            SyntaxKind::LAMBDA => {
                let params = self.collect_parameters(node);
                let body = node
                    .child_by_field_name(field::BODY)
                    .or_else(|| node.named_children().into_iter().last());
                ExprKind::Lambda {
                    params,
                    body: self.boxed(body),
                }
            }
            SyntaxKind::BLOCK => ExprKind::Block(
                node.named_children()
                    .into_iter()
                    .filter_map(|s| self.collect_block_statement(s))
                    .collect(),
            ),
            _ => return self.unwrap_expression(node),
        };
        Some(Expr::new(expr, location))
    }

    fn unwrap_expression<N: CstNode>(&mut self, node: N) -> Option<Expr> {
        match node.first_named_child() {
            Some(child) => self.collect_expression(child),
            None => {
                trace!(kind = node.kind(), "no expression in node");
                None
            }
        }
    }

    fn boxed<N: CstNode>(&mut self, node: Option<N>) -> Option<Box<Expr>> {
        node.and_then(|n| self.collect_expression(n)).map(Box::new)
    }

    /// `left op right`; operands come from the `left`/`right` fields or,
    /// failing that, the first two non-operator named children.
    fn collect_binary<N: CstNode>(&mut self, node: N) -> Option<ExprKind> {
        let Some(op) = self.operator(node) else {
            self.missing(field::OPERATOR, node);
            return None;
        };
        let operands = Self::operands(node);
        let left = node
            .child_by_field_name(field::LEFT)
            .or_else(|| operands.first().copied());
        let right = node
            .child_by_field_name(field::RIGHT)
            .or_else(|| operands.get(1).copied());
        Some(ExprKind::Binary {
            op: BinaryOp::from_symbol(op),
            left: self.boxed(left),
            right: self.boxed(right),
        })
    }

    /// Operator text: the `operator` field, an `operator` child, or the
    /// first anonymous token.
    fn operator<N: CstNode>(&self, node: N) -> Option<&'s str> {
        let op = node
            .child_by_field_name(field::OPERATOR)
            .or_else(|| Self::child_of_kind(node, SyntaxKind::OPERATOR))
            .or_else(|| node.children().into_iter().find(|c| !c.is_named()))?;
        let text = self.text(op);
        (!text.is_empty()).then_some(text)
    }

    fn operands<N: CstNode>(node: N) -> Vec<N> {
        node.named_children()
            .into_iter()
            .filter(|c| c.syntax_kind() != Some(SyntaxKind::OPERATOR))
            .collect()
    }

    /// Statements inside a block: declarations and returns as at top level,
    /// anything else as an expression statement. Nothing is registered in
    /// the symbol table; block scopes are the checker's concern.
    fn collect_block_statement<N: CstNode>(&mut self, node: N) -> Option<Stmt> {
        if let Some(stmt) = self.collect_statement(node) {
            return Some(stmt);
        }
        if matches!(
            node.syntax_kind(),
            Some(
                SyntaxKind::TRAIT_DECLARATION
                    | SyntaxKind::TRAIT_IMPLEMENTATION
                    | SyntaxKind::TYPE_DECLARATION
                    | SyntaxKind::STRUCT_TYPE
                    | SyntaxKind::DATA_TYPE
                    | SyntaxKind::FUNCTION_DEFINITION
                    | SyntaxKind::DECLARATION
                    | SyntaxKind::CONST_DECLARATION
                    | SyntaxKind::EXPRESSION_STATEMENT
                    | SyntaxKind::STATEMENT
            )
        ) {
            return None;
        }
        let location = self.location(node);
        let expr = self.collect_expression(node)?;
        Some(Stmt::new(StmtKind::Expr(expr), location))
    }

    /// The value of a literal node. Text that does not denote a value of the
    /// node's kind is recorded as an error.
    pub(super) fn literal<N: CstNode>(&mut self, node: N) -> Option<Literal> {
        let text = self.text(node);
        let (kind, value) = match node.syntax_kind() {
            Some(SyntaxKind::INTEGER) => ("integer", Literal::parse_int(text).map(Literal::Int)),
            Some(SyntaxKind::FLOAT) => ("float", Literal::parse_float(text).map(Literal::Float)),
            Some(SyntaxKind::STRING) => ("string", Some(Literal::String(Literal::parse_string(text)))),
            Some(SyntaxKind::CHAR) => ("char", Literal::parse_char(text).map(Literal::Char)),
            Some(SyntaxKind::BOOLEAN) => (
                "boolean",
                match text {
                    "true" => Some(Literal::Bool(true)),
                    "false" => Some(Literal::Bool(false)),
                    _ => None,
                },
            ),
            _ => return None,
        };
        if value.is_none() {
            let location = self.location(node);
            self.error(CollectionError::InvalidLiteral {
                kind,
                text: text.to_owned(),
                location,
            });
        }
        value
    }
}
