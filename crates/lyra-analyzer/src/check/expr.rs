//! Expression typing rules.

use lyra_ast::symbols::{ScopeKind, Symbol};
use lyra_ast::{BinaryOp, Expr, ExprKind, Pattern, Stmt, StmtKind, UnaryOp};
use lyra_common::Location;
use lyra_types::{is_numeric, CtorShape, FnTy, Ty};
use tracing::trace;

use super::Checker;
use crate::error::{MismatchContext, TypeError};

impl Checker<'_> {
    /// Derive the type of `expr`, recording it in the type table when known.
    pub(super) fn check_expr(&mut self, expr: &Expr) -> Option<Ty> {
        let ty = self.infer(expr);
        if let Some(ty) = &ty {
            self.types.insert(expr.location.range, ty.clone());
        }
        ty
    }

    fn check_opt(&mut self, expr: Option<&Expr>) -> Option<Ty> {
        expr.and_then(|e| self.check_expr(e))
    }

    fn infer(&mut self, expr: &Expr) -> Option<Ty> {
        let location = &expr.location;
        match &expr.kind {
            ExprKind::Literal(literal) => Some(literal.ty()),
            ExprKind::Identifier(name) => self.check_identifier(name, location),
            ExprKind::Binary { op, left, right } => {
                let lhs = self.check_opt(left.as_deref());
                let rhs = self.check_opt(right.as_deref());
                self.check_binary(op, lhs, rhs, location)
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.check_opt(operand.as_deref());
                match op {
                    UnaryOp::Not => {
                        if let Some(found) = ty.filter(|t| !t.is_bool()) {
                            let at = operand.as_deref().map_or(location, |o| &o.location);
                            self.mismatch(Ty::bool(), found, MismatchContext::NotOperand, at);
                        }
                        Some(Ty::bool())
                    }
                    UnaryOp::Neg => ty,
                    UnaryOp::Other(symbol) => {
                        self.error(TypeError::UnsupportedOperator {
                            op: symbol.clone(),
                            operands: ty.into_iter().collect(),
                            location: location.clone(),
                        });
                        None
                    }
                }
            }
            ExprKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if let Some(condition) = condition.as_deref() {
                    if let Some(found) = self.check_expr(condition).filter(|t| !t.is_bool()) {
                        self.mismatch(Ty::bool(), found, MismatchContext::Condition, &condition.location);
                    }
                }
                let then_ty = self.check_opt(then_branch.as_deref());
                let Some(else_branch) = else_branch.as_deref() else {
                    return Some(Ty::unit());
                };
                let else_ty = self.check_expr(else_branch);
                match (then_ty, else_ty) {
                    (Some(a), Some(b)) => {
                        if a != b {
                            let expected = a.clone();
                            self.mismatch(expected, b, MismatchContext::Branches, &else_branch.location);
                        }
                        Some(a)
                    }
                    (a, b) => a.or(b),
                }
            }
            ExprKind::Guard(condition) => {
                if let Some(condition) = condition.as_deref() {
                    if let Some(found) = self.check_expr(condition).filter(|t| !t.is_bool()) {
                        self.mismatch(Ty::bool(), found, MismatchContext::Guard, &condition.location);
                    }
                }
                Some(Ty::bool())
            }
            ExprKind::Array(elements) => self.check_array(elements),
            ExprKind::Tuple(elements) => {
                let slots = elements.iter().map(|e| self.check_opt(e.as_ref())).collect();
                Some(Ty::Tuple(slots))
            }
            ExprKind::Call { callee, args } => self.check_call(callee.as_deref(), args, location),
            ExprKind::Member { object, property } => {
                let object_ty = self.check_opt(object.as_deref())?;
                self.check_member(object_ty, property, location)
            }
            ExprKind::Index { object, index } => {
                let object_ty = self.check_opt(object.as_deref());
                let index_ty = self.check_opt(index.as_deref());
                let index_location = index.as_deref().map_or(location, |i| &i.location);
                self.check_index(object_ty?, index_ty, index_location, location)
            }
            ExprKind::Lambda { params, body } => {
                self.check_lambda(params, body.as_deref());
                None
            }
            ExprKind::Block(stmts) => self.in_scope(ScopeKind::Block, |checker| checker.check_block(stmts)),
        }
    }

    // ── Names ──────────────────────────────────────────────────────────

    /// Scope chain first, then data constructors.
    fn check_identifier(&mut self, name: &str, location: &Location) -> Option<Ty> {
        let program = self.program;
        let symbol = self.table.lookup(self.scope, name).map(|e| e.symbol.clone());
        match symbol {
            Some(Symbol::Local(local)) => local.ty,
            Some(Symbol::Variable(id)) => match self.var_types.get(&id) {
                Some(ty) => ty.clone(),
                // Not checked yet: fall back to the annotation.
                None => program
                    .var_decl(id)
                    .and_then(|decl| decl.ty.as_ref())
                    .and_then(|ty| self.resolve(ty)),
            },
            Some(Symbol::Function(id)) => program
                .function(id)
                .and_then(|def| def.signature.as_ref())
                .and_then(|sig| self.resolve(&Ty::Fun(sig.clone()))),
            Some(Symbol::Type(id)) => program.type_decl(id).map(|decl| decl.ty.clone()),
            Some(Symbol::Trait(_) | Symbol::TraitImpl(_)) => None,
            None => match self.constructor(name) {
                Some(ty) => ty,
                None => {
                    self.error(TypeError::UndefinedReference {
                        name: name.to_owned(),
                        location: location.clone(),
                    });
                    None
                }
            },
        }
    }

    /// The type of a data constructor used as a value: a function into the
    /// data type for positional constructors with parameters, the data type
    /// itself otherwise. The outer `None` means no such constructor.
    fn constructor(&self, name: &str) -> Option<Option<Ty>> {
        let id = *self.constructors.get(name)?;
        let Ty::Data(data) = &self.program.type_decl(id)?.ty else {
            return None;
        };
        let ctor = data.constructor(name)?;
        Some(match &ctor.shape {
            CtorShape::Positional(params) if !params.is_empty() => params
                .iter()
                .map(|p| self.resolve(p))
                .collect::<Option<Vec<Ty>>>()
                .map(|params| Ty::fun(params, Ty::Data(data.clone()))),
            CtorShape::Positional(_) | CtorShape::Record(_) => Some(Ty::Data(data.clone())),
        })
    }

    // ── Operators ──────────────────────────────────────────────────────

    fn check_binary(
        &mut self,
        op: &BinaryOp,
        lhs: Option<Ty>,
        rhs: Option<Ty>,
        location: &Location,
    ) -> Option<Ty> {
        if op.is_comparison() {
            if let (Some(l), Some(r)) = (lhs, rhs) {
                if l != r {
                    self.mismatch(l, r, MismatchContext::Comparison, location);
                }
            }
            return Some(Ty::bool());
        }
        if op.is_logical() {
            for found in [lhs, rhs].into_iter().flatten() {
                if !found.is_bool() {
                    self.mismatch(Ty::bool(), found, MismatchContext::LogicalOperand, location);
                }
            }
            return Some(Ty::bool());
        }
        if op.is_arithmetic() {
            return self.check_arithmetic(op, lhs, rhs, location);
        }
        match op {
            BinaryOp::Concat => self.check_concat(lhs, rhs, location),
            BinaryOp::Spaceship => Some(Ty::int()),
            other => {
                trace!(op = %other, "unknown binary operator");
                self.error(TypeError::UnsupportedOperator {
                    op: other.symbol().to_owned(),
                    operands: lhs.into_iter().chain(rhs).collect(),
                    location: location.clone(),
                });
                None
            }
        }
    }

    /// Both operands must be the same numeric primitive.
    fn check_arithmetic(&mut self, op: &BinaryOp, lhs: Option<Ty>, rhs: Option<Ty>, location: &Location) -> Option<Ty> {
        match (lhs, rhs) {
            (Some(l), Some(r)) => {
                if l != r {
                    let expected = l.clone();
                    self.mismatch(expected, r, MismatchContext::Arithmetic, location);
                } else if !is_numeric(&l) {
                    self.error(TypeError::UnsupportedOperator {
                        op: op.symbol().to_owned(),
                        operands: vec![l.clone(), r],
                        location: location.clone(),
                    });
                }
                Some(l)
            }
            (known, None) | (None, known) => known,
        }
    }

    /// `++` joins two arrays of the same element type. An empty array joins
    /// with any array.
    fn check_concat(&mut self, lhs: Option<Ty>, rhs: Option<Ty>, location: &Location) -> Option<Ty> {
        let unsupported = |operands: Vec<Ty>| TypeError::UnsupportedOperator {
            op: BinaryOp::Concat.symbol().to_owned(),
            operands,
            location: location.clone(),
        };
        match (lhs, rhs) {
            (Some(Ty::Array(a)), Some(Ty::Array(b))) => match (a, b) {
                (Some(x), Some(y)) => {
                    if x != y {
                        let (expected, found) = (Ty::Array(Some(x.clone())), Ty::Array(Some(y)));
                        self.mismatch(expected, found, MismatchContext::Concatenation, location);
                    }
                    Some(Ty::Array(Some(x)))
                }
                (Some(elem), None) | (None, Some(elem)) => Some(Ty::Array(Some(elem))),
                (None, None) => Some(Ty::empty_array()),
            },
            (Some(l), Some(r)) => {
                self.error(unsupported(vec![l, r]));
                None
            }
            (Some(known @ Ty::Array(_)), None) | (None, Some(known @ Ty::Array(_))) => Some(known),
            (Some(known), None) | (None, Some(known)) => {
                self.error(unsupported(vec![known]));
                None
            }
            (None, None) => None,
        }
    }

    // ── Collections ────────────────────────────────────────────────────

    /// The first element with a known type sets the element type; every
    /// other element must match it.
    fn check_array(&mut self, elements: &[Expr]) -> Option<Ty> {
        if elements.is_empty() {
            return Some(Ty::empty_array());
        }
        let mut element_ty: Option<Ty> = None;
        for element in elements {
            let Some(found) = self.check_expr(element) else {
                continue;
            };
            match &element_ty {
                None => element_ty = Some(found),
                Some(expected) => {
                    if *expected != found {
                        let expected = expected.clone();
                        self.mismatch(expected, found, MismatchContext::ArrayElement, &element.location);
                    }
                }
            }
        }
        element_ty.map(Ty::array)
    }

    fn check_index(&mut self, object: Ty, index: Option<Ty>, index_location: &Location, location: &Location) -> Option<Ty> {
        match object {
            Ty::Array(element) => {
                if let Some(found) = index.filter(|t| *t != Ty::int()) {
                    self.mismatch(Ty::int(), found, MismatchContext::ArrayIndex, index_location);
                }
                element.map(|e| *e)
            }
            Ty::Map(key, value) => {
                if let Some(found) = index.filter(|t| t != key.as_ref()) {
                    self.mismatch(*key, found, MismatchContext::MapKey, index_location);
                }
                Some(*value)
            }
            Ty::Generic(_) => None,
            other => {
                self.error(TypeError::NotIndexable {
                    ty: other,
                    location: location.clone(),
                });
                None
            }
        }
    }

    /// Struct fields, tuple positions and record-constructor fields.
    fn check_member(&mut self, object: Ty, property: &str, location: &Location) -> Option<Ty> {
        let field_ty = match &object {
            Ty::Struct(s) => s.field(property).map(|f| f.ty.clone()),
            Ty::Tuple(elems) => match property.parse::<usize>().ok().and_then(|i| elems.get(i)) {
                Some(slot) => return slot.clone(),
                None => None,
            },
            Ty::Data(data) => data.constructors.iter().find_map(|ctor| match &ctor.shape {
                CtorShape::Record(fields) => fields.iter().find(|f| f.name == property).map(|f| f.ty.clone()),
                CtorShape::Positional(_) => None,
            }),
            Ty::Generic(_) => return None,
            _ => None,
        };
        match field_ty {
            Some(ty) => self.resolve(&ty),
            None => {
                self.error(TypeError::NoSuchField {
                    ty: object,
                    field: property.to_owned(),
                    location: location.clone(),
                });
                None
            }
        }
    }

    // ── Calls ──────────────────────────────────────────────────────────

    /// Arity and per-argument checks against the callee's function type;
    /// the call has the declared return type.
    fn check_call(&mut self, callee: Option<&Expr>, args: &[Expr], location: &Location) -> Option<Ty> {
        let callee_ty = self.check_opt(callee);
        let arg_tys: Vec<Option<Ty>> = args.iter().map(|a| self.check_expr(a)).collect();

        let fun: FnTy = match callee_ty? {
            Ty::Fun(fun) => fun,
            Ty::Generic(_) => return None,
            other => {
                let at = callee.map_or(location, |c| &c.location);
                self.error(TypeError::NotCallable {
                    ty: other,
                    location: at.clone(),
                });
                return None;
            }
        };

        if fun.arity() != args.len() {
            let callee_name = callee.and_then(|c| match &c.kind {
                ExprKind::Identifier(name) => Some(name.clone()),
                _ => None,
            });
            self.error(TypeError::ArityMismatch {
                callee: callee_name,
                expected: fun.arity(),
                found: args.len(),
                location: location.clone(),
            });
        }
        for (i, (param, (arg, found))) in fun.param_tys().zip(args.iter().zip(arg_tys)).enumerate() {
            if let Some(found) = found.filter(|t| t != param) {
                self.mismatch(
                    param.clone(),
                    found,
                    MismatchContext::Argument { index: i + 1 },
                    &arg.location,
                );
            }
        }

        Some(*fun.ret)
    }

    // ── Scoped forms ───────────────────────────────────────────────────

    /// Lambda parameters carry no annotations, so they bind with unknown
    /// types; the body is still checked for undefined names and the like.
    fn check_lambda(&mut self, params: &[Pattern], body: Option<&Expr>) {
        self.in_scope(ScopeKind::Function, |checker| {
            for param in params {
                checker.bind_pattern(param, None);
            }
            let saved = checker.return_ty.replace(None);
            checker.check_opt(body);
            checker.return_ty = saved;
        });
    }

    /// Statements in order; the block has the type of its last statement.
    fn check_block(&mut self, stmts: &[Stmt]) -> Option<Ty> {
        let mut last = Some(Ty::unit());
        for stmt in stmts {
            last = match &stmt.kind {
                StmtKind::VarDecl(decl) => {
                    let ty = self.check_var_decl(decl, &stmt.location);
                    self.bind_local(&decl.name, ty, &stmt.location);
                    Some(Ty::unit())
                }
                StmtKind::FunctionDef(def) => {
                    let ty = def
                        .signature
                        .as_ref()
                        .and_then(|sig| self.resolve(&Ty::Fun(sig.clone())));
                    self.bind_local(&def.name, ty, &stmt.location);
                    self.check_stmt(stmt)
                }
                _ => self.check_stmt(stmt),
            };
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use lyra_ast::symbols::SymbolTable;
    use lyra_ast::{Program, VarDecl, VarKeyword};
    use lyra_types::Literal;

    use super::*;
    use crate::check::TypeckResult;

    fn lit(literal: Literal) -> Expr {
        Expr::new(ExprKind::Literal(literal), Location::default())
    }

    fn ident(name: &str) -> Expr {
        Expr::new(ExprKind::Identifier(name.into()), Location::default())
    }

    fn binary(op: &str, left: Expr, right: Expr) -> Expr {
        Expr::new(
            ExprKind::Binary {
                op: BinaryOp::from_symbol(op),
                left: Some(Box::new(left)),
                right: Some(Box::new(right)),
            },
            Location::default(),
        )
    }

    fn let_stmt(name: &str, ty: Option<Ty>, value: Expr) -> Stmt {
        Stmt::new(
            StmtKind::VarDecl(VarDecl {
                keyword: VarKeyword::Let,
                name: name.into(),
                ty,
                value: Some(value),
            }),
            Location::default(),
        )
    }

    /// Check `program` and return the result alongside the type of its last
    /// top-level variable.
    fn check(stmts: Vec<Stmt>) -> (TypeckResult, Option<Ty>) {
        let mut program = Program::new();
        let mut table = SymbolTable::new();
        let mut last = None;
        for stmt in stmts {
            let name = match &stmt.kind {
                StmtKind::VarDecl(decl) => Some(decl.name.clone()),
                _ => None,
            };
            let location = stmt.location.clone();
            let id = program.push(stmt);
            if let Some(name) = name {
                table.register_variable(&name, id, location).unwrap();
                last = Some(id);
            }
        }
        let mut checker = Checker::new(&program, &mut table);
        checker.check_program();
        let var_ty = last.and_then(|id| checker.var_types.get(&id).cloned().flatten());
        (checker.finish(), var_ty)
    }

    #[test]
    fn arithmetic_requires_matching_numeric_operands() {
        let (result, ty) = check(vec![let_stmt("a", None, binary("+", lit(Literal::Int(1)), lit(Literal::Int(2))))]);
        assert!(result.errors.is_empty());
        assert_eq!(ty, Some(Ty::int()));

        let (result, ty) = check(vec![let_stmt("a", None, binary("*", lit(Literal::Int(1)), lit(Literal::Float(2.0))))]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "cannot perform arithmetic on Int and Float");
        assert_eq!(ty, Some(Ty::int()));

        let (result, _) = check(vec![let_stmt("a", None, binary("+", lit(Literal::Bool(true)), lit(Literal::Bool(false))))]);
        assert_eq!(result.errors[0].to_string(), "operator + is not supported for Bool and Bool");
    }

    #[test]
    fn comparison_and_spaceship() {
        let (result, ty) = check(vec![let_stmt("a", None, binary("<", lit(Literal::Int(1)), lit(Literal::String("x".into()))))]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(ty, Some(Ty::bool()));

        let (result, ty) = check(vec![let_stmt("a", None, binary("<=>", lit(Literal::Int(1)), lit(Literal::Int(2))))]);
        assert!(result.errors.is_empty());
        assert_eq!(ty, Some(Ty::int()));
    }

    #[test]
    fn array_elements_share_the_first_type() {
        let array = Expr::new(
            ExprKind::Array(vec![lit(Literal::Int(1)), lit(Literal::String("two".into())), lit(Literal::Int(3))]),
            Location::default(),
        );
        let (result, ty) = check(vec![let_stmt("xs", None, array)]);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(
            result.errors[0].to_string(),
            "array elements must have same type: expected Int but got String"
        );
        assert_eq!(ty, Some(Ty::array(Ty::int())));

        let empty = Expr::new(ExprKind::Array(vec![]), Location::default());
        let (_, ty) = check(vec![let_stmt("xs", None, empty)]);
        assert_eq!(ty, Some(Ty::empty_array()));
    }

    #[test]
    fn concatenation() {
        let ints = |n: i64| Expr::new(ExprKind::Array(vec![lit(Literal::Int(n))]), Location::default());
        let empty = Expr::new(ExprKind::Array(vec![]), Location::default());
        let (result, ty) = check(vec![let_stmt("xs", None, binary("++", ints(1), empty))]);
        assert!(result.errors.is_empty());
        assert_eq!(ty, Some(Ty::array(Ty::int())));

        let (result, _) = check(vec![let_stmt("xs", None, binary("++", ints(1), lit(Literal::Int(2))))]);
        assert!(matches!(result.errors.as_slice(), [TypeError::UnsupportedOperator { .. }]));
    }

    #[test]
    fn if_without_else_is_unit() {
        let expr = Expr::new(
            ExprKind::If {
                condition: Some(Box::new(lit(Literal::Int(1)))),
                then_branch: Some(Box::new(lit(Literal::Int(2)))),
                else_branch: None,
            },
            Location::default(),
        );
        let (result, ty) = check(vec![let_stmt("a", None, expr)]);
        assert_eq!(ty, Some(Ty::unit()));
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "if condition must be Bool, got Int");
    }

    #[test]
    fn undefined_identifier() {
        let (result, ty) = check(vec![let_stmt("a", None, ident("nope"))]);
        assert_eq!(ty, None);
        assert!(matches!(
            result.errors.as_slice(),
            [TypeError::UndefinedReference { name, .. }] if name == "nope"
        ));
    }

    #[test]
    fn index_and_tuple_member() {
        let array = Expr::new(ExprKind::Array(vec![lit(Literal::Int(1))]), Location::default());
        let index = Expr::new(
            ExprKind::Index {
                object: Some(Box::new(array)),
                index: Some(Box::new(lit(Literal::String("0".into())))),
            },
            Location::default(),
        );
        let (result, ty) = check(vec![let_stmt("a", None, index)]);
        assert_eq!(ty, Some(Ty::int()));
        assert_eq!(result.errors[0].to_string(), "array index must be Int, got String");

        let tuple = Expr::new(
            ExprKind::Tuple(vec![Some(lit(Literal::Int(1))), Some(lit(Literal::Bool(true)))]),
            Location::default(),
        );
        let member = Expr::new(
            ExprKind::Member {
                object: Some(Box::new(tuple)),
                property: "1".into(),
            },
            Location::default(),
        );
        let (result, ty) = check(vec![let_stmt("b", None, member)]);
        assert!(result.errors.is_empty());
        assert_eq!(ty, Some(Ty::bool()));

        let (result, _) = check(vec![let_stmt(
            "c",
            None,
            Expr::new(
                ExprKind::Index {
                    object: Some(Box::new(lit(Literal::Int(1)))),
                    index: Some(Box::new(lit(Literal::Int(0)))),
                },
                Location::default(),
            ),
        )]);
        assert_eq!(result.errors[0].to_string(), "cannot index type Int");
    }

    #[test]
    fn block_locals_are_scoped_and_yield_the_last_type() {
        let block = Expr::new(
            ExprKind::Block(vec![
                let_stmt("y", None, lit(Literal::Int(1))),
                let_stmt("y", None, lit(Literal::Int(2))),
                Stmt::new(StmtKind::Expr(ident("y")), Location::default()),
            ]),
            Location::default(),
        );
        let (result, ty) = check(vec![let_stmt("a", None, block)]);
        assert_eq!(ty, Some(Ty::int()));
        assert!(matches!(
            result.errors.as_slice(),
            [TypeError::DuplicateBinding { name, .. }] if name == "y"
        ));

        // `y` is gone once the block ends.
        let (result, _) = check(vec![
            let_stmt(
                "a",
                None,
                Expr::new(ExprKind::Block(vec![let_stmt("y", None, lit(Literal::Int(1)))]), Location::default()),
            ),
            let_stmt("b", None, ident("y")),
        ]);
        assert!(matches!(result.errors.as_slice(), [TypeError::UndefinedReference { .. }]));
    }

    #[test]
    fn lambda_body_is_checked_with_unknown_parameters() {
        let lambda = Expr::new(
            ExprKind::Lambda {
                params: vec![Pattern::identifier("x", Location::default())],
                body: Some(Box::new(binary("+", ident("x"), ident("missing")))),
            },
            Location::default(),
        );
        let (result, ty) = check(vec![let_stmt("f", None, lambda)]);
        assert_eq!(ty, None);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].to_string(), "undefined: missing");
    }
}
