//! AST type checking.
//!
//! The checker walks the collected [`Program`] with the [`SymbolTable`] as
//! its environment. Function clauses, lambdas and blocks get their own
//! scopes in the table, parented so lookups climb to the global scope.
//!
//! Every check returns a best-effort type. `None` means "unknown": the
//! construct was already reported or cannot be typed without inference,
//! and comparisons against an unknown type are skipped so one mistake does
//! not cascade into many.

mod expr;
mod traits;

use lyra_ast::symbols::{ScopeId, ScopeKind, Symbol, SymbolTable};
use lyra_ast::{Clause, FunctionDef, Pattern, PatternKind, Program, Stmt, StmtId, StmtKind, TypeDecl, VarDecl};
use lyra_common::Location;
use lyra_types::{CtorShape, FnTy, StructField, Ty};
use rowan::TextRange;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{MismatchContext, TypeError};

/// Output of [`crate::check`].
#[derive(Debug, Default)]
pub struct TypeckResult {
    /// Derived type of every expression whose type is known, keyed by the
    /// expression's source range.
    pub types: FxHashMap<TextRange, Ty>,
    pub errors: Vec<TypeError>,
}

/// Parameter and return types of a signature after name resolution.
/// Entries that could not be resolved are `None`.
struct ResolvedSig {
    params: Vec<Option<Ty>>,
    ret: Option<Ty>,
}

pub(crate) struct Checker<'a> {
    program: &'a Program,
    table: &'a mut SymbolTable,
    scope: ScopeId,
    /// Declared return type of the enclosing function. `None` at top level;
    /// `Some(None)` inside a function whose return type is unknown.
    return_ty: Option<Option<Ty>>,
    /// Types of top-level variables checked so far.
    var_types: FxHashMap<StmtId, Option<Ty>>,
    /// Data constructor name → declaring statement, first declaration wins.
    constructors: FxHashMap<String, StmtId>,
    types: FxHashMap<TextRange, Ty>,
    errors: Vec<TypeError>,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(program: &'a Program, table: &'a mut SymbolTable) -> Self {
        let mut constructors = FxHashMap::default();
        for (id, stmt) in program.iter() {
            let StmtKind::TypeDecl(decl) = &stmt.kind else {
                continue;
            };
            // Only the declaration that owns the name contributes.
            if table.lookup_type(&decl.name) != Some(id) {
                continue;
            }
            if let Ty::Data(data) = &decl.ty {
                for ctor in &data.constructors {
                    constructors.entry(ctor.name.clone()).or_insert(id);
                }
            }
        }
        let scope = table.global();
        Checker {
            program,
            table,
            scope,
            return_ty: None,
            var_types: FxHashMap::default(),
            constructors,
            types: FxHashMap::default(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> TypeckResult {
        TypeckResult {
            types: self.types,
            errors: self.errors,
        }
    }

    fn error(&mut self, err: TypeError) {
        debug!(%err, "type error");
        self.errors.push(err);
    }

    fn mismatch(&mut self, expected: Ty, found: Ty, context: MismatchContext, location: &Location) {
        self.error(TypeError::Mismatch {
            expected,
            found,
            context,
            location: location.clone(),
        });
    }

    // ── Program ────────────────────────────────────────────────────────

    pub(crate) fn check_program(&mut self) {
        let program = self.program;
        for (id, stmt) in program.iter() {
            match &stmt.kind {
                StmtKind::VarDecl(decl) => {
                    let ty = self.check_var_decl(decl, &stmt.location);
                    self.var_types.insert(id, ty);
                }
                _ => {
                    self.check_stmt(stmt);
                }
            }
        }
        self.check_traits();
        debug!(
            errors = self.errors.len(),
            typed = self.types.len(),
            "check finished"
        );
    }

    /// Check a statement in the current scope and return the type it yields
    /// as the last statement of a block.
    fn check_stmt(&mut self, stmt: &Stmt) -> Option<Ty> {
        match &stmt.kind {
            StmtKind::TypeDecl(decl) => {
                self.check_type_decl(decl, &stmt.location);
                Some(Ty::unit())
            }
            StmtKind::VarDecl(decl) => {
                self.check_var_decl(decl, &stmt.location);
                Some(Ty::unit())
            }
            StmtKind::FunctionDef(def) => {
                self.check_function(def, &stmt.location);
                Some(Ty::unit())
            }
            StmtKind::Expr(expr) => self.check_expr(expr),
            StmtKind::Return(value) => {
                self.check_return(value.as_ref(), &stmt.location);
                None
            }
        }
    }

    // ── Type resolution ────────────────────────────────────────────────

    /// Replace `Unresolved` names with their declared types. On failure the
    /// names that could not be found are returned, each once.
    fn try_resolve(&self, ty: &Ty) -> Result<Ty, Vec<String>> {
        let program = self.program;
        let table: &SymbolTable = &*self.table;
        let resolved = ty.resolve_with(&mut |name| {
            table
                .lookup_type(name)
                .and_then(|id| program.type_decl(id))
                .map(|decl| decl.ty.clone())
        });
        let mut unknown: Vec<String> = Vec::new();
        for name in resolved.unresolved_names() {
            if !unknown.iter().any(|n| n == name) {
                unknown.push(name.to_owned());
            }
        }
        if unknown.is_empty() {
            Ok(resolved)
        } else {
            Err(unknown)
        }
    }

    /// Resolve a type at a use site; failures were reported at the
    /// declaration.
    fn resolve(&self, ty: &Ty) -> Option<Ty> {
        self.try_resolve(ty).ok()
    }

    /// Resolve a type written in a declaration, reporting unknown names.
    fn resolve_declared(&mut self, ty: &Ty, location: &Location) -> Option<Ty> {
        match self.try_resolve(ty) {
            Ok(ty) => Some(ty),
            Err(names) => {
                for name in names {
                    self.error(TypeError::UnknownType {
                        name,
                        location: location.clone(),
                    });
                }
                None
            }
        }
    }

    /// Resolve a signature. Unknown names are reported when `report` is set,
    /// i.e. when the signature is being declared rather than used.
    fn resolve_signature(&mut self, sig: &FnTy, location: &Location, report: bool) -> ResolvedSig {
        let params = sig
            .param_tys()
            .map(|p| self.resolve_at(p, location, report))
            .collect();
        let ret = self.resolve_at(&sig.ret, location, report);
        ResolvedSig { params, ret }
    }

    fn resolve_at(&mut self, ty: &Ty, location: &Location, report: bool) -> Option<Ty> {
        if report {
            self.resolve_declared(ty, location)
        } else {
            self.resolve(ty)
        }
    }

    // ── Declarations ───────────────────────────────────────────────────

    /// Field, constructor and default-value validation for `struct`/`data`.
    fn check_type_decl(&mut self, decl: &TypeDecl, location: &Location) {
        match &decl.ty {
            Ty::Struct(s) => self.check_fields(&s.fields, location),
            Ty::Data(data) => {
                for ctor in &data.constructors {
                    match &ctor.shape {
                        CtorShape::Positional(params) => {
                            for param in params {
                                self.resolve_declared(param, location);
                            }
                        }
                        CtorShape::Record(fields) => self.check_fields(fields, location),
                    }
                }
            }
            other => {
                self.resolve_declared(other, location);
            }
        }
    }

    fn check_fields(&mut self, fields: &[StructField], location: &Location) {
        for field in fields {
            let ty = self.resolve_declared(&field.ty, location);
            if let (Some(ty), Some(default)) = (ty, &field.default) {
                let found = default.ty();
                if found != ty {
                    self.mismatch(
                        ty,
                        found,
                        MismatchContext::FieldDefault {
                            field: field.name.clone(),
                        },
                        location,
                    );
                }
            }
        }
    }

    /// Check the initializer against the annotation and return the type the
    /// variable has: the annotation if present, else the initializer's.
    fn check_var_decl(&mut self, decl: &VarDecl, location: &Location) -> Option<Ty> {
        let declared = decl.ty.as_ref().and_then(|ty| self.resolve_declared(ty, location));
        let value = decl.value.as_ref().and_then(|v| self.check_expr(v));
        if let (Some(declared), Some(found), Some(expr)) = (&declared, &value, &decl.value) {
            if declared != found {
                self.mismatch(
                    declared.clone(),
                    found.clone(),
                    MismatchContext::Assignment {
                        name: decl.name.clone(),
                    },
                    &expr.location,
                );
            }
        }
        declared.or(value)
    }

    fn check_function(&mut self, def: &FunctionDef, location: &Location) {
        let sig = match &def.signature {
            Some(sig) => Some(self.resolve_signature(sig, location, true)),
            None => {
                self.error(TypeError::MissingSignature {
                    function: def.name.clone(),
                    location: location.clone(),
                });
                None
            }
        };
        for clause in &def.clauses {
            self.check_clause(clause, sig.as_ref(), &def.name);
        }
    }

    /// Check one clause in a fresh Function scope: bind its patterns to the
    /// signature's parameter types, then check guard and body. Functions
    /// defined inside a block see the block's locals.
    fn check_clause(&mut self, clause: &Clause, sig: Option<&ResolvedSig>, function: &str) {
        let scope = self.table.new_scope(Some(self.scope), ScopeKind::Function);
        let saved_scope = std::mem::replace(&mut self.scope, scope);
        let saved_ret = self.return_ty.replace(sig.and_then(|s| s.ret.clone()));

        if let Some(sig) = sig {
            if sig.params.len() != clause.params.len() {
                self.error(TypeError::ClauseArityMismatch {
                    function: function.to_owned(),
                    expected: sig.params.len(),
                    found: clause.params.len(),
                    location: clause.location.clone(),
                });
            }
        }
        for (i, pattern) in clause.params.iter().enumerate() {
            let ty = sig.and_then(|s| s.params.get(i).cloned().flatten());
            self.bind_pattern(pattern, ty);
        }

        if let Some(guard) = &clause.guard {
            self.check_expr(guard);
        }
        if let Some(body) = &clause.body {
            let found = self.check_expr(body);
            if let (Some(expected), Some(found)) = (sig.and_then(|s| s.ret.as_ref()), found) {
                if *expected != found {
                    self.mismatch(
                        expected.clone(),
                        found,
                        MismatchContext::ClauseBody {
                            function: function.to_owned(),
                        },
                        &body.location,
                    );
                }
            }
        }

        self.scope = saved_scope;
        self.return_ty = saved_ret;
    }

    /// Bind a parameter pattern in the current scope. Identifiers bind their
    /// name; literal patterns are typed from their text and keyed by it.
    fn bind_pattern(&mut self, pattern: &Pattern, ty: Option<Ty>) {
        match &pattern.kind {
            PatternKind::Identifier(name) => self.bind_local(name, ty, &pattern.location),
            PatternKind::Literal(text) => {
                if let (Some(literal), Some(expected)) = (pattern.literal_value(), &ty) {
                    let found = literal.ty();
                    if found != *expected {
                        self.mismatch(
                            expected.clone(),
                            found,
                            MismatchContext::LiteralPattern { text: text.clone() },
                            &pattern.location,
                        );
                    }
                }
                // A repeated literal keeps its first binding.
                if self.table.lookup_local(self.scope, text).is_none() {
                    self.table
                        .define(self.scope, text, Symbol::local(ty), pattern.location.clone())
                        .ok();
                }
            }
        }
    }

    fn bind_local(&mut self, name: &str, ty: Option<Ty>, location: &Location) {
        if let Err(dup) = self
            .table
            .define(self.scope, name, Symbol::local(ty), location.clone())
        {
            self.error(TypeError::DuplicateBinding {
                name: dup.name,
                location: dup.location,
                previous: dup.previous,
            });
        }
    }

    fn check_return(&mut self, value: Option<&lyra_ast::Expr>, location: &Location) {
        let found = match value {
            Some(value) => self.check_expr(value),
            None => Some(Ty::unit()),
        };
        match self.return_ty.clone() {
            None => self.error(TypeError::ReturnOutsideFunction {
                location: location.clone(),
            }),
            Some(Some(expected)) => {
                if let Some(found) = found {
                    if expected != found {
                        let at = value.map_or(location, |v| &v.location);
                        self.mismatch(expected, found, MismatchContext::Return, at);
                    }
                }
            }
            Some(None) => {}
        }
    }

    /// Run `f` in a new child scope of the current one.
    fn in_scope<T>(&mut self, kind: ScopeKind, f: impl FnOnce(&mut Self) -> T) -> T {
        let scope = self.table.new_scope(Some(self.scope), kind);
        let saved = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.scope = saved;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyra_ast::{Expr, ExprKind};
    use lyra_types::{Literal, StructTy};

    fn stmt(kind: StmtKind) -> Stmt {
        Stmt::new(kind, Location::default())
    }

    #[test]
    fn unknown_annotation_is_reported_once_at_the_declaration() {
        let mut program = Program::new();
        program.push(stmt(StmtKind::VarDecl(VarDecl {
            keyword: lyra_ast::VarKeyword::Let,
            name: "p".into(),
            ty: Some(Ty::unresolved("Missing")),
            value: Some(Expr::new(ExprKind::Literal(Literal::Int(1)), Location::default())),
        })));
        let mut table = SymbolTable::new();
        let mut checker = Checker::new(&program, &mut table);
        checker.check_program();
        let result = checker.finish();
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(&result.errors[0], TypeError::UnknownType { name, .. } if name == "Missing"));
    }

    #[test]
    fn field_default_must_match_field_type() {
        let mut program = Program::new();
        let fields = vec![StructField::with_default("y", Ty::int(), Literal::String("0".into()))];
        program.push(stmt(StmtKind::TypeDecl(TypeDecl {
            name: "Point".into(),
            generic_params: vec![],
            ty: Ty::Struct(StructTy::new("Point", fields)),
            is_public: false,
        })));
        let mut table = SymbolTable::new();
        let mut checker = Checker::new(&program, &mut table);
        checker.check_program();
        let errors = checker.finish().errors;
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "default value of field y: expected Int but got String");
    }

    #[test]
    fn top_level_return_is_an_error() {
        let mut program = Program::new();
        program.push(stmt(StmtKind::Return(None)));
        let mut table = SymbolTable::new();
        let mut checker = Checker::new(&program, &mut table);
        checker.check_program();
        let errors = checker.finish().errors;
        assert!(matches!(errors.as_slice(), [TypeError::ReturnOutsideFunction { .. }]));
    }
}
