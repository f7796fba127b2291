//! Statements and the program root.

use lyra_common::Location;
use lyra_types::{FnTy, Ty};

use crate::expr::Expr;
use crate::pat::Pattern;

/// Index of a top-level statement in [`Program::statements`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(pub u32);

/// A collected source file: its top-level statements in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement and return its id.
    pub fn push(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId(self.statements.len() as u32);
        self.statements.push(stmt);
        id
    }

    pub fn get(&self, id: StmtId) -> Option<&Stmt> {
        self.statements.get(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StmtId, &Stmt)> {
        self.statements
            .iter()
            .enumerate()
            .map(|(i, s)| (StmtId(i as u32), s))
    }

    pub fn type_decl(&self, id: StmtId) -> Option<&TypeDecl> {
        match &self.get(id)?.kind {
            StmtKind::TypeDecl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn function(&self, id: StmtId) -> Option<&FunctionDef> {
        match &self.get(id)?.kind {
            StmtKind::FunctionDef(def) => Some(def),
            _ => None,
        }
    }

    pub fn var_decl(&self, id: StmtId) -> Option<&VarDecl> {
        match &self.get(id)?.kind {
            StmtKind::VarDecl(decl) => Some(decl),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub location: Location,
}

impl Stmt {
    pub fn new(kind: StmtKind, location: Location) -> Self {
        Stmt { kind, location }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    TypeDecl(TypeDecl),
    VarDecl(VarDecl),
    FunctionDef(FunctionDef),
    Expr(Expr),
    Return(Option<Expr>),
}

/// `struct Point { ... }` or `data Tree = ...`; `ty` is the `Struct`/`Data` type.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    pub generic_params: Vec<String>,
    pub ty: Ty,
    pub is_public: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarKeyword {
    Let,
    Var,
    Const,
}

impl VarKeyword {
    pub fn from_keyword(text: &str) -> Option<VarKeyword> {
        match text {
            "let" => Some(VarKeyword::Let),
            "var" => Some(VarKeyword::Var),
            "const" => Some(VarKeyword::Const),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarKeyword::Let => "let",
            VarKeyword::Var => "var",
            VarKeyword::Const => "const",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub keyword: VarKeyword,
    pub name: String,
    /// The annotation, if one was written.
    pub ty: Option<Ty>,
    pub value: Option<Expr>,
}

/// A multi-clause function. All clauses share `signature`; `None` means the
/// signature could not be collected.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub generic_params: Vec<String>,
    pub signature: Option<FnTy>,
    pub clauses: Vec<Clause>,
    pub is_public: bool,
    pub is_pure: bool,
    pub is_async: bool,
}

/// One pattern-matched alternative: `(n) if n < 2 => n`.
#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub params: Vec<Pattern>,
    pub guard: Option<Expr>,
    pub body: Option<Expr>,
    pub location: Location,
}
