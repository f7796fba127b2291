//! Symbol table: a scope tree plus registries for top-level declarations.
//!
//! Scopes live in an arena owned by [`SymbolTable`] and refer to each other
//! by [`ScopeId`]. Table entries point at AST statements by [`StmtId`]; trait
//! declarations and implementations are kept in the table itself since they
//! have no statement of their own.
//!
//! The type, function and trait registries are views over the global scope,
//! so a declaration is resolvable through the registry exactly when it was
//! successfully defined in scope.

mod scope;
mod table;
mod traits;

use std::fmt;

use lyra_common::Location;
use lyra_types::Ty;

use crate::stmt::StmtId;

pub use scope::{Scope, ScopeId, ScopeKind};
pub use table::SymbolTable;
pub use traits::{TraitId, TraitImplId, TraitImplSymbol, TraitMethod, TraitMethodImpl, TraitSymbol};

/// What a name is bound to.
#[derive(Clone, Debug, PartialEq)]
pub enum Symbol {
    Type(StmtId),
    Function(StmtId),
    Variable(StmtId),
    Trait(TraitId),
    TraitImpl(TraitImplId),
    /// A clause parameter, lambda parameter or block-local variable.
    /// `ty` is `None` when it is not known.
    Local(Local),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Local {
    pub ty: Option<Ty>,
}

impl Symbol {
    pub fn local(ty: Option<Ty>) -> Symbol {
        Symbol::Local(Local { ty })
    }
}

/// A binding in a scope.
#[derive(Clone, Debug, PartialEq)]
pub struct ScopeEntry {
    pub symbol: Symbol,
    /// Where the name was defined.
    pub location: Location,
}

/// A name was defined twice in one scope. The first definition stays bound.
#[derive(Clone, Debug, PartialEq)]
pub struct DuplicateSymbol {
    pub name: String,
    /// The rejected definition.
    pub location: Location,
    /// The definition already in scope.
    pub previous: Location,
}

impl fmt::Display for DuplicateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "symbol {:?} already defined at {}", self.name, self.previous)
    }
}

impl std::error::Error for DuplicateSymbol {}
