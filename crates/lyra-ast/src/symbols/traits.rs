//! Trait bookkeeping.
//!
//! A trait implementation maps several method names to clause bodies plus a
//! target type, which no single AST statement expresses, so traits and their
//! implementations are stored as table records.

use lyra_common::Location;
use lyra_types::{FnTy, Ty};

use crate::stmt::Clause;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TraitId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TraitImplId(pub u32);

/// `trait Show<t> { show: (t) -> String }`
#[derive(Clone, Debug, PartialEq)]
pub struct TraitSymbol {
    pub name: String,
    pub generic_params: Vec<String>,
    pub methods: Vec<TraitMethod>,
    pub location: Location,
    pub is_public: bool,
}

impl TraitSymbol {
    pub fn method(&self, name: &str) -> Option<&TraitMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// A required method. `signature` is `None` when it could not be collected.
#[derive(Clone, Debug, PartialEq)]
pub struct TraitMethod {
    pub name: String,
    pub signature: Option<FnTy>,
    pub location: Location,
}

/// `impl Show for Point { show: (p) => ... }`
#[derive(Clone, Debug, PartialEq)]
pub struct TraitImplSymbol {
    pub trait_name: String,
    pub for_type: Ty,
    pub methods: Vec<TraitMethodImpl>,
    pub location: Location,
}

impl TraitImplSymbol {
    /// The scope name of this implementation, e.g. `Show for Point`.
    pub fn name(&self) -> String {
        format!("{} for {}", self.trait_name, self.for_type)
    }

    pub fn method(&self, name: &str) -> Option<&TraitMethodImpl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TraitMethodImpl {
    pub name: String,
    pub clause: Clause,
    pub location: Location,
}
