use lyra_common::Location;
use tracing::debug;

use super::scope::{Scope, ScopeId, ScopeKind};
use super::traits::{TraitId, TraitImplId, TraitImplSymbol, TraitSymbol};
use super::{DuplicateSymbol, ScopeEntry, Symbol};
use crate::stmt::StmtId;

/// The scope arena and the trait records of one analysis run.
///
/// Scope 0 is the global scope. Every registration goes through
/// [`SymbolTable::define`] on the global scope first, so a name collides
/// with any earlier binding regardless of what kind of symbol it was.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    traits: Vec<TraitSymbol>,
    trait_impls: Vec<TraitImplSymbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::new(ScopeKind::Global, None)],
            traits: Vec::new(),
            trait_impls: Vec::new(),
        }
    }

    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Create a scope. It is linked into `parent`'s children when a parent
    /// is given; without one it is a detached root.
    pub fn new_scope(&mut self, parent: Option<ScopeId>, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(kind, parent));
        if let Some(parent) = parent {
            self.scopes[parent.0 as usize].children.push(id);
        }
        id
    }

    /// Bind `name` in `scope`. A name already bound in that same scope is
    /// rejected and the existing binding is kept.
    pub fn define(
        &mut self,
        scope: ScopeId,
        name: &str,
        symbol: Symbol,
        location: Location,
    ) -> Result<(), DuplicateSymbol> {
        let scope = &mut self.scopes[scope.0 as usize];
        if let Some(existing) = scope.entries.get(name) {
            return Err(DuplicateSymbol {
                name: name.to_owned(),
                location,
                previous: existing.location.clone(),
            });
        }
        scope
            .entries
            .insert(name.to_owned(), ScopeEntry { symbol, location });
        Ok(())
    }

    /// Resolve `name` from `scope` outward through its parents.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&ScopeEntry> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(entry) = scope.get(name) {
                return Some(entry);
            }
            current = scope.parent;
        }
        None
    }

    /// Resolve `name` in `scope` only.
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<&ScopeEntry> {
        self.scope(scope).get(name)
    }

    // ── Registration ───────────────────────────────────────────────────

    pub fn register_type(&mut self, name: &str, id: StmtId, location: Location) -> Result<(), DuplicateSymbol> {
        debug!(name, ?id, "register type");
        self.define(self.global(), name, Symbol::Type(id), location)
    }

    pub fn register_function(&mut self, name: &str, id: StmtId, location: Location) -> Result<(), DuplicateSymbol> {
        debug!(name, ?id, "register function");
        self.define(self.global(), name, Symbol::Function(id), location)
    }

    pub fn register_variable(&mut self, name: &str, id: StmtId, location: Location) -> Result<(), DuplicateSymbol> {
        debug!(name, ?id, "register variable");
        self.define(self.global(), name, Symbol::Variable(id), location)
    }

    /// Register a trait; the record is stored only if its name is free.
    pub fn register_trait(&mut self, symbol: TraitSymbol) -> Result<TraitId, DuplicateSymbol> {
        debug!(name = %symbol.name, "register trait");
        let id = TraitId(self.traits.len() as u32);
        let name = symbol.name.clone();
        self.define(self.global(), &name, Symbol::Trait(id), symbol.location.clone())?;
        self.traits.push(symbol);
        Ok(id)
    }

    /// Register a trait implementation under `"<Trait> for <Type>"`, so a
    /// second implementation of the same trait for the same type collides.
    pub fn register_trait_impl(&mut self, symbol: TraitImplSymbol) -> Result<TraitImplId, DuplicateSymbol> {
        let name = symbol.name();
        debug!(%name, "register trait impl");
        let id = TraitImplId(self.trait_impls.len() as u32);
        self.define(self.global(), &name, Symbol::TraitImpl(id), symbol.location.clone())?;
        self.trait_impls.push(symbol);
        Ok(id)
    }

    // ── Registries ─────────────────────────────────────────────────────

    pub fn lookup_type(&self, name: &str) -> Option<StmtId> {
        match self.lookup_local(self.global(), name)?.symbol {
            Symbol::Type(id) => Some(id),
            _ => None,
        }
    }

    pub fn lookup_function(&self, name: &str) -> Option<StmtId> {
        match self.lookup_local(self.global(), name)?.symbol {
            Symbol::Function(id) => Some(id),
            _ => None,
        }
    }

    pub fn lookup_trait(&self, name: &str) -> Option<&TraitSymbol> {
        match self.lookup_local(self.global(), name)?.symbol {
            Symbol::Trait(id) => self.trait_symbol(id),
            _ => None,
        }
    }

    pub fn trait_symbol(&self, id: TraitId) -> Option<&TraitSymbol> {
        self.traits.get(id.0 as usize)
    }

    pub fn trait_impl(&self, id: TraitImplId) -> Option<&TraitImplSymbol> {
        self.trait_impls.get(id.0 as usize)
    }

    /// All registered types, in unspecified order.
    pub fn types(&self) -> impl Iterator<Item = (&str, StmtId)> {
        self.scope(self.global()).entries().filter_map(|(name, e)| match e.symbol {
            Symbol::Type(id) => Some((name, id)),
            _ => None,
        })
    }

    /// All registered functions, in unspecified order.
    pub fn functions(&self) -> impl Iterator<Item = (&str, StmtId)> {
        self.scope(self.global()).entries().filter_map(|(name, e)| match e.symbol {
            Symbol::Function(id) => Some((name, id)),
            _ => None,
        })
    }

    /// Registered traits in registration order.
    pub fn traits(&self) -> &[TraitSymbol] {
        &self.traits
    }

    /// Registered trait implementations in registration order.
    pub fn trait_impls(&self) -> &[TraitImplSymbol] {
        &self.trait_impls
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lyra_common::{LineIndex, Location};
    use lyra_types::Ty;

    fn loc(start: u32, end: u32) -> Location {
        let index = LineIndex::new("let x = 1\nlet x = 2\n");
        Location::from_offsets(None, start, end, &index)
    }

    #[test]
    fn define_rejects_duplicates_and_keeps_first() {
        let mut table = SymbolTable::new();
        let global = table.global();
        table.define(global, "x", Symbol::Variable(StmtId(0)), loc(0, 9)).unwrap();
        let err = table
            .define(global, "x", Symbol::Variable(StmtId(1)), loc(10, 19))
            .unwrap_err();
        assert_eq!(err.previous.start.line, 1);
        assert_eq!(err.location.start.line, 2);
        insta::assert_snapshot!(err.to_string(), @r#"symbol "x" already defined at 1:1"#);
        assert_eq!(
            table.lookup(global, "x").map(|e| &e.symbol),
            Some(&Symbol::Variable(StmtId(0)))
        );
    }

    #[test]
    fn lookup_climbs_parents_but_local_does_not() {
        let mut table = SymbolTable::new();
        let global = table.global();
        table.register_function("fib", StmtId(0), loc(0, 3)).unwrap();
        let func = table.new_scope(Some(global), ScopeKind::Function);
        table.define(func, "n", Symbol::local(Some(Ty::int())), loc(4, 5)).unwrap();

        assert!(table.lookup(func, "fib").is_some());
        assert!(table.lookup_local(func, "fib").is_none());
        assert!(table.lookup(global, "n").is_none());
        assert_eq!(table.scope(global).children, vec![func]);
        assert_eq!(table.scope(func).parent, Some(global));
    }

    #[test]
    fn shadowing_in_child_scope() {
        let mut table = SymbolTable::new();
        let global = table.global();
        table.define(global, "x", Symbol::local(Some(Ty::int())), loc(0, 1)).unwrap();
        let block = table.new_scope(Some(global), ScopeKind::Block);
        table.define(block, "x", Symbol::local(Some(Ty::string())), loc(2, 3)).unwrap();
        match &table.lookup(block, "x").unwrap().symbol {
            Symbol::Local(local) => assert_eq!(local.ty, Some(Ty::string())),
            other => panic!("unexpected symbol {:?}", other),
        }
    }

    #[test]
    fn detached_scope_has_no_parent() {
        let mut table = SymbolTable::new();
        let root = table.new_scope(None, ScopeKind::Module);
        assert_eq!(table.scope(root).parent, None);
        assert!(table.scope(table.global()).children.is_empty());
        assert_eq!(table.scope_count(), 2);
    }

    #[test]
    fn registries_are_views_over_the_global_scope() {
        let mut table = SymbolTable::new();
        table.register_type("Point", StmtId(0), loc(0, 5)).unwrap();
        table.register_function("sum", StmtId(1), loc(6, 9)).unwrap();
        // A function named like an existing type is rejected, and the type
        // registry is unaffected.
        assert!(table.register_function("Point", StmtId(2), loc(10, 15)).is_err());

        assert_eq!(table.lookup_type("Point"), Some(StmtId(0)));
        assert_eq!(table.lookup_function("Point"), None);
        assert_eq!(table.lookup_function("sum"), Some(StmtId(1)));
        assert_eq!(table.types().count(), 1);
        assert_eq!(table.functions().count(), 1);
    }

    #[test]
    fn duplicate_trait_is_not_stored() {
        let mut table = SymbolTable::new();
        let show = TraitSymbol {
            name: "Show".into(),
            generic_params: vec!["t".into()],
            methods: vec![],
            location: loc(0, 4),
            is_public: true,
        };
        let id = table.register_trait(show.clone()).unwrap();
        assert!(table.register_trait(show).is_err());
        assert_eq!(table.traits().len(), 1);
        assert_eq!(table.lookup_trait("Show").map(|t| &t.name), table.trait_symbol(id).map(|t| &t.name));
    }
}
