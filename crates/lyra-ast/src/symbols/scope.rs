use rustc_hash::FxHashMap;

use super::ScopeEntry;

/// Index of a scope in its [`super::SymbolTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    Block,
    Loop,
}

/// One lexical region. Names are unique within a scope.
#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Non-owning link to the enclosing scope.
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub(super) entries: FxHashMap<String, ScopeEntry>,
}

impl Scope {
    pub(super) fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            children: Vec::new(),
            entries: FxHashMap::default(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in unspecified order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ScopeEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
