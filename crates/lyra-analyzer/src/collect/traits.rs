//! Trait declarations and implementations.
//!
//! Neither produces a program statement; both are recorded directly in the
//! symbol table.

use lyra_ast::symbols::{TraitImplSymbol, TraitMethod, TraitMethodImpl, TraitSymbol};
use lyra_common::Location;
use lyra_syntax::{field, CstNode, SyntaxKind};

use super::Collector;
use crate::error::{CollectionError, MemberKind};

impl Collector<'_> {
    /// `trait Show<t> { show: (t) -> String }`
    pub(super) fn collect_trait<N: CstNode>(&mut self, node: N) {
        let location = self.location(node);
        let Some(name) = Self::child_of_kind(node, SyntaxKind::TRAIT_NAME) else {
            self.missing("trait_name", node);
            return;
        };
        let name = self.text(name).to_owned();
        let generic_params = self.collect_generic_params(node);

        let mut methods: Vec<TraitMethod> = Vec::new();
        for child in Self::children_of_kind(node, SyntaxKind::TRAIT_METHOD) {
            let Some(method_name) = Self::child_of_kind(child, SyntaxKind::METHOD_NAME) else {
                self.missing("method_name", child);
                continue;
            };
            let method_location = self.location(method_name);
            let method_name = self.text(method_name).to_owned();
            let signature = match Self::child_of_kind(child, SyntaxKind::FUNCTION_TYPE) {
                Some(fn_type) => self.parse_function_type(fn_type),
                None => {
                    self.missing("function_type", child);
                    None
                }
            };
            if let Some(previous) = methods.iter().find(|m| m.name == method_name) {
                let previous = previous.location.clone();
                self.duplicate_method(&name, method_name, method_location, previous);
                continue;
            }
            methods.push(TraitMethod {
                name: method_name,
                signature,
                location: method_location,
            });
        }

        let symbol = TraitSymbol {
            name,
            generic_params,
            methods,
            location,
            is_public: Self::has_visibility(node),
        };
        if let Err(dup) = self.table.register_trait(symbol) {
            self.error(dup.into());
        }
    }

    /// `impl Show for Point { show: (p) => ... }`. An implementation whose
    /// target type cannot be collected is not registered.
    pub(super) fn collect_trait_impl<N: CstNode>(&mut self, node: N) {
        let location = self.location(node);
        let Some(trait_name) = Self::child_of_kind(node, SyntaxKind::TRAIT_NAME) else {
            self.missing("trait_name", node);
            return;
        };
        let trait_name = self.text(trait_name).to_owned();

        let target = node.child_by_field_name(field::TYPE).or_else(|| {
            node.named_children()
                .into_iter()
                .find(|c| c.syntax_kind().is_some_and(|k| k.is_type() || k == SyntaxKind::TYPE))
        });
        let Some(target) = target else {
            self.missing(field::TYPE, node);
            return;
        };
        let Some(for_type) = self.parse_type(target) else {
            return;
        };

        let mut methods: Vec<TraitMethodImpl> = Vec::new();
        for child in Self::children_of_kind(node, SyntaxKind::TRAIT_METHOD_IMPLEMENTATION) {
            let Some(method_name) = Self::child_of_kind(child, SyntaxKind::METHOD_NAME) else {
                self.missing("method_name", child);
                continue;
            };
            let method_location = self.location(method_name);
            let method_name = self.text(method_name).to_owned();
            let Some(clause) = Self::child_of_kind(child, SyntaxKind::FUNCTION_CLAUSE) else {
                self.missing("function_clause", child);
                continue;
            };
            let clause = self.collect_clause(clause);
            if let Some(previous) = methods.iter().find(|m| m.name == method_name) {
                let previous = previous.location.clone();
                self.duplicate_method(&trait_name, method_name, method_location, previous);
                continue;
            }
            methods.push(TraitMethodImpl {
                name: method_name,
                clause,
                location: method_location,
            });
        }

        let symbol = TraitImplSymbol {
            trait_name,
            for_type,
            methods,
            location,
        };
        if let Err(dup) = self.table.register_trait_impl(symbol) {
            self.error(dup.into());
        }
    }

    fn duplicate_method(&mut self, owner: &str, member: String, location: Location, previous: Location) {
        self.error(CollectionError::DuplicateMember {
            owner: owner.to_owned(),
            member,
            kind: MemberKind::Method,
            location,
            previous,
        });
    }
}
