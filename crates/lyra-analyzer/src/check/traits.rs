//! Trait declarations and implementations.
//!
//! Method signatures are resolved where the trait is declared. Each
//! implementation's methods are checked as single clauses against the
//! trait's signature with the trait's first type parameter replaced by the
//! implementing type.

use lyra_ast::symbols::{TraitImplSymbol, TraitSymbol};
use tracing::debug;

use super::Checker;
use crate::error::TypeError;

impl Checker<'_> {
    pub(super) fn check_traits(&mut self) {
        let traits: Vec<TraitSymbol> = self.table.traits().to_vec();
        for declared in &traits {
            self.check_trait_decl(declared);
        }
        let impls: Vec<TraitImplSymbol> = self.table.trait_impls().to_vec();
        for imp in &impls {
            self.check_trait_impl(imp);
        }
    }

    fn check_trait_decl(&mut self, declared: &TraitSymbol) {
        for method in &declared.methods {
            match &method.signature {
                Some(sig) => {
                    self.resolve_signature(sig, &method.location, true);
                }
                None => self.error(TypeError::MissingSignature {
                    function: format!("{}.{}", declared.name, method.name),
                    location: method.location.clone(),
                }),
            }
        }
    }

    fn check_trait_impl(&mut self, imp: &TraitImplSymbol) {
        debug!(name = %imp.name(), "check trait impl");
        let for_type = self.resolve_declared(&imp.for_type, &imp.location);

        let Some(declared) = self.table.lookup_trait(&imp.trait_name).cloned() else {
            self.error(TypeError::UnknownTrait {
                name: imp.trait_name.clone(),
                location: imp.location.clone(),
            });
            for method in &imp.methods {
                let function = format!("{}.{}", imp.trait_name, method.name);
                self.check_clause(&method.clause, None, &function);
            }
            return;
        };

        for method in &imp.methods {
            let signature = match declared.method(&method.name) {
                Some(required) => required.signature.as_ref().map(|sig| {
                    let sig = match (declared.generic_params.first(), &for_type) {
                        (Some(param), Some(ty)) => sig.substitute(param, ty),
                        _ => sig.clone(),
                    };
                    self.resolve_signature(&sig, &method.location, false)
                }),
                None => {
                    self.error(TypeError::UnknownTraitMethod {
                        trait_name: imp.trait_name.clone(),
                        method: method.name.clone(),
                        location: method.location.clone(),
                    });
                    None
                }
            };
            let function = format!("{}.{}", imp.trait_name, method.name);
            self.check_clause(&method.clause, signature.as_ref(), &function);
        }

        for required in &declared.methods {
            if imp.method(&required.name).is_none() {
                self.error(TypeError::MissingTraitMethod {
                    trait_name: imp.trait_name.clone(),
                    method: required.name.clone(),
                    impl_ty: imp.for_type.to_string(),
                    location: imp.location.clone(),
                });
            }
        }
    }
}
