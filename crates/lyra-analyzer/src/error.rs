//! Error taxonomies for the two analysis phases.
//!
//! Collection errors describe the tree: duplicate declarations, required
//! nodes that are absent, node kinds the collector does not understand.
//! Type errors describe the program. Both are recoverable; each phase
//! records them and keeps going.

use std::fmt;

use lyra_ast::symbols::DuplicateSymbol;
use lyra_common::Location;
use lyra_types::Ty;

// ── Collection errors ──────────────────────────────────────────────────

/// Which kind of member a [`CollectionError::DuplicateMember`] refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Constructor,
    Method,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberKind::Field => "field",
            MemberKind::Constructor => "constructor",
            MemberKind::Method => "method",
        })
    }
}

/// An error found while building the AST and symbol table.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionError {
    /// A top-level name was already bound in the global scope.
    DuplicateDefinition(DuplicateSymbol),
    /// Two fields, constructors or trait methods of one declaration share a
    /// name. The first one is kept.
    DuplicateMember {
        owner: String,
        member: String,
        kind: MemberKind,
        location: Location,
        previous: Location,
    },
    /// A node the construct requires is absent.
    MissingNode {
        expected: &'static str,
        parent: String,
        location: Location,
    },
    /// A node appeared where the collector cannot interpret its kind.
    MalformedNode {
        context: &'static str,
        kind: String,
        location: Location,
    },
    /// A literal whose text does not denote a value of its kind.
    InvalidLiteral {
        kind: &'static str,
        text: String,
        location: Location,
    },
}

impl CollectionError {
    pub fn location(&self) -> &Location {
        match self {
            CollectionError::DuplicateDefinition(dup) => &dup.location,
            CollectionError::DuplicateMember { location, .. }
            | CollectionError::MissingNode { location, .. }
            | CollectionError::MalformedNode { location, .. }
            | CollectionError::InvalidLiteral { location, .. } => location,
        }
    }

    /// The earlier definition a duplicate collides with.
    pub fn previous(&self) -> Option<&Location> {
        match self {
            CollectionError::DuplicateDefinition(dup) => Some(&dup.previous),
            CollectionError::DuplicateMember { previous, .. } => Some(previous),
            _ => None,
        }
    }
}

impl From<DuplicateSymbol> for CollectionError {
    fn from(dup: DuplicateSymbol) -> Self {
        CollectionError::DuplicateDefinition(dup)
    }
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::DuplicateDefinition(dup) => write!(f, "{}", dup),
            CollectionError::DuplicateMember {
                owner,
                member,
                kind,
                previous,
                ..
            } => write!(
                f,
                "{} {:?} of {} already defined at {}",
                kind, member, owner, previous
            ),
            CollectionError::MissingNode { expected, parent, .. } => {
                write!(f, "missing {} in {}", expected, parent)
            }
            CollectionError::MalformedNode { context, kind, .. } => {
                write!(f, "unknown {} node kind: {}", context, kind)
            }
            CollectionError::InvalidLiteral { kind, text, .. } => {
                write!(f, "invalid {} literal: {}", kind, text)
            }
        }
    }
}

impl std::error::Error for CollectionError {}

// ── Type errors ────────────────────────────────────────────────────────

/// Where a [`TypeError::Mismatch`] was detected; selects its message.
#[derive(Clone, Debug, PartialEq)]
pub enum MismatchContext {
    /// 1-based argument position.
    Argument { index: usize },
    Assignment { name: String },
    FieldDefault { field: String },
    ClauseBody { function: String },
    LiteralPattern { text: String },
    Return,
    Comparison,
    LogicalOperand,
    Arithmetic,
    Concatenation,
    NotOperand,
    Condition,
    Guard,
    Branches,
    ArrayElement,
    ArrayIndex,
    MapKey,
}

/// An error found while checking the AST.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeError {
    UndefinedReference {
        name: String,
        location: Location,
    },
    /// A call passed the wrong number of arguments.
    ArityMismatch {
        callee: Option<String>,
        expected: usize,
        found: usize,
        location: Location,
    },
    Mismatch {
        expected: Ty,
        found: Ty,
        context: MismatchContext,
        location: Location,
    },
    NotCallable {
        ty: Ty,
        location: Location,
    },
    NotIndexable {
        ty: Ty,
        location: Location,
    },
    NoSuchField {
        ty: Ty,
        field: String,
        location: Location,
    },
    /// An operator applied to operand types it is not defined for, or an
    /// operator symbol the language does not have.
    UnsupportedOperator {
        op: String,
        operands: Vec<Ty>,
        location: Location,
    },
    /// A user type name that no declaration provides.
    UnknownType {
        name: String,
        location: Location,
    },
    /// A clause's pattern count differs from the signature's parameter count.
    ClauseArityMismatch {
        function: String,
        expected: usize,
        found: usize,
        location: Location,
    },
    /// A name bound twice in one clause, lambda or block scope.
    DuplicateBinding {
        name: String,
        location: Location,
        previous: Location,
    },
    MissingSignature {
        function: String,
        location: Location,
    },
    UnknownTrait {
        name: String,
        location: Location,
    },
    UnknownTraitMethod {
        trait_name: String,
        method: String,
        location: Location,
    },
    MissingTraitMethod {
        trait_name: String,
        method: String,
        impl_ty: String,
        location: Location,
    },
    ReturnOutsideFunction {
        location: Location,
    },
}

impl TypeError {
    pub fn location(&self) -> &Location {
        match self {
            TypeError::UndefinedReference { location, .. }
            | TypeError::ArityMismatch { location, .. }
            | TypeError::Mismatch { location, .. }
            | TypeError::NotCallable { location, .. }
            | TypeError::NotIndexable { location, .. }
            | TypeError::NoSuchField { location, .. }
            | TypeError::UnsupportedOperator { location, .. }
            | TypeError::UnknownType { location, .. }
            | TypeError::ClauseArityMismatch { location, .. }
            | TypeError::DuplicateBinding { location, .. }
            | TypeError::MissingSignature { location, .. }
            | TypeError::UnknownTrait { location, .. }
            | TypeError::UnknownTraitMethod { location, .. }
            | TypeError::MissingTraitMethod { location, .. }
            | TypeError::ReturnOutsideFunction { location } => location,
        }
    }

    /// The type the context required, for mismatches.
    pub fn expected(&self) -> Option<&Ty> {
        match self {
            TypeError::Mismatch { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// The type actually found, for mismatches and errors about one type.
    pub fn found(&self) -> Option<&Ty> {
        match self {
            TypeError::Mismatch { found, .. }
            | TypeError::NotCallable { ty: found, .. }
            | TypeError::NotIndexable { ty: found, .. }
            | TypeError::NoSuchField { ty: found, .. } => Some(found),
            _ => None,
        }
    }
}

fn mismatch_message(f: &mut fmt::Formatter<'_>, expected: &Ty, found: &Ty, context: &MismatchContext) -> fmt::Result {
    match context {
        MismatchContext::Argument { index } => {
            write!(f, "argument {}: expected {} but got {}", index, expected, found)
        }
        MismatchContext::Assignment { name } => write!(
            f,
            "cannot assign {} to variable {} of type {}",
            found, name, expected
        ),
        MismatchContext::FieldDefault { field } => write!(
            f,
            "default value of field {}: expected {} but got {}",
            field, expected, found
        ),
        MismatchContext::ClauseBody { function } => write!(
            f,
            "clause of {} returns {} but the signature declares {}",
            function, found, expected
        ),
        MismatchContext::LiteralPattern { text } => write!(
            f,
            "pattern {}: expected {} but got {}",
            text, expected, found
        ),
        MismatchContext::Return => {
            write!(f, "return: expected {} but got {}", expected, found)
        }
        MismatchContext::Comparison => write!(f, "cannot compare {} and {}", expected, found),
        MismatchContext::LogicalOperand => {
            write!(f, "expected Bool for logical operator, got {}", found)
        }
        MismatchContext::Arithmetic => write!(
            f,
            "cannot perform arithmetic on {} and {}",
            expected, found
        ),
        MismatchContext::Concatenation => write!(f, "cannot concatenate {} and {}", expected, found),
        MismatchContext::NotOperand => write!(f, "! requires Bool operand, got {}", found),
        MismatchContext::Condition => write!(f, "if condition must be Bool, got {}", found),
        MismatchContext::Guard => write!(f, "guard must be Bool, got {}", found),
        MismatchContext::Branches => write!(
            f,
            "if branches have different types: {} and {}",
            expected, found
        ),
        MismatchContext::ArrayElement => write!(
            f,
            "array elements must have same type: expected {} but got {}",
            expected, found
        ),
        MismatchContext::ArrayIndex => write!(f, "array index must be Int, got {}", found),
        MismatchContext::MapKey => write!(
            f,
            "map key type mismatch: expected {} but got {}",
            expected, found
        ),
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::UndefinedReference { name, .. } => write!(f, "undefined: {}", name),
            TypeError::ArityMismatch { expected, found, .. } => {
                write!(f, "expected {} arguments but got {}", expected, found)
            }
            TypeError::Mismatch {
                expected,
                found,
                context,
                ..
            } => mismatch_message(f, expected, found, context),
            TypeError::NotCallable { ty, .. } => write!(f, "cannot call non-function type {}", ty),
            TypeError::NotIndexable { ty, .. } => write!(f, "cannot index type {}", ty),
            TypeError::NoSuchField { ty, field, .. } => match ty {
                Ty::Struct(s) => write!(f, "struct {} has no field {}", s.name, field),
                other => write!(f, "type {} has no field {}", other, field),
            },
            TypeError::UnsupportedOperator { op, operands, .. } => {
                write!(f, "operator {} is not supported", op)?;
                if !operands.is_empty() {
                    write!(f, " for ")?;
                    for (i, ty) in operands.iter().enumerate() {
                        if i > 0 {
                            write!(f, " and ")?;
                        }
                        write!(f, "{}", ty)?;
                    }
                }
                Ok(())
            }
            TypeError::UnknownType { name, .. } => write!(f, "unknown type: {}", name),
            TypeError::ClauseArityMismatch {
                function,
                expected,
                found,
                ..
            } => write!(
                f,
                "clause of {} has {} parameters but the signature declares {}",
                function, found, expected
            ),
            TypeError::DuplicateBinding { name, previous, .. } => {
                write!(f, "{} is already bound at {}", name, previous)
            }
            TypeError::MissingSignature { function, .. } => {
                write!(f, "function {} has no type signature", function)
            }
            TypeError::UnknownTrait { name, .. } => write!(f, "unknown trait: {}", name),
            TypeError::UnknownTraitMethod { trait_name, method, .. } => {
                write!(f, "trait {} has no method {}", trait_name, method)
            }
            TypeError::MissingTraitMethod {
                trait_name,
                method,
                impl_ty,
                ..
            } => write!(
                f,
                "implementation of {} for {} is missing method {}",
                trait_name, impl_ty, method
            ),
            TypeError::ReturnOutsideFunction { .. } => write!(f, "return outside of a function"),
        }
    }
}

impl std::error::Error for TypeError {}

#[cfg(test)]
mod tests {
    use super::*;
    use lyra_types::{StructTy, Ty};

    #[test]
    fn messages() {
        let loc = Location::default();
        let err = TypeError::Mismatch {
            expected: Ty::int(),
            found: Ty::string(),
            context: MismatchContext::Assignment { name: "the_answer".into() },
            location: loc.clone(),
        };
        insta::assert_snapshot!(err.to_string(), @"cannot assign String to variable the_answer of type Int");
        assert_eq!(err.expected(), Some(&Ty::int()));
        assert_eq!(err.found(), Some(&Ty::string()));

        let err = TypeError::NoSuchField {
            ty: Ty::Struct(StructTy::new("Point", vec![])),
            field: "z".into(),
            location: loc.clone(),
        };
        assert_eq!(err.to_string(), "struct Point has no field z");

        let err = TypeError::UnsupportedOperator {
            op: "+".into(),
            operands: vec![Ty::bool(), Ty::bool()],
            location: loc,
        };
        assert_eq!(err.to_string(), "operator + is not supported for Bool and Bool");
    }

    #[test]
    fn collection_messages() {
        let err = CollectionError::MalformedNode {
            context: "type",
            kind: "tuple_pattern".into(),
            location: Location::default(),
        };
        assert_eq!(err.to_string(), "unknown type node kind: tuple_pattern");
        assert!(err.previous().is_none());
    }
}
