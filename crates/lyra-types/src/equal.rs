//! Type equality.
//!
//! There is no coercion and no substitution here: `Int` never equals
//! `Int64`, a generic never equals a concrete type, and an `Unresolved`
//! name only equals the same `Unresolved` name. Callers resolve names
//! before comparing. An unknown tuple slot is compatible with any slot.

use crate::ty::{Primitive, Ty};

/// Decide whether two types are compatible. Pure and total.
pub fn types_equal(a: &Ty, b: &Ty) -> bool {
    match (a, b) {
        (Ty::Primitive(x), Ty::Primitive(y)) => x == y,
        (Ty::Array(None), Ty::Array(None)) => true,
        (Ty::Array(Some(x)), Ty::Array(Some(y))) => types_equal(x, y),
        (Ty::Map(k1, v1), Ty::Map(k2, v2)) => types_equal(k1, k2) && types_equal(v1, v2),
        (Ty::Tuple(xs), Ty::Tuple(ys)) => {
            xs.len() == ys.len()
                && xs.iter().zip(ys).all(|pair| match pair {
                    (Some(x), Some(y)) => types_equal(x, y),
                    _ => true,
                })
        }
        (Ty::Fun(f), Ty::Fun(g)) => {
            all_equal(f.param_tys(), g.param_tys(), f.arity(), g.arity())
                && types_equal(&f.ret, &g.ret)
        }
        (Ty::Generic(x), Ty::Generic(y)) => x == y,
        (Ty::Struct(x), Ty::Struct(y)) => x.name == y.name,
        (Ty::Data(x), Ty::Data(y)) => x.name == y.name,
        (Ty::Unresolved(x), Ty::Unresolved(y)) => x == y,
        _ => false,
    }
}

fn all_equal<'a>(
    xs: impl Iterator<Item = &'a Ty>,
    ys: impl Iterator<Item = &'a Ty>,
    xlen: usize,
    ylen: usize,
) -> bool {
    xlen == ylen && xs.zip(ys).all(|(x, y)| types_equal(x, y))
}

/// True only for the integer, unsigned and float primitive families.
pub fn is_numeric(ty: &Ty) -> bool {
    match ty {
        Ty::Primitive(p) => is_numeric_primitive(*p),
        _ => false,
    }
}

fn is_numeric_primitive(p: Primitive) -> bool {
    p.is_integer() || p.is_float()
}

impl PartialEq for Ty {
    fn eq(&self, other: &Ty) -> bool {
        types_equal(self, other)
    }
}

impl Eq for Ty {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use crate::ty::{Constructor, DataTy, FnTy, Modifier, Param, StructField, StructTy};

    fn samples() -> Vec<Ty> {
        vec![
            Ty::int(),
            Ty::float(),
            Ty::Primitive(Primitive::UInt8),
            Ty::string(),
            Ty::unit(),
            Ty::array(Ty::int()),
            Ty::array(Ty::string()),
            Ty::empty_array(),
            Ty::map(Ty::string(), Ty::int()),
            Ty::tuple(vec![Ty::int(), Ty::string()]),
            Ty::tuple(vec![]),
            Ty::fun(vec![Ty::int(), Ty::int()], Ty::int()),
            Ty::fun(vec![Ty::int()], Ty::int()),
            Ty::generic("t"),
            Ty::generic("u"),
            Ty::Struct(StructTy::new("Point", vec![StructField::new("x", Ty::int())])),
            Ty::Data(DataTy::new(
                "Option",
                vec![Constructor::positional("Some", vec![Ty::generic("t")])],
            )),
            Ty::unresolved("Point"),
        ]
    }

    #[test]
    fn reflexive_and_symmetric() {
        let all = samples();
        for a in &all {
            assert!(types_equal(a, a), "{} should equal itself", a);
            for b in &all {
                assert_eq!(types_equal(a, b), types_equal(b, a), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn distinct_samples_are_unequal() {
        let all = samples();
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert!(!types_equal(a, b), "{} should differ from {}", a, b);
                }
            }
        }
    }

    #[test]
    fn unknown_tuple_slots_match_any_slot() {
        let partial = Ty::Tuple(vec![Some(Ty::int()), None]);
        assert!(types_equal(&partial, &Ty::tuple(vec![Ty::int(), Ty::bool()])));
        assert!(types_equal(&Ty::tuple(vec![Ty::int(), Ty::bool()]), &partial));
        assert!(!types_equal(&partial, &Ty::tuple(vec![Ty::string(), Ty::bool()])));
        assert!(!types_equal(&partial, &Ty::tuple(vec![Ty::int()])));
    }

    #[test]
    fn no_numeric_widening() {
        assert!(!types_equal(&Ty::int(), &Ty::Primitive(Primitive::Int64)));
        assert!(!types_equal(&Ty::float(), &Ty::int()));
    }

    #[test]
    fn structs_are_nominal() {
        let a = Ty::Struct(StructTy::new("Point", vec![StructField::new("x", Ty::int())]));
        let b = Ty::Struct(StructTy::new(
            "Point",
            vec![StructField::with_default("y", Ty::string(), Literal::String("s".into()))],
        ));
        let c = Ty::Struct(StructTy::new("Vec2", vec![StructField::new("x", Ty::int())]));
        assert!(types_equal(&a, &b));
        assert!(!types_equal(&a, &c));
    }

    #[test]
    fn data_types_are_nominal() {
        let a = Ty::Data(DataTy::new("Tree", vec![Constructor::positional("Leaf", vec![Ty::int()])]));
        let b = Ty::Data(DataTy::new("Tree", vec![]));
        assert!(types_equal(&a, &b));
    }

    #[test]
    fn function_modifiers_do_not_affect_identity() {
        let a = Ty::Fun(FnTy::new(vec![Param::with_modifier(Modifier::Mut, Ty::int())], Ty::unit()));
        let b = Ty::fun(vec![Ty::int()], Ty::unit());
        assert!(types_equal(&a, &b));
        assert!(!types_equal(&b, &Ty::fun(vec![Ty::int()], Ty::int())));
    }

    #[test]
    fn unresolved_never_equals_resolved() {
        let point = Ty::Struct(StructTy::new("Point", vec![]));
        assert!(!types_equal(&Ty::unresolved("Point"), &point));
        assert!(!types_equal(&Ty::generic("t"), &Ty::int()));
    }

    #[test]
    fn numeric_predicate() {
        for p in Primitive::ALL {
            let expected = !matches!(
                p,
                Primitive::Bool | Primitive::String | Primitive::Char | Primitive::Unit
            );
            assert_eq!(is_numeric(&Ty::Primitive(p)), expected, "{}", p);
        }
        assert!(!is_numeric(&Ty::array(Ty::int())));
        assert!(!is_numeric(&Ty::generic("t")));
    }
}
