//! Type representation for the Lyra type system.
//!
//! `Ty` is a closed variant set. Annotations written by the user become
//! `Ty` values during collection; the checker derives `Ty` values for
//! expressions and compares them with [`crate::types_equal`].

use std::fmt;

use crate::literal::Literal;

/// Built-in scalar types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float,
    Float16,
    Float32,
    Float64,
    Bool,
    String,
    Char,
    Unit,
}

impl Primitive {
    pub const ALL: [Primitive; 18] = [
        Primitive::Int,
        Primitive::Int8,
        Primitive::Int16,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::UInt,
        Primitive::UInt8,
        Primitive::UInt16,
        Primitive::UInt32,
        Primitive::UInt64,
        Primitive::Float,
        Primitive::Float16,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::Bool,
        Primitive::String,
        Primitive::Char,
        Primitive::Unit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Int => "Int",
            Primitive::Int8 => "Int8",
            Primitive::Int16 => "Int16",
            Primitive::Int32 => "Int32",
            Primitive::Int64 => "Int64",
            Primitive::UInt => "UInt",
            Primitive::UInt8 => "UInt8",
            Primitive::UInt16 => "UInt16",
            Primitive::UInt32 => "UInt32",
            Primitive::UInt64 => "UInt64",
            Primitive::Float => "Float",
            Primitive::Float16 => "Float16",
            Primitive::Float32 => "Float32",
            Primitive::Float64 => "Float64",
            Primitive::Bool => "Bool",
            Primitive::String => "String",
            Primitive::Char => "Char",
            Primitive::Unit => "Unit",
        }
    }

    /// Look up a primitive by its keyword.
    pub fn from_name(name: &str) -> Option<Primitive> {
        Primitive::ALL.iter().copied().find(|p| p.name() == name)
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Primitive::Int
                | Primitive::Int8
                | Primitive::Int16
                | Primitive::Int32
                | Primitive::Int64
                | Primitive::UInt
                | Primitive::UInt8
                | Primitive::UInt16
                | Primitive::UInt32
                | Primitive::UInt64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            Primitive::Float | Primitive::Float16 | Primitive::Float32 | Primitive::Float64
        )
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameter-passing modifier. Annotates how an argument is passed and
/// never takes part in type identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    Ref,
    Mut,
    Own,
}

impl Modifier {
    pub fn from_name(name: &str) -> Option<Modifier> {
        match name {
            "ref" => Some(Modifier::Ref),
            "mut" => Some(Modifier::Mut),
            "own" => Some(Modifier::Own),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Modifier::Ref => "ref",
            Modifier::Mut => "mut",
            Modifier::Own => "own",
        }
    }
}

/// One parameter slot of a function type.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub modifier: Option<Modifier>,
    pub ty: Ty,
}

impl Param {
    pub fn new(ty: Ty) -> Self {
        Param { modifier: None, ty }
    }

    pub fn with_modifier(modifier: Modifier, ty: Ty) -> Self {
        Param {
            modifier: Some(modifier),
            ty,
        }
    }
}

/// A function type: `(params) -> ret`.
#[derive(Clone, Debug, PartialEq)]
pub struct FnTy {
    pub params: Vec<Param>,
    pub ret: Box<Ty>,
}

impl FnTy {
    pub fn new(params: Vec<Param>, ret: Ty) -> Self {
        FnTy {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameter types in order, without modifiers.
    pub fn param_tys(&self) -> impl Iterator<Item = &Ty> {
        self.params.iter().map(|p| &p.ty)
    }

    /// Replace the generic parameter `name` with `with` in every parameter
    /// and the result. Modifiers are kept.
    pub fn substitute(&self, name: &str, with: &Ty) -> FnTy {
        FnTy {
            params: self
                .params
                .iter()
                .map(|p| Param {
                    modifier: p.modifier,
                    ty: p.ty.substitute(name, with),
                })
                .collect(),
            ret: Box::new(self.ret.substitute(name, with)),
        }
    }
}

/// A named field of a struct or record-shaped constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct StructField {
    pub name: String,
    pub ty: Ty,
    pub default: Option<Literal>,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        StructField {
            name: name.into(),
            ty,
            default: None,
        }
    }

    pub fn with_default(name: impl Into<String>, ty: Ty, default: Literal) -> Self {
        StructField {
            name: name.into(),
            ty,
            default: Some(default),
        }
    }
}

/// A struct type. Fields keep declaration order; names are unique.
#[derive(Clone, Debug)]
pub struct StructTy {
    pub name: String,
    pub fields: Vec<StructField>,
}

impl StructTy {
    pub fn new(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        StructTy {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field-level structural comparison: same field names with equal types.
    /// Defaults are ignored. Equality of struct types themselves is nominal;
    /// this is for validation only.
    pub fn fields_match(&self, other: &StructTy) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().all(|f| {
                other
                    .field(&f.name)
                    .is_some_and(|g| crate::types_equal(&f.ty, &g.ty))
            })
    }
}

/// The payload shape of a data constructor.
#[derive(Clone, Debug, PartialEq)]
pub enum CtorShape {
    /// `Leaf(Int)`
    Positional(Vec<Ty>),
    /// `Node { left: Tree, right: Tree }`
    Record(Vec<StructField>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Constructor {
    pub name: String,
    pub shape: CtorShape,
}

impl Constructor {
    pub fn positional(name: impl Into<String>, params: Vec<Ty>) -> Self {
        Constructor {
            name: name.into(),
            shape: CtorShape::Positional(params),
        }
    }

    pub fn record(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        Constructor {
            name: name.into(),
            shape: CtorShape::Record(fields),
        }
    }
}

/// An algebraic data type with named constructors.
#[derive(Clone, Debug)]
pub struct DataTy {
    pub name: String,
    pub constructors: Vec<Constructor>,
}

impl DataTy {
    pub fn new(name: impl Into<String>, constructors: Vec<Constructor>) -> Self {
        DataTy {
            name: name.into(),
            constructors,
        }
    }

    pub fn constructor(&self, name: &str) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.name == name)
    }
}

/// A Lyra type.
///
/// `PartialEq` is [`crate::types_equal`]: nominal for `Struct`/`Data`,
/// structural for containers and functions.
#[derive(Clone, Debug)]
pub enum Ty {
    Primitive(Primitive),
    /// `[]T`. `None` is the element-less type of an empty array literal.
    Array(Option<Box<Ty>>),
    /// `{K: V}`
    Map(Box<Ty>, Box<Ty>),
    /// `(A, B)`. A `None` slot is an element whose type is unknown.
    Tuple(Vec<Option<Ty>>),
    Fun(FnTy),
    /// A lowercase type parameter such as `t`.
    Generic(String),
    Struct(StructTy),
    Data(DataTy),
    /// A user type name seen before its declaration is known.
    Unresolved(String),
}

impl Ty {
    pub fn int() -> Ty {
        Ty::Primitive(Primitive::Int)
    }

    pub fn float() -> Ty {
        Ty::Primitive(Primitive::Float)
    }

    pub fn string() -> Ty {
        Ty::Primitive(Primitive::String)
    }

    pub fn bool() -> Ty {
        Ty::Primitive(Primitive::Bool)
    }

    pub fn char() -> Ty {
        Ty::Primitive(Primitive::Char)
    }

    pub fn unit() -> Ty {
        Ty::Primitive(Primitive::Unit)
    }

    pub fn array(element: Ty) -> Ty {
        Ty::Array(Some(Box::new(element)))
    }

    pub fn empty_array() -> Ty {
        Ty::Array(None)
    }

    pub fn map(key: Ty, value: Ty) -> Ty {
        Ty::Map(Box::new(key), Box::new(value))
    }

    /// A function type whose parameters carry no modifiers.
    /// A tuple whose element types are all known.
    pub fn tuple(elements: Vec<Ty>) -> Ty {
        Ty::Tuple(elements.into_iter().map(Some).collect())
    }

    pub fn fun(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Fun(FnTy::new(params.into_iter().map(Param::new).collect(), ret))
    }

    pub fn generic(name: impl Into<String>) -> Ty {
        Ty::Generic(name.into())
    }

    pub fn unresolved(name: impl Into<String>) -> Ty {
        Ty::Unresolved(name.into())
    }

    pub fn as_fun(&self) -> Option<&FnTy> {
        match self {
            Ty::Fun(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Ty::Primitive(Primitive::Bool))
    }

    /// Declared name of a nominal or named type.
    pub fn name(&self) -> Option<&str> {
        match self {
            Ty::Primitive(p) => Some(p.name()),
            Ty::Generic(n) | Ty::Unresolved(n) => Some(n),
            Ty::Struct(s) => Some(&s.name),
            Ty::Data(d) => Some(&d.name),
            _ => None,
        }
    }

    /// Replace `Unresolved` names using `lookup`. Names `lookup` cannot
    /// answer stay `Unresolved`. Struct and data payloads are not entered:
    /// they are nominal and may refer to themselves.
    pub fn resolve_with(&self, lookup: &mut dyn FnMut(&str) -> Option<Ty>) -> Ty {
        match self {
            Ty::Unresolved(name) => lookup(name).unwrap_or_else(|| self.clone()),
            Ty::Array(Some(elem)) => Ty::array(elem.resolve_with(lookup)),
            Ty::Map(k, v) => Ty::map(k.resolve_with(lookup), v.resolve_with(lookup)),
            Ty::Tuple(elems) => Ty::Tuple(
                elems
                    .iter()
                    .map(|e| e.as_ref().map(|e| e.resolve_with(lookup)))
                    .collect(),
            ),
            Ty::Fun(f) => Ty::Fun(FnTy {
                params: f
                    .params
                    .iter()
                    .map(|p| Param {
                        modifier: p.modifier,
                        ty: p.ty.resolve_with(lookup),
                    })
                    .collect(),
                ret: Box::new(f.ret.resolve_with(lookup)),
            }),
            _ => self.clone(),
        }
    }

    /// Names still `Unresolved` anywhere inside this type.
    pub fn unresolved_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_unresolved(&mut out);
        out
    }

    fn collect_unresolved<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Ty::Unresolved(name) => out.push(name),
            Ty::Array(Some(elem)) => elem.collect_unresolved(out),
            Ty::Map(k, v) => {
                k.collect_unresolved(out);
                v.collect_unresolved(out);
            }
            Ty::Tuple(elems) => elems.iter().flatten().for_each(|e| e.collect_unresolved(out)),
            Ty::Fun(f) => {
                f.param_tys().for_each(|p| p.collect_unresolved(out));
                f.ret.collect_unresolved(out);
            }
            _ => {}
        }
    }

    /// Replace the generic parameter `name` with `with`.
    pub fn substitute(&self, name: &str, with: &Ty) -> Ty {
        match self {
            Ty::Generic(g) if g == name => with.clone(),
            Ty::Array(Some(elem)) => Ty::array(elem.substitute(name, with)),
            Ty::Map(k, v) => Ty::map(k.substitute(name, with), v.substitute(name, with)),
            Ty::Tuple(elems) => Ty::Tuple(
                elems
                    .iter()
                    .map(|e| e.as_ref().map(|e| e.substitute(name, with)))
                    .collect(),
            ),
            Ty::Fun(f) => Ty::Fun(f.substitute(name, with)),
            _ => self.clone(),
        }
    }
}

impl From<Primitive> for Ty {
    fn from(p: Primitive) -> Self {
        Ty::Primitive(p)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = impl fmt::Display>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.modifier {
            Some(m) => write!(f, "{} {}", m.name(), self.ty),
            None => write!(f, "{}", self.ty),
        }
    }
}

impl fmt::Display for FnTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_list(f, self.params.iter())?;
        write!(f, ") -> {}", self.ret)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Primitive(p) => write!(f, "{}", p),
            Ty::Array(Some(elem)) => write!(f, "[]{}", elem),
            Ty::Array(None) => write!(f, "[]"),
            Ty::Map(k, v) => write!(f, "{{{}: {}}}", k, v),
            Ty::Tuple(elems) => {
                write!(f, "(")?;
                let slots = elems.iter().map(|e| match e {
                    Some(ty) => ty.to_string(),
                    None => "?".to_owned(),
                });
                write_list(f, slots)?;
                write!(f, ")")
            }
            Ty::Fun(fun) => write!(f, "{}", fun),
            Ty::Generic(name) | Ty::Unresolved(name) => write!(f, "{}", name),
            Ty::Struct(s) => write!(f, "{}", s.name),
            Ty::Data(d) => write!(f, "{}", d.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names_round_trip() {
        for p in Primitive::ALL {
            assert_eq!(Primitive::from_name(p.name()), Some(p));
        }
        assert_eq!(Primitive::from_name("Str"), None);
        assert_eq!(Primitive::from_name("int"), None);
    }

    #[test]
    fn display_forms() {
        let f = Ty::Fun(FnTy::new(
            vec![Param::with_modifier(Modifier::Ref, Ty::int()), Param::new(Ty::array(Ty::string()))],
            Ty::map(Ty::string(), Ty::generic("t")),
        ));
        insta::assert_snapshot!(f.to_string(), @"(ref Int, []String) -> {String: t}");
        assert_eq!(Ty::tuple(vec![Ty::int(), Ty::bool()]).to_string(), "(Int, Bool)");
        assert_eq!(Ty::Tuple(vec![Some(Ty::int()), None]).to_string(), "(Int, ?)");
        assert_eq!(Ty::empty_array().to_string(), "[]");
        assert_eq!(Ty::unresolved("Point").to_string(), "Point");
    }

    #[test]
    fn resolve_replaces_known_names_only() {
        let point = Ty::Struct(StructTy::new("Point", vec![StructField::new("x", Ty::int())]));
        let ty = Ty::fun(
            vec![Ty::unresolved("Point"), Ty::unresolved("Missing")],
            Ty::array(Ty::unresolved("Point")),
        );
        let resolved = ty.resolve_with(&mut |name| (name == "Point").then(|| point.clone()));
        assert_eq!(resolved.unresolved_names(), vec!["Missing"]);
        let f = resolved.as_fun().unwrap();
        assert!(matches!(f.params[0].ty, Ty::Struct(_)));
        assert!(matches!(&*f.ret, Ty::Array(Some(e)) if matches!(**e, Ty::Struct(_))));
    }

    #[test]
    fn substitute_generic() {
        let show = Ty::fun(vec![Ty::generic("t")], Ty::string());
        let concrete = show.substitute("t", &Ty::int());
        assert_eq!(concrete, Ty::fun(vec![Ty::int()], Ty::string()));
        assert_eq!(show.substitute("u", &Ty::int()), show);
        let nested = Ty::map(Ty::string(), Ty::array(Ty::generic("v")));
        assert_eq!(nested.substitute("v", &Ty::int()).to_string(), "{String: []Int}");

        let sig = FnTy::new(vec![Param::with_modifier(Modifier::Ref, Ty::generic("t"))], Ty::generic("t"));
        insta::assert_snapshot!(sig.substitute("t", &Ty::float()).to_string(), @"(ref Float) -> Float");
    }

    #[test]
    fn struct_field_lookup_and_fields_match() {
        let a = StructTy::new(
            "Point",
            vec![
                StructField::new("x", Ty::int()),
                StructField::with_default("y", Ty::int(), Literal::Int(0)),
            ],
        );
        let b = StructTy::new(
            "Other",
            vec![StructField::new("y", Ty::int()), StructField::new("x", Ty::int())],
        );
        assert_eq!(a.field("y").and_then(|f| f.default.clone()), Some(Literal::Int(0)));
        assert!(a.field("z").is_none());
        assert!(a.fields_match(&b));
    }
}
