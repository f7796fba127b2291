//! Type declarations and type annotations.

use lyra_ast::{Stmt, StmtKind, TypeDecl};
use lyra_common::Location;
use lyra_syntax::{field, CstNode, SyntaxKind};
use lyra_types::{Constructor, DataTy, FnTy, Modifier, Param, Primitive, StructField, StructTy, Ty};
use tracing::trace;

use super::Collector;
use crate::error::{CollectionError, MemberKind};

impl Collector<'_> {
    /// `type_declaration` wrapping a `struct_type`/`data_type`, or either of
    /// those directly.
    pub(super) fn collect_type_decl<N: CstNode>(&mut self, node: N) -> Option<Stmt> {
        let location = self.location(node);
        let inner = match node.syntax_kind() {
            Some(SyntaxKind::STRUCT_TYPE | SyntaxKind::DATA_TYPE) => node,
            _ => match node.named_children().into_iter().find(|c| {
                matches!(
                    c.syntax_kind(),
                    Some(SyntaxKind::STRUCT_TYPE | SyntaxKind::DATA_TYPE)
                )
            }) {
                Some(inner) => inner,
                None => {
                    self.missing("struct_type or data_type", node);
                    return None;
                }
            },
        };
        let is_public = Self::has_visibility(node) || Self::has_visibility(inner);
        let decl = if inner.syntax_kind() == Some(SyntaxKind::STRUCT_TYPE) {
            self.collect_struct(inner, is_public)?
        } else {
            self.collect_data(inner, is_public)?
        };
        Some(Stmt::new(StmtKind::TypeDecl(decl), location))
    }

    fn collect_struct<N: CstNode>(&mut self, node: N, is_public: bool) -> Option<TypeDecl> {
        let Some(name) = Self::child_of_kind(node, SyntaxKind::STRUCT_NAME) else {
            self.missing("struct_name", node);
            return None;
        };
        let name = self.text(name).to_owned();
        let generic_params = self.collect_generic_params(node);
        let fields = match Self::child_of_kind(node, SyntaxKind::STRUCT_TYPE_BODY) {
            Some(body) => self.collect_fields(body, &name),
            None => Vec::new(),
        };
        Some(TypeDecl {
            ty: Ty::Struct(StructTy::new(name.clone(), fields)),
            name,
            generic_params,
            is_public,
        })
    }

    fn collect_data<N: CstNode>(&mut self, node: N, is_public: bool) -> Option<TypeDecl> {
        let Some(name) = Self::child_of_kind(node, SyntaxKind::DATA_TYPE_NAME) else {
            self.missing("data_type_name", node);
            return None;
        };
        let name = self.text(name).to_owned();
        let generic_params = self.collect_generic_params(node);

        let mut constructors: Vec<Constructor> = Vec::new();
        let mut seen: Vec<Location> = Vec::new();
        for child in Self::children_of_kind(node, SyntaxKind::DATA_TYPE_CONSTRUCTOR) {
            let Some((ctor, location)) = self.collect_constructor(child, &name) else {
                continue;
            };
            if let Some(i) = constructors.iter().position(|c| c.name == ctor.name) {
                self.error(CollectionError::DuplicateMember {
                    owner: name.clone(),
                    member: ctor.name,
                    kind: MemberKind::Constructor,
                    location,
                    previous: seen[i].clone(),
                });
                continue;
            }
            constructors.push(ctor);
            seen.push(location);
        }

        Some(TypeDecl {
            ty: Ty::Data(DataTy::new(name.clone(), constructors)),
            name,
            generic_params,
            is_public,
        })
    }

    /// `Leaf(Int)` or `Node { left: Tree, right: Tree }`. A constructor with
    /// a parameter type that fails to parse is dropped.
    fn collect_constructor<N: CstNode>(&mut self, node: N, owner: &str) -> Option<(Constructor, Location)> {
        let Some(name_node) = Self::child_of_kind(node, SyntaxKind::DATA_TYPE_CONSTRUCTOR_NAME) else {
            self.missing("data_type_constructor_name", node);
            return None;
        };
        let name = self.text(name_node).to_owned();
        let location = self.location(name_node);

        if let Some(body) = Self::child_of_kind(node, SyntaxKind::STRUCT_TYPE_BODY) {
            let fields = self.collect_fields(body, &format!("{}.{}", owner, name));
            return Some((Constructor::record(name, fields), location));
        }

        let mut params = Vec::new();
        let mut complete = true;
        for child in node.named_children() {
            let is_param = child.syntax_kind().is_some_and(|k| {
                k.is_type() || matches!(k, SyntaxKind::TYPE | SyntaxKind::FIELD_TYPE)
            });
            if !is_param {
                continue;
            }
            match self.parse_type(child) {
                Some(ty) => params.push(ty),
                None => complete = false,
            }
        }
        complete.then(|| (Constructor::positional(name, params), location))
    }

    /// Fields of a `struct_type_body`: `field_name`, `field_type` and an
    /// optional `default_value`, as flat siblings.
    fn collect_fields<N: CstNode>(&mut self, body: N, owner: &str) -> Vec<StructField> {
        let mut fields: Vec<StructField> = Vec::new();
        let mut seen: Vec<Location> = Vec::new();
        let mut pending: Option<(String, Location)> = None;
        // Index of the field a following `default_value` belongs to.
        let mut last: Option<usize> = None;

        for child in body.named_children() {
            match child.syntax_kind() {
                Some(SyntaxKind::FIELD_NAME) => {
                    pending = Some((self.text(child).to_owned(), self.location(child)));
                    last = None;
                }
                Some(SyntaxKind::FIELD_TYPE) => {
                    let Some((name, location)) = pending.take() else {
                        self.missing("field_name", child);
                        continue;
                    };
                    last = None;
                    let ty = self.parse_type(child);
                    if let Some(i) = fields.iter().position(|f| f.name == name) {
                        self.error(CollectionError::DuplicateMember {
                            owner: owner.to_owned(),
                            member: name,
                            kind: MemberKind::Field,
                            location,
                            previous: seen[i].clone(),
                        });
                        continue;
                    }
                    if let Some(ty) = ty {
                        fields.push(StructField::new(name, ty));
                        seen.push(location);
                        last = Some(fields.len() - 1);
                    }
                }
                Some(SyntaxKind::DEFAULT_VALUE) => {
                    let Some(i) = last.take() else {
                        continue;
                    };
                    match child.first_named_child() {
                        Some(value) if value.syntax_kind().is_some_and(SyntaxKind::is_literal) => {
                            if let Some(literal) = self.literal(value) {
                                fields[i].default = Some(literal);
                            }
                        }
                        Some(value) => self.malformed("default value", value),
                        None => self.missing("literal", child),
                    }
                }
                _ => trace!(kind = child.kind(), "skipping struct body node"),
            }
        }
        fields
    }

    pub(super) fn collect_generic_params<N: CstNode>(&self, node: N) -> Vec<String> {
        let Some(params) = Self::child_of_kind(node, SyntaxKind::GENERIC_PARAMETERS) else {
            return Vec::new();
        };
        params
            .named_children()
            .into_iter()
            .filter(|c| {
                matches!(
                    c.syntax_kind(),
                    Some(SyntaxKind::GENERIC_TYPE | SyntaxKind::IDENTIFIER)
                )
            })
            .map(|c| self.text(c).to_owned())
            .collect()
    }

    // ── Type expressions ───────────────────────────────────────────────

    /// Map a CST type node to a [`Ty`]. Wrapper nodes (`type`,
    /// `type_annotation`, `field_type`, `key_type`, `value_type`) are
    /// unwrapped. Returns `None` after recording an error.
    pub(super) fn parse_type<N: CstNode>(&mut self, node: N) -> Option<Ty> {
        let Some(kind) = node.syntax_kind() else {
            self.malformed("type", node);
            return None;
        };
        match kind {
            SyntaxKind::SIGNED_INTEGER_TYPE | SyntaxKind::UNSIGNED_INTEGER_TYPE | SyntaxKind::FLOAT_TYPE => {
                match Primitive::from_name(self.text(node)) {
                    Some(p) => Some(Ty::Primitive(p)),
                    None => {
                        let kind = format!("{} `{}`", node.kind(), self.text(node));
                        let location = self.location(node);
                        self.error(CollectionError::MalformedNode {
                            context: "type",
                            kind,
                            location,
                        });
                        None
                    }
                }
            }
            SyntaxKind::STRING_TYPE => Some(Ty::string()),
            SyntaxKind::BOOLEAN_TYPE => Some(Ty::bool()),
            SyntaxKind::CHAR_TYPE => Some(Ty::char()),
            SyntaxKind::UNIT_TYPE => Some(Ty::unit()),
            SyntaxKind::USER_DEFINED_TYPE_NAME => {
                let name = self.text(node);
                Some(match Primitive::from_name(name) {
                    Some(p) => Ty::Primitive(p),
                    None => Ty::unresolved(name),
                })
            }
            SyntaxKind::GENERIC_TYPE => Some(Ty::generic(self.text(node))),
            SyntaxKind::ARRAY_TYPE => match node.first_named_child() {
                Some(element) => self.parse_type(element).map(Ty::array),
                None => {
                    self.missing("element type", node);
                    None
                }
            },
            SyntaxKind::MAP_TYPE => {
                let key = Self::child_of_kind(node, SyntaxKind::KEY_TYPE);
                let value = Self::child_of_kind(node, SyntaxKind::VALUE_TYPE);
                let (Some(key), Some(value)) = (key, value) else {
                    self.missing("key_type and value_type", node);
                    return None;
                };
                let key = self.parse_type(key);
                let value = self.parse_type(value);
                Some(Ty::map(key?, value?))
            }
            SyntaxKind::TUPLE_TYPE => {
                let elements: Vec<Option<Ty>> = node
                    .named_children()
                    .into_iter()
                    .map(|c| self.parse_type(c))
                    .collect();
                elements.into_iter().collect::<Option<Vec<_>>>().map(Ty::tuple)
            }
            SyntaxKind::FUNCTION_TYPE => self.parse_function_type(node).map(Ty::Fun),
            SyntaxKind::FIELD_TYPE
            | SyntaxKind::TYPE
            | SyntaxKind::TYPE_ANNOTATION
            | SyntaxKind::KEY_TYPE
            | SyntaxKind::VALUE_TYPE => {
                match node.child_by_field_name(field::TYPE).or_else(|| node.first_named_child()) {
                    Some(inner) => self.parse_type(inner),
                    None => {
                        self.missing(field::TYPE, node);
                        None
                    }
                }
            }
            _ => {
                self.malformed("type", node);
                None
            }
        }
    }

    /// `(ref Int, []String) -> Bool`. Parameters come from the
    /// `parameter_types` field, a `parameter_types` child, or bare
    /// `parameter_type` children. The return type is required.
    pub(super) fn parse_function_type<N: CstNode>(&mut self, node: N) -> Option<FnTy> {
        let list = node
            .child_by_field_name(field::PARAMETER_TYPES)
            .or_else(|| Self::child_of_kind(node, SyntaxKind::PARAMETER_TYPES));
        let entries: Vec<N> = match list {
            Some(list) => list.named_children(),
            None => Self::children_of_kind(node, SyntaxKind::PARAMETER_TYPE),
        };

        let mut params = Vec::new();
        let mut complete = true;
        for entry in entries {
            let param = if entry.syntax_kind() == Some(SyntaxKind::PARAMETER_TYPE) {
                self.parse_parameter_type(entry)
            } else {
                self.parse_type(entry).map(Param::new)
            };
            match param {
                Some(param) => params.push(param),
                None => complete = false,
            }
        }

        let ret = self
            .required_field(node, field::RETURN_TYPE)
            .and_then(|r| self.parse_type(r));
        if !complete {
            return None;
        }
        Some(FnTy::new(params, ret?))
    }

    fn parse_parameter_type<N: CstNode>(&mut self, node: N) -> Option<Param> {
        let modifier = match node.child_by_field_name(field::MODIFIER) {
            Some(m) => match Modifier::from_name(self.text(m)) {
                Some(modifier) => Some(modifier),
                None => {
                    self.malformed("modifier", m);
                    None
                }
            },
            None => None,
        };
        let ty_node = node.child_by_field_name(field::TYPE).or_else(|| {
            node.named_children().into_iter().find(|c| {
                c.syntax_kind()
                    .is_some_and(|k| k.is_type() || k == SyntaxKind::TYPE)
            })
        });
        let Some(ty_node) = ty_node else {
            self.missing(field::TYPE, node);
            return None;
        };
        let ty = self.parse_type(ty_node)?;
        Some(Param { modifier, ty })
    }
}
